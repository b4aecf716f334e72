//! Fallible allocation of the two buffers a table owns outright: key copies
//! and bucket arrays.
//!
//! Both go through `try_reserve_exact`, so exhaustion comes back as an
//! `AllocError` instead of aborting. Test builds can force either site to
//! fail through `failpoint`.

use crate::chain::BindingKey;
use crate::error::AllocError;

/// Owned copy of `key`.
pub(crate) fn copy_key(key: &str) -> Result<Box<str>, AllocError> {
    let err = AllocError::KeyCopy { len: key.len() };
    #[cfg(test)]
    {
        if failpoint::hit(failpoint::Site::KeyCopy) {
            return Err(err);
        }
    }
    let mut s = String::new();
    s.try_reserve_exact(key.len()).map_err(|_| err)?;
    s.push_str(key);
    Ok(s.into_boxed_str())
}

/// Bucket array of `buckets` empty chains.
pub(crate) fn bucket_array(buckets: usize) -> Result<Vec<Option<BindingKey>>, AllocError> {
    let err = AllocError::BucketArray { buckets };
    #[cfg(test)]
    {
        if failpoint::hit(failpoint::Site::BucketArray) {
            return Err(err);
        }
    }
    let mut v = Vec::new();
    v.try_reserve_exact(buckets).map_err(|_| err)?;
    v.resize(buckets, None);
    Ok(v)
}
