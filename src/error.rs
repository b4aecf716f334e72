//! Error types shared by both table backends.

use core::fmt;

/// An allocation the table attempted with `try_reserve_exact` failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Owned copy of a key of `len` bytes.
    KeyCopy { len: usize },
    /// Bucket array of `buckets` slots (creation or growth).
    BucketArray { buckets: usize },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::KeyCopy { len } => {
                write!(f, "failed to allocate a {len}-byte key copy")
            }
            AllocError::BucketArray { buckets } => {
                write!(f, "failed to allocate a bucket array of {buckets} slots")
            }
        }
    }
}

impl std::error::Error for AllocError {}

/// Why `try_put` did not insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    DuplicateKey,
    AllocFailed(AllocError),
}

impl From<AllocError> for InsertError {
    fn from(e: AllocError) -> Self {
        InsertError::AllocFailed(e)
    }
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("key already present"),
            InsertError::AllocFailed(e) => write!(f, "insert aborted: {e}"),
        }
    }
}

impl std::error::Error for InsertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InsertError::DuplicateKey => None,
            InsertError::AllocFailed(e) => Some(e),
        }
    }
}

/// Rejected growth-size sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthConfigError {
    Empty,
    ZeroSize { index: usize },
    /// `sizes[index]` is not strictly greater than `sizes[index - 1]`.
    NotAscending { index: usize },
}

impl fmt::Display for GrowthConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthConfigError::Empty => f.write_str("growth sequence is empty"),
            GrowthConfigError::ZeroSize { index } => {
                write!(f, "growth size at index {index} is zero")
            }
            GrowthConfigError::NotAscending { index } => write!(
                f,
                "growth size at index {index} does not exceed its predecessor"
            ),
        }
    }
}

impl std::error::Error for GrowthConfigError {}
