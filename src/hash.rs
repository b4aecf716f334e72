//! Polynomial rolling hash used to place keys into buckets.

/// Multiplier folded into the running hash for every key byte.
pub const HASH_MULTIPLIER: usize = 65599;

/// Bucket index of `key` in a table of `bucket_count` buckets.
///
/// Computes `h = h * 65599 + byte` over the key's bytes with wrapping
/// `usize` arithmetic, then reduces modulo `bucket_count`. Bytes are
/// folded in as unsigned values.
///
/// # Panics
///
/// Panics if `bucket_count` is zero. Tables never hold an empty bucket
/// array, since `GrowthSizes` rejects zero sizes.
#[inline]
pub fn hash_key(key: &str, bucket_count: usize) -> usize {
    key.bytes()
        .fold(0usize, |h, b| {
            h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(b as usize)
        })
        % bucket_count
}
