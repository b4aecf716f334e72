//! Growth tiers: the ascending bucket counts a hash table moves through.

use crate::error::GrowthConfigError;

/// Prime bucket counts used when no sequence is configured.
pub const DEFAULT_GROWTH_SIZES: [usize; 8] =
    [509, 1021, 2039, 4093, 8191, 16381, 32749, 65521];

/// Validated, strictly ascending sequence of non-zero bucket counts.
///
/// A table starts at `sizes[0]` and advances one tier per rehash; once the
/// last tier is reached it stops growing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthSizes {
    sizes: Box<[usize]>,
}

impl GrowthSizes {
    pub fn new(sizes: Vec<usize>) -> Result<Self, GrowthConfigError> {
        if sizes.is_empty() {
            return Err(GrowthConfigError::Empty);
        }
        if let Some(index) = sizes.iter().position(|&s| s == 0) {
            return Err(GrowthConfigError::ZeroSize { index });
        }
        if let Some(w) = sizes.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GrowthConfigError::NotAscending { index: w + 1 });
        }
        Ok(Self {
            sizes: sizes.into_boxed_slice(),
        })
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of tiers; always at least one.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bucket count of the initial tier.
    pub fn first(&self) -> usize {
        self.sizes[0]
    }

    pub fn get(&self, tier: usize) -> Option<usize> {
        self.sizes.get(tier).copied()
    }

    pub(crate) fn is_last(&self, tier: usize) -> bool {
        tier + 1 >= self.sizes.len()
    }
}

impl Default for GrowthSizes {
    fn default() -> Self {
        Self {
            sizes: Box::new(DEFAULT_GROWTH_SIZES),
        }
    }
}

impl TryFrom<Vec<usize>> for GrowthSizes {
    type Error = GrowthConfigError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}
