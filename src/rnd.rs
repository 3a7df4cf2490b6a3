//! Randomness source for backoff jitter.

use std::fmt::Debug;

use rand::Rng;

/// Non-cryptographic random number source used for jitter.
///
/// `Real` draws from the thread-local generator provided by `rand`, so
/// concurrent retry sequences never contend on a shared lock and never
/// share mutable generator state.
#[derive(Clone, Default)]
pub(crate) enum Rnd {
    #[default]
    Real,

    #[cfg(test)]
    Test(std::sync::Arc<dyn Fn(u64) -> u64 + Send + Sync>),
}

impl Debug for Rnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real => write!(f, "Real"),
            #[cfg(test)]
            Self::Test(_) => write!(f, "Test"),
        }
    }
}

impl Rnd {
    /// Always draws `bound - 1` (the top of the range), or `0` for an empty range.
    #[cfg(test)]
    pub fn new_max() -> Self {
        Self::Test(std::sync::Arc::new(|bound| bound.saturating_sub(1)))
    }

    /// Always draws `0`.
    #[cfg(test)]
    pub fn new_min() -> Self {
        Self::Test(std::sync::Arc::new(|_| 0))
    }

    /// Returns a uniformly distributed value in `[0, bound)`, or `0` when `bound` is `0`.
    pub fn below(&self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }

        match self {
            Self::Real => rand::rng().random_range(0..bound),
            #[cfg(test)]
            Self::Test(generator) => generator(bound).min(bound - 1),
        }
    }
}
