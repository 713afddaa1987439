//! Deterministic random number generation.
//!
//! The engine itself makes no random decisions during membership
//! tracking. Randomness is only used when a zone ejects subjects to a
//! named spawn set, and that choice must be reproducible from a seed so
//! hosts can replay a session.
//!
//! ```
//! use zone_engine::core::EngineRng;
//!
//! let points = [1, 2, 3, 4, 5];
//! let mut a = EngineRng::new(42);
//! let mut b = EngineRng::new(42);
//! assert_eq!(a.choose(&points), b.choose(&points));
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 RNG.
#[derive(Clone, Debug)]
pub struct EngineRng {
    inner: ChaCha8Rng,
}

impl EngineRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}
