//! Deterministic random number generation for session decisions.
//!
//! The only random decision in the game is the colour assignment on a
//! rematch. Every session receives its own `GameRng`, forked from the
//! registry's master generator, so a fixed master seed replays the same
//! sequence of assignments.
//!
//! ```
//! use rust_gomoku::core::GameRng;
//!
//! let mut master = GameRng::new(42);
//! let mut room_1 = master.fork();
//! let mut room_2 = master.fork();
//!
//! // Forks are independent of each other...
//! let a: Vec<_> = (0..32).map(|_| room_1.coin_flip()).collect();
//! let b: Vec<_> = (0..32).map(|_| room_2.coin_flip()).collect();
//! assert_ne!(a, b);
//!
//! // ...but reproducible from the master seed.
//! let mut replay = GameRng::new(42).fork();
//! let again: Vec<_> = (0..32).map(|_| replay.coin_flip()).collect();
//! assert_eq!(a, again);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable, forkable RNG.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Derive an independent child generator.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Fair coin.
    pub fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flips(rng: &mut GameRng, n: usize) -> Vec<bool> {
        (0..n).map(|_| rng.coin_flip()).collect()
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        assert_eq!(flips(&mut rng1, 64), flips(&mut rng2, 64));
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);
        assert_ne!(flips(&mut rng1, 64), flips(&mut rng2, 64));
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        let forked1 = rng1.fork();
        let forked2 = rng2.fork();

        assert_eq!(forked1.seed(), forked2.seed());
        assert_ne!(forked1.seed(), rng1.seed());
    }

    #[test]
    fn test_coin_is_not_constant() {
        let mut rng = GameRng::new(7);
        let seq = flips(&mut rng, 64);
        assert!(seq.iter().any(|&b| b));
        assert!(seq.iter().any(|&b| !b));
    }
}
