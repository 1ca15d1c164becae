//! Deterministic Random Number Generator
//!
//! Uses Xorshift128+ for fast, high-quality, deterministic randomness.
//! Seeded from an arbitrary string, the stream produces the same sequence
//! on every platform, which is what makes puzzles shareable by seed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Deterministic PRNG using the Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Two streams built from the same seed string produce the exact same
/// sequence of values on any platform. Entropy-seeded streams carry no
/// such promise.
///
/// # Example
///
/// ```
/// use pupiletras::core::rng::SeededRng;
///
/// let mut a = SeededRng::from_seed("amigos2025");
/// let mut b = SeededRng::from_seed("amigos2025");
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeededRng {
    state: [u64; 2],
}

impl SeededRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // State must never be all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Create an RNG from a seed string.
    ///
    /// Any string is a valid seed, including the empty string.
    pub fn from_seed(seed: &str) -> Self {
        Self::new(derive_seed(seed))
    }

    /// Create an RNG with no reproducibility promise.
    ///
    /// Seeds from the system clock; used when no seed string was supplied.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED);
        Self::new(nanos)
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random float in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        // 53 significant bits, the float mantissa width
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Generate a random integer in range `[0, max)`.
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Simple modulo - slight bias for very large max, but acceptable
        (self.next_u64() % max as u64) as u32
    }

    /// Generate a random integer in range `[min, max]` inclusive.
    #[inline]
    pub fn next_int_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let range = (max - min + 1) as u32;
        min + self.next_int(range) as i32
    }

    /// Select a random element from a slice.
    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.next_int(slice.len() as u32) as usize;
            Some(&slice[idx])
        }
    }

    /// Shuffle a slice in place using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        for i in (1..len).rev() {
            let j = self.next_int((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a 64-bit seed from a seed string.
///
/// Hashes the string under a domain separator and takes the first 8
/// bytes, so near-identical seed strings still land far apart.
pub fn derive_seed(seed: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(b"PUPILETRAS_SEED_V1");
    hasher.update(seed.as_bytes());
    let hash = hasher.finalize();

    u64::from_le_bytes(hash[0..8].try_into().expect("hash is 32 bytes"))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        // Same seed string must produce same sequence
        let mut rng1 = SeededRng::from_seed("amigos2025");
        let mut rng2 = SeededRng::from_seed("amigos2025");

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SeededRng::from_seed("amigos2025");
        let mut rng2 = SeededRng::from_seed("amigos2026");

        // Very unlikely to match
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_empty_seed_is_valid() {
        let mut rng1 = SeededRng::from_seed("");
        let mut rng2 = SeededRng::from_seed("");
        assert_eq!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_derive_seed_stability() {
        // Seed derivation is part of the share-link contract; if it
        // drifts, previously shared puzzles regenerate differently.
        assert_eq!(derive_seed("amigos2025"), derive_seed("amigos2025"));
        assert_ne!(derive_seed("amigos2025"), derive_seed("amigos2025 "));
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = SeededRng::from_seed("floats");
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_int() {
        let mut rng = SeededRng::new(1234);

        for _ in 0..1000 {
            let val = rng.next_int(100);
            assert!(val < 100);
        }

        // Edge case: max = 0
        assert_eq!(rng.next_int(0), 0);

        // Edge case: max = 1
        assert_eq!(rng.next_int(1), 0);
    }

    #[test]
    fn test_next_int_range() {
        let mut rng = SeededRng::new(5678);

        for _ in 0..1000 {
            let val = rng.next_int_range(-10, 10);
            assert!((-10..=10).contains(&val));
        }

        // Edge case: min = max
        assert_eq!(rng.next_int_range(5, 5), 5);
    }

    #[test]
    fn test_pick() {
        let mut rng = SeededRng::new(42);
        let items = [10, 20, 30];

        for _ in 0..100 {
            assert!(items.contains(rng.pick(&items).unwrap()));
        }

        let empty: [i32; 0] = [];
        assert!(rng.pick(&empty).is_none());
    }

    #[test]
    fn test_shuffle_determinism() {
        let mut rng1 = SeededRng::from_seed("shuffle");
        let mut rng2 = SeededRng::from_seed("shuffle");

        let mut arr1 = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut arr2 = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        rng1.shuffle(&mut arr1);
        rng2.shuffle(&mut arr2);

        assert_eq!(arr1, arr2);
    }

    #[test]
    fn test_entropy_stream_is_usable() {
        // Not a reproducibility test - just confirms the unseeded
        // constructor yields a working stream.
        let mut rng = SeededRng::from_entropy();
        assert!(rng.next_int(10) < 10);
    }
}
