//! Deterministic daily selection.
//!
//! The shuffle is a Fisher-Yates pass driven by a ChaCha8 stream whose key is
//! the SHA-256 digest of the seed string, so the order depends only on the
//! input sequence and the seed bytes.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

fn rng_for_seed(seed: &str) -> ChaCha8Rng {
    let digest: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
    ChaCha8Rng::from_seed(digest)
}

/// Return a permutation of `items` that is fixed for a given `seed`.
///
/// The input slice is left untouched.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let mut shuffled = items.to_vec();
    if shuffled.len() < 2 {
        return shuffled;
    }

    let mut rng = rng_for_seed(seed);
    for i in (1..shuffled.len()).rev() {
        // Modulo draw keeps the sequence independent of rand's sampling internals.
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        shuffled.swap(i, j);
    }

    shuffled
}

/// Map a day number onto `[0, total_count)` with floored modulo.
///
/// # Panics
///
/// Panics if `total_count` is zero. Callers reject empty track lists first.
pub fn select_daily_index(full_days_since_epoch: i64, total_count: usize) -> usize {
    assert!(total_count > 0, "select_daily_index requires a non-empty list");
    full_days_since_epoch.rem_euclid(total_count as i64) as usize
}
