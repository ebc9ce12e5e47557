//! Random source for `random` columns.

use super::spec::MAX_RANDOM_LENGTH;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// 26 lowercase, 26 uppercase, 10 digits.
pub const ALPHANUMERIC: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draw `length` characters uniformly from [`ALPHANUMERIC`].
pub fn random_alphanumeric(rng: &mut dyn RngCore, length: usize) -> String {
    let mut out = String::with_capacity(length.min(MAX_RANDOM_LENGTH));
    for _ in 0..length {
        let idx = rng.random_range(0..ALPHANUMERIC.len());
        out.push(ALPHANUMERIC[idx] as char);
    }
    out
}

/// Seed derived from the wall clock, used when no seed is given.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
