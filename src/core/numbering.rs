//! Invoice number candidates
//!
//! Numbers are `INV-` followed by four zero-padded digits drawn uniformly
//! from `0..=9999`. They are suggestions only and are not checked for
//! uniqueness.

use rand::Rng;

pub const PREFIX: &str = "INV-";

/// Draw a fresh candidate from the thread-local RNG
pub fn generate() -> String {
    generate_with(&mut rand::rng())
}

/// Draw a candidate from the given RNG
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let n: u16 = rng.random_range(0..=9999);
    format!("{}{:04}", PREFIX, n)
}
