//! Seedable randomness
//!
//! Every randomized decision in the crate (instrument variation, timing and
//! velocity jitter, variant selection, detuning, noise) draws from an RNG passed
//! in by the caller. Renders are reproducible for a fixed seed.

use rand::Rng;
use rand_pcg::Pcg32;

/// The RNG used by the render pipeline and the tests.
pub type RenderRng = Pcg32;

/// Normal-distribution sampling on top of any [`Rng`].
pub trait Gaussian: Rng {
    /// Sample from N(mean, std) using the Box-Muller transform.
    ///
    /// A zero or negative `std` returns `mean` without consuming randomness.
    fn normal(&mut self, mean: f64, std: f64) -> f64 {
        if !(std > 0.0) {
            return mean;
        }
        let u1: f64 = self.random_range(f64::MIN_POSITIVE..1.0);
        let u2: f64 = self.random();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + z * std
    }

    /// Uniform sample in `[center * (1 - spread), center * (1 + spread)]`.
    fn around(&mut self, center: f64, spread: f64) -> f64 {
        if spread <= 0.0 {
            return center;
        }
        center * self.random_range(1.0 - spread..=1.0 + spread)
    }
}

impl<R: Rng + ?Sized> Gaussian for R {}

/// Derive an independent child seed from a parent seed and a key.
///
/// FNV-1a over the key, folded into the parent and finished with SplitMix64.
pub fn derive_seed(parent: u64, key: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in key.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    let mut z = parent ^ hash;
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
