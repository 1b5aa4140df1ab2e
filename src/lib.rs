//! Physically-informed rendering of a traditional percussion ensemble.
//!
//! A symbolic stroke sequence is assigned to the players of a simulated
//! chendamelam ensemble, every stroke is synthesized from a shared partial
//! bank with stick/membrane physics applied on top, and the player tracks are
//! spatialized and mastered into a single bus.
//!
//! - [`material`]: wood, membrane, stick and body properties
//! - [`physics`]: stick impact modelling
//! - [`generator`] / [`synthesis`]: additive synthesis over the partial bank
//! - [`ensemble`]: instruments and players
//! - [`pipeline`]: stroke notation, orchestration, mixing and the render pipeline

pub mod config;
pub mod dsp;
pub mod ensemble;
pub mod error;
pub mod generator;
pub mod material;
pub mod physics;
pub mod pipeline;
pub mod rng;
pub mod synthesis;
pub mod wav;

pub use error::{Error, Result};

/// Output sample rate used throughout the crate unless configured otherwise.
pub const SAMPLE_RATE: u32 = 44_100;

/// Number of samples covering `duration` seconds; non-positive durations give zero.
pub fn samples_for(duration: f32, sample_rate: u32) -> usize {
    if !(duration > 0.0) {
        return 0;
    }
    (duration as f64 * sample_rate as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_for() {
        assert_eq!(samples_for(1.0, SAMPLE_RATE), 44_100);
        assert_eq!(samples_for(2.0, SAMPLE_RATE), 88_200);
        assert_eq!(samples_for(0.0, SAMPLE_RATE), 0);
        assert_eq!(samples_for(-1.0, SAMPLE_RATE), 0);
        assert_eq!(samples_for(f32::NAN, SAMPLE_RATE), 0);
    }
}
