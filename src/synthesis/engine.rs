use rand::Rng;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

use super::{PartialBank, SoundCategory};
use crate::config::EnsemblingConfig;
use crate::dsp;
use crate::generator::synthesize_additive;
use crate::rng::Gaussian;
use crate::samples_for;

/// Randomized parameters of one virtual performer
struct Layer<'a> {
    partials: &'a [super::Partial],
    detune: f32,
    velocity: f32,
    /// Onset shift in samples; negative pulls the strike earlier
    shift: isize,
}

/// Renders sound categories from a shared, read-only partial bank
///
/// Every request layers several virtual performers, each striking a randomly
/// chosen variant with its own detune, velocity and timing, so a hit sounds
/// like a section of drummers rather than a single drum.
#[derive(Debug, Clone)]
pub struct SpectralEngine {
    bank: Arc<PartialBank>,
    config: EnsemblingConfig,
    sample_rate: u32,
}

impl SpectralEngine {
    pub fn new(bank: Arc<PartialBank>, config: EnsemblingConfig, sample_rate: u32) -> Self {
        Self {
            bank,
            config,
            sample_rate,
        }
    }

    pub fn bank(&self) -> &PartialBank {
        &self.bank
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render `duration` seconds of `category` peaking at `velocity`.
    ///
    /// Always returns `round(duration × sample_rate)` samples. Categories
    /// without variants (including REST) give silence.
    ///
    /// # Arguments
    /// * `category` - Sound category to render
    /// * `velocity` - Peak amplitude of the result, 0.0 to 1.0
    /// * `duration` - Length in seconds
    /// * `rng` - Source of the per-layer variation
    pub fn get_sound<R: Rng + ?Sized>(
        &self,
        category: SoundCategory,
        velocity: f32,
        duration: f32,
        rng: &mut R,
    ) -> Vec<f32> {
        let len = samples_for(duration, self.sample_rate);
        let variants = self.bank.variants(category);
        if variants.is_empty() || len == 0 {
            debug!(%category, "no variants, rendering silence");
            return vec![0.0; len];
        }
        let velocity = velocity.clamp(0.0, 1.0);
        let jitter = self.config.velocity_jitter;

        let layers: Vec<Layer> = (0..self.config.layers)
            .map(|_| {
                let variant = &variants[rng.random_range(0..variants.len())];
                let detune = rng.normal(1.0, self.config.detune_std) as f32;
                let scale = if jitter > 0.0 {
                    rng.random_range(1.0 - jitter..=1.0 + jitter)
                } else {
                    1.0
                };
                let offset = rng.normal(0.0, self.config.timing_std_s);
                let shift = (offset.abs() * self.sample_rate as f64) as isize;
                Layer {
                    partials: &variant.partials,
                    detune,
                    velocity: velocity * scale as f32,
                    shift: if offset < 0.0 { -shift } else { shift },
                }
            })
            .collect();

        let rendered: Vec<Vec<f32>> = layers
            .par_iter()
            .map(|layer| {
                let strike = synthesize_additive(
                    layer.partials,
                    layer.detune,
                    len,
                    self.sample_rate,
                    layer.velocity,
                );
                shifted(&strike, layer.shift)
            })
            .collect();

        let mut mix = vec![0.0f32; len];
        for layer in &rendered {
            dsp::accumulate(&mut mix, layer, 0, 1.0);
        }
        dsp::normalize_to(&mut mix, velocity);
        mix
    }
}

/// Shift a buffer by `shift` samples within its own length.
fn shifted(samples: &[f32], shift: isize) -> Vec<f32> {
    let len = samples.len();
    let mut out = vec![0.0f32; len];
    let n = shift.unsigned_abs().min(len);
    if shift >= 0 {
        out[n..].copy_from_slice(&samples[..len - n]);
    } else {
        out[..len - n].copy_from_slice(&samples[n..]);
    }
    out
}
