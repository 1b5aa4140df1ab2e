//! First-order tone filters and a biquad band-pass
//!
//! The one-pole filters are used for the gentle tilts applied after
//! synthesis (wood brightness, contact point). The band-pass shapes the
//! noise of the stick click.

use std::f32::consts::PI;

fn clamp_cutoff(cutoff: f32, sample_rate: u32) -> f32 {
    cutoff.clamp(10.0, sample_rate as f32 * 0.49)
}

/// One-pole low-pass (RC smoothing), in place.
pub fn one_pole_low_pass(samples: &mut [f32], cutoff: f32, sample_rate: u32) {
    if samples.is_empty() {
        return;
    }

    let rc = 1.0 / (2.0 * PI * clamp_cutoff(cutoff, sample_rate));
    let dt = 1.0 / sample_rate as f32;
    let alpha = dt / (rc + dt);

    let mut z1 = 0.0f32;
    for sample in samples.iter_mut() {
        z1 += alpha * (*sample - z1);
        *sample = z1;
    }
}

/// One-pole high-pass (RC differentiator), in place.
pub fn one_pole_high_pass(samples: &mut [f32], cutoff: f32, sample_rate: u32) {
    if samples.is_empty() {
        return;
    }

    let rc = 1.0 / (2.0 * PI * clamp_cutoff(cutoff, sample_rate));
    let dt = 1.0 / sample_rate as f32;
    let a = rc / (rc + dt);

    let mut prev_x = samples[0];
    let mut prev_y = 0.0f32;
    for sample in samples.iter_mut() {
        let x = *sample;
        let y = a * (prev_y + x - prev_x);
        prev_x = x;
        prev_y = y;
        *sample = y;
    }
}

/// Mix a filtered copy into the signal: `out = x * (1 - blend) + filtered * blend`.
///
/// A `blend` of zero or less leaves the signal untouched.
pub fn blend_filtered<F>(samples: &mut [f32], blend: f32, filter: F)
where
    F: FnOnce(&mut [f32]),
{
    if !(blend > 0.0) || samples.is_empty() {
        return;
    }
    let blend = blend.min(1.0);
    let mut filtered = samples.to_vec();
    filter(&mut filtered);
    for (s, f) in samples.iter_mut().zip(filtered) {
        *s = *s * (1.0 - blend) + f * blend;
    }
}

/// Direct form I biquad section
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Constant-peak band-pass (RBJ cookbook) covering `center ± bandwidth / 2`.
    ///
    /// Returns `None` when the band collapses after clamping to [20 Hz, 0.99 × Nyquist].
    pub fn band_pass(center: f32, bandwidth: f32, sample_rate: u32) -> Option<Self> {
        let nyquist = sample_rate as f32 / 2.0;
        let low = (center - bandwidth / 2.0).max(20.0);
        let high = (center + bandwidth / 2.0).min(nyquist * 0.99);
        if !(low < high) {
            return None;
        }
        let center = (low * high).sqrt();
        let q = (center / (high - low)).max(0.1);

        let omega = 2.0 * PI * center / sample_rate as f32;
        let alpha = omega.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        Some(Self {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: -2.0 * omega.cos() / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        })
    }

    pub fn process(&mut self, x0: f32) -> f32 {
        let y0 = self.b0 * x0 + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;
        y0
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Band-pass a buffer in place; a degenerate band leaves it untouched.
///
/// # Arguments
/// * `samples` - Signal to filter
/// * `center` - Center frequency in Hz
/// * `bandwidth` - Width of the pass band in Hz
/// * `sample_rate` - Sample rate in Hz
pub fn band_pass(samples: &mut [f32], center: f32, bandwidth: f32, sample_rate: u32) {
    if let Some(mut biquad) = Biquad::band_pass(center, bandwidth, sample_rate) {
        for sample in samples.iter_mut() {
            *sample = biquad.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44_100;

    fn sine(freq: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / SR as f32).sin())
            .collect()
    }

    fn energy(samples: &[f32]) -> f32 {
        samples.iter().map(|s| s * s).sum()
    }

    #[test]
    fn test_low_pass_attenuates_highs() {
        let mut samples = sine(8000.0, 4000);
        let before = energy(&samples);
        one_pole_low_pass(&mut samples, 500.0, SR);
        assert!(energy(&samples) < before * 0.2);
    }

    #[test]
    fn test_high_pass_attenuates_lows() {
        let mut samples = sine(50.0, 8000);
        let before = energy(&samples);
        one_pole_high_pass(&mut samples, 2000.0, SR);
        assert!(energy(&samples) < before * 0.1);
    }

    #[test]
    fn test_band_pass_prefers_center() {
        let mut inside = sine(2000.0, 8000);
        let mut outside = sine(100.0, 8000);
        band_pass(&mut inside, 2000.0, 800.0, SR);
        band_pass(&mut outside, 2000.0, 800.0, SR);
        assert!(energy(&inside) > energy(&outside) * 10.0);
    }

    #[test]
    fn test_degenerate_band() {
        assert!(Biquad::band_pass(10.0, 5.0, SR).is_none());
        let original = sine(440.0, 64);
        let mut samples = original.clone();
        band_pass(&mut samples, 10.0, 5.0, SR);
        assert_eq!(samples, original);
    }

    #[test]
    fn test_blend_zero_is_identity() {
        let original = sine(440.0, 256);
        let mut samples = original.clone();
        blend_filtered(&mut samples, 0.0, |s| one_pole_low_pass(s, 100.0, SR));
        assert_eq!(samples, original);
    }

    #[test]
    fn test_filters_empty() {
        let mut empty: Vec<f32> = vec![];
        one_pole_low_pass(&mut empty, 1000.0, SR);
        one_pole_high_pass(&mut empty, 1000.0, SR);
        band_pass(&mut empty, 1000.0, 200.0, SR);
        assert!(empty.is_empty());
    }
}
