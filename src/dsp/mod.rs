//! Buffer utilities and filters shared by synthesis and mixing

pub mod filters;

pub use filters::{band_pass, blend_filtered, one_pole_high_pass, one_pole_low_pass, Biquad};

/// Largest absolute sample value (0.0 for an empty buffer).
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

/// Scale the buffer so its peak equals `target`. Silent buffers are left alone.
pub fn normalize_to(samples: &mut [f32], target: f32) {
    let max = peak(samples);
    if max > 0.0 {
        let factor = target / max;
        for s in samples.iter_mut() {
            *s *= factor;
        }
    }
}

/// Replace a buffer holding NaN or infinite samples with silence.
///
/// Returns `true` if the buffer had to be cleared.
pub fn sanitize(samples: &mut [f32]) -> bool {
    if samples.iter().all(|s| s.is_finite()) {
        return false;
    }
    samples.iter_mut().for_each(|s| *s = 0.0);
    true
}

/// Add `source` into `target` starting at `offset`, clipped to the target's end.
///
/// Returns the number of samples written.
pub fn accumulate(target: &mut [f32], source: &[f32], offset: usize, gain: f32) -> usize {
    if offset >= target.len() {
        return 0;
    }
    let n = source.len().min(target.len() - offset);
    for (t, s) in target[offset..offset + n].iter_mut().zip(&source[..n]) {
        *t += s * gain;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak() {
        assert_eq!(peak(&[]), 0.0);
        assert_eq!(peak(&[0.1, -0.7, 0.5]), 0.7);
    }

    #[test]
    fn test_normalize_to() {
        let mut samples = vec![0.25, -0.5, 0.1];
        normalize_to(&mut samples, 0.8);
        assert!((peak(&samples) - 0.8).abs() < 1e-6);
        assert!((samples[0] - 0.4).abs() < 1e-6);

        let mut silent = vec![0.0; 4];
        normalize_to(&mut silent, 1.0);
        assert_eq!(silent, vec![0.0; 4]);
    }

    #[test]
    fn test_sanitize() {
        let mut ok = vec![0.1, 0.2];
        assert!(!sanitize(&mut ok));
        assert_eq!(ok, vec![0.1, 0.2]);

        let mut bad = vec![0.1, f32::NAN, 0.3];
        assert!(sanitize(&mut bad));
        assert_eq!(bad, vec![0.0; 3]);
    }

    #[test]
    fn test_accumulate_clips_at_end() {
        let mut target = vec![0.0; 5];
        let written = accumulate(&mut target, &[1.0, 1.0, 1.0], 3, 0.5);
        assert_eq!(written, 2);
        assert_eq!(target, vec![0.0, 0.0, 0.0, 0.5, 0.5]);

        assert_eq!(accumulate(&mut target, &[1.0], 10, 1.0), 0);
    }
}
