use super::{GeneratorState, SignalGenerator};
use std::f32::consts::PI;

/// Exponentially damped sine: `a sin(2π f t) e^(-k t)` for a fixed number of samples.
pub struct DampedSineGenerator {
    phase_per_sample: f32,
    decay_per_sample: f32,
    amplitude: f32,
    length: usize,
    // state
    position: usize,
    envelope: f32,
}

impl DampedSineGenerator {
    /// # Arguments
    /// * `frequency` - Frequency in Hz
    /// * `decay_rate` - Exponential decay constant k in 1/s
    /// * `amplitude` - Peak amplitude at t = 0
    /// * `length` - Number of samples produced before completing
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(
        frequency: f32,
        decay_rate: f32,
        amplitude: f32,
        length: usize,
        sample_rate: u32,
    ) -> Self {
        let dt = 1.0 / sample_rate as f32;
        Self {
            phase_per_sample: 2.0 * PI * frequency * dt,
            decay_per_sample: (-decay_rate.max(0.0) * dt).exp(),
            amplitude,
            length,
            position: 0,
            envelope: 1.0,
        }
    }
}

impl SignalGenerator for DampedSineGenerator {
    fn process(&mut self, buffer: &mut [f32]) -> GeneratorState {
        for sample in buffer.iter_mut() {
            if self.position < self.length {
                let phase = (self.phase_per_sample * self.position as f32) % (2.0 * PI);
                *sample = phase.sin() * self.envelope * self.amplitude;
                self.envelope *= self.decay_per_sample;
                self.position += 1;
            } else {
                *sample = 0.0;
            }
        }

        if self.is_complete() {
            GeneratorState::Complete
        } else {
            GeneratorState::Running
        }
    }

    fn is_complete(&self) -> bool {
        self.position >= self.length
    }

    fn reset(&mut self) {
        self.position = 0;
        self.envelope = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::render;

    #[test]
    fn test_starts_at_zero_and_decays() {
        let mut gen = DampedSineGenerator::new(100.0, 15.0, 0.5, 4410, 44_100);
        let out = render(&mut gen, 4410);
        assert_eq!(out[0], 0.0);
        assert!(out.iter().all(|s| s.abs() <= 0.5));
        let early = out[..441].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let late = out[3969..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(late < early);
        assert!(gen.is_complete());
    }

    #[test]
    fn test_silent_after_length() {
        let mut gen = DampedSineGenerator::new(1000.0, 1.0, 1.0, 100, 44_100);
        let mut frame = vec![1.0f32; 256];
        assert_eq!(gen.process(&mut frame), GeneratorState::Complete);
        assert!(frame[100..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_reset() {
        let mut gen = DampedSineGenerator::new(440.0, 15.0, 1.0, 512, 44_100);
        let a = render(&mut gen, 512);
        gen.reset();
        let b = render(&mut gen, 512);
        assert_eq!(a, b);
    }
}
