use super::{GeneratorState, SignalGenerator};
use crate::dsp::Biquad;
use crate::rng::RenderRng;
use rand::{Rng, SeedableRng};

/// Band-limited white noise burst with an exponential decay
///
/// Models the click of a stick meeting the head. The noise stream is seeded,
/// so [`reset`](SignalGenerator::reset) replays the identical burst.
pub struct NoiseBurstGenerator {
    seed: u64,
    filter: Option<Biquad>,
    decay_per_sample: f32,
    amplitude: f32,
    length: usize,
    // state
    rng: RenderRng,
    position: usize,
    envelope: f32,
}

impl NoiseBurstGenerator {
    /// # Arguments
    /// * `center` - Band center in Hz
    /// * `bandwidth` - Band width in Hz
    /// * `time_constant` - Envelope time constant τ in seconds, `e^(-t/τ)`
    /// * `amplitude` - Output scale
    /// * `length` - Number of samples produced before completing
    /// * `sample_rate` - Sample rate in Hz
    /// * `seed` - Seed of the noise stream
    pub fn new(
        center: f32,
        bandwidth: f32,
        time_constant: f32,
        amplitude: f32,
        length: usize,
        sample_rate: u32,
        seed: u64,
    ) -> Self {
        let decay_per_sample = if time_constant > 0.0 {
            (-1.0 / (time_constant * sample_rate as f32)).exp()
        } else {
            0.0
        };
        Self {
            seed,
            filter: Biquad::band_pass(center, bandwidth, sample_rate),
            decay_per_sample,
            amplitude,
            length,
            rng: RenderRng::seed_from_u64(seed),
            position: 0,
            envelope: 1.0,
        }
    }
}

impl SignalGenerator for NoiseBurstGenerator {
    fn process(&mut self, buffer: &mut [f32]) -> GeneratorState {
        for sample in buffer.iter_mut() {
            if self.position < self.length {
                let white: f32 = self.rng.random_range(-1.0..1.0);
                let colored = match self.filter.as_mut() {
                    Some(filter) => filter.process(white),
                    None => white,
                };
                *sample = colored * self.envelope * self.amplitude;
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
        self.rng = RenderRng::seed_from_u64(self.seed);
        if let Some(filter) = self.filter.as_mut() {
            filter.reset();
        }
        self.position = 0;
        self.envelope = 1.0;
    }
}
