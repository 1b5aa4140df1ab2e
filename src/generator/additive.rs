use super::{render, GeneratorState, SignalGenerator};
use crate::dsp;
use crate::synthesis::Partial;
use std::f64::consts::PI;

/// Partials quieter than this are never started
const MIN_PARTIAL_AMPLITUDE: f32 = 0.001;
/// A partial whose envelope falls below this stops contributing
const SILENCE_THRESHOLD: f64 = 1e-5;
/// Inharmonic stretch of a stiff membrane: f' = f (1 + STRETCH f)
const STRETCH: f64 = 0.00005;

/// Fixed frequency-shaping gain applied to a partial.
///
/// Thins out the mud below 80 Hz, lifts the body and wood warmth up to
/// 450 Hz and keeps metallic ringing above 5 kHz down.
pub fn band_gain(freq: f32) -> f32 {
    match freq {
        f if f < 80.0 => 0.4,
        f if f < 180.0 => 1.2,
        f if f < 450.0 => 1.6,
        f if f < 800.0 => 1.1,
        f if f < 2500.0 => 0.8,
        f if f < 5000.0 => 0.6,
        _ => 0.1,
    }
}

/// One damped sine partial
#[derive(Debug, Clone)]
struct Oscillator {
    omega: f64,
    amplitude: f64,
    body_step: f64,
    transient_step: f64,
    transient_mix: f64,
    // state
    body_env: f64,
    transient_env: f64,
    active: bool,
}

impl Oscillator {
    fn new(partial: &Partial, detune: f32, sample_rate: u32) -> Option<Self> {
        if !(partial.amplitude >= MIN_PARTIAL_AMPLITUDE) {
            return None;
        }
        let freq = partial.frequency as f64 * detune as f64;
        if !(freq > 0.0) {
            return None;
        }
        let target = freq * (1.0 + freq * STRETCH);
        let omega = 2.0 * PI * target;
        // Slight even-harmonic saturation
        let distortion = 1.0 + 0.1 * (omega * 0.002).sin().abs();
        let gain = band_gain(freq as f32) as f64;
        let dt = 1.0 / sample_rate as f64;
        let decay = partial.decay.max(0.0) as f64;

        Some(Self {
            omega: omega * dt,
            amplitude: partial.amplitude as f64 * gain * distortion,
            body_step: (-5.0 * decay * dt).exp(),
            transient_step: (-500.0 * dt).exp(),
            transient_mix: if freq > 1000.0 { 0.4 } else { 0.0 },
            body_env: 1.0,
            transient_env: 1.0,
            active: true,
        })
    }

    fn reset(&mut self) {
        self.body_env = 1.0;
        self.transient_env = 1.0;
        self.active = true;
    }
}

/// Additive voice summing the damped partials of one acoustic signature
///
/// Each partial `(f, a, d)` is detuned, stretched and shaped by [`band_gain`],
/// then rings with the envelope
/// `exp(-5 d t) + w exp(-500 t)` where `w = 0.4` above 1 kHz and 0 otherwise.
/// The voice completes once every partial has decayed below audibility.
#[derive(Debug, Clone)]
pub struct AdditiveVoice {
    oscillators: Vec<Oscillator>,
    position: usize,
}

impl AdditiveVoice {
    /// Create a voice
    ///
    /// # Arguments
    /// * `partials` - Absolute frequencies (Hz), amplitudes and decay scales
    /// * `detune` - Frequency multiplier applied to every partial
    /// * `sample_rate` - Output sample rate in Hz
    pub fn new(partials: &[Partial], detune: f32, sample_rate: u32) -> Self {
        Self {
            oscillators: partials
                .iter()
                .filter_map(|p| Oscillator::new(p, detune, sample_rate))
                .collect(),
            position: 0,
        }
    }

    /// Number of partials that survived the amplitude floor
    pub fn partial_count(&self) -> usize {
        self.oscillators.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl SignalGenerator for AdditiveVoice {
    fn process(&mut self, buffer: &mut [f32]) -> GeneratorState {
        buffer.fill(0.0);

        for osc in self.oscillators.iter_mut().filter(|o| o.active) {
            for (i, sample) in buffer.iter_mut().enumerate() {
                let total = (osc.body_env + osc.transient_mix * osc.transient_env) * osc.amplitude;
                if total < SILENCE_THRESHOLD {
                    osc.active = false;
                    break;
                }
                let phase = osc.omega * (self.position + i) as f64;
                *sample += (phase.sin() * total) as f32;
                osc.body_env *= osc.body_step;
                osc.transient_env *= osc.transient_step;
            }
        }

        self.position += buffer.len();

        if self.is_complete() {
            GeneratorState::Complete
        } else {
            GeneratorState::Running
        }
    }

    fn is_complete(&self) -> bool {
        self.oscillators.iter().all(|o| !o.active)
    }

    fn reset(&mut self) {
        self.oscillators.iter_mut().for_each(Oscillator::reset);
        self.position = 0;
    }
}

/// Render one strike of a partial list, peak-normalized to `velocity`.
///
/// # Arguments
/// * `partials` - Partials of the acoustic signature
/// * `detune` - Frequency multiplier
/// * `len` - Output length in samples
/// * `sample_rate` - Sample rate in Hz
/// * `velocity` - Target peak amplitude
pub fn synthesize_additive(
    partials: &[Partial],
    detune: f32,
    len: usize,
    sample_rate: u32,
    velocity: f32,
) -> Vec<f32> {
    let mut voice = AdditiveVoice::new(partials, detune, sample_rate);
    let mut output = render(&mut voice, len);
    dsp::normalize_to(&mut output, velocity);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44_100;

    fn partial(frequency: f32, amplitude: f32, decay: f32) -> Partial {
        Partial {
            frequency,
            amplitude,
            decay,
        }
    }

    #[test]
    fn test_band_gain_table() {
        assert_eq!(band_gain(60.0), 0.4);
        assert_eq!(band_gain(100.0), 1.2);
        assert_eq!(band_gain(300.0), 1.6);
        assert_eq!(band_gain(600.0), 1.1);
        assert_eq!(band_gain(1000.0), 0.8);
        assert_eq!(band_gain(3000.0), 0.6);
        assert_eq!(band_gain(8000.0), 0.1);
    }

    #[test]
    fn test_normalized_to_velocity() {
        let partials = [partial(280.0, 1.0, 2.0), partial(640.0, 0.5, 1.0)];
        let out = synthesize_additive(&partials, 1.0, 4410, SR, 0.7);
        assert_eq!(out.len(), 4410);
        assert!((dsp::peak(&out) - 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_quiet_partials_are_skipped() {
        let voice = AdditiveVoice::new(
            &[partial(200.0, 0.0005, 1.0), partial(300.0, 0.5, 1.0)],
            1.0,
            SR,
        );
        assert_eq!(voice.partial_count(), 1);
    }

    #[test]
    fn test_empty_partials_are_silent() {
        let out = synthesize_additive(&[], 1.0, 1000, SR, 0.9);
        assert_eq!(out.len(), 1000);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_envelope_decays() {
        let out = synthesize_additive(&[partial(300.0, 1.0, 4.0)], 1.0, SR as usize, SR, 1.0);
        let head = dsp::peak(&out[..2205]);
        let tail = dsp::peak(&out[SR as usize - 2205..]);
        assert!(tail < head * 0.1, "head {} tail {}", head, tail);
    }

    #[test]
    fn test_fast_decay_completes_early() {
        let mut voice = AdditiveVoice::new(&[partial(300.0, 1.0, 50.0)], 1.0, SR);
        let out = render(&mut voice, SR as usize);
        assert!(voice.is_complete());
        assert!(voice.position() < SR as usize);
        assert!(out[SR as usize - 10..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_reset_replays() {
        let mut voice = AdditiveVoice::new(&[partial(440.0, 1.0, 1.0)], 1.02, SR);
        let first = render(&mut voice, 1024);
        voice.reset();
        let second = render(&mut voice, 1024);
        assert_eq!(first, second);
    }
}
