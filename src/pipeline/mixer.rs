//! Ensemble mixer
//!
//! Renders every active player's strokes into a mono track, places the
//! tracks on a stereo stage (or sums them to mono) and masters the bus with
//! a tanh saturation stage followed by a peak ceiling.
//!
//! Chenda strokes get the full material treatment: a stick/membrane strike
//! profile, the ensembled spectral sound, a pitch drop at the onset, wood and
//! contact point tone tilts, and the stick click and ring on top.

use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use super::events::{AssignedStroke, OrchestrationPattern};
use crate::config::MixerConfig;
use crate::dsp;
use crate::ensemble::{ChendaInstrument, ChendaSide, Ensemble, Instrument, Player};
use crate::physics::{strike_profile, StickImpactModeler};
use crate::rng::{derive_seed, RenderRng};
use crate::samples_for;
use crate::synthesis::{SoundCategory, SpectralEngine};

/// Pitch bends below this amount are inaudible and skipped
const MIN_PITCH_BEND: f32 = 0.01;
/// Bends shorter than this many samples are skipped
const MIN_BEND_SAMPLES: usize = 10;
const STRIKE_ANGLE: f32 = 90.0;
/// Closest distance used for attenuation, meters
const MIN_DISTANCE: f32 = 0.1;
/// Listener distance beyond which the propagation delay applies, meters
const DELAY_THRESHOLD_Z: f32 = 0.5;

/// A stroke that could not be placed on its track
#[derive(Debug, Error)]
enum StrikeError {
    #[error("rendered {actual} samples, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Mastered output bus
#[derive(Debug, Clone, PartialEq)]
pub enum MasterBus {
    Mono(Vec<f32>),
    Stereo { left: Vec<f32>, right: Vec<f32> },
}

impl MasterBus {
    /// Samples per channel
    pub fn len(&self) -> usize {
        match self {
            MasterBus::Mono(samples) => samples.len(),
            MasterBus::Stereo { left, .. } => left.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channels(&self) -> u16 {
        match self {
            MasterBus::Mono(_) => 1,
            MasterBus::Stereo { .. } => 2,
        }
    }

    pub fn peak(&self) -> f32 {
        match self {
            MasterBus::Mono(samples) => dsp::peak(samples),
            MasterBus::Stereo { left, right } => dsp::peak(left).max(dsp::peak(right)),
        }
    }
}

/// Result of a render
#[derive(Debug, Clone)]
pub struct MixOutput {
    pub master: MasterBus,
    /// Per-player tracks before gain and spatialization, keyed by player id
    pub stems: Option<BTreeMap<String, Vec<f32>>>,
}

/// Renders orchestrated patterns through the spectral engine and stick physics
#[derive(Debug, Clone)]
pub struct EnsembleMixer {
    engine: SpectralEngine,
    modeler: StickImpactModeler,
    config: MixerConfig,
    sample_rate: u32,
}

impl EnsembleMixer {
    pub fn new(engine: SpectralEngine, config: MixerConfig) -> Self {
        let sample_rate = engine.sample_rate();
        Self {
            engine,
            modeler: StickImpactModeler::new(sample_rate),
            config,
            sample_rate,
        }
    }

    pub fn engine(&self) -> &SpectralEngine {
        &self.engine
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render and master an orchestrated pattern.
    ///
    /// Each player renders on its own random stream derived from a single
    /// seed drawn from `rng`, so a player's track does not depend on which
    /// other players are active.
    ///
    /// # Arguments
    /// * `ensemble` - Players, instruments and mix state
    /// * `pattern` - Strokes assigned to players
    /// * `duration` - Output length in seconds
    /// * `spatial` - Stereo stage placement; a mono bus otherwise
    /// * `stems` - Also return each player's unprocessed track
    /// * `rng` - Source of the render seed
    pub fn render_ensemble<R: Rng + ?Sized>(
        &self,
        ensemble: &Ensemble,
        pattern: &OrchestrationPattern,
        duration: f32,
        spatial: bool,
        stems: bool,
        rng: &mut R,
    ) -> MixOutput {
        let len = samples_for(duration, self.sample_rate);
        let render_seed: u64 = rng.random();

        let players: Vec<&Player> = ensemble
            .active_players()
            .into_iter()
            .filter(|p| !pattern.strokes_for(&p.id).is_empty())
            .collect();

        let tracks: Vec<Vec<f32>> = players
            .par_iter()
            .map(|player| {
                let mut player_rng = RenderRng::seed_from_u64(derive_seed(render_seed, &player.id));
                self.render_player(player, pattern.strokes_for(&player.id), len, &mut player_rng)
            })
            .collect();

        let master = if spatial {
            let mut left = vec![0.0f32; len];
            let mut right = vec![0.0f32; len];
            for (player, track) in players.iter().zip(&tracks) {
                let (l, r) = self.spatialize(track, player);
                dsp::accumulate(&mut left, &l, 0, 1.0);
                dsp::accumulate(&mut right, &r, 0, 1.0);
            }
            master(&mut [&mut left[..], &mut right[..]], self.config.ceiling);
            MasterBus::Stereo { left, right }
        } else {
            let mut mono = vec![0.0f32; len];
            for (player, track) in players.iter().zip(&tracks) {
                dsp::accumulate(&mut mono, track, 0, player.mix.gain);
            }
            master(&mut [&mut mono[..]], self.config.ceiling);
            MasterBus::Mono(mono)
        };

        let stems = stems.then(|| {
            players
                .iter()
                .zip(tracks)
                .map(|(player, track)| (player.id.clone(), track))
                .collect()
        });

        MixOutput { master, stems }
    }

    /// One player's mono track of `len` samples.
    pub fn render_player<R: Rng + ?Sized>(
        &self,
        player: &Player,
        strokes: &[AssignedStroke],
        len: usize,
        rng: &mut R,
    ) -> Vec<f32> {
        let mut track = vec![0.0f32; len];
        if player.instrument.is_wind() {
            debug!(player = %player.id, "wind instruments render silence");
            return track;
        }

        let mut placed = 0usize;
        for stroke in strokes {
            if stroke.event.is_rest() {
                continue;
            }
            let mut sound = match &player.instrument {
                Instrument::Chenda(chenda) => self.chenda_strike(chenda, stroke, rng),
                Instrument::Cymbal(_) => self.engine.get_sound(
                    SoundCategory::METALLIC,
                    stroke.velocity,
                    stroke.event.duration,
                    rng,
                ),
                Instrument::Wind => continue,
            };

            if dsp::sanitize(&mut sound) {
                warn!(
                    player = %player.id,
                    time = stroke.event.time,
                    "non-finite samples replaced with silence"
                );
            }

            let expected = samples_for(stroke.event.duration, self.sample_rate);
            match place(&mut track, &sound, expected, stroke.event.time, self.sample_rate) {
                Ok(true) => placed += 1,
                Ok(false) => {}
                Err(e) => warn!(
                    player = %player.id,
                    time = stroke.event.time,
                    error = %e,
                    "dropping stroke"
                ),
            }
        }

        debug!(player = %player.id, strokes = strokes.len(), placed, "rendered player");
        track
    }

    /// A chenda stroke with stick physics and material post-processing.
    fn chenda_strike<R: Rng + ?Sized>(
        &self,
        chenda: &ChendaInstrument,
        stroke: &AssignedStroke,
        rng: &mut R,
    ) -> Vec<f32> {
        let side = ChendaSide::for_category(stroke.event.category);
        let profile = strike_profile(
            &self.modeler,
            chenda.stick(side),
            chenda.membrane(side),
            stroke.velocity,
            stroke.contact_point,
            STRIKE_ANGLE,
            rng,
        );

        let mut sound = self.engine.get_sound(
            stroke.event.category,
            stroke.velocity,
            stroke.event.duration,
            rng,
        );
        if sound.is_empty() {
            return sound;
        }
        dsp::sanitize(&mut sound);

        if profile.response.pitch_bend_amount > MIN_PITCH_BEND {
            let bend_len = samples_for(profile.response.pitch_bend_duration, self.sample_rate);
            pitch_bend(&mut sound, profile.response.pitch_bend_amount, bend_len);
        }
        apply_wood_character(
            &mut sound,
            chenda.body_wood.resonance_brightness(),
            self.sample_rate,
        );
        self.modeler
            .apply_contact_point_filtering(&mut sound, profile.contact_point);

        dsp::accumulate(&mut sound, &profile.transient, 0, self.config.transient_gain);
        dsp::accumulate(
            &mut sound,
            &profile.stick_resonance,
            0,
            self.config.resonance_gain,
        );
        sound
    }

    /// Gain, constant-power pan, distance attenuation and propagation delay.
    fn spatialize(&self, track: &[f32], player: &Player) -> (Vec<f32>, Vec<f32>) {
        let pan = player.effective_pan().clamp(-1.0, 1.0);
        let distance = player.distance().max(MIN_DISTANCE);
        let attenuation = (1.0 / distance).clamp(0.5, 2.0);
        let angle = (pan + 1.0) * std::f32::consts::FRAC_PI_4;
        let left_gain = angle.cos() * attenuation * player.mix.gain;
        let right_gain = angle.sin() * attenuation * player.mix.gain;

        let z = player.position[2];
        let delay = if z > DELAY_THRESHOLD_Z {
            ((z - DELAY_THRESHOLD_Z) / self.config.speed_of_sound * self.sample_rate as f32) as usize
        } else {
            0
        };
        let delay = if delay < self.config.max_delay_samples {
            delay
        } else {
            0
        };

        let mut left = vec![0.0f32; track.len()];
        let mut right = vec![0.0f32; track.len()];
        dsp::accumulate(&mut left, track, delay, left_gain);
        dsp::accumulate(&mut right, track, delay, right_gain);
        (left, right)
    }
}

/// Add `sound` to `track` at `time`.
///
/// Returns `Ok(false)` for sounds that are empty or start past the end of the
/// track, and an error when the sound is not the length its stroke asks for.
fn place(
    track: &mut [f32],
    sound: &[f32],
    expected: usize,
    time: f32,
    sample_rate: u32,
) -> Result<bool, StrikeError> {
    if sound.is_empty() {
        return Ok(false);
    }
    if sound.len() != expected {
        return Err(StrikeError::LengthMismatch {
            expected,
            actual: sound.len(),
        });
    }
    let start = (time.max(0.0) as f64 * sample_rate as f64).round() as usize;
    Ok(dsp::accumulate(track, sound, start, 1.0) > 0)
}

/// Glue the channels with a shared tanh drive, then scale them together
/// under `ceiling`.
fn master(channels: &mut [&mut [f32]], ceiling: f32) {
    let peak = channels.iter().map(|c| dsp::peak(c)).fold(0.0, f32::max);
    let drive = drive_for(peak);
    for channel in channels.iter_mut() {
        saturate(channel, drive);
    }
    let post = channels.iter().map(|c| dsp::peak(c)).fold(0.0, f32::max);
    if post > ceiling {
        let factor = ceiling / post;
        for channel in channels.iter_mut() {
            channel.iter_mut().for_each(|s| *s *= factor);
        }
    }
}

fn drive_for(peak: f32) -> f32 {
    if peak < 0.5 {
        1.5
    } else {
        1.0
    }
}

fn saturate(samples: &mut [f32], drive: f32) {
    for s in samples.iter_mut() {
        *s = (*s * drive).tanh();
    }
}

/// Momentary pitch drop over the first `bend_len` samples.
///
/// The head is read back at `1 - amount × e^(-i / 0.1n)` of normal speed, so
/// the strike starts flat and recovers within the bend, and the bent part is
/// crossfaded back into the untouched signal.
pub fn pitch_bend(samples: &mut [f32], amount: f32, bend_len: usize) {
    let n = bend_len.min(samples.len());
    if n < MIN_BEND_SAMPLES || !(amount > 0.0) {
        return;
    }
    let original = samples[..n].to_vec();
    let tau = n as f32 * 0.1;
    let mut position = 0.0f32;
    for i in 0..n {
        let index = position as usize;
        let frac = position - index as f32;
        let a = original[index.min(n - 1)];
        let b = original[(index + 1).min(n - 1)];
        let bent = a + (b - a) * frac;

        let fade = i as f32 / n as f32;
        samples[i] = bent * (1.0 - fade) + original[i] * fade;

        let rate = 1.0 - amount * (-(i as f32) / tau).exp();
        position += rate.max(0.0);
    }
}

/// Blend a high-passed copy into bright woods and a low-passed copy into dark ones.
pub fn apply_wood_character(samples: &mut [f32], brightness: f32, sample_rate: u32) {
    if brightness > 0.6 {
        dsp::blend_filtered(samples, (brightness - 0.6) * 0.5, |s| {
            dsp::one_pole_high_pass(s, 1500.0, sample_rate)
        });
    } else if brightness < 0.4 {
        dsp::blend_filtered(samples, (0.4 - brightness) * 0.5, |s| {
            dsp::one_pole_low_pass(s, 800.0, sample_rate)
        });
    }
}
