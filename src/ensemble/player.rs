use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Instrument;
use crate::rng::Gaussian;

/// Role of a player in the ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    /// Leads the melodic patterns
    ChendaLead,
    /// Keeps time
    ChendaRhythm,
    /// Accents and fills
    ChendaAccent,
    ElathaalamPrimary,
    ElathaalamSecondary,
    /// Wind (kombu)
    Kombu,
}

impl PlayerRole {
    pub fn name(self) -> &'static str {
        match self {
            PlayerRole::ChendaLead => "chenda_lead",
            PlayerRole::ChendaRhythm => "chenda_rhythm",
            PlayerRole::ChendaAccent => "chenda_accent",
            PlayerRole::ElathaalamPrimary => "elathaalam_primary",
            PlayerRole::ElathaalamSecondary => "elathaalam_secondary",
            PlayerRole::Kombu => "kombu",
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Human timing of a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingCharacteristics {
    /// 0.0 to 1.0, higher is tighter
    pub precision: f32,
    /// Positive rushes, negative drags
    pub rush_tendency: f32,
    /// Constant offset in milliseconds
    pub groove_offset_ms: f32,
}

impl TimingCharacteristics {
    /// Timing offset in seconds for a stroke at `beat_position`.
    ///
    /// `N(0, (1 - precision) × 10 ms) + rush × 5 ms + groove offset`
    pub fn offset<R: Rng + ?Sized>(&self, _beat_position: f32, rng: &mut R) -> f32 {
        let spread = ((1.0 - self.precision) * 0.01).max(0.0) as f64;
        let random = rng.normal(0.0, spread) as f32;
        random + self.rush_tendency * 0.005 + self.groove_offset_ms / 1000.0
    }
}

/// Velocity bounds of a player; `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicRange {
    min: f32,
    max: f32,
}

impl DynamicRange {
    /// Bounds are reordered if given the wrong way round.
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Linear map of an intensity in [0, 1] into the range.
    pub fn map(&self, intensity: f32) -> f32 {
        self.min + intensity * (self.max - self.min)
    }
}

impl fmt::Display for DynamicRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}-{:.2}", self.min, self.max)
    }
}

/// Channel strip of a player
///
/// Gain, pan, mute and solo drive the mixer. The remaining fields are send
/// and insert settings stored for external effect hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixState {
    pub gain: f32,
    /// -1.0 (left) to 1.0 (right); the player's x position when unset
    pub pan: Option<f32>,
    pub mute: bool,
    pub solo: bool,
    /// dB
    pub eq_low: f32,
    /// dB
    pub eq_mid: f32,
    /// dB
    pub eq_high: f32,
    pub compress: f32,
    pub reverb: f32,
    pub delay: f32,
    /// Semitones
    pub pitch: f32,
    pub saturation: f32,
    /// Hz
    pub hpf_freq: f32,
    /// Hz
    pub lpf_freq: f32,
    pub stereo_width: f32,
}

impl Default for MixState {
    fn default() -> Self {
        Self {
            gain: 1.0,
            pan: None,
            mute: false,
            solo: false,
            eq_low: 0.0,
            eq_mid: 0.0,
            eq_high: 0.0,
            compress: 0.0,
            reverb: 0.0,
            delay: 0.0,
            pitch: 0.0,
            saturation: 0.0,
            hpf_freq: 20.0,
            lpf_freq: 20_000.0,
            stereo_width: 1.0,
        }
    }
}

/// A performer with an instrument, a playing style and a place on stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub role: PlayerRole,
    pub instrument: Instrument,
    pub timing: TimingCharacteristics,
    /// 0.0 to 1.0
    pub skill: f32,
    pub dynamic_range: DynamicRange,
    /// (x, y, z) in meters; x is left/right, z is distance from the listener
    pub position: [f32; 3],
    pub mix: MixState,
}

impl Player {
    /// Pan used by the mixer: the explicit pan, or the x position.
    pub fn effective_pan(&self) -> f32 {
        self.mix.pan.unwrap_or(self.position[0])
    }

    /// Velocity this player produces for a musical intensity.
    ///
    /// The intensity is mapped into the dynamic range and perturbed by
    /// `N(0, (1 - skill) × 0.05)`; the result is clipped to [0, 1].
    pub fn velocity_for_intensity<R: Rng + ?Sized>(&self, intensity: f32, rng: &mut R) -> f32 {
        let base = self.dynamic_range.map(intensity);
        let spread = ((1.0 - self.skill) * 0.05).max(0.0) as f64;
        (base + rng.normal(0.0, spread) as f32).clamp(0.0, 1.0)
    }

    /// Distance from the listener in meters
    pub fn distance(&self) -> f32 {
        let [x, y, z] = self.position;
        (x * x + y * y + z * z).sqrt()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        writeln!(f, "{}: {} ({})", self.id, self.name, self.role)?;
        writeln!(f, "   Skill: {:.2} | Dynamics: {}", self.skill, self.dynamic_range)?;
        writeln!(f, "   Position: ({:.1}, {:.1}, {:.1})", x, y, z)?;
        writeln!(
            f,
            "   Timing: precision={:.2}, rush={:+.3}",
            self.timing.precision, self.timing.rush_tendency
        )?;
        write!(f, "   Instrument: {}", self.instrument)
    }
}
