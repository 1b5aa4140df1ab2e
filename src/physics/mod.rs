//! Stick impact physics
//!
//! Turns a stick, a membrane, a strike velocity and a contact point into the
//! parameters and short waveforms layered over a synthesized drum strike.

pub mod stick;

pub use stick::{strike_profile, StickImpactModeler};

use serde::{Deserialize, Serialize};

/// Spectral characteristics of the stick hitting the head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSpectrum {
    pub impact_force: f32,
    /// Seconds the tip stays on the head
    pub contact_duration: f32,
    /// Hz
    pub spectral_centroid: f32,
    /// Hz
    pub spectral_width: f32,
    pub transient_energy: f32,
    /// Hz
    pub stick_resonance_freq: f32,
    pub stick_resonance_energy: f32,
    /// Degrees, 90 is perpendicular
    pub angle: f32,
    /// 0.0 (edge) to 1.0 (center)
    pub contact_point: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembraneResponse {
    pub excitation_amplitude: f32,
    /// Seconds
    pub decay_time: f32,
    /// Fractional momentary pitch drop (0.15 = 15%)
    pub pitch_bend_amount: f32,
    /// Seconds
    pub pitch_bend_duration: f32,
}

/// Rebound of the stick off the head.
///
/// Reported for plausibility checks on fast passages; nothing enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReboundDynamics {
    pub restitution: f32,
    pub rebound_velocity: f32,
    /// Seconds
    pub contact_time: f32,
    /// Seconds
    pub min_inter_hit_time: f32,
}

/// Everything the mixer needs to put one stick strike on top of a drum sound
#[derive(Debug, Clone)]
pub struct StrikeProfile {
    pub impact: ImpactSpectrum,
    pub response: MembraneResponse,
    pub rebound: ReboundDynamics,
    /// 50 ms stick click
    pub transient: Vec<f32>,
    /// 100 ms stick ring
    pub stick_resonance: Vec<f32>,
    pub velocity: f32,
    pub contact_point: f32,
}
