use rand::Rng;

use super::{ImpactSpectrum, MembraneResponse, ReboundDynamics, StrikeProfile};
use crate::dsp;
use crate::generator::{render, DampedSineGenerator, NoiseBurstGenerator};
use crate::material::{MembraneProperties, StickProperties};
use crate::samples_for;

/// Click length used in a strike profile, seconds
pub const TRANSIENT_DURATION: f32 = 0.05;
/// Stick ring length used in a strike profile, seconds
pub const RESONANCE_DURATION: f32 = 0.1;
/// Waveforms with less energy than this are returned silent
const MIN_ENERGY: f32 = 0.01;
const STICK_RING_DECAY: f32 = 15.0;

/// Models the stick-membrane interaction at a fixed sample rate
#[derive(Debug, Clone, Copy)]
pub struct StickImpactModeler {
    sample_rate: u32,
}

impl StickImpactModeler {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Spectral characteristics of a stick impact.
    ///
    /// # Arguments
    /// * `stick` - Stick properties
    /// * `velocity` - Normalized strike velocity, 0.0 to 1.0
    /// * `contact_point` - 0.0 (edge) to 1.0 (center)
    /// * `angle` - Strike angle in degrees, 90 = perpendicular
    pub fn impact_spectrum(
        &self,
        stick: &StickProperties,
        velocity: f32,
        contact_point: f32,
        angle: f32,
    ) -> ImpactSpectrum {
        let brightness = stick.impact_brightness();
        let impact_force =
            stick.momentum_factor() * velocity * (angle.to_radians() - std::f32::consts::FRAC_PI_2).cos();
        // Harder tips leave the head sooner
        let contact_duration = 0.001 / brightness;

        let spectral_centroid =
            2000.0 * brightness * (1.0 + velocity) * (0.5 + 0.5 * contact_point);

        ImpactSpectrum {
            impact_force,
            contact_duration,
            spectral_centroid,
            spectral_width: 1500.0 * velocity + 500.0,
            transient_energy: brightness * velocity * 0.3,
            stick_resonance_freq: stick.resonant_frequency(),
            stick_resonance_energy: 0.1 * velocity,
            angle,
            contact_point,
        }
    }

    /// How the head answers an impact. Softer heads bend pitch more.
    pub fn membrane_response(
        &self,
        membrane: &MembraneProperties,
        impact: &ImpactSpectrum,
    ) -> MembraneResponse {
        let tension = membrane.effective_tension();
        MembraneResponse {
            excitation_amplitude: impact.impact_force * tension,
            decay_time: 0.5 * (membrane.thickness / 3.5) / tension,
            pitch_bend_amount: (1.0 - tension) * 0.15,
            pitch_bend_duration: impact.contact_duration * 3.0,
        }
    }

    pub fn rebound_dynamics(
        &self,
        stick: &StickProperties,
        membrane: &MembraneProperties,
        velocity: f32,
    ) -> ReboundDynamics {
        let restitution = 0.3 * membrane.effective_tension() / stick.momentum_factor();
        let contact_time = 0.001 / stick.impact_brightness();
        ReboundDynamics {
            restitution,
            rebound_velocity: velocity * restitution,
            contact_time,
            min_inter_hit_time: contact_time * 2.0,
        }
    }

    /// Band-limited noise click centered on the impact's spectral centroid.
    ///
    /// The envelope time constant is ten contact durations. Returns silence
    /// when the transient energy is negligible.
    pub fn impact_transient<R: Rng + ?Sized>(
        &self,
        impact: &ImpactSpectrum,
        duration: f32,
        rng: &mut R,
    ) -> Vec<f32> {
        let len = samples_for(duration, self.sample_rate);
        if impact.transient_energy < MIN_ENERGY {
            return vec![0.0; len];
        }
        let mut burst = NoiseBurstGenerator::new(
            impact.spectral_centroid,
            impact.spectral_width,
            impact.contact_duration * 10.0,
            impact.transient_energy,
            len,
            self.sample_rate,
            rng.random(),
        );
        render(&mut burst, len)
    }

    /// The stick's own ring: a damped sine at its resonant frequency.
    pub fn stick_resonance(&self, impact: &ImpactSpectrum, duration: f32) -> Vec<f32> {
        let len = samples_for(duration, self.sample_rate);
        if impact.stick_resonance_energy < MIN_ENERGY {
            return vec![0.0; len];
        }
        let mut ring = DampedSineGenerator::new(
            impact.stick_resonance_freq,
            STICK_RING_DECAY,
            impact.stick_resonance_energy,
            len,
            self.sample_rate,
        );
        render(&mut ring, len)
    }

    /// Tone tilt by strike position, in place.
    ///
    /// Center hits blend in a high-passed copy (cutoff 300 to 800 Hz), edge hits
    /// a low-passed copy (cutoff 1.5 to 2.5 kHz), each up to 20% at the
    /// extremes. A contact point of exactly 0.5 leaves the signal unchanged.
    pub fn apply_contact_point_filtering(&self, signal: &mut [f32], contact_point: f32) {
        let sample_rate = self.sample_rate;
        if contact_point > 0.5 {
            let cutoff = 300.0 + (contact_point - 0.5) * 1000.0;
            dsp::blend_filtered(signal, (contact_point - 0.5) * 0.4, |s| {
                dsp::one_pole_high_pass(s, cutoff, sample_rate)
            });
        } else {
            let cutoff = 1500.0 + contact_point * 2000.0;
            dsp::blend_filtered(signal, (0.5 - contact_point) * 0.4, |s| {
                dsp::one_pole_low_pass(s, cutoff, sample_rate)
            });
        }
    }
}

impl Default for StickImpactModeler {
    fn default() -> Self {
        Self::new(crate::SAMPLE_RATE)
    }
}

/// Complete physics of one strike: spectrum, head response, rebound and the
/// click and ring waveforms.
pub fn strike_profile<R: Rng + ?Sized>(
    modeler: &StickImpactModeler,
    stick: &StickProperties,
    membrane: &MembraneProperties,
    velocity: f32,
    contact_point: f32,
    angle: f32,
    rng: &mut R,
) -> StrikeProfile {
    let impact = modeler.impact_spectrum(stick, velocity, contact_point, angle);
    let response = modeler.membrane_response(membrane, &impact);
    let rebound = modeler.rebound_dynamics(stick, membrane, velocity);
    let transient = modeler.impact_transient(&impact, TRANSIENT_DURATION, rng);
    let stick_resonance = modeler.stick_resonance(&impact, RESONANCE_DURATION);

    StrikeProfile {
        impact,
        response,
        rebound,
        transient,
        stick_resonance,
        velocity,
        contact_point,
    }
}
