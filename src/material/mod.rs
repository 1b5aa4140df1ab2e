//! Material model
//!
//! Physical properties of the wood body, leather membranes and sticks, the
//! quantities derived from them, and the randomized variants used to make
//! every built instrument sound slightly different.

pub mod presets;

pub use presets::{MembranePreset, StickPreset, WoodKind};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng::Gaussian;

/// Physical properties of a wood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WoodProperties {
    pub name: String,
    /// kg/m³
    pub density: f32,
    /// Young's modulus (elasticity) in GPa
    pub youngs_modulus: f32,
    /// 0.0 to 1.0
    pub damping_coefficient: f32,
    /// m/s
    pub speed_of_sound: f32,
    /// Shore D
    pub hardness: f32,
}

impl WoodProperties {
    /// √(elasticity / density)
    pub fn stiffness_factor(&self) -> f32 {
        (self.youngs_modulus / self.density).sqrt()
    }

    /// Denser woods sound darker; 1.0 at 500 kg/m³, 0.0 at 1500 kg/m³.
    pub fn resonance_brightness(&self) -> f32 {
        1.0 - (self.density - 500.0) / 1000.0
    }

    /// A new wood with each property perturbed around this one.
    ///
    /// Density, damping and hardness vary by ±`variation`, elasticity by
    /// half of that and the speed of sound by a quarter.
    pub fn variant<R: Rng + ?Sized>(&self, variation: f32, rng: &mut R) -> WoodProperties {
        let v = variation.max(0.0) as f64;
        WoodProperties {
            name: format!("{} (Variant)", self.name),
            density: rng.around(self.density as f64, v) as f32,
            youngs_modulus: rng.around(self.youngs_modulus as f64, v / 2.0) as f32,
            damping_coefficient: rng.around(self.damping_coefficient as f64, v) as f32,
            speed_of_sound: rng.around(self.speed_of_sound as f64, v / 4.0) as f32,
            hardness: rng.around(self.hardness as f64, v) as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembraneMaterial {
    CowLeather,
    GoatLeather,
    Synthetic,
}

/// A drum head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembraneProperties {
    pub material: MembraneMaterial,
    /// mm
    pub thickness: f32,
    /// Normalized tension, 0.0 to 1.0
    pub tension: f32,
    pub age_months: f32,
    /// 0.0 to 1.0
    pub moisture_absorption: f32,
}

impl MembraneProperties {
    /// Leather stiffens with age: +30% over two years.
    pub fn effective_tension(&self) -> f32 {
        self.tension * (1.0 + 0.3 * self.age_months / 24.0)
    }

    pub fn fundamental_freq_factor(&self) -> f32 {
        self.effective_tension().sqrt()
    }

    /// Same head with its tension scaled by a uniform factor in `1 ± spread`.
    pub fn with_tension_variation<R: Rng + ?Sized>(
        &self,
        spread: f32,
        rng: &mut R,
    ) -> MembraneProperties {
        MembraneProperties {
            tension: rng.around(self.tension as f64, spread.max(0.0) as f64) as f32,
            ..self.clone()
        }
    }
}

/// A drum stick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickProperties {
    pub material: WoodKind,
    /// grams
    pub mass: f32,
    /// cm
    pub length: f32,
    /// cm
    pub diameter: f32,
    /// Shore D
    pub tip_hardness: f32,
    /// mm
    pub tip_radius: f32,
}

impl StickProperties {
    /// Heavier sticks carry more momentum; normalized around 100 g.
    pub fn momentum_factor(&self) -> f32 {
        self.mass / 100.0
    }

    /// Simplified beam resonance: stiffer wood and shorter sticks ring higher.
    pub fn resonant_frequency(&self) -> f32 {
        100.0 * self.material.properties().youngs_modulus / (self.length * self.length)
    }

    /// Hard tips give brighter impacts.
    pub fn impact_brightness(&self) -> f32 {
        self.tip_hardness / 100.0
    }
}

/// Shell of the instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentBody {
    pub wood: WoodKind,
    /// cm
    pub length: f32,
    /// cm
    pub diameter: f32,
    /// cm
    pub wall_thickness: f32,
}

impl InstrumentBody {
    /// Internal volume in cm³
    pub fn cavity_volume(&self) -> f32 {
        let inner_radius = (self.diameter / 2.0 - self.wall_thickness).max(0.0);
        std::f32::consts::PI * inner_radius * inner_radius * self.length
    }

    /// Helmholtz resonance of the cavity in Hz; smaller cavities resonate higher.
    pub fn resonance_frequency(&self) -> f32 {
        let volume = self.cavity_volume();
        if volume <= 0.0 {
            return 0.0;
        }
        15_000.0 / volume.sqrt()
    }
}

/// How material properties feed into synthesis parameters
pub mod effects {
    use super::*;

    /// Tension raises pitch; denser wood lowers it slightly.
    pub fn frequency_shift(
        base_freq: f32,
        membrane: &MembraneProperties,
        wood: &WoodProperties,
    ) -> f32 {
        let wood_factor = 1.0 - (wood.density - 650.0) / 2000.0;
        base_freq * membrane.fundamental_freq_factor() * wood_factor
    }

    /// More combined damping gives a shorter decay. Leather contributes 0.3.
    pub fn decay_time(base_decay: f32, wood: &WoodProperties) -> f32 {
        const MEMBRANE_DAMPING: f32 = 0.3;
        let combined = (wood.damping_coefficient + MEMBRANE_DAMPING) / 2.0;
        base_decay * (1.0 - combined * 0.5)
    }

    /// High-frequency content of a strike, 0.0 to 1.0.
    ///
    /// # Arguments
    /// * `velocity` - Normalized strike velocity
    /// * `contact_point` - 0.0 (edge) to 1.0 (center)
    pub fn strike_brightness(stick: &StickProperties, velocity: f32, contact_point: f32) -> f32 {
        let velocity_brightness = (velocity * 1.5).min(1.0);
        let position_brightness = contact_point * 0.3 + 0.7;
        stick.impact_brightness() * velocity_brightness * position_brightness
    }

    /// F = m·v, simplified
    pub fn impact_force(stick: &StickProperties, velocity: f32) -> f32 {
        stick.momentum_factor() * velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RenderRng;
    use rand::SeedableRng;

    #[test]
    fn test_brightness_decreases_with_density() {
        let mut wood = WoodKind::Teak.properties();
        let mut last = f32::INFINITY;
        for density in [400.0, 600.0, 800.0, 1000.0, 1400.0] {
            wood.density = density;
            let b = wood.resonance_brightness();
            assert!(b < last, "brightness {} not below {}", b, last);
            last = b;
        }
    }

    #[test]
    fn test_effective_tension_two_years() {
        let membrane = MembraneProperties {
            age_months: 24.0,
            ..MembranePreset::CowMedium.properties()
        };
        assert!((membrane.effective_tension() - membrane.tension * 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_fundamental_factor() {
        let membrane = MembranePreset::CowHigh.properties();
        let expected = membrane.effective_tension().sqrt();
        assert!((membrane.fundamental_freq_factor() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_stiffness_factor() {
        let wood = WoodKind::Bamboo.properties();
        assert!((wood.stiffness_factor() - (17.0f32 / 400.0).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_stick_resonance_uses_wood_stiffness() {
        let stick = StickPreset::BambooMedium.properties();
        let expected = 100.0 * 17.0 / (35.0 * 35.0);
        assert!((stick.resonant_frequency() - expected).abs() < 1e-4);
        assert!((stick.momentum_factor() - 0.95).abs() < 1e-6);
        assert!((stick.impact_brightness() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_wood_variant_bounds() {
        let base = WoodKind::Jackwood.properties();
        let mut rng = RenderRng::seed_from_u64(11);
        for _ in 0..200 {
            let v = base.variant(0.1, &mut rng);
            assert!((v.density / base.density - 1.0).abs() <= 0.1 + 1e-4);
            assert!((v.youngs_modulus / base.youngs_modulus - 1.0).abs() <= 0.05 + 1e-4);
            assert!((v.speed_of_sound / base.speed_of_sound - 1.0).abs() <= 0.025 + 1e-4);
            assert!((v.hardness / base.hardness - 1.0).abs() <= 0.1 + 1e-4);
        }
    }

    #[test]
    fn test_variants_differ() {
        let base = WoodKind::Rosewood.properties();
        let mut rng = RenderRng::seed_from_u64(5);
        let a = base.variant(0.08, &mut rng);
        let b = base.variant(0.08, &mut rng);
        assert_ne!(a.density, b.density);
    }

    #[test]
    fn test_body_resonance() {
        let body = InstrumentBody {
            wood: WoodKind::Jackwood,
            length: 60.0,
            diameter: 30.0,
            wall_thickness: 2.5,
        };
        let volume = std::f32::consts::PI * 12.5 * 12.5 * 60.0;
        assert!((body.cavity_volume() - volume).abs() < 1e-2);
        assert!((body.resonance_frequency() - 15_000.0 / volume.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_effects() {
        let stick = StickPreset::BambooMedium.properties();
        let wood = WoodKind::Jackwood.properties();
        let membrane = MembranePreset::CowHigh.properties();

        assert!((effects::impact_force(&stick, 0.5) - 0.475).abs() < 1e-6);

        let shifted = effects::frequency_shift(450.0, &membrane, &wood);
        let expected = 450.0 * membrane.fundamental_freq_factor() * (1.0 - 70.0 / 2000.0);
        assert!((shifted - expected).abs() < 1e-3);

        let decay = effects::decay_time(1.0, &wood);
        assert!((decay - (1.0 - 0.225 * 0.5)).abs() < 1e-6);

        let center = effects::strike_brightness(&stick, 0.8, 1.0);
        let edge = effects::strike_brightness(&stick, 0.8, 0.0);
        assert!(center > edge);
        assert!((center - 0.75).abs() < 1e-6);
    }
}
