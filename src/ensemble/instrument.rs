use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::material::{
    InstrumentBody, MembranePreset, MembraneProperties, StickPreset, StickProperties, WoodKind,
    WoodProperties,
};
use crate::synthesis::SoundCategory;

/// Default material variation between two instruments built from the same presets
pub const DEFAULT_VARIATION: f32 = 0.08;

/// The two heads of a chenda
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChendaSide {
    /// Right head, treble
    Valam,
    /// Left head, bass
    Edamthala,
}

impl ChendaSide {
    /// Open tones and slaps are played on the valam, everything else on the edamthala.
    pub fn for_category(category: SoundCategory) -> Self {
        if category.is_treble() {
            ChendaSide::Valam
        } else {
            ChendaSide::Edamthala
        }
    }
}

/// Cylindrical drum with two different heads and two different sticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChendaInstrument {
    pub id: String,
    pub body_wood: WoodProperties,
    pub body: InstrumentBody,
    pub membrane_valam: MembraneProperties,
    pub membrane_edamthala: MembraneProperties,
    pub stick_valam: StickProperties,
    pub stick_edamthala: StickProperties,
}

impl ChendaInstrument {
    pub fn membrane(&self, side: ChendaSide) -> &MembraneProperties {
        match side {
            ChendaSide::Valam => &self.membrane_valam,
            ChendaSide::Edamthala => &self.membrane_edamthala,
        }
    }

    pub fn stick(&self, side: ChendaSide) -> &StickProperties {
        match side {
            ChendaSide::Valam => &self.stick_valam,
            ChendaSide::Edamthala => &self.stick_edamthala,
        }
    }
}

impl fmt::Display for ChendaInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chenda({}, wood={}, valam_tension={:.2})",
            self.id, self.body_wood.name, self.membrane_valam.tension
        )
    }
}

/// Presets a chenda is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChendaPreset {
    pub wood: WoodKind,
    pub valam: MembranePreset,
    pub edamthala: MembranePreset,
    pub valam_stick: StickPreset,
    pub edamthala_stick: StickPreset,
    /// Relative spread of the wood properties
    pub variation: f32,
}

impl Default for ChendaPreset {
    fn default() -> Self {
        Self {
            wood: WoodKind::Jackwood,
            valam: MembranePreset::CowHigh,
            edamthala: MembranePreset::CowMedium,
            valam_stick: StickPreset::BambooLight,
            edamthala_stick: StickPreset::BambooHeavy,
            variation: DEFAULT_VARIATION,
        }
    }
}

impl ChendaPreset {
    /// Build an instrument: wood varied by `variation`, head tensions by ±5%,
    /// body dimensions drawn around a 60 × 30 cm shell.
    pub fn build<R: Rng + ?Sized>(&self, id: impl Into<String>, rng: &mut R) -> ChendaInstrument {
        let body_wood = self.wood.properties().variant(self.variation, rng);
        let membrane_valam = self.valam.properties().with_tension_variation(0.05, rng);
        let membrane_edamthala = self.edamthala.properties().with_tension_variation(0.05, rng);
        let body = InstrumentBody {
            wood: self.wood,
            length: rng.random_range(58.0..62.0),
            diameter: rng.random_range(28.0..32.0),
            wall_thickness: rng.random_range(2.3..2.7),
        };

        ChendaInstrument {
            id: id.into(),
            body_wood,
            body,
            membrane_valam,
            membrane_edamthala,
            stick_valam: self.valam_stick.properties(),
            stick_edamthala: self.edamthala_stick.properties(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metal {
    Bronze,
    Brass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CymbalSize {
    Small,
    Medium,
    Large,
}

impl CymbalSize {
    /// Diameter range in cm
    pub fn diameter_range(self) -> (f32, f32) {
        match self {
            CymbalSize::Small => (12.0, 14.0),
            CymbalSize::Medium => (14.0, 16.0),
            CymbalSize::Large => (16.0, 18.0),
        }
    }
}

/// Hand cymbal (elathaalam)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElathaalamInstrument {
    pub id: String,
    /// cm
    pub diameter: f32,
    /// mm
    pub thickness: f32,
    pub metal: Metal,
    pub age_years: u32,
}

impl ElathaalamInstrument {
    /// Build a cymbal of the given size with random thickness, metal and age.
    pub fn build<R: Rng + ?Sized>(id: impl Into<String>, size: CymbalSize, rng: &mut R) -> Self {
        let (low, high) = size.diameter_range();
        Self {
            id: id.into(),
            diameter: rng.random_range(low..high),
            thickness: rng.random_range(1.5..2.5),
            metal: if rng.random_bool(0.5) {
                Metal::Bronze
            } else {
                Metal::Brass
            },
            age_years: rng.random_range(1..=10),
        }
    }

    /// Larger cymbals sound lower.
    pub fn base_frequency(&self) -> f32 {
        2000.0 / self.diameter
    }
}

impl fmt::Display for ElathaalamInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metal = match self.metal {
            Metal::Bronze => "bronze",
            Metal::Brass => "brass",
        };
        write!(f, "Elathaalam({}, {}, {:.1}cm)", self.id, metal, self.diameter)
    }
}

/// What a player holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instrument {
    Chenda(ChendaInstrument),
    Cymbal(ElathaalamInstrument),
    /// Kombu; rendered as silence
    Wind,
}

impl Instrument {
    pub fn is_chenda(&self) -> bool {
        matches!(self, Instrument::Chenda(_))
    }

    pub fn is_cymbal(&self) -> bool {
        matches!(self, Instrument::Cymbal(_))
    }

    pub fn is_wind(&self) -> bool {
        matches!(self, Instrument::Wind)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Chenda(chenda) => write!(f, "{}", chenda),
            Instrument::Cymbal(cymbal) => write!(f, "{}", cymbal),
            Instrument::Wind => f.write_str("Kombu"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RenderRng;
    use rand::SeedableRng;

    #[test]
    fn test_side_for_category() {
        assert_eq!(ChendaSide::for_category(SoundCategory::Thaam), ChendaSide::Valam);
        assert_eq!(ChendaSide::for_category(SoundCategory::Chapu), ChendaSide::Valam);
        assert_eq!(ChendaSide::for_category(SoundCategory::Dheem), ChendaSide::Edamthala);
        assert_eq!(ChendaSide::for_category(SoundCategory::Nam), ChendaSide::Edamthala);
    }

    #[test]
    fn test_chenda_build_ranges() {
        let mut rng = RenderRng::seed_from_u64(4);
        let preset = ChendaPreset::default();
        let base_valam = MembranePreset::CowHigh.properties().tension;
        for i in 0..50 {
            let chenda = preset.build(format!("C{}", i), &mut rng);
            assert!((58.0..62.0).contains(&chenda.body.length));
            assert!((28.0..32.0).contains(&chenda.body.diameter));
            assert!((2.3..2.7).contains(&chenda.body.wall_thickness));
            let ratio = chenda.membrane_valam.tension / base_valam;
            assert!((0.95 - 1e-4..=1.05 + 1e-4).contains(&ratio));
            assert_eq!(chenda.stick(ChendaSide::Edamthala), &StickPreset::BambooHeavy.properties());
        }
    }

    #[test]
    fn test_no_two_chendas_identical() {
        let mut rng = RenderRng::seed_from_u64(6);
        let preset = ChendaPreset::default();
        let a = preset.build("A", &mut rng);
        let b = preset.build("A", &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_cymbal_sizes() {
        let mut rng = RenderRng::seed_from_u64(9);
        for _ in 0..50 {
            let small = ElathaalamInstrument::build("S", CymbalSize::Small, &mut rng);
            let large = ElathaalamInstrument::build("L", CymbalSize::Large, &mut rng);
            assert!(small.base_frequency() > large.base_frequency());
            assert!((1..=10).contains(&small.age_years));
            assert!((1.5..2.5).contains(&small.thickness));
        }
    }
}
