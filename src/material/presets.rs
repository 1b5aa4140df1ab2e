//! Named material presets
//!
//! Measured-ish values for the woods, leathers and sticks used in Kerala
//! percussion. Instruments start from these and get randomized around them.

use serde::{Deserialize, Serialize};

use super::{MembraneMaterial, MembraneProperties, StickProperties, WoodProperties};

/// Wood species available for bodies and sticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WoodKind {
    Jackwood,
    Rosewood,
    Teak,
    Bamboo,
    Mango,
}

impl WoodKind {
    pub const ALL: [WoodKind; 5] = [
        WoodKind::Jackwood,
        WoodKind::Rosewood,
        WoodKind::Teak,
        WoodKind::Bamboo,
        WoodKind::Mango,
    ];

    /// Base properties of this species
    pub fn properties(self) -> WoodProperties {
        let (name, density, youngs_modulus, damping_coefficient, speed_of_sound, hardness) =
            match self {
                WoodKind::Jackwood => ("Jackwood (Varikka)", 720.0, 9.8, 0.15, 3800.0, 65.0),
                WoodKind::Rosewood => ("Rosewood (Eetti)", 900.0, 12.5, 0.18, 4200.0, 80.0),
                WoodKind::Teak => ("Teak (Thekku)", 680.0, 10.2, 0.12, 3900.0, 70.0),
                // Very stiff for its weight
                WoodKind::Bamboo => ("Bamboo (Mula)", 400.0, 17.0, 0.08, 4500.0, 55.0),
                WoodKind::Mango => ("Mango Wood (Maavu)", 650.0, 8.5, 0.14, 3600.0, 60.0),
            };
        WoodProperties {
            name: name.to_string(),
            density,
            youngs_modulus,
            damping_coefficient,
            speed_of_sound,
            hardness,
        }
    }
}

/// Membrane presets by leather and tension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembranePreset {
    CowHigh,
    CowMedium,
    CowLow,
    GoatHigh,
}

impl MembranePreset {
    pub fn properties(self) -> MembraneProperties {
        let (material, thickness, tension, age_months, moisture_absorption) = match self {
            MembranePreset::CowHigh => (MembraneMaterial::CowLeather, 3.2, 0.85, 6.0, 0.3),
            MembranePreset::CowMedium => (MembraneMaterial::CowLeather, 3.5, 0.65, 12.0, 0.3),
            MembranePreset::CowLow => (MembraneMaterial::CowLeather, 4.0, 0.45, 18.0, 0.3),
            MembranePreset::GoatHigh => (MembraneMaterial::GoatLeather, 2.8, 0.75, 4.0, 0.25),
        };
        MembraneProperties {
            material,
            thickness,
            tension,
            age_months,
            moisture_absorption,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickPreset {
    BambooLight,
    BambooMedium,
    BambooHeavy,
    TeakMedium,
    RosewoodHeavy,
}

impl StickPreset {
    pub fn properties(self) -> StickProperties {
        let (material, mass, length, diameter, tip_hardness, tip_radius) = match self {
            StickPreset::BambooLight => (WoodKind::Bamboo, 85.0, 35.0, 1.2, 70.0, 8.0),
            StickPreset::BambooMedium => (WoodKind::Bamboo, 95.0, 35.0, 1.4, 75.0, 8.0),
            StickPreset::BambooHeavy => (WoodKind::Bamboo, 110.0, 38.0, 1.5, 78.0, 9.0),
            StickPreset::TeakMedium => (WoodKind::Teak, 125.0, 34.0, 1.3, 82.0, 7.0),
            StickPreset::RosewoodHeavy => (WoodKind::Rosewood, 145.0, 33.0, 1.4, 88.0, 6.0),
        };
        StickProperties {
            material,
            mass,
            length,
            diameter,
            tip_hardness,
            tip_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bamboo_is_lightest_wood() {
        let bamboo = WoodKind::Bamboo.properties().density;
        for kind in WoodKind::ALL {
            assert!(kind.properties().density >= bamboo);
        }
    }

    #[test]
    fn test_membrane_tension_ordering() {
        let high = MembranePreset::CowHigh.properties().tension;
        let medium = MembranePreset::CowMedium.properties().tension;
        let low = MembranePreset::CowLow.properties().tension;
        assert!(high > medium && medium > low);
    }

    #[test]
    fn test_heavier_sticks_have_more_momentum() {
        let light = StickPreset::BambooLight.properties();
        let heavy = StickPreset::RosewoodHeavy.properties();
        assert!(heavy.momentum_factor() > light.momentum_factor());
        assert!(heavy.impact_brightness() > light.impact_brightness());
    }
}
