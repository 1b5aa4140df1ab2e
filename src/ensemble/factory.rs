//! Players of a standard chendamelam
//!
//! Each constructor builds a varied instrument and sets the timing profile,
//! dynamics and stage position that suit the role.

use rand::Rng;

use super::{
    ChendaPreset, CymbalSize, DynamicRange, ElathaalamInstrument, Instrument, MixState, Player,
    PlayerRole, TimingCharacteristics,
};
use crate::material::{MembranePreset, StickPreset, WoodKind};

#[allow(clippy::too_many_arguments)]
fn player(
    id: &str,
    name: &str,
    role: PlayerRole,
    instrument: Instrument,
    timing: (f32, f32, f32),
    skill: f32,
    dynamics: (f32, f32),
    position: [f32; 3],
) -> Player {
    let (precision, rush_tendency, groove_offset_ms) = timing;
    Player {
        id: id.to_string(),
        name: name.to_string(),
        role,
        instrument,
        timing: TimingCharacteristics {
            precision,
            rush_tendency,
            groove_offset_ms,
        },
        skill,
        dynamic_range: DynamicRange::new(dynamics.0, dynamics.1),
        position,
        mix: MixState::default(),
    }
}

/// Lead chenda: tight jackwood drum, very precise, rushes slightly, loud.
pub fn chenda_lead<R: Rng + ?Sized>(id: &str, rng: &mut R) -> Player {
    let chenda = ChendaPreset {
        wood: WoodKind::Jackwood,
        valam: MembranePreset::CowHigh,
        valam_stick: StickPreset::BambooMedium,
        ..ChendaPreset::default()
    }
    .build(format!("{}_chenda", id), rng);

    player(
        id,
        "Lead Player",
        PlayerRole::ChendaLead,
        Instrument::Chenda(chenda),
        (0.95, 0.02, 0.0),
        0.95,
        (0.6, 1.0),
        [-0.3, 0.0, 1.0],
    )
}

/// Rhythm chenda: the timekeeper, most precise with no rush.
pub fn chenda_rhythm<R: Rng + ?Sized>(id: &str, rng: &mut R) -> Player {
    let chenda = ChendaPreset {
        wood: WoodKind::Teak,
        valam: MembranePreset::CowMedium,
        valam_stick: StickPreset::BambooMedium,
        ..ChendaPreset::default()
    }
    .build(format!("{}_chenda", id), rng);

    player(
        id,
        "Rhythm Player",
        PlayerRole::ChendaRhythm,
        Instrument::Chenda(chenda),
        (0.98, 0.0, 0.0),
        0.92,
        (0.5, 0.85),
        [0.3, 0.0, 1.0],
    )
}

/// Accent chenda: rosewood with a heavier stick, drags a little, wide dynamics.
pub fn chenda_accent<R: Rng + ?Sized>(id: &str, rng: &mut R) -> Player {
    let chenda = ChendaPreset {
        wood: WoodKind::Rosewood,
        valam: MembranePreset::CowHigh,
        valam_stick: StickPreset::TeakMedium,
        ..ChendaPreset::default()
    }
    .build(format!("{}_chenda", id), rng);

    player(
        id,
        "Accent Player",
        PlayerRole::ChendaAccent,
        Instrument::Chenda(chenda),
        (0.90, -0.01, 0.0),
        0.90,
        (0.4, 1.0),
        [0.0, 0.0, 0.8],
    )
}

pub fn elathaalam_primary<R: Rng + ?Sized>(id: &str, rng: &mut R) -> Player {
    let cymbal = ElathaalamInstrument::build(format!("{}_elathaalam", id), CymbalSize::Medium, rng);
    player(
        id,
        "Elathaalam 1",
        PlayerRole::ElathaalamPrimary,
        Instrument::Cymbal(cymbal),
        (0.93, 0.0, 0.0),
        0.90,
        (0.5, 0.9),
        [-0.8, 0.0, 1.2],
    )
}

/// Smaller, higher cymbal half a millisecond behind the primary.
pub fn elathaalam_secondary<R: Rng + ?Sized>(id: &str, rng: &mut R) -> Player {
    let cymbal = ElathaalamInstrument::build(format!("{}_elathaalam", id), CymbalSize::Small, rng);
    player(
        id,
        "Elathaalam 2",
        PlayerRole::ElathaalamSecondary,
        Instrument::Cymbal(cymbal),
        (0.91, 0.0, 0.5),
        0.88,
        (0.4, 0.8),
        [0.8, 0.0, 1.2],
    )
}

pub fn kombu(id: &str) -> Player {
    player(
        id,
        "Kombu Player",
        PlayerRole::Kombu,
        Instrument::Wind,
        (0.85, 0.0, 0.0),
        0.85,
        (0.3, 0.7),
        [0.0, 0.0, 1.5],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::ChendaSide;
    use crate::rng::RenderRng;
    use rand::SeedableRng;

    #[test]
    fn test_role_profiles() {
        let mut rng = RenderRng::seed_from_u64(1);
        let lead = chenda_lead("P1", &mut rng);
        let rhythm = chenda_rhythm("P2", &mut rng);
        let accent = chenda_accent("P3", &mut rng);

        assert!(rhythm.timing.precision > lead.timing.precision);
        assert!(rhythm.timing.precision > accent.timing.precision);
        assert_eq!(rhythm.timing.rush_tendency, 0.0);
        assert!(accent.timing.rush_tendency < 0.0);
        assert_eq!(lead.dynamic_range.min(), 0.6);
        assert_eq!(lead.effective_pan(), -0.3);
    }

    #[test]
    fn test_instruments() {
        let mut rng = RenderRng::seed_from_u64(2);
        match chenda_accent("P3", &mut rng).instrument {
            Instrument::Chenda(chenda) => {
                assert_eq!(chenda.id, "P3_chenda");
                assert_eq!(chenda.body.wood, WoodKind::Rosewood);
                assert_eq!(
                    chenda.stick(ChendaSide::Valam),
                    &StickPreset::TeakMedium.properties()
                );
            }
            other => panic!("expected a chenda, got {}", other),
        }

        match elathaalam_secondary("P5", &mut rng).instrument {
            Instrument::Cymbal(cymbal) => assert!((12.0..14.0).contains(&cymbal.diameter)),
            other => panic!("expected a cymbal, got {}", other),
        }

        assert!(kombu("P6").instrument.is_wind());
    }

    #[test]
    fn test_players_serialize() {
        let mut rng = RenderRng::seed_from_u64(3);
        for player in [
            chenda_lead("P1", &mut rng),
            elathaalam_primary("P4", &mut rng),
            kombu("P6"),
        ] {
            let json = serde_json::to_string(&player).unwrap();
            let back: Player = serde_json::from_str(&json).unwrap();
            assert_eq!(back.id, player.id);
            assert_eq!(back.role, player.role);
            assert_eq!(back.instrument.is_chenda(), player.instrument.is_chenda());
            assert_eq!(back.instrument.is_cymbal(), player.instrument.is_cymbal());
            assert_eq!(serde_json::to_string(&back).unwrap(), json);
        }
    }
}
