//! Ensemble and player registry
//!
//! A standard chendamelam has three chenda players (lead, rhythm, accent),
//! two elathaalam (cymbal) players and a kombu player. Instruments are built
//! once per ensemble with bounded random variation; only the mix state of a
//! player changes afterwards.

pub mod factory;
pub mod instrument;
pub mod player;

pub use instrument::{
    ChendaInstrument, ChendaPreset, ChendaSide, CymbalSize, ElathaalamInstrument, Instrument,
    Metal,
};
pub use player::{DynamicRange, MixState, Player, PlayerRole, TimingCharacteristics};

use rand::Rng;
use std::fmt;

/// Ordered set of players
#[derive(Debug, Clone, Default)]
pub struct Ensemble {
    players: Vec<Player>,
}

impl Ensemble {
    /// Ensemble from explicit players, kept in the given order.
    pub fn from_players(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// The standard six-player ensemble, P1 to P6.
    pub fn build_standard<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_players(vec![
            factory::chenda_lead("P1", rng),
            factory::chenda_rhythm("P2", rng),
            factory::chenda_accent("P3", rng),
            factory::elathaalam_primary("P4", rng),
            factory::elathaalam_secondary("P5", rng),
            factory::kombu("P6"),
        ])
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get_player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Mutable access for mix state changes.
    pub fn get_player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn players_by_role(&self, role: PlayerRole) -> Vec<&Player> {
        self.players.iter().filter(|p| p.role == role).collect()
    }

    /// First player holding a role
    pub fn player_for_role(&self, role: PlayerRole) -> Option<&Player> {
        self.players.iter().find(|p| p.role == role)
    }

    pub fn chenda_players(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.instrument.is_chenda())
            .collect()
    }

    pub fn cymbal_players(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.instrument.is_cymbal())
            .collect()
    }

    pub fn wind_players(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.instrument.is_wind())
            .collect()
    }

    pub fn any_solo(&self) -> bool {
        self.players.iter().any(|p| p.mix.solo)
    }

    /// Players that produce sound: the soloed ones if any player is soloed,
    /// otherwise every player that is not muted.
    pub fn active_players(&self) -> Vec<&Player> {
        let solo = self.any_solo();
        self.players
            .iter()
            .filter(|p| if solo { p.mix.solo } else { !p.mix.mute })
            .collect()
    }
}

impl fmt::Display for Ensemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chendamelam Ensemble ({} players)", self.players.len())?;
        for player in &self.players {
            writeln!(f, "{}", player)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RenderRng;
    use rand::SeedableRng;

    fn ensemble() -> Ensemble {
        Ensemble::build_standard(&mut RenderRng::seed_from_u64(42))
    }

    #[test]
    fn test_standard_layout() {
        let e = ensemble();
        assert_eq!(e.len(), 6);
        let ids: Vec<&str> = e.players().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["P1", "P2", "P3", "P4", "P5", "P6"]);
        assert_eq!(e.chenda_players().len(), 3);
        assert_eq!(e.cymbal_players().len(), 2);
        assert_eq!(e.wind_players().len(), 1);
        assert_eq!(e.get_player("P3").map(|p| p.role), Some(PlayerRole::ChendaAccent));
        assert!(e.get_player("P9").is_none());
        assert_eq!(e.players_by_role(PlayerRole::ElathaalamSecondary)[0].id, "P5");
    }

    #[test]
    fn test_active_players() {
        let mut e = ensemble();
        assert_eq!(e.active_players().len(), 6);

        if let Some(p) = e.get_player_mut("P2") {
            p.mix.mute = true;
        }
        assert_eq!(e.active_players().len(), 5);

        if let Some(p) = e.get_player_mut("P4") {
            p.mix.solo = true;
        }
        let active: Vec<&str> = e.active_players().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(active, ["P4"]);
    }

    #[test]
    fn test_display_lists_players() {
        let text = ensemble().to_string();
        assert!(text.contains("P1: Lead Player (chenda_lead)"));
        assert!(text.contains("Kombu"));
    }

    #[test]
    fn test_builds_differ() {
        let a = Ensemble::build_standard(&mut RenderRng::seed_from_u64(1));
        let b = Ensemble::build_standard(&mut RenderRng::seed_from_u64(2));
        assert_ne!(a.players()[0].instrument, b.players()[0].instrument);
    }
}
