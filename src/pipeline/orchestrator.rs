//! Orchestration engine
//!
//! Distributes a stroke sequence over the players of an ensemble. Every
//! assignment resolves the player's velocity, timing offset and contact point
//! at the moment of assignment. Rests are never assigned.

use rand::Rng;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use super::events::{AssignedStroke, OrchestrationPattern, StrokeEvent};
use crate::ensemble::{Ensemble, Player, PlayerRole};
use crate::error::Error;
use crate::synthesis::SoundCategory;

/// Strokes routed to the accent player when played loud
const HEAVY_ACCENTS: [&str; 2] = ["Dheem", "Dha"];
/// Events per phrase in call and response
const PHRASE_LENGTH: usize = 4;

const CYMBAL_STROKE: &str = "1";
const CYMBAL_INTENSITY: f32 = 0.6;
const CYMBAL_DURATION: f32 = 0.5;

/// How strokes are distributed over the chenda players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Role-based rules: accents, pulse, complexity, rotation
    #[default]
    Traditional,
    /// Least-loaded chenda player takes the stroke
    Dynamic,
    /// Call and response between the lead and the other two
    Antiphonal,
    /// Every chenda player plays every stroke
    Unison,
    /// Players enter one after another and then play everything
    Layered,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Traditional,
        Strategy::Dynamic,
        Strategy::Antiphonal,
        Strategy::Unison,
        Strategy::Layered,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Traditional => "traditional",
            Strategy::Dynamic => "dynamic",
            Strategy::Antiphonal => "antiphonal",
            Strategy::Unison => "unison",
            Strategy::Layered => "layered",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}

/// Resolve `event` for `player`.
///
/// Velocity comes from the player's dynamic range, the time is shifted by the
/// player's timing offset, and loud strokes land nearer the center.
pub fn assign<R: Rng + ?Sized>(event: &StrokeEvent, player: &Player, rng: &mut R) -> AssignedStroke {
    let velocity = player.velocity_for_intensity(event.intensity, rng);
    let offset = player.timing.offset(event.time, rng);
    let contact_point = if event.intensity > 0.7 {
        rng.random_range(0.6..0.9)
    } else {
        rng.random_range(0.3..0.6)
    };

    let mut adjusted = event.clone();
    adjusted.time = (event.time + offset).max(0.0);
    AssignedStroke {
        event: adjusted,
        player_id: player.id.clone(),
        velocity,
        contact_point,
    }
}

/// One cymbal stroke per cymbal player at `time`.
fn add_cymbal_hits<R: Rng + ?Sized>(
    time: f32,
    cymbals: &[&Player],
    pattern: &mut OrchestrationPattern,
    rng: &mut R,
) {
    for cymbal in cymbals {
        let offset = cymbal.timing.offset(time, rng);
        let velocity = cymbal.velocity_for_intensity(CYMBAL_INTENSITY, rng);
        pattern.push(AssignedStroke {
            event: StrokeEvent::new(
                time + offset,
                CYMBAL_STROKE,
                SoundCategory::METALLIC,
                CYMBAL_INTENSITY,
                CYMBAL_DURATION,
            ),
            player_id: cymbal.id.clone(),
            velocity,
            contact_point: 0.5,
        });
    }
}

/// 0.0 to 1.0: half the fraction of sounding strokes plus half their
/// intensity spread.
pub fn pattern_complexity(events: &[StrokeEvent]) -> f32 {
    if events.is_empty() {
        return 0.0;
    }
    let sounding: Vec<f32> = events
        .iter()
        .filter(|e| !e.is_rest())
        .map(|e| e.intensity)
        .collect();
    let density = sounding.len() as f32 / events.len() as f32;
    let spread = if sounding.is_empty() {
        0.0
    } else {
        let max = sounding.iter().copied().fold(f32::MIN, f32::max);
        let min = sounding.iter().copied().fold(f32::MAX, f32::min);
        max - min
    };
    (density * 0.5 + spread * 0.5).clamp(0.0, 1.0)
}

/// The lead, rhythm and accent chendas.
///
/// A missing role falls back to the first chenda player.
struct Section<'a> {
    lead: &'a Player,
    rhythm: &'a Player,
    accent: &'a Player,
}

impl<'a> Section<'a> {
    fn from_ensemble(ensemble: &'a Ensemble) -> Option<Self> {
        let first = *ensemble.chenda_players().first()?;
        let role = |r: PlayerRole| ensemble.player_for_role(r).unwrap_or(first);
        Some(Self {
            lead: role(PlayerRole::ChendaLead),
            rhythm: role(PlayerRole::ChendaRhythm),
            accent: role(PlayerRole::ChendaAccent),
        })
    }

    fn register(&self, pattern: &mut OrchestrationPattern) {
        for player in [self.lead, self.rhythm, self.accent] {
            pattern.add_player(&player.id);
        }
    }
}

/// Assigns stroke sequences to the players of one ensemble
pub struct OrchestrationEngine<'a> {
    ensemble: &'a Ensemble,
}

impl<'a> OrchestrationEngine<'a> {
    pub fn new(ensemble: &'a Ensemble) -> Self {
        Self { ensemble }
    }

    /// Distribute `events` over the ensemble.
    ///
    /// # Arguments
    /// * `events` - Strokes in playing order, rests included
    /// * `strategy` - Distribution strategy
    /// * `rng` - Source of timing, velocity and contact point variation
    pub fn orchestrate<R: Rng + ?Sized>(
        &self,
        events: &[StrokeEvent],
        strategy: Strategy,
        rng: &mut R,
    ) -> OrchestrationPattern {
        let mut pattern = OrchestrationPattern::new();
        let cymbals = self.ensemble.cymbal_players();
        for cymbal in &cymbals {
            pattern.add_player(&cymbal.id);
        }

        if self.ensemble.chenda_players().is_empty() {
            warn!(%strategy, "ensemble has no chenda players, nothing to orchestrate");
            return pattern;
        }

        match strategy {
            Strategy::Traditional => self.traditional(events, &cymbals, &mut pattern, rng),
            Strategy::Dynamic => self.dynamic(events, &cymbals, &mut pattern, rng),
            Strategy::Antiphonal => self.antiphonal(events, &mut pattern, rng),
            Strategy::Unison => self.unison(events, &cymbals, &mut pattern, rng),
            Strategy::Layered => self.layered(events, &mut pattern, rng),
        }

        for (id, strokes) in pattern.iter() {
            debug!(%strategy, player = id, strokes = strokes.len(), "orchestrated");
        }
        pattern
    }

    fn traditional<R: Rng + ?Sized>(
        &self,
        events: &[StrokeEvent],
        cymbals: &[&Player],
        pattern: &mut OrchestrationPattern,
        rng: &mut R,
    ) {
        let Some(section) = Section::from_ensemble(self.ensemble) else {
            return;
        };
        section.register(pattern);
        let complexity = pattern_complexity(events);

        for (i, event) in events.iter().enumerate() {
            if event.is_rest() {
                continue;
            }
            let player = select_traditional(event, i, complexity, &section);
            pattern.push(assign(event, player, rng));

            if i % 4 == 0 {
                add_cymbal_hits(event.time, cymbals, pattern, rng);
            }
        }
    }

    fn dynamic<R: Rng + ?Sized>(
        &self,
        events: &[StrokeEvent],
        cymbals: &[&Player],
        pattern: &mut OrchestrationPattern,
        rng: &mut R,
    ) {
        let chendas = self.ensemble.chenda_players();
        for player in &chendas {
            pattern.add_player(&player.id);
        }

        for (i, event) in events.iter().enumerate() {
            if event.is_rest() {
                continue;
            }
            // min_by_key keeps the first of equal loads
            let Some(player) = chendas
                .iter()
                .min_by_key(|p| pattern.strokes_for(&p.id).len())
            else {
                return;
            };
            pattern.push(assign(event, player, rng));

            if i % 8 == 0 {
                add_cymbal_hits(event.time, cymbals, pattern, rng);
            }
        }
    }

    fn antiphonal<R: Rng + ?Sized>(
        &self,
        events: &[StrokeEvent],
        pattern: &mut OrchestrationPattern,
        rng: &mut R,
    ) {
        let Some(section) = Section::from_ensemble(self.ensemble) else {
            return;
        };
        section.register(pattern);

        for (i, event) in events.iter().enumerate() {
            if event.is_rest() {
                continue;
            }
            let player = if (i / PHRASE_LENGTH) % 2 == 0 {
                section.lead
            } else if i % 2 == 0 {
                section.rhythm
            } else {
                section.accent
            };
            pattern.push(assign(event, player, rng));
        }
    }

    fn unison<R: Rng + ?Sized>(
        &self,
        events: &[StrokeEvent],
        cymbals: &[&Player],
        pattern: &mut OrchestrationPattern,
        rng: &mut R,
    ) {
        let chendas = self.ensemble.chenda_players();
        for player in &chendas {
            pattern.add_player(&player.id);
        }

        for (i, event) in events.iter().enumerate() {
            if event.is_rest() {
                continue;
            }
            for player in &chendas {
                pattern.push(assign(event, player, rng));
            }
            if i % 4 == 0 {
                add_cymbal_hits(event.time, cymbals, pattern, rng);
            }
        }
    }

    fn layered<R: Rng + ?Sized>(
        &self,
        events: &[StrokeEvent],
        pattern: &mut OrchestrationPattern,
        rng: &mut R,
    ) {
        let chendas = self.ensemble.chenda_players();
        for player in &chendas {
            pattern.add_player(&player.id);
        }
        let entry_points = [0, events.len() / 4, events.len() / 2];

        for (i, event) in events.iter().enumerate() {
            if event.is_rest() {
                continue;
            }
            for (player, &entry) in chendas.iter().zip(&entry_points) {
                if i >= entry {
                    pattern.push(assign(event, player, rng));
                }
            }
        }
    }
}

fn select_traditional<'a>(
    event: &StrokeEvent,
    position: usize,
    complexity: f32,
    section: &Section<'a>,
) -> &'a Player {
    if event.intensity > 0.8 {
        if HEAVY_ACCENTS.contains(&event.stroke_type.as_str()) {
            return section.accent;
        }
        return section.lead;
    }
    // Quiet downbeats keep the pulse
    if position % 4 == 0 && event.intensity < 0.6 {
        return section.rhythm;
    }
    if complexity > 0.7 {
        return section.lead;
    }
    [section.lead, section.rhythm, section.accent][position % 3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::patterns::events_from_pattern;
    use crate::rng::RenderRng;
    use rand::SeedableRng;

    fn ensemble() -> Ensemble {
        Ensemble::build_standard(&mut RenderRng::seed_from_u64(42))
    }

    fn events() -> Vec<StrokeEvent> {
        events_from_pattern(
            &["Ta", "Ka", ".", "Na", "Dheem", "Ta", ".", "Ka", "Ta", "Ta", "Na", ".", "Ta"],
            120.0,
            None,
        )
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("unison".parse::<Strategy>().unwrap(), Strategy::Unison);
        assert_eq!("Layered".parse::<Strategy>().unwrap(), Strategy::Layered);
        assert!(matches!(
            "random".parse::<Strategy>(),
            Err(Error::UnknownStrategy(_))
        ));
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_rests_never_assigned() {
        let ensemble = ensemble();
        let engine = OrchestrationEngine::new(&ensemble);
        for strategy in Strategy::ALL {
            let pattern = engine.orchestrate(&events(), strategy, &mut RenderRng::seed_from_u64(1));
            for (_, strokes) in pattern.iter() {
                assert!(strokes.iter().all(|s| !s.event.is_rest()), "{}", strategy);
            }
        }
    }

    #[test]
    fn test_unison_counts_equal() {
        let ensemble = ensemble();
        let events = events();
        let sounding = events.iter().filter(|e| !e.is_rest()).count();
        let pattern = OrchestrationEngine::new(&ensemble).orchestrate(
            &events,
            Strategy::Unison,
            &mut RenderRng::seed_from_u64(2),
        );
        for id in ["P1", "P2", "P3"] {
            assert_eq!(pattern.strokes_for(id).len(), sounding);
        }
        // Sounding events at positions 0, 4, 8, 12
        assert_eq!(pattern.strokes_for("P4").len(), 4);
        assert!(pattern.strokes_for("P6").is_empty());
    }

    #[test]
    fn test_traditional_heavy_accent_to_accent_player() {
        let ensemble = ensemble();
        let engine = OrchestrationEngine::new(&ensemble);
        let mut rng = RenderRng::seed_from_u64(3);
        for position in 0..8 {
            let mut strokes = vec!["Ta"; 8];
            strokes[position] = "Dheem";
            let mut curve = vec![0.5; 8];
            curve[position] = 0.95;
            let events = events_from_pattern(&strokes, 100.0, Some(&curve));
            let pattern = engine.orchestrate(&events, Strategy::Traditional, &mut rng);
            assert!(pattern
                .strokes_for("P3")
                .iter()
                .any(|s| s.event.stroke_type == "Dheem"));
            assert!(pattern
                .strokes_for("P1")
                .iter()
                .chain(pattern.strokes_for("P2"))
                .all(|s| s.event.stroke_type != "Dheem"));
        }
    }

    #[test]
    fn test_traditional_cymbals_on_downbeats() {
        let ensemble = ensemble();
        let events = events_from_pattern(&["Ta"; 9], 120.0, None);
        let pattern = OrchestrationEngine::new(&ensemble).orchestrate(
            &events,
            Strategy::Traditional,
            &mut RenderRng::seed_from_u64(4),
        );
        for id in ["P4", "P5"] {
            let hits = pattern.strokes_for(id);
            assert_eq!(hits.len(), 3);
            assert!(hits.iter().all(|h| h.event.category == SoundCategory::Nam));
            assert!(hits.iter().all(|h| h.event.stroke_type == "1"));
            assert!(hits.iter().all(|h| h.contact_point == 0.5));
        }
        let chenda_total: usize = ["P1", "P2", "P3"]
            .iter()
            .map(|id| pattern.strokes_for(id).len())
            .sum();
        assert_eq!(chenda_total, 9);
    }

    #[test]
    fn test_dynamic_balances_load() {
        let ensemble = ensemble();
        let events = events_from_pattern(&["Ta"; 10], 120.0, None);
        let pattern = OrchestrationEngine::new(&ensemble).orchestrate(
            &events,
            Strategy::Dynamic,
            &mut RenderRng::seed_from_u64(5),
        );
        assert_eq!(pattern.strokes_for("P1").len(), 4);
        assert_eq!(pattern.strokes_for("P2").len(), 3);
        assert_eq!(pattern.strokes_for("P3").len(), 3);
        // Positions 0 and 8
        assert_eq!(pattern.strokes_for("P4").len(), 2);
    }

    #[test]
    fn test_antiphonal_phrases() {
        let ensemble = ensemble();
        let events = events_from_pattern(&["Ta"; 8], 120.0, None);
        let pattern = OrchestrationEngine::new(&ensemble).orchestrate(
            &events,
            Strategy::Antiphonal,
            &mut RenderRng::seed_from_u64(6),
        );
        assert_eq!(pattern.strokes_for("P1").len(), 4);
        assert_eq!(pattern.strokes_for("P2").len(), 2);
        assert_eq!(pattern.strokes_for("P3").len(), 2);
        assert!(pattern.strokes_for("P4").is_empty());
    }

    #[test]
    fn test_layered_entries() {
        let ensemble = ensemble();
        let events = events_from_pattern(&["Ta"; 8], 120.0, None);
        let pattern = OrchestrationEngine::new(&ensemble).orchestrate(
            &events,
            Strategy::Layered,
            &mut RenderRng::seed_from_u64(7),
        );
        assert_eq!(pattern.strokes_for("P1").len(), 8);
        assert_eq!(pattern.strokes_for("P2").len(), 6);
        assert_eq!(pattern.strokes_for("P3").len(), 4);
    }

    #[test]
    fn test_assign_resolves_player_values() {
        let ensemble = ensemble();
        let lead = ensemble.get_player("P1").unwrap();
        let mut rng = RenderRng::seed_from_u64(8);
        let loud = StrokeEvent::new(1.0, "Ta", SoundCategory::Thaam, 0.9, 0.4);
        let soft = StrokeEvent::new(0.0, "Ta", SoundCategory::Thaam, 0.3, 0.4);
        for _ in 0..50 {
            let a = assign(&loud, lead, &mut rng);
            assert_eq!(a.player_id, "P1");
            assert!((0.6..0.9).contains(&a.contact_point));
            assert!((a.event.time - 1.0).abs() < 0.05);
            assert!((0.0..=1.0).contains(&a.velocity));

            let b = assign(&soft, lead, &mut rng);
            assert!((0.3..0.6).contains(&b.contact_point));
            assert!(b.event.time >= 0.0);
        }
    }

    #[test]
    fn test_complexity() {
        assert_eq!(pattern_complexity(&[]), 0.0);
        let flat = events_from_pattern(&["Ta", "Ta", ".", "."], 120.0, None);
        assert!((pattern_complexity(&flat) - 0.25).abs() < 1e-6);
        let wide = events_from_pattern(&["Ta", "Ta"], 120.0, Some(&[0.1, 0.9]));
        assert!((pattern_complexity(&wide) - 0.9).abs() < 1e-6);
    }
}
