//! Stroke events, player assignments and the orchestration trace

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::synthesis::SoundCategory;

/// One symbolic stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeEvent {
    /// Seconds from the start, never negative
    pub time: f32,
    /// Syllable, e.g. "Ta"
    pub stroke_type: String,
    pub category: SoundCategory,
    /// 0.0 to 1.0
    pub intensity: f32,
    /// Seconds
    pub duration: f32,
}

impl StrokeEvent {
    pub fn new(
        time: f32,
        stroke_type: impl Into<String>,
        category: SoundCategory,
        intensity: f32,
        duration: f32,
    ) -> Self {
        Self {
            time: time.max(0.0),
            stroke_type: stroke_type.into(),
            category,
            intensity: intensity.clamp(0.0, 1.0),
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.category.is_rest()
    }
}

/// A stroke resolved for a specific player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedStroke {
    /// The stroke with the player's timing applied to `time`
    pub event: StrokeEvent,
    pub player_id: String,
    pub velocity: f32,
    /// 0.0 (edge) to 1.0 (center)
    pub contact_point: f32,
}

/// Strokes assigned to each player, in playing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestrationPattern {
    players: BTreeMap<String, Vec<AssignedStroke>>,
}

impl OrchestrationPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player with no strokes yet.
    pub fn add_player(&mut self, player_id: &str) {
        self.players.entry(player_id.to_string()).or_default();
    }

    pub fn push(&mut self, stroke: AssignedStroke) {
        self.players
            .entry(stroke.player_id.clone())
            .or_default()
            .push(stroke);
    }

    /// Strokes of a player; empty for players without assignments.
    pub fn strokes_for(&self, player_id: &str) -> &[AssignedStroke] {
        self.players
            .get(player_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AssignedStroke])> {
        self.players
            .iter()
            .map(|(id, strokes)| (id.as_str(), strokes.as_slice()))
    }

    pub fn total_strokes(&self) -> usize {
        self.players.values().map(Vec::len).sum()
    }

    /// End of the last stroke in seconds
    pub fn end_time(&self) -> f32 {
        self.players
            .values()
            .flatten()
            .map(|s| s.event.time + s.event.duration)
            .fold(0.0, f32::max)
    }
}

/// One line of the trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub time: f32,
    pub stroke_type: String,
    pub category: SoundCategory,
    pub velocity: f32,
    pub duration: f32,
    pub contact_point: f32,
}

/// Serializable record of who plays what, for audit and replay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationTrace {
    pub players: BTreeMap<String, Vec<TraceEntry>>,
}

impl OrchestrationTrace {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl From<&OrchestrationPattern> for OrchestrationTrace {
    fn from(pattern: &OrchestrationPattern) -> Self {
        let players = pattern
            .iter()
            .map(|(id, strokes)| {
                let entries = strokes
                    .iter()
                    .map(|s| TraceEntry {
                        time: s.event.time,
                        stroke_type: s.event.stroke_type.clone(),
                        category: s.event.category,
                        velocity: s.velocity,
                        duration: s.event.duration,
                        contact_point: s.contact_point,
                    })
                    .collect();
                (id.to_string(), entries)
            })
            .collect();
        Self { players }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(player: &str, time: f32) -> AssignedStroke {
        AssignedStroke {
            event: StrokeEvent::new(time, "Ta", SoundCategory::Thaam, 0.7, 0.4),
            player_id: player.to_string(),
            velocity: 0.8,
            contact_point: 0.5,
        }
    }

    #[test]
    fn test_event_clamps() {
        let event = StrokeEvent::new(-0.1, "Ta", SoundCategory::Thaam, 1.4, 0.4);
        assert_eq!(event.time, 0.0);
        assert_eq!(event.intensity, 1.0);
        assert!(!event.is_rest());
    }

    #[test]
    fn test_pattern_queries() {
        let mut pattern = OrchestrationPattern::new();
        pattern.add_player("P3");
        pattern.push(stroke("P1", 0.0));
        pattern.push(stroke("P1", 0.5));
        pattern.push(stroke("P2", 1.0));

        assert_eq!(pattern.strokes_for("P1").len(), 2);
        assert!(pattern.strokes_for("P3").is_empty());
        assert!(pattern.strokes_for("P9").is_empty());
        assert_eq!(pattern.total_strokes(), 3);
        assert_eq!(pattern.player_ids().collect::<Vec<_>>(), ["P1", "P2", "P3"]);
        assert!((pattern.end_time() - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_trace_json() {
        let mut pattern = OrchestrationPattern::new();
        pattern.push(stroke("P1", 0.25));
        let trace = OrchestrationTrace::from(&pattern);
        let json = trace.to_json().unwrap();
        assert!(json.contains("\"THAAM\""));
        assert!(json.contains("\"contact_point\""));

        let back = OrchestrationTrace::from_json(&json).unwrap();
        assert_eq!(back, trace);
        assert_eq!(back.players["P1"][0].time, 0.25);
    }
}
