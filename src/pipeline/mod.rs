//! Rendering pipeline
//!
//! From symbolic strokes to a mastered bus:
//! - Parser: stroke pattern notation
//! - Patterns: stroke library, timing and traditional presets
//! - Orchestrator: assignment of strokes to players
//! - Mixer: per-player rendering, spatialization and mastering
//! - Scheduler: the one-call `Pipeline`

pub mod events;
pub mod mixer;
pub mod orchestrator;
pub mod parser;
pub mod patterns;
pub mod scheduler;

pub use events::{
    AssignedStroke, OrchestrationPattern, OrchestrationTrace, StrokeEvent, TraceEntry,
};
pub use mixer::{EnsembleMixer, MasterBus, MixOutput};
pub use orchestrator::{OrchestrationEngine, Strategy};
pub use parser::{parse_pattern, ParseError, StrokeToken};
pub use patterns::{category_for, events_from_pattern, events_from_tokens, preset, PatternPreset};
pub use scheduler::{write_master, Pipeline, PipelineConfig, Render};
