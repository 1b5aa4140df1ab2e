//! Render pipeline
//!
//! Composes the stages into one call: stroke events are orchestrated over the
//! ensemble, the pattern is mixed to a master bus and optionally written out
//! as WAV.

use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::events::{OrchestrationPattern, StrokeEvent};
use super::mixer::{EnsembleMixer, MasterBus, MixOutput};
use super::orchestrator::{OrchestrationEngine, Strategy};
use super::parser::parse_pattern;
use super::patterns::{events_from_pattern, events_from_tokens};
use crate::config::RenderConfig;
use crate::ensemble::Ensemble;
use crate::error::Result;
use crate::rng::RenderRng;
use crate::synthesis::{PartialBank, SpectralEngine};
use crate::wav;

/// Silence appended after the last stroke when no duration is given, seconds
pub const TAIL_SECONDS: f32 = 1.0;

/// Configuration for the render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tempo used to time plain stroke lists
    pub bpm: f32,
    pub strategy: Strategy,
    /// Output length in seconds; the end of the last stroke plus a tail when unset
    pub duration: Option<f32>,
    /// Stereo stage placement instead of a mono sum
    pub spatial: bool,
    /// Seed for the bank, the ensemble and every render
    pub seed: u64,
    /// Keep per-player stems
    pub stems: bool,
    pub render: RenderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            strategy: Strategy::Traditional,
            duration: None,
            spatial: true,
            seed: 42,
            stems: false,
            render: RenderConfig::default(),
        }
    }
}

/// Everything produced by one render
#[derive(Debug, Clone)]
pub struct Render {
    pub events: Vec<StrokeEvent>,
    pub pattern: OrchestrationPattern,
    /// Seconds
    pub duration: f32,
    pub output: MixOutput,
}

/// Ensemble, spectral engine and mixer, built once and reused across renders
pub struct Pipeline {
    config: PipelineConfig,
    ensemble: Ensemble,
    mixer: EnsembleMixer,
    rng: RenderRng,
}

impl Pipeline {
    /// Build the bank and the standard ensemble from the configured seed.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let mut rng = RenderRng::seed_from_u64(config.seed);
        let ensemble = Ensemble::build_standard(&mut rng);
        Self::build(config, ensemble, rng)
    }

    /// Pipeline over an explicit ensemble.
    pub fn with_ensemble(config: PipelineConfig, ensemble: Ensemble) -> Result<Self> {
        let rng = RenderRng::seed_from_u64(config.seed);
        Self::build(config, ensemble, rng)
    }

    fn build(config: PipelineConfig, ensemble: Ensemble, mut rng: RenderRng) -> Result<Self> {
        config.render.validate()?;
        let bank = PartialBank::from_config(&config.render.bank, &mut rng)?;
        let engine = SpectralEngine::new(
            Arc::new(bank),
            config.render.ensembling.clone(),
            config.render.sample_rate,
        );
        let mixer = EnsembleMixer::new(engine, config.render.mixer.clone());
        Ok(Self {
            config,
            ensemble,
            mixer,
            rng,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    /// Mutable access for mix state changes between renders.
    pub fn ensemble_mut(&mut self) -> &mut Ensemble {
        &mut self.ensemble
    }

    pub fn sample_rate(&self) -> u32 {
        self.mixer.sample_rate()
    }

    /// Render a stroke list at the configured tempo.
    pub fn render<S: AsRef<str>>(&mut self, strokes: &[S]) -> Render {
        let events = events_from_pattern(strokes, self.config.bpm, None);
        self.render_events(events)
    }

    /// Render text notation at the configured tempo.
    pub fn render_notation(&mut self, text: &str) -> Result<Render> {
        let tokens = parse_pattern(text)?;
        let events = events_from_tokens(&tokens, self.config.bpm);
        Ok(self.render_events(events))
    }

    /// Orchestrate and mix already timed events.
    pub fn render_events(&mut self, events: Vec<StrokeEvent>) -> Render {
        let pattern = OrchestrationEngine::new(&self.ensemble).orchestrate(
            &events,
            self.config.strategy,
            &mut self.rng,
        );
        let duration = self
            .config
            .duration
            .unwrap_or_else(|| pattern.end_time() + TAIL_SECONDS);

        info!(
            events = events.len(),
            strokes = pattern.total_strokes(),
            strategy = %self.config.strategy,
            duration,
            "rendering"
        );
        let output = self.mixer.render_ensemble(
            &self.ensemble,
            &pattern,
            duration,
            self.config.spatial,
            self.config.stems,
            &mut self.rng,
        );

        Render {
            events,
            pattern,
            duration,
            output,
        }
    }

    /// Render a stroke list and write the master bus to `output_path`.
    ///
    /// # Arguments
    /// * `strokes` - Stroke syllables, `.` for rests
    /// * `output_path` - Path for output WAV file
    pub fn generate_wav<S: AsRef<str>, P: AsRef<Path>>(
        &mut self,
        strokes: &[S],
        output_path: P,
    ) -> Result<Render> {
        let render = self.render(strokes);
        write_master(output_path, &render.output.master, self.sample_rate())?;
        Ok(render)
    }
}

/// Write a master bus as mono or interleaved stereo 16-bit WAV.
pub fn write_master<P: AsRef<Path>>(path: P, master: &MasterBus, sample_rate: u32) -> Result<()> {
    match master {
        MasterBus::Mono(samples) => wav::write_mono(path, samples, sample_rate),
        MasterBus::Stereo { left, right } => wav::write_stereo(path, left, right, sample_rate),
    }
}
