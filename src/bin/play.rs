//! CLI tool for rendering stroke patterns with the full ensemble
//!
//! Usage: play [pattern.txt] [--preset NAME] [-o output.wav]
//!
//! If output is not specified, generates <input>.wav (or <preset>.wav)

use clap::Parser;
use melam::config::RenderConfig;
use melam::pipeline::{patterns, OrchestrationTrace, Pipeline, PipelineConfig, Strategy};
use melam::wav;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "play")]
#[command(about = "Render a chendamelam stroke pattern to WAV")]
struct Args {
    /// Pattern file in stroke notation (e.g. "Ta ka . Dheem@0.9")
    input: Option<PathBuf>,

    /// Render a traditional preset instead of a file
    #[arg(long, conflicts_with = "input")]
    preset: Option<String>,

    /// Output WAV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// traditional, dynamic, antiphonal, unison or layered
    #[arg(short, long, default_value = "traditional")]
    strategy: Strategy,

    /// Tempo; defaults to 120, or the preset's own tempo
    #[arg(long)]
    bpm: Option<f32>,

    /// Output length in seconds (default: last stroke + 1 s)
    #[arg(long)]
    duration: Option<f32>,

    /// Sum to mono instead of placing players on a stereo stage
    #[arg(long)]
    mono: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write one WAV per player into this directory
    #[arg(long)]
    stems: Option<PathBuf>,

    /// Write the orchestration trace as JSON
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Render configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the presets and exit
    #[arg(long)]
    list_presets: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list_presets {
        for preset in patterns::PRESETS.iter() {
            println!("{:<16} {:>4} BPM  {} strokes", preset.name, preset.bpm, preset.strokes.len());
        }
        return Ok(());
    }

    let render = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    let preset = args.preset.as_deref().map(patterns::preset).transpose()?;
    let bpm = args
        .bpm
        .or(preset.map(|p| p.bpm))
        .unwrap_or(PipelineConfig::default().bpm);

    let config = PipelineConfig {
        bpm,
        strategy: args.strategy,
        duration: args.duration,
        spatial: !args.mono,
        seed: args.seed,
        stems: args.stems.is_some(),
        render,
    };

    let output_path = match (&args.output, &args.input, preset) {
        (Some(path), _, _) => path.clone(),
        (None, Some(input), _) => input.with_extension("wav"),
        (None, None, Some(p)) => PathBuf::from(format!("{}.wav", p.name)),
        (None, None, None) => PathBuf::from("melam.wav"),
    };

    let mut pipeline = Pipeline::new(config)?;
    print!("{}", pipeline.ensemble());

    let result = match (&args.input, preset) {
        (Some(input), _) => pipeline.render_notation(&fs::read_to_string(input)?)?,
        (None, Some(p)) => pipeline.render(p.strokes),
        (None, None) => return Err("give a pattern file or --preset (see --list-presets)".into()),
    };

    melam::pipeline::write_master(&output_path, &result.output.master, pipeline.sample_rate())?;
    info!(
        path = %output_path.display(),
        seconds = result.duration,
        peak = result.output.master.peak(),
        "wrote master"
    );

    if let (Some(dir), Some(stems)) = (&args.stems, &result.output.stems) {
        wav::write_stems(dir, stems, pipeline.sample_rate())?;
    }

    if let Some(path) = &args.trace {
        OrchestrationTrace::from(&result.pattern).save(path)?;
        info!(path = %path.display(), "wrote orchestration trace");
    }

    println!("✓ Generated {}", output_path.display());
    Ok(())
}
