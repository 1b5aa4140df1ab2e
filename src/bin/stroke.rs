//! Render a single sound category from the partial bank
//!
//! Usage: stroke <CATEGORY> [-v velocity] [-d seconds] [-o output.wav]

use clap::Parser;
use melam::config::{BankConfig, EnsemblingConfig};
use melam::rng::RenderRng;
use melam::synthesis::{PartialBank, SoundCategory, SpectralEngine};
use melam::{wav, SAMPLE_RATE};
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "stroke")]
#[command(about = "Render one ensembled stroke of a sound category")]
struct Args {
    /// THAAM, CHAPU, DHEEM, NAM, URUTTU or WIND
    category: String,

    /// Peak amplitude, 0.0 to 1.0
    #[arg(short, long, default_value_t = 0.8)]
    velocity: f32,

    /// Seconds
    #[arg(short, long, default_value_t = 1.0)]
    duration: f32,

    /// Virtual performers layered per hit
    #[arg(long, default_value_t = 4)]
    layers: usize,

    /// Spectral database (JSON); generated when absent
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Save the generated bank to this path
    #[arg(long)]
    save_bank: Option<PathBuf>,

    /// Silence padding at start and end, seconds
    #[arg(long, default_value_t = 0.1)]
    silence: f32,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(short, long, default_value = "stroke.wav")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let category = SoundCategory::from_name(&args.category)
        .ok_or_else(|| format!("unknown sound category: {}", args.category))?;

    let mut rng = RenderRng::seed_from_u64(args.seed);
    let bank_config = BankConfig {
        path: args.bank.clone(),
        ..BankConfig::default()
    };
    let bank = PartialBank::from_config(&bank_config, &mut rng)?;
    if let Some(path) = &args.save_bank {
        bank.save(path)?;
    }

    let engine = SpectralEngine::new(
        Arc::new(bank),
        EnsemblingConfig {
            layers: args.layers.max(1),
            ..EnsemblingConfig::default()
        },
        SAMPLE_RATE,
    );
    let sound = engine.get_sound(category, args.velocity, args.duration, &mut rng);

    let pad = melam::samples_for(args.silence, SAMPLE_RATE);
    let mut output = vec![0.0f32; pad];
    output.extend_from_slice(&sound);
    output.resize(output.len() + pad, 0.0);

    wav::write_mono(&args.output, &output, SAMPLE_RATE)?;
    println!(
        "✓ {} at velocity {:.2}: {} samples -> {}",
        category,
        args.velocity,
        sound.len(),
        args.output.display()
    );
    Ok(())
}
