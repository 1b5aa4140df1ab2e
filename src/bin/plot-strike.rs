//! Plot the stick click and stick ring of one strike to SVG
//!
//! Usage: plot-strike [--stick bamboo_medium] [--membrane cow_high] [-v 0.8] [-c 0.7] output.svg

use clap::Parser;
use melam::material::{MembranePreset, StickPreset};
use melam::physics::{strike_profile, StickImpactModeler};
use melam::rng::RenderRng;
use melam::SAMPLE_RATE;
use plotters::prelude::*;
use rand::SeedableRng;
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(name = "plot-strike")]
#[command(about = "Plot the transient and stick resonance of a strike")]
struct Args {
    output: String,

    /// bamboo_light, bamboo_medium, bamboo_heavy, teak_medium, rosewood_heavy
    #[arg(long, default_value = "bamboo_medium")]
    stick: String,

    /// cow_high, cow_medium, cow_low, goat_high
    #[arg(long, default_value = "cow_high")]
    membrane: String,

    #[arg(short, long, default_value_t = 0.8)]
    velocity: f32,

    /// 0.0 (edge) to 1.0 (center)
    #[arg(short, long, default_value_t = 0.7)]
    contact: f32,

    /// Degrees, 90 is perpendicular
    #[arg(long, default_value_t = 90.0)]
    angle: f32,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Preset from its snake_case name
fn preset<T: DeserializeOwned>(name: &str) -> Result<T, Box<dyn std::error::Error>> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("unknown preset: {}", name).into())
}

fn create_plot(
    args: &Args,
    transient: &[f32],
    ring: &[f32],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(&args.output, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let to_ms = |i: usize| i as f32 * 1000.0 / SAMPLE_RATE as f32;
    let max_time = to_ms(transient.len().max(ring.len()));
    let peak = transient
        .iter()
        .chain(ring)
        .fold(0.0f32, |m, s| m.max(s.abs()))
        .max(1e-3)
        * 1.1;

    let title = format!(
        "Strike: {} on {}, v={:.2}, contact={:.2}",
        args.stick, args.membrane, args.velocity, args.contact
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..max_time, -peak..peak)?;

    chart
        .configure_mesh()
        .x_desc("Time (ms)")
        .y_desc("Amplitude")
        .x_labels(10)
        .y_labels(10)
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            transient.iter().enumerate().map(|(i, &s)| (to_ms(i), s)),
            BLUE.stroke_width(1),
        ))?
        .label("click")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            ring.iter().enumerate().map(|(i, &s)| (to_ms(i), s)),
            RED.stroke_width(2),
        ))?
        .label("stick ring")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let stick = preset::<StickPreset>(&args.stick)?.properties();
    let membrane = preset::<MembranePreset>(&args.membrane)?.properties();

    let modeler = StickImpactModeler::new(SAMPLE_RATE);
    let mut rng = RenderRng::seed_from_u64(args.seed);
    let profile = strike_profile(
        &modeler,
        &stick,
        &membrane,
        args.velocity,
        args.contact,
        args.angle,
        &mut rng,
    );

    println!("Strike Profile");
    println!("==============");
    println!("  Impact force:      {:.3}", profile.impact.impact_force);
    println!("  Contact duration:  {:.3} ms", profile.impact.contact_duration * 1000.0);
    println!("  Spectral centroid: {:.0} Hz", profile.impact.spectral_centroid);
    println!("  Stick resonance:   {:.0} Hz", profile.impact.stick_resonance_freq);
    println!("  Pitch bend:        {:.1}%", profile.response.pitch_bend_amount * 100.0);
    println!("  Restitution:       {:.3}", profile.rebound.restitution);

    create_plot(&args, &profile.transient, &profile.stick_resonance)?;
    println!("✓ Plot saved to {}", args.output);
    Ok(())
}
