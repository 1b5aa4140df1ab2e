use melam::generator::{AdditiveVoice, GeneratorState, SignalGenerator, FRAME_SIZE};
use melam::material::{effects, MembranePreset, StickPreset, WoodKind};
use melam::pipeline::{patterns, Pipeline, PipelineConfig, Strategy};
use melam::rng::RenderRng;
use melam::synthesis::{PartialBank, SoundCategory};
use rand::SeedableRng;

fn demo_materials() {
    println!("\n=== Material Model Demo ===\n");

    println!("{:<22} {:>8} {:>11}", "Wood", "Density", "Brightness");
    println!("{}", "-".repeat(43));
    for kind in WoodKind::ALL {
        let wood = kind.properties();
        println!(
            "{:<22} {:>8.0} {:>11.2}",
            wood.name,
            wood.density,
            wood.resonance_brightness()
        );
    }

    let stick = StickPreset::BambooMedium.properties();
    let membrane = MembranePreset::CowHigh.properties();
    let jackwood = WoodKind::Jackwood.properties();
    println!();
    println!(
        "280 Hz on a jackwood shell with a tight cow head: {:.1} Hz",
        effects::frequency_shift(280.0, &membrane, &jackwood)
    );
    println!(
        "Strike brightness (v=0.8, center): {:.2}",
        effects::strike_brightness(&stick, 0.8, 1.0)
    );
}

fn demo_voice(bank: &PartialBank) {
    println!("\n=== Additive Voice Demo ===\n");

    let Some(signature) = bank.variants(SoundCategory::Thaam).first() else {
        println!("No THAAM variants in the bank");
        return;
    };
    let mut voice = AdditiveVoice::new(&signature.partials, 1.0, melam::SAMPLE_RATE);
    println!("Variant {} with {} partials", signature.id, voice.partial_count());

    let mut frame = vec![0.0f32; FRAME_SIZE];
    let mut frames = 0;
    loop {
        let state = voice.process(&mut frame);
        frames += 1;
        if frames <= 3 {
            let peak = frame.iter().fold(0.0f32, |m, s| m.max(s.abs()));
            println!("  Frame {}: peak {:.3}", frames, peak);
        }
        if state == GeneratorState::Complete || frames >= 400 {
            break;
        }
    }
    println!("Rendered {} frames ({} samples)", frames, voice.position());
}

fn demo_render() -> melam::Result<()> {
    println!("\n=== Ensemble Render Demo ===\n");

    let preset = patterns::preset("naalam_kaalam")?;
    let mut pipeline = Pipeline::new(PipelineConfig {
        bpm: preset.bpm,
        strategy: Strategy::Traditional,
        ..PipelineConfig::default()
    })?;
    print!("{}", pipeline.ensemble());

    let path = "melam_demo.wav";
    let render = pipeline.generate_wav(preset.strokes, path)?;
    println!();
    for (id, strokes) in render.pattern.iter() {
        println!("  {}: {} strokes", id, strokes.len());
    }
    println!(
        "\n{} ({} BPM): {:.2}s, peak {:.3} -> {}",
        preset.name,
        preset.bpm,
        render.duration,
        render.output.master.peak(),
        path
    );
    Ok(())
}

fn main() -> melam::Result<()> {
    println!("Melam Ensemble Renderer");
    println!("=======================");

    demo_materials();

    let mut rng = RenderRng::seed_from_u64(7);
    let bank = PartialBank::generate(2, &mut rng);
    demo_voice(&bank);

    demo_render()?;

    println!("\n=======================");
    println!("All demos complete!");
    Ok(())
}
