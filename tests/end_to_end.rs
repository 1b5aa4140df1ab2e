use melam::pipeline::{MasterBus, OrchestrationTrace, Pipeline, PipelineConfig, Strategy};

fn config() -> PipelineConfig {
    let mut config = PipelineConfig {
        bpm: 120.0,
        strategy: Strategy::Traditional,
        duration: Some(2.0),
        spatial: true,
        seed: 7,
        ..PipelineConfig::default()
    };
    config.render.bank.variants_per_category = 4;
    config
}

#[test]
fn test_traditional_stereo_render() {
    let mut pipeline = Pipeline::new(config()).unwrap();
    let render = pipeline.render(&["Ta", "Ka", "Na", "."]);

    match &render.output.master {
        MasterBus::Stereo { left, right } => {
            assert_eq!(left.len(), 88_200);
            assert_eq!(right.len(), 88_200);
            assert!(left.iter().chain(right).all(|s| s.is_finite()));
            assert!(left.iter().chain(right).any(|&s| s != 0.0));
        }
        MasterBus::Mono(_) => panic!("expected a stereo bus"),
    }
    assert!(render.output.master.peak() <= 0.98 + 1e-6);
}

#[test]
fn test_every_strategy_renders() {
    for strategy in Strategy::ALL {
        let mut pipeline = Pipeline::new(PipelineConfig {
            strategy,
            stems: true,
            ..config()
        })
        .unwrap();
        let render = pipeline.render(&["Ta", "Ka", ".", "Dheem", "Na", "Ta", "Ki", "Ta"]);
        assert_eq!(render.output.master.len(), 88_200, "{}", strategy);
        assert!(render.output.master.peak() > 0.0, "{}", strategy);

        let stems = render.output.stems.unwrap();
        assert!(stems.contains_key("P1"), "{}", strategy);
        assert!(stems.values().all(|s| s.len() == 88_200));
    }
}

#[test]
fn test_trace_lists_every_stroke() {
    let mut pipeline = Pipeline::new(config()).unwrap();
    let render = pipeline.render(&["Ta", "Ka", "Na", "."]);
    let trace = OrchestrationTrace::from(&render.pattern);

    let traced: usize = trace.players.values().map(Vec::len).sum();
    assert_eq!(traced, render.pattern.total_strokes());

    let json = trace.to_json().unwrap();
    assert_eq!(OrchestrationTrace::from_json(&json).unwrap(), trace);
}
