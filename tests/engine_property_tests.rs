use proptest::prelude::*;
use std::cell::Cell;
use tiler_core::compute::{ComputeOutput, Replay};
use tiler_core::config::EngineSettings;
use tiler_core::error::ComputationError;
use tiler_core::notify::{notify, NotificationLevel};
use tiler_core::selection::DirectResolver;
use tiler_core::{AnnotationEngine, ConfigurationOptions, EngineError, Pair, Substring, TextSide};

const TEXT_A: &str = "天地玄黃宇宙洪荒日月盈昃";
const TEXT_B: &str = "玄黃宇宙之洪荒日月";

fn replay() -> Replay {
    Replay::new(ComputeOutput {
        pairs: vec![
            Pair::new(Substring::new(2, 6), Substring::new(0, 4), 1.0, true),
            Pair::new(Substring::new(6, 10), Substring::new(5, 9), 0.75, false),
            Pair::new(Substring::new(0, 2), Substring::new(4, 5), 0.2, false),
        ],
        overall_similarity_a: 0.7,
        overall_similarity_b: 0.6,
    })
}

fn opened<C: tiler_core::compute::Compute>(compute: C, settings: EngineSettings) -> AnnotationEngine<C> {
    let mut engine = AnnotationEngine::with_settings(compute, settings);
    engine
        .analyze(TEXT_A.into(), TEXT_B.into(), ConfigurationOptions::default())
        .unwrap();
    engine
}

fn config_with(min_length: usize) -> ConfigurationOptions {
    ConfigurationOptions {
        min_length,
        ..ConfigurationOptions::default()
    }
}

#[test]
fn settings_file_shapes_rendering_and_history() {
    let settings = EngineSettings::from_toml(
        r#"
        match_color = "teal"
        palette = ["orange", "blue"]
        hover_color = "purple"
        history_limit = 1
        "#,
    )
    .unwrap();
    let mut engine = opened(replay(), settings);

    let frame = engine.render().unwrap();
    assert_eq!(frame.a[2].background.as_deref(), Some("teal"));
    assert_eq!(frame.a[6].background.as_deref(), Some("blue"));
    assert_eq!(frame.a[0].background.as_deref(), Some("orange"));

    engine.pointer_down(TextSide::A, 7);
    engine.pointer_over(TextSide::B, 6);
    let frame = engine.render().unwrap();
    assert_eq!(frame.a[7].background.as_deref(), Some("purple"));

    engine.update_configuration(config_with(3)).unwrap();
    engine.update_configuration(config_with(4)).unwrap();
    assert_eq!(engine.history().len(), 1);
    engine.undo().unwrap();
    assert_eq!(engine.project().unwrap().config.min_length, 3);
    let last = notify(engine.undo());
    assert_eq!(last.level, NotificationLevel::Info);
}

#[test]
fn cosine_pair_over_exact_match_gets_border() {
    let compute = Replay::new(ComputeOutput {
        pairs: vec![
            Pair::new(Substring::new(0, 4), Substring::new(0, 4), 1.0, true),
            Pair::new(Substring::new(2, 6), Substring::new(2, 6), 0.4, false),
        ],
        overall_similarity_a: 0.5,
        overall_similarity_b: 0.5,
    });
    let engine = opened(compute, EngineSettings::default());
    let frame = engine.render().unwrap();
    assert!(frame.a[3].border);
    assert_eq!(frame.a[3].background.as_deref(), Some("orange"));
    assert!(!frame.a[4].border);
    assert!(!frame.a[1].border);
    assert_eq!(
        frame.b[5].tooltip.as_deref(),
        Some("Cosine similarity: 0.4000")
    );
}

#[test]
fn project_survives_disk_roundtrip_between_engines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.tile");

    let mut engine = opened(replay(), EngineSettings::default());
    engine.add_synonym(&DirectResolver, &(TextSide::A, 0, 1)).unwrap();
    engine.add_synonym(&DirectResolver, &(TextSide::B, 4, 4)).unwrap();
    engine.save(&path).unwrap();

    let mut reopened = AnnotationEngine::new(replay());
    reopened.open_path(&path).unwrap();
    assert_eq!(reopened.project(), engine.project());
    let frame = reopened.render().unwrap();
    assert_eq!(frame.a[1].underline.as_deref(), Some("black"));
    assert_eq!(frame.b[4].underline.as_deref(), Some("black"));
}

#[derive(Debug, Clone)]
enum Command {
    Update(usize),
    Fail(usize),
    Undo,
    Toggle(usize),
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        (1usize..20).prop_map(Command::Update),
        (1usize..20).prop_map(Command::Fail),
        Just(Command::Undo),
        (0usize..12).prop_map(Command::Toggle),
    ]
}

fn selection_strategy() -> impl Strategy<Value = (TextSide, usize, usize)> {
    let side = prop_oneof![Just(TextSide::A), Just(TextSide::B)];
    (side, 0usize..9, 0usize..3).prop_map(|(side, first, extra)| (side, first, first + extra))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The engine behaves like a stack of configurations: failures change
    /// nothing, undo returns to the previous successful configuration.
    #[test]
    fn prop_history_matches_model(commands in prop::collection::vec(command_strategy(), 0..24)) {
        let offline = Cell::new(false);
        let inner = replay();
        let compute = |a: &str, b: &str, config: &ConfigurationOptions| {
            if offline.get() {
                return Err(ComputationError::Rejected { reason: "offline".into() });
            }
            tiler_core::compute::Compute::compute(&inner, a, b, config)
        };
        let mut engine = opened(compute, EngineSettings::default());
        let mut model: Vec<usize> = vec![ConfigurationOptions::default().min_length];

        for command in commands {
            let before = engine.project().cloned();
            match command {
                Command::Update(min_length) => {
                    engine.update_configuration(config_with(min_length)).unwrap();
                    model.push(min_length);
                    prop_assert!(engine.project().unwrap().pairs.iter().all(|pair| pair.hold));
                }
                Command::Fail(min_length) => {
                    offline.set(true);
                    let result = engine.update_configuration(config_with(min_length));
                    offline.set(false);
                    prop_assert!(matches!(result, Err(EngineError::Computation(_))));
                    prop_assert_eq!(engine.project().cloned(), before);
                }
                Command::Undo => {
                    let result = engine.undo();
                    if model.len() > 1 {
                        prop_assert!(result.is_ok());
                        model.pop();
                    } else {
                        prop_assert!(matches!(result, Err(EngineError::HistoryEmpty)));
                        prop_assert_eq!(engine.project().cloned(), before);
                    }
                }
                Command::Toggle(index) => {
                    engine.pointer_down(TextSide::A, index);
                }
            }
            prop_assert_eq!(engine.history().len(), model.len() - 1);
            prop_assert_eq!(engine.project().unwrap().config.min_length, *model.last().unwrap());
        }
    }

    /// However links are added and removed, the stored graph stays a valid
    /// mirror of itself and fits both texts.
    #[test]
    fn prop_synonym_edits_keep_graph_valid(
        edits in prop::collection::vec((any::<bool>(), selection_strategy()), 0..20),
    ) {
        let mut engine = opened(replay(), EngineSettings::default());
        for (remove, range) in edits {
            let result = if remove {
                engine.remove_synonym(&DirectResolver, &range)
            } else {
                engine.add_synonym(&DirectResolver, &range)
            };
            if let Err(err) = result {
                prop_assert!(matches!(
                    err,
                    EngineError::Selection(_) | EngineError::Pairing(_) | EngineError::Synonym(_)
                ));
            }
            let project = engine.project().unwrap();
            prop_assert!(project.validate().is_ok());
        }
    }
}
