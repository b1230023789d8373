//! Configuration validation tests. A run must never start on a
//! semantically invalid config.

use studycast_core::{
    config::{GradeProbabilities, SimulationConfig},
    engine::ReviewSimulator,
    error::SimError,
    population,
};

#[test]
fn default_test_config_is_valid() {
    SimulationConfig::default_test()
        .validate()
        .expect("default test config must validate");
}

#[test]
fn empty_learning_steps_are_rejected() {
    let mut config = SimulationConfig::default_test();
    config.learning_steps.clear();
    config.probabilities.learning_steps.clear();
    assert!(matches!(
        config.validate(),
        Err(SimError::EmptySteps { which: "learning" })
    ));
}

#[test]
fn empty_lapse_steps_are_rejected() {
    let mut config = SimulationConfig::default_test();
    config.lapse_steps.clear();
    config.probabilities.lapse_steps.clear();
    assert!(matches!(
        config.validate(),
        Err(SimError::EmptySteps { which: "lapse" })
    ));
}

#[test]
fn step_and_probability_lengths_must_match() {
    let mut config = SimulationConfig::default_test();
    config.probabilities.learning_steps.pop();
    assert!(matches!(
        config.validate(),
        Err(SimError::StepTableMismatch {
            which: "learning",
            steps: 2,
            probs: 1,
        })
    ));

    let mut config = SimulationConfig::default_test();
    config
        .probabilities
        .lapse_steps
        .push(GradeProbabilities::good_only(90));
    assert!(matches!(
        config.validate(),
        Err(SimError::StepTableMismatch { which: "lapse", .. })
    ));
}

#[test]
fn oversummed_probabilities_are_rejected() {
    let mut config = SimulationConfig::default_test();
    config.probabilities.mature = GradeProbabilities {
        hard: 50,
        good: 40,
        easy: 20,
    };
    match config.validate() {
        Err(SimError::InvalidProbabilityConfig { table, sum }) => {
            assert_eq!(table, "mature");
            assert_eq!(sum, 110);
        }
        other => panic!("expected InvalidProbabilityConfig, got {other:?}"),
    }
}

#[test]
fn hard_or_easy_on_stepped_states_is_rejected() {
    let mut config = SimulationConfig::default_test();
    config.probabilities.learning_steps[0].hard = 5;
    assert!(matches!(
        config.validate(),
        Err(SimError::UnsupportedGradeProbability { .. })
    ));

    let mut config = SimulationConfig::default_test();
    config.probabilities.unseen.easy = 3;
    assert!(matches!(
        config.validate(),
        Err(SimError::UnsupportedGradeProbability { .. })
    ));
}

#[test]
fn zero_max_interval_is_rejected() {
    let mut config = SimulationConfig::default_test();
    config.max_interval = 0;
    assert!(matches!(
        config.validate(),
        Err(SimError::InvalidMaxInterval)
    ));
}

#[test]
fn engine_refuses_invalid_config_before_any_day() {
    let mut config = SimulationConfig::default_test();
    config.probabilities.young = GradeProbabilities {
        hard: 60,
        good: 60,
        easy: 0,
    };
    let seeded = population::synthetic(&config, 10, 2500);
    let built = ReviewSimulator::new(config, seeded, 7);
    assert!(
        matches!(built, Err(SimError::InvalidProbabilityConfig { .. })),
        "engine must reject an oversummed table at construction"
    );
}
