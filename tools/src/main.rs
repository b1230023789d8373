//! forecast-runner: headless forecast harness for studycast.
//!
//! Usage:
//!   forecast-runner --seed 42 --days 90 --new-cards 500
//!   forecast-runner --seed 42 --days 180 --config deck.json

use anyhow::Result;
use std::env;
use studycast_core::{
    config::{GradeProbabilities, ProbabilityTables, SchedulerVersion, SimulationConfig},
    engine::{CancelToken, ReviewSimulator, SimOutcome},
    population, report,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let days = parse_arg(&args, "--days", 90usize);
    let new_cards = parse_arg(&args, "--new-cards", 500usize);
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].clone());

    let mut config = match config_path {
        Some(path) => SimulationConfig::load(&path)?,
        None => stock_config(),
    };
    config.days_to_simulate = days;

    println!("studycast — forecast-runner");
    println!("  seed:      {seed}");
    println!("  days:      {days}");
    println!("  new cards: {new_cards}");
    println!();

    let population = population::synthetic(&config, new_cards, 2500);
    let simulator = ReviewSimulator::new(config, population, seed)?;
    let cancel = CancelToken::new();

    match simulator.run(&cancel)? {
        SimOutcome::Cancelled => println!("(run cancelled)"),
        SimOutcome::Completed(result) => {
            let start = chrono::Local::now().date_naive();
            let series = report::forecast_series(&result, start);
            print_series(&series);
        }
    }

    Ok(())
}

fn print_series(series: &[report::DaySeriesPoint]) {
    println!("=== FORECAST ===");
    println!("  {:<12} {:>8} {:>12} {:>10} {:>8}", "date", "reviews", "cumulative", "avg/day", "mature");
    for point in series {
        println!(
            "  {:<12} {:>8} {:>12} {:>10.1} {:>8}",
            point.date,
            point.review_count,
            point.cumulative_reviews,
            point.average_reviews_per_day,
            point.mature_count
        );
    }
    if let Some(last) = series.last() {
        println!();
        println!("  total cards:   {}", last.total_card_count);
        println!("  total reviews: {}", last.cumulative_reviews);
    }
}

/// Stock deck options: two learning steps, one lapse step, and success
/// rates in the ballpark of a long-running collection.
fn stock_config() -> SimulationConfig {
    SimulationConfig {
        days_to_simulate: 90,
        new_cards_per_day: 20,
        max_reviews_per_day: 200,
        interval_modifier: 1.0,
        learning_steps: vec![1, 10],
        lapse_steps: vec![10],
        graduating_interval: 1,
        new_lapse_interval: 0.0,
        max_interval: 36500,
        scheduler_version: SchedulerVersion::V2,
        probabilities: ProbabilityTables {
            unseen: GradeProbabilities::good_only(92),
            learning_steps: vec![
                GradeProbabilities::good_only(92),
                GradeProbabilities::good_only(92),
            ],
            lapse_steps: vec![GradeProbabilities::good_only(92)],
            young: GradeProbabilities {
                hard: 8,
                good: 80,
                easy: 6,
            },
            mature: GradeProbabilities {
                hard: 10,
                good: 82,
                easy: 4,
            },
        },
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
