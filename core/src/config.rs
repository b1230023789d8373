//! Run configuration: scheduling-policy parameters and the per-state
//! success-probability tables, plus the semantic validation that must
//! pass before a single day is simulated.

use crate::error::{SimError, SimResult};
use crate::types::Day;
use serde::{Deserialize, Serialize};

/// Which scheduler generation's hard-interval formula applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerVersion {
    V1,
    V2,
}

/// Success percentages for one state (or one step of a stepped state),
/// in whole percent. Whatever remains below 100 is the Wrong share.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GradeProbabilities {
    #[serde(default)]
    pub hard: u8,
    pub good: u8,
    #[serde(default)]
    pub easy: u8,
}

impl GradeProbabilities {
    /// A Good/Wrong-only entry, as New/Learning/Relearn tables require.
    pub fn good_only(good: u8) -> Self {
        Self {
            hard: 0,
            good,
            easy: 0,
        }
    }

    /// Remaining share for Wrong. Negative when the entries oversum,
    /// which validation rejects before any draw happens.
    pub fn wrong(&self) -> i32 {
        100 - self.hard as i32 - self.good as i32 - self.easy as i32
    }

    fn sum(&self) -> u32 {
        self.hard as u32 + self.good as u32 + self.easy as u32
    }
}

/// Per-state success tables. The stepped entries are index-aligned with
/// the corresponding step lists in [`SimulationConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityTables {
    /// New cards (never reviewed). Good/Wrong only.
    pub unseen: GradeProbabilities,
    /// One entry per learning step. Good/Wrong only.
    pub learning_steps: Vec<GradeProbabilities>,
    /// One entry per relearning step. Good/Wrong only.
    pub lapse_steps: Vec<GradeProbabilities>,
    pub young: GradeProbabilities,
    pub mature: GradeProbabilities,
}

/// Immutable inputs for one forecast run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub days_to_simulate: usize,
    pub new_cards_per_day: u32,
    pub max_reviews_per_day: u32,
    /// Fractional multiplier applied to every computed interval.
    pub interval_modifier: f64,
    /// Ordered learning step offsets, in minutes.
    pub learning_steps: Vec<u32>,
    /// Ordered relearning step offsets, in minutes.
    pub lapse_steps: Vec<u32>,
    /// Interval assigned when a card finishes its learning steps, in days.
    pub graduating_interval: u32,
    /// Fraction of the previous interval kept after a lapse.
    pub new_lapse_interval: f64,
    /// Hard ceiling for any computed interval, in days.
    pub max_interval: u32,
    pub scheduler_version: SchedulerVersion,
    pub probabilities: ProbabilityTables,
}

impl SimulationConfig {
    /// Day offset of a learning step: whole-day floor of the minute offset.
    pub fn learning_step_days(&self, step: usize) -> Day {
        (self.learning_steps[step] / 1440) as Day
    }

    /// Day offset of a relearning step.
    pub fn lapse_step_days(&self, step: usize) -> Day {
        (self.lapse_steps[step] / 1440) as Day
    }

    /// Semantic validation. The engine refuses to start a run until
    /// this passes; in particular an oversummed probability table is a
    /// configuration error here, never a bad draw later.
    pub fn validate(&self) -> SimResult<()> {
        if self.learning_steps.is_empty() {
            return Err(SimError::EmptySteps { which: "learning" });
        }
        if self.lapse_steps.is_empty() {
            return Err(SimError::EmptySteps { which: "lapse" });
        }
        if self.learning_steps.len() != self.probabilities.learning_steps.len() {
            return Err(SimError::StepTableMismatch {
                which: "learning",
                steps: self.learning_steps.len(),
                probs: self.probabilities.learning_steps.len(),
            });
        }
        if self.lapse_steps.len() != self.probabilities.lapse_steps.len() {
            return Err(SimError::StepTableMismatch {
                which: "lapse",
                steps: self.lapse_steps.len(),
                probs: self.probabilities.lapse_steps.len(),
            });
        }
        if self.max_interval < 1 {
            return Err(SimError::InvalidMaxInterval);
        }

        check_good_only("unseen", &self.probabilities.unseen)?;
        check_sum("unseen", &self.probabilities.unseen)?;
        for (i, entry) in self.probabilities.learning_steps.iter().enumerate() {
            check_good_only(&format!("learning step {i}"), entry)?;
            check_sum(&format!("learning step {i}"), entry)?;
        }
        for (i, entry) in self.probabilities.lapse_steps.iter().enumerate() {
            check_good_only(&format!("lapse step {i}"), entry)?;
            check_sum(&format!("lapse step {i}"), entry)?;
        }
        check_sum("young", &self.probabilities.young)?;
        check_sum("mature", &self.probabilities.mature)?;
        Ok(())
    }

    /// Load a config from a JSON file. Syntactic errors surface here;
    /// semantic validation still runs when the engine is built.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimulationConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            days_to_simulate: 30,
            new_cards_per_day: 10,
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
}

fn check_sum(table: &str, entry: &GradeProbabilities) -> SimResult<()> {
    if entry.wrong() < 0 {
        return Err(SimError::InvalidProbabilityConfig {
            table: table.to_string(),
            sum: entry.sum(),
        });
    }
    Ok(())
}

fn check_good_only(table: &str, entry: &GradeProbabilities) -> SimResult<()> {
    if entry.hard != 0 || entry.easy != 0 {
        return Err(SimError::UnsupportedGradeProbability {
            table: table.to_string(),
            hard: entry.hard,
            easy: entry.easy,
        });
    }
    Ok(())
}
