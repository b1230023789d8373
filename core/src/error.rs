use crate::card::{CardState, Grade};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{which} steps must contain at least one entry")]
    EmptySteps { which: &'static str },

    #[error("{which} has {steps} steps but {probs} probability entries")]
    StepTableMismatch {
        which: &'static str,
        steps: usize,
        probs: usize,
    },

    #[error("probability table for {table} sums to {sum}%, above 100")]
    InvalidProbabilityConfig { table: String, sum: u32 },

    #[error("{table} supports Good/Wrong only, but hard={hard}% easy={easy}%")]
    UnsupportedGradeProbability { table: String, hard: u8, easy: u8 },

    #[error("max_interval must be at least 1 day")]
    InvalidMaxInterval,

    #[error("grade {grade:?} drawn for {state:?}, which defines no such transition")]
    UnsupportedGrade { state: CardState, grade: Grade },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
