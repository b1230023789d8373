//! The simulated card model.
//!
//! RULE: A card is owned by exactly one day bucket at a time. Every
//! reschedule pushes a fresh owned value into the target bucket; two
//! buckets never hold references to the same mutable card state.

use crate::types::{CardId, Day};
use serde::{Deserialize, Serialize};

/// Interval, in days, at and above which a card counts as mature.
pub const MATURE_THRESHOLD: u32 = 21;

/// Lifecycle phase of a simulated card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    New,
    Learning,
    Young,
    Mature,
    Relearn,
}

impl CardState {
    /// Young or Mature, depending on where the interval sits relative
    /// to the mature threshold.
    pub fn from_interval(interval: u32) -> Self {
        if interval >= MATURE_THRESHOLD {
            Self::Mature
        } else {
            Self::Young
        }
    }

    /// Review-queue cards (Young/Mature) are the only ones subject to
    /// the daily cap.
    pub fn is_review(self) -> bool {
        matches!(self, Self::Young | Self::Mature)
    }
}

/// Grade drawn for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Wrong,
    Hard,
    Good,
    Easy,
}

/// One graded review in a card's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Day the review happened.
    pub day: Day,
    /// How many days overdue the card was when processed.
    pub delay: u32,
    /// State the card was in when graded.
    pub was_state: CardState,
    pub grade: Grade,
    /// Days until the next scheduled review.
    pub days_added: Day,
    /// State the card transitioned into.
    pub becomes: CardState,
    /// Ease after the review, in the 2500 = 250% scale.
    pub new_ease: u32,
}

/// A card moving through the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedCard {
    pub id: CardId,
    /// Days until the next review once the card is in the review queue.
    pub interval: u32,
    /// Ease scaled so 2500 = 250%. Never drops below 1300 once the card
    /// has been through a review transition.
    pub ease: u32,
    pub state: CardState,
    /// Index into the active step table; -1 when not applicable.
    pub step: i32,
    /// Days the card was overdue when actually processed. Accumulates
    /// while postponed, resets after a successful review or a lapse.
    pub delay: u32,
    /// Full review history across the run.
    pub reviews: Vec<ReviewRecord>,
}

impl SimulatedCard {
    /// A card that has never been reviewed.
    pub fn new_card(id: CardId, starting_ease: u32) -> Self {
        Self {
            id,
            interval: 0,
            ease: starting_ease,
            state: CardState::New,
            step: 0,
            delay: 0,
            reviews: Vec::new(),
        }
    }
}
