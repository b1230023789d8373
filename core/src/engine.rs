//! The simulation engine — the day-stepping heart of studycast.
//!
//! RULES:
//!   - One engine instance runs exactly one simulation to completion
//!     or cancellation; run() consumes the engine.
//!   - All randomness flows through the run's SimRng.
//!   - A rescheduled card is always a fresh owned value; two buckets
//!     never share mutable card state.
//!   - Cancellation is polled once per day boundary, never mid-day.
//!   - The bucket array holds exactly days_to_simulate entries for the
//!     whole run; a card landing beyond the horizon is dropped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::card::{CardState, Grade, ReviewRecord, SimulatedCard};
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::interval::next_review_intervals;
use crate::outcome;
use crate::population::SeededPopulation;
use crate::rng::SimRng;
use crate::types::{CardId, Day};

/// Ease drop after a lapse, in ease-scale points (2500 = 250%).
const LAPSE_EASE_PENALTY: u32 = 200;
/// Ease drop after a hard answer.
const HARD_EASE_PENALTY: u32 = 150;
/// Ease gain after an easy answer.
const EASY_EASE_BONUS: u32 = 150;
/// Lowest ease a review transition will ever assign.
const MINIMUM_EASE: u32 = 1300;

/// Cooperative cancellation flag. The caller keeps one end (usually
/// behind an Arc) and sets it; the engine observes it at day
/// boundaries and returns [`SimOutcome::Cancelled`].
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Per-day progress side channel. Rate-limited so a chatty consumer
/// cannot turn the day loop into a UI repaint loop; the callback runs
/// synchronously and must not block.
pub struct ProgressReporter {
    callback: Box<dyn FnMut(Day) + Send>,
    min_interval: Duration,
    last_emit: Option<Instant>,
}

impl ProgressReporter {
    pub fn new(callback: impl FnMut(Day) + Send + 'static) -> Self {
        Self {
            callback: Box::new(callback),
            min_interval: Duration::from_millis(100),
            last_emit: None,
        }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    fn day_processed(&mut self, day: Day) {
        let now = Instant::now();
        if let Some(last) = self.last_emit {
            if now.duration_since(last) < self.min_interval {
                return;
            }
        }
        self.last_emit = Some(now);
        (self.callback)(day);
    }
}

/// Terminal outcome of a run. Cancellation is a first-class result,
/// distinct from both success and failure.
#[derive(Debug)]
pub enum SimOutcome {
    Completed(SimulationResult),
    Cancelled,
}

/// Final state of a completed run, ready for aggregation.
#[derive(Debug)]
pub struct SimulationResult {
    pub buckets: Vec<Vec<SimulatedCard>>,
    /// Net cards entering (+) or leaving (-) the mature band per day.
    /// Day 0 starts seeded with the initial mature count.
    pub mature_delta: Vec<i64>,
    pub total_cards: usize,
}

pub struct ReviewSimulator {
    config: SimulationConfig,
    buckets: Vec<Vec<SimulatedCard>>,
    mature_delta: Vec<i64>,
    total_cards: usize,
    rng: SimRng,
    progress: Option<ProgressReporter>,
}

impl ReviewSimulator {
    /// Build an engine over a seeded population. Configuration is
    /// validated here; a run never starts on a bad config.
    pub fn new(
        config: SimulationConfig,
        population: SeededPopulation,
        seed: u64,
    ) -> SimResult<Self> {
        config.validate()?;
        let days = config.days_to_simulate;
        let SeededPopulation {
            buckets,
            total_cards,
            mature_cards,
        } = population;
        assert_eq!(
            buckets.len(),
            days,
            "population bucket count must match days_to_simulate"
        );

        let mut mature_delta = vec![0i64; days];
        if let Some(first) = mature_delta.first_mut() {
            *first = mature_cards as i64;
        }

        Ok(Self {
            config,
            buckets,
            mature_delta,
            total_cards,
            rng: SimRng::new(seed),
            progress: None,
        })
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Advance day by day to the horizon. This is the core simulation
    /// loop; everything else hangs off it.
    pub fn run(mut self, cancel: &CancelToken) -> SimResult<SimOutcome> {
        for day in 0..self.config.days_to_simulate {
            if cancel.is_cancelled() {
                log::debug!("run cancelled at day {day}");
                return Ok(SimOutcome::Cancelled);
            }
            if let Some(progress) = self.progress.as_mut() {
                progress.day_processed(day);
            }
            self.step_day(day)?;
        }
        Ok(SimOutcome::Completed(SimulationResult {
            buckets: self.buckets,
            mature_delta: self.mature_delta,
            total_cards: self.total_cards,
        }))
    }

    fn step_day(&mut self, day: Day) -> SimResult<()> {
        // Distinct young/mature ids graded today, for the daily cap.
        let mut ids_done: HashSet<CardId> = HashSet::new();
        // Postponed cards are removed only after the full scan, by
        // descending index, so removal never perturbs indices still
        // to be visited.
        let mut postponed: Vec<usize> = Vec::new();

        // Index-based scan: sub-day learning steps re-enqueue into the
        // current bucket mid-scan and must still be visited today.
        let mut index = 0;
        while index < self.buckets[day].len() {
            let card = self.buckets[day][index].clone();

            if card.state.is_review() && !ids_done.contains(&card.id) {
                if ids_done.len() as u32 + 1 > self.config.max_reviews_per_day {
                    self.postpone(day, &card);
                    postponed.push(index);
                    index += 1;
                    continue;
                }
                ids_done.insert(card.id);
            }

            let grade =
                outcome::draw(&self.config.probabilities, card.state, card.step, &mut self.rng);
            self.apply_review(day, card, grade)?;
            index += 1;
        }

        for &i in postponed.iter().rev() {
            self.buckets[day].remove(i);
        }
        log::debug!(
            "day {day}: {} cards processed, {} postponed",
            self.buckets[day].len(),
            postponed.len()
        );
        Ok(())
    }

    /// Push an unmodified copy of the card to tomorrow with one more
    /// day of accumulated delay. Beyond the horizon it simply drops.
    fn postpone(&mut self, day: Day, card: &SimulatedCard) {
        if day + 1 < self.config.days_to_simulate {
            let mut moved = card.clone();
            moved.delay += 1;
            self.buckets[day + 1].push(moved);
        }
    }

    /// Apply one graded review: state-machine transition, interval and
    /// ease arithmetic, mature-series bookkeeping, and re-enqueue of a
    /// fresh owned card into its next due bucket.
    fn apply_review(&mut self, day: Day, card: SimulatedCard, grade: Grade) -> SimResult<()> {
        let was_state = card.state;
        let was_delay = card.delay;
        let mut next = card;

        let days_to_add: Day = match (was_state, grade) {
            (CardState::New | CardState::Learning, Grade::Wrong) => {
                next.state = CardState::Learning;
                next.step = 0;
                self.config.learning_step_days(0)
            }
            (CardState::New | CardState::Learning, Grade::Good) => {
                if next.step < self.config.learning_steps.len() as i32 - 1 {
                    next.state = CardState::Learning;
                    next.step += 1;
                    self.config.learning_step_days(next.step as usize)
                } else {
                    // Finished the learning steps: graduate.
                    next.interval = self.config.graduating_interval.min(self.config.max_interval);
                    next.state = CardState::from_interval(next.interval);
                    next.step = -1;
                    next.interval as Day
                }
            }
            (CardState::Relearn, Grade::Wrong) => {
                next.step = 0;
                next.interval = lapse_interval(next.interval, self.config.new_lapse_interval);
                self.config.lapse_step_days(0)
            }
            (CardState::Relearn, Grade::Good) => {
                if next.step < self.config.lapse_steps.len() as i32 - 1 {
                    next.step += 1;
                    self.config.lapse_step_days(next.step as usize)
                } else {
                    // Finished relearning: back to the review queue with
                    // the interval the lapse left behind.
                    next.state = CardState::from_interval(next.interval);
                    next.step = -1;
                    next.interval as Day
                }
            }
            (CardState::Young | CardState::Mature, Grade::Wrong) => {
                next.state = CardState::Relearn;
                next.step = 0;
                next.ease = floored_ease(next.ease, LAPSE_EASE_PENALTY);
                next.interval = lapse_interval(next.interval, self.config.new_lapse_interval);
                next.delay = 0;
                self.config.lapse_step_days(0)
            }
            (CardState::Young | CardState::Mature, passing) => {
                let candidates =
                    next_review_intervals(&self.config, next.interval, next.delay, next.ease);
                next.interval = match passing {
                    Grade::Hard => {
                        next.ease = floored_ease(next.ease, HARD_EASE_PENALTY);
                        candidates.hard
                    }
                    Grade::Good => candidates.good,
                    Grade::Easy => {
                        next.ease += EASY_EASE_BONUS;
                        candidates.easy
                    }
                    Grade::Wrong => unreachable!("wrong is matched above"),
                };
                next.delay = 0;
                next.state = CardState::from_interval(next.interval);
                next.interval as Day
            }
            // The tables and the state machine are out of sync. Fatal;
            // this is not user input.
            (state, grade) => return Err(SimError::UnsupportedGrade { state, grade }),
        };

        let is_mature = next.state == CardState::Mature;
        if (was_state == CardState::Mature) != is_mature {
            self.mature_delta[day] += if is_mature { 1 } else { -1 };
        }

        next.reviews.push(ReviewRecord {
            day,
            delay: was_delay,
            was_state,
            grade,
            days_added: days_to_add,
            becomes: next.state,
            new_ease: next.ease,
        });

        let target = day + days_to_add;
        if target < self.config.days_to_simulate {
            self.buckets[target].push(next);
        }
        Ok(())
    }
}

/// Post-lapse interval: the old interval scaled by the configured
/// multiplier, never below a single day.
fn lapse_interval(interval: u32, multiplier: f64) -> u32 {
    ((interval as f64 * multiplier) as u32).max(1)
}

/// Ease after a penalty, held at the scheduler's floor.
fn floored_ease(ease: u32, penalty: u32) -> u32 {
    ease.saturating_sub(penalty).max(MINIMUM_EASE)
}
