//! CardPopulationBuilder — turns a collection snapshot (or a bare
//! new-card count) into the initial day-bucket array the engine
//! consumes. This is the entry point external collaborators feed;
//! the core never queries a live store itself.

use crate::card::{CardState, SimulatedCard};
use crate::config::SimulationConfig;
use crate::types::{CardId, Day};
use serde::{Deserialize, Serialize};

/// Native scheduler state of a card in the collection feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeCardType {
    New,
    Learning,
    Review,
    Relearn,
}

/// One record of the existing-card feed. A pure data contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingCard {
    pub id: CardId,
    pub native_type: NativeCardType,
    pub suspended: bool,
    /// Day the card is due, counted from collection creation.
    pub due_day: i64,
    /// Non-zero when the card sits in a filtered deck; replaces due_day.
    pub override_due_day: i64,
    /// Set for day-(re)learn cards, which are due today regardless of
    /// their stored due day.
    pub queue_day_flag: bool,
    /// The scheduler's packed remaining-step counter (steps = left % 10).
    pub left_count: u32,
    /// Ease in the 2500 = 250% scale. Ignored for New/Learning cards,
    /// which start from the deck's configured ease.
    pub ease: u32,
    pub interval: u32,
}

/// Options for seeding from an existing collection.
#[derive(Debug, Clone)]
pub struct PopulationOptions {
    /// Ease assigned to New and Learning cards.
    pub starting_ease: u32,
    /// Clamp overdue cards to day 0 instead of dropping them.
    pub include_overdue: bool,
    /// Keep suspended New cards (other suspended cards always drop).
    pub include_suspended_new: bool,
    /// Extra New cards to synthesize on top of the feed.
    pub extra_new_cards: usize,
    /// Today's day number counted from collection creation.
    pub today_offset: i64,
    /// New cards the user has already studied today.
    pub already_seen_today: u32,
}

impl Default for PopulationOptions {
    fn default() -> Self {
        Self {
            starting_ease: 2500,
            include_overdue: false,
            include_suspended_new: false,
            extra_new_cards: 0,
            today_offset: 0,
            already_seen_today: 0,
        }
    }
}

/// The seeded bucket array plus the counts the aggregator needs.
/// `total_cards` and `mature_cards` count cards actually placed into
/// buckets; dropped cards (suspended, overdue, out of horizon) are in
/// neither.
#[derive(Debug, Clone)]
pub struct SeededPopulation {
    pub buckets: Vec<Vec<SimulatedCard>>,
    pub total_cards: usize,
    pub mature_cards: usize,
}

/// Classify an existing-card feed into due-day buckets.
pub fn from_existing(
    cards: &[ExistingCard],
    config: &SimulationConfig,
    opts: &PopulationOptions,
) -> SeededPopulation {
    let days = config.days_to_simulate;
    let mut buckets: Vec<Vec<SimulatedCard>> = vec![Vec::new(); days];
    let mut new_cards: Vec<SimulatedCard> = Vec::new();
    let mut mature_cards = 0usize;

    for card in cards {
        match card.native_type {
            NativeCardType::New => {
                if card.suspended && !opts.include_suspended_new {
                    continue;
                }
                new_cards.push(SimulatedCard::new_card(card.id, opts.starting_ease));
            }
            NativeCardType::Learning => {
                if card.suspended {
                    continue;
                }
                let Some(due) = due_offset(card, opts, days, true) else {
                    continue;
                };
                buckets[due].push(SimulatedCard {
                    id: card.id,
                    interval: 0,
                    ease: opts.starting_ease,
                    state: CardState::Learning,
                    step: recovered_step(config.learning_steps.len(), card.left_count),
                    delay: 0,
                    reviews: Vec::new(),
                });
            }
            NativeCardType::Review => {
                if card.suspended {
                    continue;
                }
                // Day-queue flag never applies to review cards.
                let Some(due) = due_offset(card, opts, days, false) else {
                    continue;
                };
                let state = CardState::from_interval(card.interval);
                if state == CardState::Mature {
                    mature_cards += 1;
                }
                buckets[due].push(SimulatedCard {
                    id: card.id,
                    interval: card.interval,
                    ease: card.ease,
                    state,
                    step: -1,
                    delay: 0,
                    reviews: Vec::new(),
                });
            }
            NativeCardType::Relearn => {
                if card.suspended {
                    continue;
                }
                let Some(due) = due_offset(card, opts, days, true) else {
                    continue;
                };
                buckets[due].push(SimulatedCard {
                    id: card.id,
                    interval: card.interval,
                    ease: card.ease,
                    state: CardState::Relearn,
                    step: recovered_step(config.lapse_steps.len(), card.left_count),
                    delay: 0,
                    reviews: Vec::new(),
                });
            }
        }
    }

    // Synthesize extra New cards, capped at what the new-card schedule
    // can actually place within the horizon.
    if opts.extra_new_cards > 0 {
        let capacity = config.new_cards_per_day as usize * days;
        let room = capacity.saturating_sub(new_cards.len());
        let base_id = cards.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        for k in 0..opts.extra_new_cards.min(room) {
            new_cards.push(SimulatedCard::new_card(base_id + k as i64, opts.starting_ease));
        }
    }

    // Distribute New cards across days, resuming after today's quota.
    if config.new_cards_per_day > 0 {
        let per_day = config.new_cards_per_day as usize;
        let already_seen = opts.already_seen_today.min(config.new_cards_per_day) as usize;
        for (index, card) in new_cards.into_iter().enumerate() {
            let day = (index + already_seen) / per_day;
            if day < days {
                buckets[day].push(card);
            }
        }
    }

    let total_cards = buckets.iter().map(Vec::len).sum();
    log::debug!("seeded {total_cards} cards across {days} day buckets ({mature_cards} mature)");
    SeededPopulation {
        buckets,
        total_cards,
        mature_cards,
    }
}

/// Seed a population of only-new cards ("new-count mode"): each day
/// takes `min(new_cards_per_day, remaining)` fresh New cards until
/// the total is exhausted.
pub fn synthetic(
    config: &SimulationConfig,
    total_new_cards: usize,
    starting_ease: u32,
) -> SeededPopulation {
    let days = config.days_to_simulate;
    let mut buckets: Vec<Vec<SimulatedCard>> = vec![Vec::new(); days];
    if config.new_cards_per_day > 0 {
        let mut remaining = total_new_cards;
        let mut next_id: CardId = 0;
        for bucket in &mut buckets {
            if remaining == 0 {
                break;
            }
            let today = remaining.min(config.new_cards_per_day as usize);
            for _ in 0..today {
                bucket.push(SimulatedCard::new_card(next_id, starting_ease));
                next_id += 1;
            }
            remaining -= today;
        }
    }

    let total_cards = buckets.iter().map(Vec::len).sum();
    SeededPopulation {
        buckets,
        total_cards,
        mature_cards: 0,
    }
}

/// Offset from today to the card's due day, after the filtered-deck
/// override and the day-queue rule. None means the card is dropped
/// (overdue and excluded, or beyond the horizon).
fn due_offset(
    card: &ExistingCard,
    opts: &PopulationOptions,
    days: usize,
    day_queue_applies: bool,
) -> Option<Day> {
    let mut due = card.due_day - opts.today_offset;
    if card.override_due_day != 0 {
        due = card.override_due_day - opts.today_offset;
    }
    if day_queue_applies && card.queue_day_flag {
        due = 0;
    }
    if due < 0 {
        if opts.include_overdue {
            due = 0;
        } else {
            return None;
        }
    }
    let due = due as Day;
    if due >= days {
        return None;
    }
    Some(due)
}

/// Rebuild the step index from the scheduler's packed left counter.
fn recovered_step(step_count: usize, left_count: u32) -> i32 {
    (step_count as i32 - (left_count % 10) as i32).max(-1)
}
