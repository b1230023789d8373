//! OutcomeSampler — draws a review grade from the configured
//! per-state success tables.

use crate::card::{CardState, Grade};
use crate::config::{GradeProbabilities, ProbabilityTables};
use crate::rng::SimRng;

/// Draw one categorical outcome for a card in `state` at `step`.
///
/// One uniform roll in [1, 100] lands in cumulative bands laid out in
/// fixed order Wrong, Hard, Good, Easy. Tables are validated before
/// the run, so the Wrong band is never negative here.
pub fn draw(tables: &ProbabilityTables, state: CardState, step: i32, rng: &mut SimRng) -> Grade {
    let entry = table_for(tables, state, step);
    let wrong = entry.wrong();
    debug_assert!(wrong >= 0, "oversummed table must be rejected at validation");
    let wrong = wrong as u32;
    let hard = entry.hard as u32;
    let good = entry.good as u32;

    let roll = rng.roll_percent();
    if roll <= wrong {
        Grade::Wrong
    } else if roll <= wrong + hard {
        Grade::Hard
    } else if roll <= wrong + hard + good {
        Grade::Good
    } else {
        Grade::Easy
    }
}

fn table_for(tables: &ProbabilityTables, state: CardState, step: i32) -> &GradeProbabilities {
    match state {
        CardState::New => &tables.unseen,
        CardState::Learning => step_entry(&tables.learning_steps, step),
        CardState::Relearn => step_entry(&tables.lapse_steps, step),
        CardState::Young => &tables.young,
        CardState::Mature => &tables.mature,
    }
}

/// A negative step addresses the last entry, matching how partially
/// consumed step counts arrive from the collection feed.
fn step_entry(entries: &[GradeProbabilities], step: i32) -> &GradeProbabilities {
    let last = entries.len() - 1;
    let index = if step < 0 { last } else { (step as usize).min(last) };
    &entries[index]
}
