//! IntervalCalculator — pure next-interval arithmetic for a reviewed
//! young/mature card. No state, no I/O.

use crate::config::{SchedulerVersion, SimulationConfig};

/// Candidate next intervals for each passing grade, in days.
///
/// Candidates grow strictly (hard < good < easy) before the final
/// `max_interval` cap, so a harder answer can never schedule a card
/// further out than an easier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewIntervals {
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

/// Compute the hard/good/easy interval candidates for a card with the
/// given current interval, accumulated overdue delay, and ease.
///
/// Ease is scaled so 2500 = 250%; the growth multiplier is ease/1000.
/// Delay contributions use whole-day floor division, matching the
/// scheduler being modeled. The V1 scheduler credits a quarter of the
/// delay on hard answers; V2 ignores delay there.
pub fn next_review_intervals(
    config: &SimulationConfig,
    interval: u32,
    delay: u32,
    ease: u32,
) -> ReviewIntervals {
    let modifier = config.interval_modifier;
    let ease_factor = ease as f64 / 1000.0;

    let hard_base = match config.scheduler_version {
        SchedulerVersion::V1 => (interval + delay / 4) as f64 * 1.2,
        SchedulerVersion::V2 => interval as f64 * 1.2,
    };
    let hard = (hard_base * modifier).max(interval as f64 + 1.0);

    let good_base = (interval + delay / 2) as f64 * ease_factor;
    let good = (good_base * modifier).max(hard + 1.0);

    let easy_base = (interval + delay) as f64 * ease_factor * 1.5;
    let easy = (easy_base * modifier).max(good + 1.0);

    let cap = config.max_interval as f64;
    ReviewIntervals {
        hard: hard.min(cap) as u32,
        good: good.min(cap) as u32,
        easy: easy.min(cap) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulationConfig {
        SimulationConfig::default_test()
    }

    #[test]
    fn candidates_grow_strictly_below_the_cap() {
        let c = config();
        let ivl = next_review_intervals(&c, 10, 0, 2500);
        assert!(ivl.hard > 10, "hard must exceed the current interval");
        assert!(ivl.good > ivl.hard);
        assert!(ivl.easy > ivl.good);
    }

    #[test]
    fn all_candidates_respect_max_interval() {
        let mut c = config();
        c.max_interval = 30;
        let ivl = next_review_intervals(&c, 29, 0, 2500);
        assert_eq!(ivl.good, 30);
        assert_eq!(ivl.easy, 30);
        assert!(ivl.hard <= 30);
    }

    #[test]
    fn v1_credits_quarter_delay_on_hard() {
        let mut c = config();
        c.scheduler_version = SchedulerVersion::V1;
        let v1 = next_review_intervals(&c, 10, 8, 2500);
        c.scheduler_version = SchedulerVersion::V2;
        let v2 = next_review_intervals(&c, 10, 8, 2500);
        // V1: (10 + 8/4) * 1.2 = 14.4 -> 14; V2: 10 * 1.2 = 12.
        assert_eq!(v1.hard, 14);
        assert_eq!(v2.hard, 12);
    }

    #[test]
    fn delay_uses_floor_division() {
        let c = config();
        // delay 3: good credits 3/2 = 1 day, easy credits all 3.
        let ivl = next_review_intervals(&c, 10, 3, 2000);
        assert_eq!(ivl.good, 22); // (10 + 1) * 2.0
        assert_eq!(ivl.easy, 39); // (10 + 3) * 2.0 * 1.5
    }

    #[test]
    fn hard_floor_is_current_interval_plus_one() {
        let mut c = config();
        c.interval_modifier = 0.01;
        let ivl = next_review_intervals(&c, 10, 0, 1300);
        assert_eq!(ivl.hard, 11);
        assert_eq!(ivl.good, 12);
        assert_eq!(ivl.easy, 13);
    }
}
