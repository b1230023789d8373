//! ResultAggregator — reduces the final day buckets into the
//! day-indexed forecast series handed to charting collaborators.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::engine::SimulationResult;
use crate::types::Day;

/// One day of the forecast series. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySeriesPoint {
    pub date: NaiveDate,
    pub day_number: Day,
    /// Reviews that landed on this day (postponed cards count on the
    /// day they were actually processed).
    pub review_count: usize,
    pub cumulative_reviews: u64,
    pub average_reviews_per_day: f64,
    /// Cards seeded into the simulation; constant across the series.
    pub total_card_count: usize,
    /// Cards in the mature band at the end of this day.
    pub mature_count: i64,
}

/// Fold a completed run into the report series. The start date anchors
/// the calendar axis and is caller-supplied for reproducibility.
pub fn forecast_series(result: &SimulationResult, start_date: NaiveDate) -> Vec<DaySeriesPoint> {
    let mut cumulative: u64 = 0;
    let mut mature: i64 = 0;
    result
        .buckets
        .iter()
        .enumerate()
        .map(|(day, bucket)| {
            cumulative += bucket.len() as u64;
            mature += result.mature_delta[day];
            DaySeriesPoint {
                date: start_date + Days::new(day as u64),
                day_number: day,
                review_count: bucket.len(),
                cumulative_reviews: cumulative,
                average_reviews_per_day: cumulative as f64 / (day + 1) as f64,
                total_card_count: result.total_cards,
                mature_count: mature,
            }
        })
        .collect()
}
