//! Shared primitive types used across the entire simulation.

/// A simulated day index. Day 0 is "today"; the horizon is exclusive.
pub type Day = usize;

/// A stable, unique identifier for a simulated card.
///
/// Identifiers come from the collection feed (where they are millisecond
/// timestamps) or are allocated above the feed's maximum for synthesized
/// cards, so they stay unique within one run either way.
pub type CardId = i64;
