//! Trailing-window operations on transaction timestamps.
//!
//! The window for a candidate occurring at `t` is `[t - window, t]`: prior
//! transactions at the lower bound are included, anything after `t` is not.

use chrono::Duration;

use super::config::ScoringConfig;
use crate::{types::*, FraudScoringError, FraudScoringResult};

/// First instant inside the window. Fails when the window would reach past
/// the earliest representable instant.
pub fn window_start(occurs_at: Timestamp, config: &ScoringConfig) -> FraudScoringResult<Timestamp> {
    occurs_at.checked_sub_signed(config.window()).ok_or_else(|| {
        FraudScoringError::invalid(
            "occurs_at",
            "Timestamp is too early to look back over the scoring window.",
        )
    })
}

pub fn within_window(timestamp: Timestamp, since: Timestamp, occurs_at: Timestamp) -> bool {
    timestamp >= since && timestamp <= occurs_at
}

/// Timestamps of `history` in ascending order. Store ordering is never
/// relied upon.
pub fn sorted_timestamps(history: &[HistoricalTransaction]) -> Vec<Timestamp> {
    let mut timestamps: Vec<Timestamp> = history.iter().map(|tx| tx.timestamp).collect();
    timestamps.sort_unstable();
    timestamps
}

/// First adjacent pair in an ascending sequence whose gap is strictly less
/// than `min_gap`.
pub fn first_close_pair(sorted: &[Timestamp], min_gap: Duration) -> Option<(Timestamp, Timestamp)> {
    sorted
        .windows(2)
        .find(|pair| pair[1] - pair[0] < min_gap)
        .map(|pair| (pair[0], pair[1]))
}

/// Outcome of restricting a raw history to one user's window.
#[derive(Debug, Clone, Default)]
pub struct WindowPartition {
    pub in_window: Vec<HistoricalTransaction>,
    pub other_user: usize,
    pub out_of_window: usize,
}

/// Keep only `user_id`'s transactions in `[since, occurs_at]`, counting what
/// was dropped.
pub fn partition_history(
    user_id: &str,
    since: Timestamp,
    occurs_at: Timestamp,
    history: &[HistoricalTransaction],
) -> WindowPartition {
    let mut partition = WindowPartition::default();
    for tx in history {
        if tx.user_id != user_id {
            partition.other_user += 1;
        } else if !within_window(tx.timestamp, since, occurs_at) {
            partition.out_of_window += 1;
        } else {
            partition.in_window.push(tx.clone());
        }
    }
    partition
}
