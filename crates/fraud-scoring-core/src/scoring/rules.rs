use chrono::Duration;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::window::{first_close_pair, sorted_timestamps};
use crate::types::*;

// ---------------------------------------------------------------------------
// Rule catalogue
// ---------------------------------------------------------------------------

pub const HIGH_AMOUNT_POINTS: u32 = 50;
pub const HIGH_FREQUENCY_POINTS: u32 = 35;
pub const MULTIPLE_LARGE_POINTS: u32 = 50;
pub const RAPID_SUCCESSION_POINTS: u32 = 20;

/// Large transactions (candidate included) needed to trigger the
/// multiple-large-transactions rule.
pub const MULTIPLE_LARGE_MIN_COUNT: usize = 2;

/// Adjacent historical transactions closer than this are "rapid".
pub const RAPID_SUCCESSION_SECONDS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudRule {
    HighAmount,
    HighFrequency,
    MultipleLargeTransactions,
    RapidSuccession,
}

impl FraudRule {
    /// Evaluation order. Reasons are reported in this order.
    pub const ALL: [FraudRule; 4] = [
        FraudRule::HighAmount,
        FraudRule::HighFrequency,
        FraudRule::MultipleLargeTransactions,
        FraudRule::RapidSuccession,
    ];

    pub fn points(&self) -> u32 {
        match self {
            FraudRule::HighAmount => HIGH_AMOUNT_POINTS,
            FraudRule::HighFrequency => HIGH_FREQUENCY_POINTS,
            FraudRule::MultipleLargeTransactions => MULTIPLE_LARGE_POINTS,
            FraudRule::RapidSuccession => RAPID_SUCCESSION_POINTS,
        }
    }

    /// Evaluate this rule against a candidate and its window.
    pub fn evaluate(
        &self,
        candidate: &CandidateTransaction,
        history: &[HistoricalTransaction],
        config: &ScoringConfig,
    ) -> Option<RuleHit> {
        match self {
            FraudRule::HighAmount => check_high_amount(candidate.amount, config),
            FraudRule::HighFrequency => check_high_frequency(history, config),
            FraudRule::MultipleLargeTransactions => {
                check_multiple_large(candidate.amount, history, config)
            }
            FraudRule::RapidSuccession => check_rapid_succession(history),
        }
    }
}

impl std::fmt::Display for FraudRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighAmount => write!(f, "High amount"),
            Self::HighFrequency => write!(f, "High frequency"),
            Self::MultipleLargeTransactions => write!(f, "Multiple large transactions"),
            Self::RapidSuccession => write!(f, "Rapid succession"),
        }
    }
}

/// A triggered rule with its contribution and explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHit {
    pub rule: FraudRule,
    pub points: u32,
    pub reason: String,
}

impl RuleHit {
    fn new(rule: FraudRule, reason: String) -> Self {
        Self {
            rule,
            points: rule.points(),
            reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Strictly greater than the threshold; an amount equal to it passes.
pub fn check_high_amount(amount: Money, config: &ScoringConfig) -> Option<RuleHit> {
    if amount <= config.high_amount_threshold {
        return None;
    }
    Some(RuleHit::new(
        FraudRule::HighAmount,
        format!(
            "High transaction amount: ${} exceeds threshold of ${}",
            format_money(amount),
            format_money(config.high_amount_threshold)
        ),
    ))
}

/// The candidate is not in `history` yet, so it is counted on top.
pub fn check_high_frequency(
    history: &[HistoricalTransaction],
    config: &ScoringConfig,
) -> Option<RuleHit> {
    let total = history.len() + 1;
    if total < config.frequency_threshold as usize {
        return None;
    }
    Some(RuleHit::new(
        FraudRule::HighFrequency,
        format!(
            "High transaction frequency: {} transactions in {} minute(s), threshold is {}",
            total, config.time_window_minutes, config.frequency_threshold
        ),
    ))
}

pub fn check_multiple_large(
    amount: Money,
    history: &[HistoricalTransaction],
    config: &ScoringConfig,
) -> Option<RuleHit> {
    let half = config.half_threshold();
    let historical = history.iter().filter(|tx| tx.amount > half).count();
    let count = historical + usize::from(amount > half);
    if count < MULTIPLE_LARGE_MIN_COUNT {
        return None;
    }
    Some(RuleHit::new(
        FraudRule::MultipleLargeTransactions,
        format!(
            "Multiple large transactions detected: {} transactions over ${} in {} minute(s)",
            count,
            format_money(half),
            config.time_window_minutes
        ),
    ))
}

/// Looks at history only; the candidate's own timestamp is not compared.
pub fn check_rapid_succession(history: &[HistoricalTransaction]) -> Option<RuleHit> {
    if history.len() < 2 {
        return None;
    }
    let sorted = sorted_timestamps(history);
    first_close_pair(&sorted, Duration::seconds(RAPID_SUCCESSION_SECONDS))?;
    Some(RuleHit::new(
        FraudRule::RapidSuccession,
        format!(
            "Rapid successive transactions detected within {} seconds",
            RAPID_SUCCESSION_SECONDS
        ),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render money for reasons: cents precision, no trailing ".00" on whole
/// amounts.
pub fn format_money(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.fract().is_zero() {
        rounded.trunc().normalize().to_string()
    } else {
        format!("{:.2}", rounded)
    }
}
