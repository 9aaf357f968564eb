use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::config::{ScoringConfig, ScoringOverrides};
use super::rules::{FraudRule, RuleHit};
use super::window::{partition_history, window_start};
use crate::{types::*, FraudScoringError, FraudScoringResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAX_RISK_SCORE: u32 = 100;

/// Scores at or above this are suspicious.
pub const SUSPICIOUS_SCORE: u32 = 50;

pub const REASON_SEPARATOR: &str = "; ";

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Outcome of one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub risk_score: u32,
    pub is_suspicious: bool,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_reason: Option<String>,
    pub rule_hits: Vec<RuleHit>,
}

impl Verdict {
    /// Sum and cap rule contributions. `hits` must be in evaluation order.
    pub fn from_hits(hits: Vec<RuleHit>) -> Self {
        let total: u32 = hits.iter().map(|h| h.points).sum();
        let risk_score = total.min(MAX_RISK_SCORE);
        let reasons: Vec<String> = hits.iter().map(|h| h.reason.clone()).collect();
        let fraud_reason = if reasons.is_empty() {
            None
        } else {
            Some(reasons.join(REASON_SEPARATOR))
        };
        Self {
            risk_score,
            is_suspicious: is_suspicious_score(risk_score),
            reasons,
            fraud_reason,
            rule_hits: hits,
        }
    }

    pub fn triggered(&self, rule: FraudRule) -> bool {
        self.rule_hits.iter().any(|h| h.rule == rule)
    }
}

pub fn is_suspicious_score(risk_score: u32) -> bool {
    risk_score >= SUSPICIOUS_SCORE
}

/// A scoring request as handed over by a caller: the candidate, the
/// pre-fetched history, and any configuration overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringInput {
    pub user_id: String,
    pub amount: Money,
    pub occurs_at: Timestamp,
    #[serde(default)]
    pub config: ScoringOverrides,
    #[serde(default)]
    pub recent_history: Vec<HistoricalTransaction>,
}

impl ScoringInput {
    pub fn candidate(&self) -> CandidateTransaction {
        CandidateTransaction {
            user_id: self.user_id.clone(),
            amount: self.amount,
            occurs_at: self.occurs_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringOutput {
    pub user_id: String,
    pub amount: Money,
    pub occurs_at: Timestamp,
    pub window_start: Timestamp,
    /// Historical transactions that were scored against.
    pub history_considered: usize,
    pub config: ScoringConfig,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score a candidate against its pre-filtered window.
///
/// Total over valid input: `history` is taken to be exactly the user's
/// transactions in `[occurs_at - window, occurs_at]`. Every rule is evaluated
/// independently and contributions are summed, capped at 100.
pub fn score(
    candidate: &CandidateTransaction,
    history: &[HistoricalTransaction],
    config: &ScoringConfig,
) -> Verdict {
    let hits: Vec<RuleHit> = FraudRule::ALL
        .iter()
        .filter_map(|rule| rule.evaluate(candidate, history, config))
        .collect();
    Verdict::from_hits(hits)
}

/// Validate a scoring request, restrict its history to the window, score it
/// and wrap the verdict in the standard envelope.
///
/// History entries belonging to another user or falling outside the window
/// are dropped and reported as warnings.
pub fn score_transaction(
    input: &ScoringInput,
) -> FraudScoringResult<ComputationOutput<ScoringOutput>> {
    let start = Instant::now();

    let candidate = input.candidate();
    validate_candidate(&candidate)?;
    let config = input.config.resolve()?;
    let since = window_start(candidate.occurs_at, &config)?;

    let partition = partition_history(
        &candidate.user_id,
        since,
        candidate.occurs_at,
        &input.recent_history,
    );
    let warnings = partition_warnings(partition.other_user, partition.out_of_window);

    let output = build_output(&candidate, &partition.in_window, config, since);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        METHODOLOGY,
        &assumptions(&output.config),
        warnings,
        elapsed,
        output,
    ))
}

/// Boundary checks for a candidate. The engine assumes these hold.
pub fn validate_candidate(candidate: &CandidateTransaction) -> FraudScoringResult<()> {
    if candidate.user_id.trim().is_empty() {
        return Err(FraudScoringError::invalid(
            "user_id",
            "User identifier must not be empty.",
        ));
    }
    if candidate.amount <= Decimal::ZERO {
        return Err(FraudScoringError::invalid(
            "amount",
            "Transaction amount must be positive.",
        ));
    }
    if candidate.amount.normalize().scale() > 2 {
        return Err(FraudScoringError::invalid(
            "amount",
            "Transaction amount must have at most 2 decimal places.",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

pub(crate) const METHODOLOGY: &str = "Additive rule-based fraud scoring over a trailing window";

pub(crate) fn assumptions(config: &ScoringConfig) -> serde_json::Value {
    serde_json::json!({
        "window": format!("[occurs_at - {} minute(s), occurs_at]", config.time_window_minutes),
        "rules": "high amount +50, high frequency +35, multiple large +50, rapid succession +20",
        "cap": MAX_RISK_SCORE,
        "suspicious_at": SUSPICIOUS_SCORE,
        "frequency_count": "history in window plus the candidate",
        "large_transaction_cutoff": "high_amount_threshold / 2",
    })
}

pub(crate) fn build_output(
    candidate: &CandidateTransaction,
    history: &[HistoricalTransaction],
    config: ScoringConfig,
    since: Timestamp,
) -> ScoringOutput {
    let verdict = score(candidate, history, &config);
    ScoringOutput {
        user_id: candidate.user_id.clone(),
        amount: candidate.amount,
        occurs_at: candidate.occurs_at,
        window_start: since,
        history_considered: history.len(),
        config,
        verdict,
    }
}

pub(crate) fn partition_warnings(other_user: usize, out_of_window: usize) -> Vec<String> {
    let mut warnings = Vec::new();
    if other_user > 0 {
        warnings.push(format!(
            "{} history entries belong to another user and were ignored.",
            other_user
        ));
    }
    if out_of_window > 0 {
        warnings.push(format!(
            "{} history entries fall outside the scoring window and were ignored.",
            out_of_window
        ));
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
