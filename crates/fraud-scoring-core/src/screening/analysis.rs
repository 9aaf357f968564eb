use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::history::{InMemoryLedger, TransactionHistory};
use super::records::TransactionRecord;
use crate::scoring::config::ScoringOverrides;
use crate::scoring::engine::{
    assumptions, build_output, partition_warnings, validate_candidate, ScoringOutput, METHODOLOGY,
};
use crate::scoring::window::{partition_history, window_start};
use crate::{types::*, FraudScoringResult};

/// A candidate to be scored against whatever the store holds for its user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub user_id: String,
    pub amount: Money,
    pub occurs_at: Timestamp,
    #[serde(default)]
    pub config: ScoringOverrides,
}

impl AnalysisRequest {
    pub fn candidate(&self) -> CandidateTransaction {
        CandidateTransaction {
            user_id: self.user_id.clone(),
            amount: self.amount,
            occurs_at: self.occurs_at,
        }
    }
}

/// On-demand analysis: fetch the user's window from `store` and score the
/// candidate against it.
///
/// Input is validated before the store is queried. A failed fetch aborts the
/// analysis; it is never scored as an empty window.
pub fn analyze_transaction<H: TransactionHistory + ?Sized>(
    store: &H,
    request: &AnalysisRequest,
) -> FraudScoringResult<ComputationOutput<ScoringOutput>> {
    let start = Instant::now();

    let candidate = request.candidate();
    validate_candidate(&candidate)?;
    let config = request.config.resolve()?;

    let since = window_start(candidate.occurs_at, &config)?;
    let fetched = store
        .fetch_recent(&candidate.user_id, since)
        .inspect_err(|e| {
            warn!(user_id = %candidate.user_id, error = %e, "history fetch failed, aborting analysis")
        })?;
    debug!(
        user_id = %candidate.user_id,
        since = %since,
        fetched = fetched.len(),
        "fetched recent history"
    );

    // The store has no upper bound; transactions after the candidate are
    // dropped here.
    let partition = partition_history(&candidate.user_id, since, candidate.occurs_at, &fetched);
    if partition.other_user + partition.out_of_window > 0 {
        debug!(
            other_user = partition.other_user,
            out_of_window = partition.out_of_window,
            "dropped history outside the window"
        );
    }
    let warnings = partition_warnings(partition.other_user, partition.out_of_window);

    let output = build_output(&candidate, &partition.in_window, config, since);
    debug!(
        user_id = %candidate.user_id,
        risk_score = output.verdict.risk_score,
        is_suspicious = output.verdict.is_suspicious,
        "transaction scored"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        METHODOLOGY,
        &assumptions(&output.config),
        warnings,
        elapsed,
        output,
    ))
}

/// Creation flow: score the candidate against the ledger, then store it with
/// the verdict attached. Returns the stored record.
pub fn screen_and_record(
    ledger: &mut InMemoryLedger,
    request: &AnalysisRequest,
) -> FraudScoringResult<TransactionRecord> {
    let analysis = analyze_transaction(&*ledger, request)?;
    let id = ledger.next_id();
    let record = TransactionRecord::from_verdict(id, &request.candidate(), &analysis.result.verdict);
    if record.is_suspicious {
        info!(
            id = %record.id,
            user_id = %record.user_id,
            risk_score = record.risk_score,
            "suspicious transaction recorded"
        );
    }
    ledger.insert(record.clone());
    Ok(record)
}
