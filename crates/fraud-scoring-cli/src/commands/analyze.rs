use chrono::{DateTime, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use fraud_scoring_core::screening::{analyze_transaction, AnalysisRequest, InMemoryLedger};
use fraud_scoring_core::HistoricalTransaction;

use super::ThresholdArgs;
use crate::input;

/// Arguments for on-demand analysis against a transaction ledger
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON array of stored transactions (all users)
    #[arg(long)]
    pub ledger: String,

    /// Path to a JSON analysis request (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// User the candidate belongs to
    #[arg(long)]
    pub user_id: Option<String>,

    /// Candidate amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// When the candidate occurs, RFC 3339 (defaults to now)
    #[arg(long)]
    pub occurs_at: Option<DateTime<Utc>>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

impl AnalyzeArgs {
    /// Request assembled from individual flags, or `None` when `--user-id`
    /// or `--amount` is missing.
    fn request_from_flags(&self) -> Option<AnalysisRequest> {
        match (&self.user_id, self.amount) {
            (Some(user_id), Some(amount)) => Some(AnalysisRequest {
                user_id: user_id.clone(),
                amount,
                occurs_at: self.occurs_at.unwrap_or_else(Utc::now),
                config: Default::default(),
            }),
            _ => None,
        }
    }
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let stored: Vec<HistoricalTransaction> = input::file::read_json(&args.ledger)?;
    let ledger = InMemoryLedger::from_history(stored);
    info!(records = ledger.len(), "ledger loaded");

    let mut request: AnalysisRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = args.request_from_flags() {
        request
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        return Err(
            "--user-id and --amount are required (or provide --input or pipe a request)".into(),
        );
    };
    request.config = args.thresholds.layer_over(&request.config)?;

    let result = analyze_transaction(&ledger, &request)?;
    Ok(serde_json::to_value(result)?)
}
