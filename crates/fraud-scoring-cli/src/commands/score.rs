use chrono::{DateTime, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fraud_scoring_core::scoring::engine::{self, ScoringInput};
use fraud_scoring_core::HistoricalTransaction;

use super::ThresholdArgs;
use crate::input;

/// Arguments for scoring a candidate against a supplied history window
#[derive(Args)]
pub struct ScoreArgs {
    /// Path to a JSON scoring request (overrides individual flags)
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

    /// Path to a JSON array of the user's recent transactions
    #[arg(long)]
    pub history: Option<String>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

impl ScoreArgs {
    /// Request assembled from individual flags, or `None` when `--user-id`
    /// or `--amount` is missing.
    fn request_from_flags(&self) -> Result<Option<ScoringInput>, Box<dyn std::error::Error>> {
        let (user_id, amount) = match (&self.user_id, self.amount) {
            (Some(user_id), Some(amount)) => (user_id.clone(), amount),
            _ => return Ok(None),
        };
        let recent_history: Vec<HistoricalTransaction> = match self.history {
            Some(ref path) => input::file::read_json(path)?,
            None => Vec::new(),
        };
        Ok(Some(ScoringInput {
            user_id,
            amount,
            occurs_at: self.occurs_at.unwrap_or_else(Utc::now),
            config: Default::default(),
            recent_history,
        }))
    }
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut scoring_input: ScoringInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = args.request_from_flags()? {
        request
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        return Err(
            "--user-id and --amount are required (or provide --input or pipe a request)".into(),
        );
    };
    scoring_input.config = args.thresholds.layer_over(&scoring_input.config)?;

    let result = engine::score_transaction(&scoring_input)?;
    Ok(serde_json::to_value(result)?)
}
