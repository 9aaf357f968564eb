use serde::{Deserialize, Serialize};

use crate::scoring::engine::Verdict;
use crate::types::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Flagged,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Flagged => write!(f, "flagged"),
        }
    }
}

/// A stored transaction with the verdict computed when it was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    pub amount: Money,
    pub timestamp: Timestamp,
    pub status: TransactionStatus,
    pub risk_score: u32,
    pub is_suspicious: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_reason: Option<String>,
}

impl TransactionRecord {
    /// Attach a verdict to a candidate. The verdict's flag and reason are
    /// copied as-is.
    pub fn from_verdict(id: String, candidate: &CandidateTransaction, verdict: &Verdict) -> Self {
        Self {
            id,
            user_id: candidate.user_id.clone(),
            amount: candidate.amount,
            timestamp: candidate.occurs_at,
            status: TransactionStatus::Pending,
            risk_score: verdict.risk_score,
            is_suspicious: verdict.is_suspicious,
            fraud_reason: verdict.fraud_reason.clone(),
        }
    }

    /// Manual status change. Moving to `Flagged` forces the suspicious flag
    /// on; nothing else touches the stored verdict.
    pub fn apply_status(&mut self, status: TransactionStatus) {
        self.status = status;
        if status == TransactionStatus::Flagged {
            self.is_suspicious = true;
        }
    }

    pub fn as_historical(&self) -> HistoricalTransaction {
        HistoricalTransaction {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            amount: self.amount,
            timestamp: self.timestamp,
        }
    }
}
