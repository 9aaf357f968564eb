//! The transaction-store seam.
//!
//! Scoring never talks to storage directly; it is handed whatever a
//! [`TransactionHistory`] returns for the window. [`InMemoryLedger`] is a
//! non-durable store for the CLI and tests.

use tracing::debug;

use super::records::{TransactionRecord, TransactionStatus};
use crate::{types::*, FraudScoringError, FraudScoringResult};

/// Read-only "recent transactions for user" query.
pub trait TransactionHistory {
    /// All of `user_id`'s transactions with `timestamp >= since`, in any
    /// order. A failure must be reported, never masked as an empty result.
    fn fetch_recent(
        &self,
        user_id: &str,
        since: Timestamp,
    ) -> FraudScoringResult<Vec<HistoricalTransaction>>;
}

impl<T: TransactionHistory + ?Sized> TransactionHistory for &T {
    fn fetch_recent(
        &self,
        user_id: &str,
        since: Timestamp,
    ) -> FraudScoringResult<Vec<HistoricalTransaction>> {
        (**self).fetch_recent(user_id, since)
    }
}

/// Append-only in-memory record set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    records: Vec<TransactionRecord>,
    next_id: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger from already-persisted transactions. They are stored
    /// as completed and unflagged.
    pub fn from_history(history: impl IntoIterator<Item = HistoricalTransaction>) -> Self {
        let mut ledger = Self::new();
        for tx in history {
            ledger.next_id += 1;
            ledger.records.push(TransactionRecord {
                id: tx.id,
                user_id: tx.user_id,
                amount: tx.amount,
                timestamp: tx.timestamp,
                status: TransactionStatus::Completed,
                risk_score: 0,
                is_suspicious: false,
                fraud_reason: None,
            });
        }
        ledger
    }

    /// Next generated id. Ids already held by stored records, including
    /// seeded ones, are skipped.
    pub fn next_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("txn_{:06}", self.next_id);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    pub fn insert(&mut self, record: TransactionRecord) {
        debug!(id = %record.id, user_id = %record.user_id, "recording transaction");
        self.records.push(record);
    }

    pub fn get(&self, id: &str) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Manual status change for a stored transaction.
    pub fn update_status(
        &mut self,
        id: &str,
        status: TransactionStatus,
    ) -> FraudScoringResult<&TransactionRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| FraudScoringError::TransactionNotFound(id.to_string()))?;
        record.apply_status(status);
        debug!(id, %status, is_suspicious = record.is_suspicious, "status updated");
        Ok(record)
    }
}

impl TransactionHistory for InMemoryLedger {
    fn fetch_recent(
        &self,
        user_id: &str,
        since: Timestamp,
    ) -> FraudScoringResult<Vec<HistoricalTransaction>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.user_id == user_id && r.timestamp >= since)
            .map(TransactionRecord::as_historical)
            .collect())
    }
}
