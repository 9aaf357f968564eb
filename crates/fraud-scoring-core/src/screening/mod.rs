pub mod analysis;
pub mod history;
pub mod records;

pub use analysis::{analyze_transaction, screen_and_record, AnalysisRequest};
pub use history::{InMemoryLedger, TransactionHistory};
pub use records::{TransactionRecord, TransactionStatus};
