pub mod config;
pub mod engine;
pub mod rules;
pub mod window;

pub use config::{ScoringConfig, ScoringOverrides};
pub use engine::{score, score_transaction, ScoringInput, ScoringOutput, Verdict};
pub use rules::{FraudRule, RuleHit};
