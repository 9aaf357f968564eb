use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{types::*, FraudScoringError, FraudScoringResult};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_HIGH_AMOUNT_THRESHOLD: Money = dec!(10000);
pub const DEFAULT_FREQUENCY_THRESHOLD: u32 = 5;
pub const DEFAULT_TIME_WINDOW_MINUTES: u32 = 1;

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Thresholds for one scoring call. Immutable once resolved; there is no
/// process-wide instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Amounts strictly above this trigger the high-amount rule.
    pub high_amount_threshold: Money,
    /// Transactions in the window (candidate included) at or above this
    /// count trigger the frequency rule.
    pub frequency_threshold: u32,
    /// Length of the trailing window in minutes.
    pub time_window_minutes: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_amount_threshold: DEFAULT_HIGH_AMOUNT_THRESHOLD,
            frequency_threshold: DEFAULT_FREQUENCY_THRESHOLD,
            time_window_minutes: DEFAULT_TIME_WINDOW_MINUTES,
        }
    }
}

impl ScoringConfig {
    /// Reject non-positive knobs.
    pub fn validate(&self) -> FraudScoringResult<()> {
        if self.high_amount_threshold <= Decimal::ZERO {
            return Err(FraudScoringError::invalid(
                "high_amount_threshold",
                "High amount threshold must be positive.",
            ));
        }
        if self.frequency_threshold == 0 {
            return Err(FraudScoringError::invalid(
                "frequency_threshold",
                "Frequency threshold must be positive.",
            ));
        }
        if self.time_window_minutes == 0 {
            return Err(FraudScoringError::invalid(
                "time_window_minutes",
                "Time window must be at least one minute.",
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::minutes(i64::from(self.time_window_minutes))
    }

    /// Cut-off for the multiple-large-transactions rule.
    pub fn half_threshold(&self) -> Money {
        self.high_amount_threshold / dec!(2)
    }
}

// ---------------------------------------------------------------------------
// Per-call overrides
// ---------------------------------------------------------------------------

/// Partial configuration as supplied by a caller. Absent knobs fall back to
/// the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_amount_threshold: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window_minutes: Option<u32>,
}

impl ScoringOverrides {
    /// Layer `other` on top of `self`; values present in `other` win.
    pub fn merge(&self, other: &ScoringOverrides) -> ScoringOverrides {
        ScoringOverrides {
            high_amount_threshold: other.high_amount_threshold.or(self.high_amount_threshold),
            frequency_threshold: other.frequency_threshold.or(self.frequency_threshold),
            time_window_minutes: other.time_window_minutes.or(self.time_window_minutes),
        }
    }

    /// Fill absent knobs from defaults and validate the result.
    pub fn resolve(&self) -> FraudScoringResult<ScoringConfig> {
        let defaults = ScoringConfig::default();
        let config = ScoringConfig {
            high_amount_threshold: self
                .high_amount_threshold
                .unwrap_or(defaults.high_amount_threshold),
            frequency_threshold: self
                .frequency_threshold
                .unwrap_or(defaults.frequency_threshold),
            time_window_minutes: self
                .time_window_minutes
                .unwrap_or(defaults.time_window_minutes),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.high_amount_threshold, dec!(10000));
        assert_eq!(config.frequency_threshold, 5);
        assert_eq!(config.time_window_minutes, 1);
        assert_eq!(config.half_threshold(), dec!(5000));
        assert_eq!(config.window(), Duration::minutes(1));
    }

    #[test]
    fn test_empty_overrides_resolve_to_defaults() {
        let config = ScoringOverrides::default().resolve().unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_overrides_are_independent() {
        let overrides = ScoringOverrides {
            frequency_threshold: Some(3),
            ..Default::default()
        };
        let config = overrides.resolve().unwrap();
        assert_eq!(config.frequency_threshold, 3);
        assert_eq!(config.high_amount_threshold, dec!(10000));
        assert_eq!(config.time_window_minutes, 1);
    }

    #[test]
    fn test_merge_prefers_later_layer() {
        let file = ScoringOverrides {
            high_amount_threshold: Some(dec!(2000)),
            time_window_minutes: Some(10),
            ..Default::default()
        };
        let flags = ScoringOverrides {
            time_window_minutes: Some(5),
            ..Default::default()
        };
        let merged = file.merge(&flags);
        assert_eq!(merged.high_amount_threshold, Some(dec!(2000)));
        assert_eq!(merged.time_window_minutes, Some(5));
        assert_eq!(merged.frequency_threshold, None);
    }

    #[test]
    fn test_non_positive_knobs_rejected() {
        let zero_threshold = ScoringOverrides {
            high_amount_threshold: Some(Decimal::ZERO),
            ..Default::default()
        };
        match zero_threshold.resolve().unwrap_err() {
            FraudScoringError::InvalidInput { field, .. } => {
                assert_eq!(field, "high_amount_threshold")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let zero_window = ScoringOverrides {
            time_window_minutes: Some(0),
            ..Default::default()
        };
        assert!(zero_window.resolve().is_err());

        let zero_frequency = ScoringOverrides {
            frequency_threshold: Some(0),
            ..Default::default()
        };
        assert!(zero_frequency.resolve().is_err());
    }

    #[test]
    fn test_overrides_deserialize_partial_document() {
        let overrides: ScoringOverrides =
            serde_json::from_str(r#"{"high_amount_threshold": "2500.00"}"#).unwrap();
        assert_eq!(overrides.high_amount_threshold, Some(dec!(2500.00)));
        assert_eq!(overrides.frequency_threshold, None);
    }
}
