pub mod analyze;
pub mod score;

use clap::Args;
use rust_decimal::Decimal;

use fraud_scoring_core::scoring::ScoringOverrides;

use crate::input;

/// Threshold knobs shared by every scoring command
#[derive(Args, Debug, Default)]
pub struct ThresholdArgs {
    /// Path to a JSON or YAML document of threshold overrides
    #[arg(long)]
    pub config: Option<String>,

    /// Amounts strictly above this are high (default 10000)
    #[arg(long)]
    pub high_amount_threshold: Option<Decimal>,

    /// Transactions in the window, candidate included, that count as high frequency (default 5)
    #[arg(long)]
    pub frequency_threshold: Option<u32>,

    /// Trailing window length in minutes (default 1)
    #[arg(long)]
    pub time_window_minutes: Option<u32>,
}

impl ThresholdArgs {
    /// Layer config file and flags over `base`. Flags win over the file,
    /// the file wins over the request document.
    pub fn layer_over(
        &self,
        base: &ScoringOverrides,
    ) -> Result<ScoringOverrides, Box<dyn std::error::Error>> {
        let from_file: ScoringOverrides = match self.config {
            Some(ref path) => input::file::read_document(path)?,
            None => ScoringOverrides::default(),
        };
        let from_flags = ScoringOverrides {
            high_amount_threshold: self.high_amount_threshold,
            frequency_threshold: self.frequency_threshold,
            time_window_minutes: self.time_window_minutes,
        };
        Ok(base.merge(&from_file).merge(&from_flags))
    }
}
