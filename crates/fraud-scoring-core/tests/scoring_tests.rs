use chrono::{Duration, TimeZone, Utc};
use fraud_scoring_core::scoring::engine::{self, ScoringInput};
use fraud_scoring_core::scoring::{FraudRule, ScoringConfig, ScoringOverrides};
use fraud_scoring_core::{CandidateTransaction, HistoricalTransaction, Money, Timestamp};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 11, 5, 14, 30, 0).unwrap()
}

fn candidate(amount: Money) -> CandidateTransaction {
    CandidateTransaction {
        user_id: "acct-7781".into(),
        amount,
        occurs_at: now(),
    }
}

fn prior(amount: Money, secs_ago: i64) -> HistoricalTransaction {
    HistoricalTransaction {
        id: format!("txn-{secs_ago}-{amount}"),
        user_id: "acct-7781".into(),
        amount,
        timestamp: now() - Duration::seconds(secs_ago),
    }
}

/// `n` transactions of 10.00, 25 seconds apart, newest 1 second ago.
fn spaced_history(n: usize, gap_secs: i64) -> Vec<HistoricalTransaction> {
    (0..n)
        .map(|i| prior(dec!(10.00), 1 + gap_secs * i as i64))
        .collect()
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_high_amount_with_empty_history() {
    let verdict = engine::score(&candidate(dec!(15000)), &[], &ScoringConfig::default());

    assert_eq!(verdict.risk_score, 50);
    assert!(verdict.is_suspicious);
    assert_eq!(
        verdict.reasons,
        vec!["High transaction amount: $15000 exceeds threshold of $10000".to_string()]
    );
    assert_eq!(
        verdict.fraud_reason.as_deref(),
        Some("High transaction amount: $15000 exceeds threshold of $10000")
    );
}

#[test]
fn test_frequency_and_rapid_succession() {
    // 4 prior transactions 10 seconds apart within the last minute
    let history = vec![
        prior(dec!(50), 40),
        prior(dec!(50), 30),
        prior(dec!(50), 20),
        prior(dec!(50), 10),
    ];
    let verdict = engine::score(&candidate(dec!(100)), &history, &ScoringConfig::default());

    assert_eq!(verdict.risk_score, 55);
    assert!(verdict.is_suspicious);
    assert_eq!(
        verdict.reasons,
        vec![
            "High transaction frequency: 5 transactions in 1 minute(s), threshold is 5".to_string(),
            "Rapid successive transactions detected within 30 seconds".to_string(),
        ]
    );
}

#[test]
fn test_amount_exactly_at_threshold() {
    let verdict = engine::score(&candidate(dec!(10000)), &[], &ScoringConfig::default());
    assert_eq!(verdict.risk_score, 0);
    assert!(!verdict.is_suspicious);
    assert!(verdict.reasons.is_empty());
    assert_eq!(verdict.fraud_reason, None);
}

#[test]
fn test_all_rules_cap_at_100() {
    let history = vec![
        prior(dec!(6000), 50),
        prior(dec!(6000), 40),
        prior(dec!(100), 30),
        prior(dec!(100), 20),
        prior(dec!(100), 10),
    ];
    let verdict = engine::score(&candidate(dec!(12000)), &history, &ScoringConfig::default());

    assert_eq!(verdict.risk_score, 100);
    assert!(verdict.is_suspicious);
    let rules: Vec<FraudRule> = verdict.rule_hits.iter().map(|h| h.rule).collect();
    assert_eq!(rules, FraudRule::ALL.to_vec());
    assert_eq!(
        verdict.reasons[2],
        "Multiple large transactions detected: 3 transactions over $5000 in 1 minute(s)"
    );
    assert_eq!(
        verdict.reasons[1],
        "High transaction frequency: 6 transactions in 1 minute(s), threshold is 5"
    );
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_amount_rule_boundary_sweep() {
    let config = ScoringConfig::default();
    for cents in [-100i64, -1, 0, 1, 100, 500_000] {
        let amount = config.high_amount_threshold + Decimal::new(cents, 2);
        if amount <= Decimal::ZERO {
            continue;
        }
        let verdict = engine::score(&candidate(amount), &[], &config);
        assert_eq!(
            verdict.triggered(FraudRule::HighAmount),
            cents > 0,
            "amount {amount}"
        );
        let expected = if cents > 0 { 50 } else { 0 };
        assert_eq!(verdict.risk_score, expected, "amount {amount}");
    }
}

#[test]
fn test_frequency_fires_iff_n_plus_one_reaches_threshold() {
    for threshold in 1..=6u32 {
        let config = ScoringConfig {
            frequency_threshold: threshold,
            time_window_minutes: 10,
            ..Default::default()
        };
        for n in 0..8usize {
            // 45s gaps keep rapid succession quiet
            let history = spaced_history(n, 45);
            let verdict = engine::score(&candidate(dec!(1)), &history, &config);
            assert_eq!(
                verdict.triggered(FraudRule::HighFrequency),
                n + 1 >= threshold as usize,
                "n={n} threshold={threshold}"
            );
        }
    }
}

#[test]
fn test_score_invariants_over_mixed_inputs() {
    let config = ScoringConfig::default();
    let amounts = [dec!(0.01), dec!(4999.99), dec!(5000.01), dec!(10000), dec!(25000)];
    let histories = vec![
        vec![],
        spaced_history(1, 45),
        spaced_history(2, 10),
        spaced_history(4, 45),
        vec![prior(dec!(7000), 5), prior(dec!(7000), 50)],
    ];

    for amount in amounts {
        for history in &histories {
            let verdict = engine::score(&candidate(amount), history, &config);
            assert!(verdict.risk_score <= 100);
            assert_eq!(verdict.is_suspicious, verdict.risk_score >= 50);
            assert_eq!(verdict.reasons.is_empty(), verdict.risk_score == 0);
            assert_eq!(verdict.reasons.len(), verdict.rule_hits.len());
            let raw: u32 = verdict.rule_hits.iter().map(|h| h.points).sum();
            assert_eq!(verdict.risk_score, raw.min(100));
        }
    }
}

#[test]
fn test_scoring_is_deterministic() {
    let history = vec![prior(dec!(6000), 12), prior(dec!(80), 3), prior(dec!(80), 44)];
    let config = ScoringConfig::default();
    let first = engine::score(&candidate(dec!(9000)), &history, &config);
    let second = engine::score(&candidate(dec!(9000)), &history, &config);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_history_order_does_not_matter() {
    let history = vec![prior(dec!(6000), 5), prior(dec!(1), 55), prior(dec!(1), 30)];
    let mut reversed = history.clone();
    reversed.reverse();
    let config = ScoringConfig::default();
    assert_eq!(
        engine::score(&candidate(dec!(6000)), &history, &config),
        engine::score(&candidate(dec!(6000)), &reversed, &config)
    );
}

#[test]
fn test_parallel_scoring_matches_sequential() {
    let history = vec![
        prior(dec!(6000), 50),
        prior(dec!(100), 20),
        prior(dec!(100), 10),
    ];
    let config = ScoringConfig::default();
    let expected = engine::score(&candidate(dec!(7000)), &history, &config);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| engine::score(&candidate(dec!(7000)), &history, &config)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// ===========================================================================
// Custom configuration
// ===========================================================================

#[test]
fn test_custom_thresholds_in_reasons() {
    let config = ScoringConfig {
        high_amount_threshold: dec!(500),
        frequency_threshold: 3,
        time_window_minutes: 15,
    };
    let history = vec![prior(dec!(300), 600), prior(dec!(20), 120)];
    let verdict = engine::score(&candidate(dec!(750.50)), &history, &config);

    assert_eq!(
        verdict.reasons,
        vec![
            "High transaction amount: $750.50 exceeds threshold of $500".to_string(),
            "High transaction frequency: 3 transactions in 15 minute(s), threshold is 3".to_string(),
            "Multiple large transactions detected: 2 transactions over $250 in 15 minute(s)"
                .to_string(),
        ]
    );
    assert_eq!(verdict.risk_score, 100);
}

// ===========================================================================
// Validated boundary
// ===========================================================================

#[test]
fn test_score_transaction_from_json() {
    let json = r#"{
        "user_id": "acct-7781",
        "amount": "15000.00",
        "occurs_at": "2024-11-05T14:30:00Z",
        "recent_history": []
    }"#;
    let input: ScoringInput = serde_json::from_str(json).unwrap();
    let output = engine::score_transaction(&input).unwrap();

    assert_eq!(output.result.config, ScoringConfig::default());
    assert_eq!(output.result.verdict.risk_score, 50);
    assert!(output.result.verdict.reasons[0].contains("$15000 exceeds threshold of $10000"));
    assert!(output.warnings.is_empty());
    assert_eq!(output.metadata.precision, "rust_decimal_128bit");
}

#[test]
fn test_score_transaction_applies_overrides() {
    let input = ScoringInput {
        user_id: "acct-7781".into(),
        amount: dec!(600),
        occurs_at: now(),
        config: ScoringOverrides {
            high_amount_threshold: Some(dec!(500)),
            ..Default::default()
        },
        recent_history: vec![],
    };
    let output = engine::score_transaction(&input).unwrap();
    assert_eq!(output.result.config.high_amount_threshold, dec!(500));
    assert_eq!(output.result.config.frequency_threshold, 5);
    assert_eq!(output.result.verdict.risk_score, 50);
}

#[test]
fn test_score_transaction_rejects_non_positive_amount() {
    let input = ScoringInput {
        user_id: "acct-7781".into(),
        amount: dec!(-5),
        occurs_at: now(),
        config: ScoringOverrides::default(),
        recent_history: vec![],
    };
    let err = engine::score_transaction(&input).unwrap_err();
    assert!(err.to_string().contains("amount"));
}
