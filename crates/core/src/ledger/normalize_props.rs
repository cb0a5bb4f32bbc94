//! Property-based tests for unit normalization.

use proptest::prelude::*;
use rust_decimal::Decimal;
use zeitsaldo_shared::types::Minutes;

use super::normalize::{
    ValidationError, hours_to_minutes, normalize, resolve_duration, validate_date,
};
use super::types::TransactionInput;

/// Strategy for a positive whole-minute duration.
fn positive_minutes() -> impl Strategy<Value = i64> {
    1_i64..100_000
}

/// Strategy for the components of a valid calendar date.
fn date_components() -> impl Strategy<Value = (i32, u32, u32)> {
    (2000_i32..2100, 1_u32..=12, 1_u32..=28)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Deriving hours as `minutes / 60` and converting back always yields
    /// the original minute count.
    #[test]
    fn prop_hours_roundtrip_is_stable(minutes in positive_minutes()) {
        let hours = Decimal::from(minutes) / Decimal::from(60);
        prop_assert_eq!(hours_to_minutes(hours), Some(minutes));
    }

    /// The two duration representations resolve identically.
    #[test]
    fn prop_minutes_and_derived_hours_agree(minutes in positive_minutes()) {
        let hours = Decimal::from(minutes) / Decimal::from(60);
        let from_minutes = resolve_duration(Some(minutes), None);
        let from_hours = resolve_duration(None, Some(hours));
        prop_assert_eq!(from_minutes, from_hours);
    }

    /// An integer minutes value always wins over a simultaneously supplied
    /// hours value.
    #[test]
    fn prop_minutes_take_precedence(
        minutes in positive_minutes(),
        hours_scaled in 1_i64..10_000,
    ) {
        let hours = Decimal::new(hours_scaled, 2);
        let resolved = resolve_duration(Some(minutes), Some(hours));
        prop_assert_eq!(resolved, Ok(Minutes::new(minutes)));
    }

    /// Non-positive minute inputs are always rejected.
    #[test]
    fn prop_non_positive_minutes_rejected(minutes in -100_000_i64..=0) {
        prop_assert_eq!(
            resolve_duration(Some(minutes), None),
            Err(ValidationError::InvalidDuration)
        );
    }

    /// Valid dates survive an appended time-of-day suffix unchanged.
    #[test]
    fn prop_date_truncation(
        (year, month, day) in date_components(),
        suffix in prop_oneof![
            Just(String::new()),
            Just("T00:00:00Z".to_string()),
            Just("T10:30:00.000Z".to_string()),
            Just(" 12:00".to_string()),
        ],
    ) {
        let plain = format!("{year:04}-{month:02}-{day:02}");
        let decorated = format!("{plain}{suffix}");
        prop_assert_eq!(validate_date(&decorated), validate_date(&plain));
        prop_assert!(validate_date(&plain).is_ok());
    }

    /// Normalization never invents data: the canonical record carries the
    /// validated inputs verbatim.
    #[test]
    fn prop_normalize_preserves_fields(
        (year, month, day) in date_components(),
        minutes in positive_minutes(),
        description in "[a-zA-Z0-9 ]{1,40}",
    ) {
        prop_assume!(!description.trim().is_empty());

        let input = TransactionInput {
            date: format!("{year:04}-{month:02}-{day:02}"),
            kind: "EARNED".to_string(),
            minutes: Some(minutes),
            hours: None,
            description: description.clone(),
        };

        let normalized = normalize(&input).unwrap();
        prop_assert_eq!(normalized.minutes, Minutes::new(minutes));
        prop_assert_eq!(normalized.description, description.trim());
        prop_assert_eq!(normalized.date.to_string(), input.date);
    }
}
