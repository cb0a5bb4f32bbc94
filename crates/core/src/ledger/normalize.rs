//! Input validation and unit normalization.
//!
//! Every write path (single create, partial update, CSV import rows) and the
//! store's legacy-read migration goes through the functions here, so
//! duration semantics cannot diverge between call sites.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use zeitsaldo_shared::types::Minutes;

use super::types::{
    NewTransaction, Transaction, TransactionInput, TransactionKind, TransactionPatch,
};

/// Validation errors raised while normalizing transaction input.
///
/// A record either fully validates or is fully rejected; these are never
/// partially applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Date is not a valid `YYYY-MM-DD` calendar date.
    #[error("date must be a valid YYYY-MM-DD calendar date")]
    InvalidDate,

    /// Kind is not one of the recognized values.
    #[error("kind must be either EARNED or SPENT")]
    InvalidKind,

    /// Duration is present but not a positive amount.
    #[error("duration must be positive (whole minutes or decimal hours)")]
    InvalidDuration,

    /// Neither minutes nor hours were supplied.
    #[error("either minutes or hours must be supplied")]
    MissingDuration,

    /// Description is empty after trimming.
    #[error("description must not be empty")]
    MissingDescription,
}

impl ValidationError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(self) -> &'static str {
        match self {
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidKind => "INVALID_KIND",
            Self::InvalidDuration => "INVALID_DURATION",
            Self::MissingDuration => "MISSING_DURATION",
            Self::MissingDescription => "MISSING_DESCRIPTION",
        }
    }
}

/// Parses and validates a date input.
///
/// Anything past the first ten characters (e.g. a time-of-day suffix) is
/// truncated before the format check.
pub fn validate_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).ok_or(ValidationError::InvalidDate)?;
    if !is_iso_date_shape(head) {
        return Err(ValidationError::InvalidDate);
    }
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate)
}

/// Checks the exact `\d{4}-\d{2}-\d{2}` shape.
fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Parses a kind input, case-insensitively.
pub fn parse_kind(raw: &str) -> Result<TransactionKind, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidKind)
}

/// Validates a description, returning the trimmed text.
pub fn validate_description(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    Ok(trimmed.to_string())
}

/// Converts decimal hours to whole minutes, rounding ties away from zero.
///
/// This is the single conversion point; create, update, CSV import, and the
/// legacy read migration all resolve through it. Returns `None` when the
/// result does not fit the minute range.
#[must_use]
pub fn hours_to_minutes(hours: Decimal) -> Option<i64> {
    (hours * Decimal::from(60))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// The two accepted duration representations.
///
/// The ambiguity between them ends here: inputs are lifted into this type
/// once and resolved into canonical minutes, so no other layer ever looks
/// at both fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationInput {
    /// Whole minutes; authoritative when both representations arrive.
    Minutes(i64),
    /// Decimal hours.
    Hours(Decimal),
}

impl DurationInput {
    /// Selects the representation from the optional wire fields.
    pub fn from_fields(
        minutes: Option<i64>,
        hours: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        match (minutes, hours) {
            (Some(m), _) => Ok(Self::Minutes(m)),
            (None, Some(h)) => Ok(Self::Hours(h)),
            (None, None) => Err(ValidationError::MissingDuration),
        }
    }

    /// Resolves to canonical positive minutes.
    pub fn resolve(self) -> Result<Minutes, ValidationError> {
        match self {
            Self::Minutes(m) if m > 0 => Ok(Minutes::new(m)),
            Self::Minutes(_) => Err(ValidationError::InvalidDuration),
            Self::Hours(h) if h <= Decimal::ZERO => Err(ValidationError::InvalidDuration),
            Self::Hours(h) => match hours_to_minutes(h) {
                Some(m) if m > 0 => Ok(Minutes::new(m)),
                _ => Err(ValidationError::InvalidDuration),
            },
        }
    }
}

/// Resolves the canonical duration from the two optional wire fields.
pub fn resolve_duration(
    minutes: Option<i64>,
    hours: Option<Decimal>,
) -> Result<Minutes, ValidationError> {
    DurationInput::from_fields(minutes, hours)?.resolve()
}

/// Normalizes raw input into a validated, canonical record.
pub fn normalize(input: &TransactionInput) -> Result<NewTransaction, ValidationError> {
    let date = validate_date(&input.date)?;
    let kind = parse_kind(&input.kind)?;
    let minutes = resolve_duration(input.minutes, input.hours)?;
    let description = validate_description(&input.description)?;

    Ok(NewTransaction {
        date,
        kind,
        minutes,
        description,
    })
}

/// Applies a partial update, re-validating exactly the supplied fields.
///
/// Supplying either duration field replaces the stored duration with the
/// same precedence rules as `resolve_duration`.
pub fn apply_patch(
    existing: &Transaction,
    patch: &TransactionPatch,
) -> Result<Transaction, ValidationError> {
    let mut updated = existing.clone();

    if let Some(date) = &patch.date {
        updated.date = validate_date(date)?;
    }
    if let Some(kind) = &patch.kind {
        updated.kind = parse_kind(kind)?;
    }
    if patch.minutes.is_some() || patch.hours.is_some() {
        updated.minutes = resolve_duration(patch.minutes, patch.hours)?;
    }
    if let Some(description) = &patch.description {
        updated.description = validate_description(description)?;
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use zeitsaldo_shared::types::TransactionId;

    fn input(
        date: &str,
        kind: &str,
        minutes: Option<i64>,
        hours: Option<Decimal>,
        description: &str,
    ) -> TransactionInput {
        TransactionInput {
            date: date.to_string(),
            kind: kind.to_string(),
            minutes,
            hours,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_normalize_minutes_input() {
        let normalized =
            normalize(&input("2024-01-15", "EARNED", Some(90), None, "x")).unwrap();
        assert_eq!(normalized.minutes, Minutes::new(90));
        assert_eq!(normalized.minutes.to_string(), "1:30");
        assert_eq!(normalized.kind, TransactionKind::Earned);
    }

    #[test]
    fn test_normalize_hours_input_matches_minutes_input() {
        let from_hours =
            normalize(&input("2024-01-15", "EARNED", None, Some(dec!(1.5)), "x")).unwrap();
        let from_minutes =
            normalize(&input("2024-01-15", "EARNED", Some(90), None, "x")).unwrap();
        assert_eq!(from_hours, from_minutes);
    }

    #[test]
    fn test_minutes_take_precedence_over_hours() {
        let normalized =
            normalize(&input("2024-01-15", "SPENT", Some(30), Some(dec!(5.0)), "x")).unwrap();
        assert_eq!(normalized.minutes, Minutes::new(30));
    }

    #[rstest]
    #[case("15-01-2024")]
    #[case("2024/01/15")]
    #[case("2024-1-5")]
    #[case("2024-13-01")]
    #[case("2024-02-30")]
    #[case("")]
    #[case("short")]
    fn test_invalid_dates_rejected(#[case] date: &str) {
        assert_eq!(
            normalize(&input(date, "EARNED", Some(60), None, "x")),
            Err(ValidationError::InvalidDate)
        );
    }

    #[test]
    fn test_date_truncates_time_suffix() {
        let normalized = normalize(&input(
            "2024-01-15T10:30:00.000Z",
            "EARNED",
            Some(60),
            None,
            "x",
        ))
        .unwrap();
        assert_eq!(
            normalized.date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_invalid_kind_rejected() {
        assert_eq!(
            normalize(&input("2024-01-15", "GAINED", Some(60), None, "x")),
            Err(ValidationError::InvalidKind)
        );
    }

    #[rstest]
    #[case(Some(0), None)]
    #[case(Some(-30), None)]
    #[case(None, Some(dec!(0)))]
    #[case(None, Some(dec!(-1.5)))]
    fn test_non_positive_durations_rejected(
        #[case] minutes: Option<i64>,
        #[case] hours: Option<Decimal>,
    ) {
        assert_eq!(
            normalize(&input("2024-01-15", "EARNED", minutes, hours, "x")),
            Err(ValidationError::InvalidDuration)
        );
    }

    #[test]
    fn test_tiny_hours_rounding_to_zero_rejected() {
        // 0.004h rounds to 0 minutes, which is not a valid duration.
        assert_eq!(
            resolve_duration(None, Some(dec!(0.004))),
            Err(ValidationError::InvalidDuration)
        );
    }

    #[test]
    fn test_missing_duration_rejected() {
        assert_eq!(
            normalize(&input("2024-01-15", "EARNED", None, None, "x")),
            Err(ValidationError::MissingDuration)
        );
    }

    #[test]
    fn test_empty_description_rejected() {
        assert_eq!(
            normalize(&input("2024-01-15", "EARNED", Some(60), None, "   ")),
            Err(ValidationError::MissingDescription)
        );
    }

    #[test]
    fn test_description_is_trimmed() {
        let normalized =
            normalize(&input("2024-01-15", "EARNED", Some(60), None, "  Überstunden  ")).unwrap();
        assert_eq!(normalized.description, "Überstunden");
    }

    #[rstest]
    #[case(dec!(1.5), 90)]
    #[case(dec!(0.5), 30)]
    #[case(dec!(8), 480)]
    #[case(dec!(0.025), 2)] // 1.5 minutes rounds up, ties away from zero
    #[case(dec!(1.0083), 60)] // 60.498 minutes rounds down
    fn test_hours_to_minutes_rounding(#[case] hours: Decimal, #[case] expected: i64) {
        assert_eq!(hours_to_minutes(hours), Some(expected));
    }

    fn existing() -> Transaction {
        Transaction {
            id: TransactionId::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            kind: TransactionKind::Earned,
            minutes: Minutes::new(90),
            description: "Initial".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_replaces_only_supplied_fields() {
        let patch = TransactionPatch {
            minutes: Some(120),
            ..TransactionPatch::default()
        };
        let updated = apply_patch(&existing(), &patch).unwrap();
        assert_eq!(updated.minutes, Minutes::new(120));
        assert_eq!(updated.description, "Initial");
        assert_eq!(updated.kind, TransactionKind::Earned);
    }

    #[test]
    fn test_patch_hours_replaces_duration() {
        let patch = TransactionPatch {
            hours: Some(dec!(2.5)),
            ..TransactionPatch::default()
        };
        let updated = apply_patch(&existing(), &patch).unwrap();
        assert_eq!(updated.minutes, Minutes::new(150));
    }

    #[test]
    fn test_patch_rejects_invalid_fields() {
        let patch = TransactionPatch {
            date: Some("yesterday".to_string()),
            ..TransactionPatch::default()
        };
        assert_eq!(
            apply_patch(&existing(), &patch),
            Err(ValidationError::InvalidDate)
        );

        let patch = TransactionPatch {
            minutes: Some(0),
            ..TransactionPatch::default()
        };
        assert_eq!(
            apply_patch(&existing(), &patch),
            Err(ValidationError::InvalidDuration)
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ValidationError::InvalidDate.error_code(), "INVALID_DATE");
        assert_eq!(ValidationError::InvalidKind.error_code(), "INVALID_KIND");
        assert_eq!(
            ValidationError::InvalidDuration.error_code(),
            "INVALID_DURATION"
        );
        assert_eq!(
            ValidationError::MissingDuration.error_code(),
            "MISSING_DURATION"
        );
        assert_eq!(
            ValidationError::MissingDescription.error_code(),
            "MISSING_DESCRIPTION"
        );
    }
}
