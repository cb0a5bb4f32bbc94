//! Duration type with minute precision.
//!
//! CRITICAL: Never use floating-point for duration calculations.
//! The canonical unit is the whole minute; decimal hours exist only as a
//! display/input representation and use `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A signed duration in whole minutes.
///
/// Per-transaction durations are always positive; balances may be negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Minutes(pub i64);

impl Minutes {
    /// The zero duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from a raw minute count.
    #[must_use]
    pub const fn new(minutes: i64) -> Self {
        Self(minutes)
    }

    /// Returns the raw minute count.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true if the duration is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the duration is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true if the duration is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whole-hour component of the absolute value.
    #[must_use]
    pub const fn hours_component(self) -> i64 {
        self.0.abs() / 60
    }

    /// Minute remainder of the absolute value (0..60).
    #[must_use]
    pub const fn minutes_component(self) -> i64 {
        self.0.abs() % 60
    }

    /// Decimal-hours view (`minutes / 60`), for display only.
    ///
    /// The minute count stays the source of truth; the quotient is rounded
    /// to two decimal places.
    #[must_use]
    pub fn as_hours(self) -> Decimal {
        (Decimal::from(self.0) / Decimal::from(60)).round_dp(2)
    }
}

impl std::fmt::Display for Minutes {
    /// Formats as `H:MM`, with a leading minus for negative values
    /// (e.g. `-3:05`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{sign}{}:{:02}",
            self.hours_component(),
            self.minutes_component()
        )
    }
}

impl std::ops::Add for Minutes {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Minutes {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Minutes {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Neg for Minutes {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Minutes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}
