//! Monthly reporting against configured working-time targets.
//!
//! Pure aggregation over a transaction snapshot; targets are passed in
//! explicitly by the caller and never read from ambient state.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use zeitsaldo_shared::types::Minutes;

use super::types::{Transaction, TransactionKind};

/// Working-time targets for report comparisons.
#[derive(Debug, Clone, Copy)]
pub struct ReportTargets {
    /// Weekly target in hours.
    pub weekly_hours: i64,
    /// Monthly target override in hours; defaults to four weekly targets.
    pub monthly_override_hours: Option<i64>,
}

impl ReportTargets {
    /// Weekly target in minutes.
    #[must_use]
    pub const fn weekly_minutes(&self) -> Minutes {
        Minutes::new(self.weekly_hours * 60)
    }

    /// Effective monthly target in minutes.
    #[must_use]
    pub const fn monthly_minutes(&self) -> Minutes {
        let hours = match self.monthly_override_hours {
            Some(hours) => hours,
            None => self.weekly_hours * 4,
        };
        Minutes::new(hours * 60)
    }
}

/// Errors for report requests.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested year/month does not name a valid calendar month.
    #[error("{year}-{month} is not a valid calendar month")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },
}

/// Earned/spent totals for a single day.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DayTotal {
    /// The day.
    pub date: NaiveDate,
    /// Earned minutes booked on the day.
    pub earned: Minutes,
    /// Spent minutes booked on the day.
    pub spent: Minutes,
}

impl DayTotal {
    /// Net contribution of the day.
    #[must_use]
    pub fn net(&self) -> Minutes {
        self.earned - self.spent
    }
}

/// Earned total for one Monday-based week segment, clipped to the month.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeekTotal {
    /// First day of the segment.
    pub start: NaiveDate,
    /// Last day of the segment.
    pub end: NaiveDate,
    /// Earned minutes within the segment.
    pub earned: Minutes,
    /// Minutes still missing to the weekly target (zero when met).
    pub remaining: Minutes,
}

/// Aggregated view of a calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthReport {
    /// Reported year.
    pub year: i32,
    /// Reported month (1-12).
    pub month: u32,
    /// Earned minutes in the month.
    pub earned: Minutes,
    /// Spent minutes in the month.
    pub spent: Minutes,
    /// Net contribution of the month.
    pub net: Minutes,
    /// Effective monthly target.
    pub target: Minutes,
    /// Minutes still missing to the monthly target (zero when met).
    pub remaining: Minutes,
    /// Per-day totals for every day of the month.
    pub days: Vec<DayTotal>,
    /// Week segments with earned totals.
    pub weeks: Vec<WeekTotal>,
}

/// Builds the aggregated report for one calendar month.
pub fn month_report(
    transactions: &[Transaction],
    year: i32,
    month: u32,
    targets: &ReportTargets,
) -> Result<MonthReport, ReportError> {
    let invalid = || ReportError::InvalidMonth { year, month };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = first_of_next.pred_opt().ok_or_else(invalid)?;

    let mut by_day: BTreeMap<NaiveDate, (Minutes, Minutes)> = BTreeMap::new();
    for transaction in transactions
        .iter()
        .filter(|t| t.date >= first && t.date <= last)
    {
        let entry = by_day.entry(transaction.date).or_default();
        match transaction.kind {
            TransactionKind::Earned => entry.0 += transaction.minutes,
            TransactionKind::Spent => entry.1 += transaction.minutes,
        }
    }

    let days: Vec<DayTotal> = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let (earned, spent) = by_day.get(&date).copied().unwrap_or_default();
            DayTotal {
                date,
                earned,
                spent,
            }
        })
        .collect();

    let weeks = week_segments(&days, targets.weekly_minutes());

    let earned: Minutes = days.iter().map(|d| d.earned).sum();
    let spent: Minutes = days.iter().map(|d| d.spent).sum();
    let target = targets.monthly_minutes();

    Ok(MonthReport {
        year,
        month,
        earned,
        spent,
        net: earned - spent,
        target,
        remaining: shortfall(target, earned),
        days,
        weeks,
    })
}

/// Splits the month's days into Monday-based segments with earned totals.
fn week_segments(days: &[DayTotal], weekly_target: Minutes) -> Vec<WeekTotal> {
    let mut weeks = Vec::new();
    let mut start_index = 0_usize;

    while start_index < days.len() {
        let start = days[start_index].date;
        let days_left_in_week = 7 - start.weekday().num_days_from_monday() as usize;
        let end_index = (start_index + days_left_in_week - 1).min(days.len() - 1);

        let earned: Minutes = days[start_index..=end_index].iter().map(|d| d.earned).sum();
        weeks.push(WeekTotal {
            start,
            end: days[end_index].date,
            earned,
            remaining: shortfall(weekly_target, earned),
        });

        start_index = end_index + 1;
    }

    weeks
}

/// Minutes still missing to a target; zero once the target is met.
fn shortfall(target: Minutes, earned: Minutes) -> Minutes {
    Minutes::new((target - earned).get().max(0))
}
