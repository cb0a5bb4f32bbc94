//! CSV import parsing and export rendering.
//!
//! Import validates every data row independently through the normalization
//! pipeline so that one malformed row never blocks the rest; export renders
//! the localized statement the browser client downloads.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::balance::LedgerRow;
use super::normalize::{self, ValidationError};
use super::types::{NewTransaction, Transaction, TransactionInput, TransactionKind};

/// Errors that reject an import as a whole, before any row is processed.
#[derive(Debug, Error)]
pub enum CsvImportError {
    /// The payload had a header but no data rows.
    #[error("CSV contains no data rows")]
    Empty,

    /// The header line could not be read.
    #[error("CSV header could not be read: {0}")]
    Header(String),
}

/// A per-row import failure. Collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-indexed row number within the data section.
    pub row: usize,
    /// Human-readable rejection reason.
    pub reason: String,
}

/// A row that passed validation, paired with its original row number.
#[derive(Debug, Clone)]
pub struct ImportCandidate {
    /// 1-indexed row number within the data section.
    pub row: usize,
    /// The validated record, ready for persistence.
    pub record: NewTransaction,
}

/// Outcome of parsing an import payload: validated candidates plus rejected
/// rows, both in original row order.
#[derive(Debug)]
pub struct ParsedImport {
    /// Rows that passed validation.
    pub candidates: Vec<ImportCandidate>,
    /// Rows that were rejected.
    pub errors: Vec<RowError>,
}

/// Result surface of a completed import.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    /// Number of rows persisted.
    pub imported: usize,
    /// Rejected rows in original row order.
    pub errors: Vec<RowError>,
}

// Recognized header synonyms per field; lookup is case-insensitive and the
// first matching header wins.
const DATE_HEADERS: &[&str] = &["date", "datum"];
const KIND_HEADERS: &[&str] = &["type", "typ"];
const MINUTES_HEADERS: &[&str] = &["minutes", "minuten"];
const HOURS_HEADERS: &[&str] = &["hours", "stunden"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "beschreibung"];

#[derive(Debug, Clone, Copy, Default)]
struct ColumnIndices {
    date: Option<usize>,
    kind: Option<usize>,
    minutes: Option<usize>,
    hours: Option<usize>,
    description: Option<usize>,
}

impl ColumnIndices {
    fn resolve(headers: &csv::StringRecord) -> Self {
        let find = |synonyms: &[&str]| {
            headers
                .iter()
                .position(|header| synonyms.iter().any(|s| header.trim().eq_ignore_ascii_case(s)))
        };

        Self {
            date: find(DATE_HEADERS),
            kind: find(KIND_HEADERS),
            minutes: find(MINUTES_HEADERS),
            hours: find(HOURS_HEADERS),
            description: find(DESCRIPTION_HEADERS),
        }
    }
}

/// Parses a CSV payload into validated candidates and per-row errors.
///
/// Each data row runs through the full normalization pipeline independently.
/// A payload without data rows is rejected outright.
pub fn parse_import(text: &str) -> Result<ParsedImport, CsvImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => ColumnIndices::resolve(headers),
        Err(e) => return Err(CsvImportError::Header(e.to_string())),
    };

    let mut candidates = Vec::new();
    let mut errors = Vec::new();
    let mut row = 0_usize;

    for record in reader.records() {
        row += 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                errors.push(RowError {
                    row,
                    reason: format!("row could not be read: {e}"),
                });
                continue;
            }
        };

        match validate_row(&record, columns) {
            Ok(new_transaction) => candidates.push(ImportCandidate {
                row,
                record: new_transaction,
            }),
            Err(reason) => errors.push(RowError { row, reason }),
        }
    }

    if row == 0 {
        return Err(CsvImportError::Empty);
    }

    Ok(ParsedImport { candidates, errors })
}

/// Validates a single data row through the normalization pipeline.
fn validate_row(
    record: &csv::StringRecord,
    columns: ColumnIndices,
) -> Result<NewTransaction, String> {
    let cell = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("").trim();

    // A populated minutes cell is authoritative; the hours cell is only
    // consulted when minutes are absent.
    let minutes_cell = cell(columns.minutes);
    let hours_cell = cell(columns.hours);
    let (minutes, hours) = if minutes_cell.is_empty() {
        if hours_cell.is_empty() {
            (None, None)
        } else {
            let hours = hours_cell
                .parse::<Decimal>()
                .map_err(|_| ValidationError::InvalidDuration.to_string())?;
            (None, Some(hours))
        }
    } else {
        let minutes = minutes_cell
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidDuration.to_string())?;
        (Some(minutes), None)
    };

    let input = TransactionInput {
        date: cell(columns.date).to_string(),
        kind: cell(columns.kind).to_string(),
        minutes,
        hours,
        description: cell(columns.description).to_string(),
    };

    normalize::normalize(&input).map_err(|e| e.to_string())
}

/// Filters a snapshot to an inclusive date range.
#[must_use]
pub fn filter_date_range(
    transactions: &[Transaction],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| from.is_none_or(|f| t.date >= f) && to.is_none_or(|u| t.date <= u))
        .cloned()
        .collect()
}

/// Localized header row of the export format.
pub const EXPORT_HEADER: &str = "Datum,Beschreibung,Typ,Stunden,Laufender Saldo";

/// Renders chronological rows as the localized CSV export.
///
/// Descriptions are always quoted with internal quotes doubled; durations
/// carry an explicit sign; the running balance is the one attached by the
/// chronological pass.
#[must_use]
pub fn render_export(rows: &[LedgerRow]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(EXPORT_HEADER);
    out.push('\n');

    for row in rows {
        let transaction = &row.transaction;
        let sign = match transaction.kind {
            TransactionKind::Earned => '+',
            TransactionKind::Spent => '-',
        };
        out.push_str(&format!(
            "{},\"{}\",{},{}{},{}\n",
            transaction.date.format("%d.%m.%Y"),
            transaction.description.replace('"', "\"\""),
            transaction.kind.label_de(),
            sign,
            transaction.minutes,
            row.running,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::balance::chronological_rows;
    use chrono::{TimeZone, Utc};
    use zeitsaldo_shared::types::{Minutes, TransactionId};

    #[test]
    fn test_import_with_english_headers() {
        let csv = "date,type,minutes,description\n\
                   2024-01-15,EARNED,90,Late shift\n\
                   2024-01-16,SPENT,30,Left early\n";

        let parsed = parse_import(csv).unwrap();
        assert_eq!(parsed.candidates.len(), 2);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.candidates[0].row, 1);
        assert_eq!(parsed.candidates[0].record.minutes, Minutes::new(90));
        assert_eq!(parsed.candidates[1].record.kind, TransactionKind::Spent);
    }

    #[test]
    fn test_import_with_german_headers_case_insensitive() {
        let csv = "Datum,Typ,Stunden,Beschreibung\n\
                   2024-01-15,EARNED,1.5,Nachtschicht\n";

        let parsed = parse_import(csv).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].record.minutes, Minutes::new(90));
        assert_eq!(parsed.candidates[0].record.description, "Nachtschicht");
    }

    #[test]
    fn test_invalid_rows_do_not_block_valid_rows() {
        let csv = "date,type,minutes,description\n\
                   2024-01-15,EARNED,90,ok\n\
                   15-01-2024,EARNED,90,bad date\n\
                   2024-01-17,EARNED,0,bad duration\n\
                   2024-01-18,SPENT,45,ok\n";

        let parsed = parse_import(csv).unwrap();
        assert_eq!(parsed.candidates.len(), 2);
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].row, 2);
        assert!(parsed.errors[0].reason.contains("YYYY-MM-DD"));
        assert_eq!(parsed.errors[1].row, 3);
        assert_eq!(
            [parsed.candidates[0].row, parsed.candidates[1].row],
            [1, 4]
        );
    }

    #[test]
    fn test_minutes_cell_takes_precedence_over_hours_cell() {
        let csv = "date,type,minutes,hours,description\n\
                   2024-01-15,EARNED,30,5.0,both populated\n";

        let parsed = parse_import(csv).unwrap();
        assert_eq!(parsed.candidates[0].record.minutes, Minutes::new(30));
    }

    #[test]
    fn test_non_integer_minutes_cell_rejected() {
        let csv = "date,type,minutes,description\n\
                   2024-01-15,EARNED,12.5,fractional minutes\n";

        let parsed = parse_import(csv).unwrap();
        assert!(parsed.candidates.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].reason.contains("positive"));
    }

    #[test]
    fn test_missing_duration_columns_reported_per_row() {
        let csv = "date,type,description\n\
                   2024-01-15,EARNED,no duration at all\n";

        let parsed = parse_import(csv).unwrap();
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].reason.contains("minutes or hours"));
    }

    #[test]
    fn test_header_only_payload_rejected() {
        let result = parse_import("date,type,minutes,description\n");
        assert!(matches!(result, Err(CsvImportError::Empty)));
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(matches!(parse_import(""), Err(CsvImportError::Empty)));
    }

    fn make_transaction(
        date: &str,
        kind: TransactionKind,
        minutes: i64,
        description: &str,
        created_offset_secs: i64,
    ) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            date: date.parse().unwrap(),
            kind,
            minutes: Minutes::new(minutes),
            description: description.to_string(),
            created_at: Utc.timestamp_opt(1_700_000_000 + created_offset_secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_export_format() {
        let transactions = vec![
            make_transaction("2024-01-01", TransactionKind::Earned, 480, "Release-Nacht", 0),
            make_transaction("2024-01-02", TransactionKind::Spent, 120, "Arzttermin", 1),
        ];

        let rendered = render_export(&chronological_rows(&transactions));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], EXPORT_HEADER);
        assert_eq!(lines[1], "01.01.2024,\"Release-Nacht\",Hinzugefügt,+8:00,8:00");
        assert_eq!(lines[2], "02.01.2024,\"Arzttermin\",Abgezogen,-2:00,6:00");
    }

    #[test]
    fn test_export_doubles_inner_quotes() {
        let transactions = vec![make_transaction(
            "2024-01-01",
            TransactionKind::Earned,
            60,
            "Projekt \"Atlas\"",
            0,
        )];

        let rendered = render_export(&chronological_rows(&transactions));
        assert!(rendered.contains("\"Projekt \"\"Atlas\"\"\""));
    }

    #[test]
    fn test_export_negative_running_balance() {
        let transactions = vec![make_transaction(
            "2024-01-01",
            TransactionKind::Spent,
            185,
            "Urlaub",
            0,
        )];

        let rendered = render_export(&chronological_rows(&transactions));
        assert!(rendered.contains("-3:05,-3:05"));
    }

    #[test]
    fn test_filter_date_range() {
        let transactions = vec![
            make_transaction("2024-01-01", TransactionKind::Earned, 60, "a", 0),
            make_transaction("2024-02-01", TransactionKind::Earned, 60, "b", 1),
            make_transaction("2024-03-01", TransactionKind::Earned, 60, "c", 2),
        ];

        let from = Some("2024-01-15".parse().unwrap());
        let to = Some("2024-02-15".parse().unwrap());
        let filtered = filter_date_range(&transactions, from, to);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].description, "b");

        assert_eq!(filter_date_range(&transactions, None, None).len(), 3);
        assert_eq!(filter_date_range(&transactions, from, None).len(), 2);
    }
}
