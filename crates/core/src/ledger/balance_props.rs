//! Property-based tests for balance and running-balance computation.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use zeitsaldo_shared::types::{Minutes, TransactionId};

use super::balance::{chronological_rows, total_balance, with_running_balance};
use super::types::{Transaction, TransactionKind};

/// Strategy for one transaction's raw ingredients.
fn ingredient() -> impl Strategy<Value = (i32, u32, u32, bool, i64)> {
    (2020_i32..2030, 1_u32..=12, 1_u32..=28, any::<bool>(), 1_i64..600)
}

/// Strategy for a snapshot with distinct creation timestamps, so that the
/// chronological order is fully determined by the data.
fn snapshot() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(ingredient(), 0..20).prop_map(|ingredients| {
        ingredients
            .into_iter()
            .enumerate()
            .map(|(index, (year, month, day, earned, minutes))| Transaction {
                id: TransactionId::new(),
                date: NaiveDate::from_ymd_opt(year, month, day).expect("valid test date"),
                kind: if earned {
                    TransactionKind::Earned
                } else {
                    TransactionKind::Spent
                },
                minutes: Minutes::new(minutes),
                description: format!("booking {index}"),
                created_at: Utc
                    .timestamp_opt(1_700_000_000 + index as i64, 0)
                    .unwrap(),
            })
            .collect()
    })
}

/// A snapshot together with a permutation of itself.
fn snapshot_with_permutation() -> impl Strategy<Value = (Vec<Transaction>, Vec<Transaction>)> {
    snapshot().prop_flat_map(|transactions| {
        let original = transactions.clone();
        (Just(original), Just(transactions).prop_shuffle())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The total balance equals the sum of signed contributions.
    #[test]
    fn prop_total_is_signed_sum(transactions in snapshot()) {
        let expected: Minutes = transactions
            .iter()
            .map(Transaction::signed_minutes)
            .sum();
        prop_assert_eq!(total_balance(&transactions).minutes, expected);
    }

    /// The total balance is independent of list order.
    #[test]
    fn prop_total_is_order_independent(
        (original, shuffled) in snapshot_with_permutation(),
    ) {
        prop_assert_eq!(
            total_balance(&original).minutes,
            total_balance(&shuffled).minutes
        );
    }

    /// The running balance of the chronologically-last transaction equals
    /// the total balance.
    #[test]
    fn prop_last_running_equals_total(transactions in snapshot()) {
        prop_assume!(!transactions.is_empty());

        let rows = chronological_rows(&transactions);
        prop_assert_eq!(
            rows.last().unwrap().running,
            total_balance(&transactions).minutes
        );
    }

    /// Each transaction keeps its running value no matter how the caller
    /// orders the snapshot for display.
    #[test]
    fn prop_running_values_survive_reordering(
        (original, shuffled) in snapshot_with_permutation(),
    ) {
        let mut by_id: std::collections::HashMap<_, _> = with_running_balance(&original)
            .into_iter()
            .map(|row| (row.transaction.id, row.running))
            .collect();

        for row in with_running_balance(&shuffled) {
            prop_assert_eq!(by_id.remove(&row.transaction.id), Some(row.running));
        }
        prop_assert!(by_id.is_empty());
    }

    /// Consecutive chronological rows differ by exactly the signed
    /// contribution of the later transaction.
    #[test]
    fn prop_running_chain_is_consistent(transactions in snapshot()) {
        let rows = chronological_rows(&transactions);

        let mut previous = Minutes::ZERO;
        for row in rows {
            prop_assert_eq!(row.running, previous + row.transaction.signed_minutes());
            previous = row.running;
        }
    }

    /// Attaching running balances never reorders the caller's list.
    #[test]
    fn prop_input_order_is_preserved(transactions in snapshot()) {
        let rows = with_running_balance(&transactions);
        prop_assert_eq!(rows.len(), transactions.len());
        for (row, transaction) in rows.iter().zip(&transactions) {
            prop_assert_eq!(row.transaction.id, transaction.id);
        }
    }
}
