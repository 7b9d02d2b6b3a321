//! In-memory transaction ledger with query and aggregation operations.
//!
//! The store keeps records in insertion order and only ever grows by
//! appending. Every query is a fresh linear scan over the current records:
//! - Bulk reads (all records, distinct types, descriptions)
//! - Sums and averages (overall, by calendar date, debits only)
//! - Filters (type, merchant, date range, amount range, before a date)
//! - Grouping by month and debit/credit comparison

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::date::{DateFilter, MonthKey};
use crate::dto::{Transaction, CREDIT, DEBIT};
use crate::error::{Error, Result};
use crate::stores::Tally;

/// Outcome of comparing debit and credit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantType {
    Debit,
    Credit,
    Equal,
}

impl fmt::Display for DominantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DominantType::Debit => DEBIT,
            DominantType::Credit => CREDIT,
            DominantType::Equal => "equal",
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        log::debug!("creating store with {} transactions", transactions.len());
        Self { transactions }
    }

    /// Appends a record. No validation or duplicate check is performed.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        log::debug!("appending transaction {}", transaction.transaction_id);
        self.transactions.push(transaction);
    }

    pub fn all_transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn unique_transaction_types(&self) -> HashSet<&str> {
        self.transactions
            .iter()
            .map(|t| t.transaction_type.as_str())
            .collect()
    }

    /// One description per record, in store order, duplicates included.
    pub fn transaction_descriptions(&self) -> Vec<&str> {
        self.transactions
            .iter()
            .map(|t| t.transaction_description.as_str())
            .collect()
    }

    /// Sum of all amounts. `0.0` for an empty store; `NaN` if any amount
    /// failed to parse.
    pub fn total_amount(&self) -> f64 {
        sum_amounts(self.transactions.iter())
    }

    pub fn total_amount_by_date(&self, filter: DateFilter) -> f64 {
        sum_amounts(
            self.transactions
                .iter()
                .filter(|t| filter.matches(&t.transaction_date)),
        )
    }

    /// Mean amount. An empty store yields `NaN` (0 / 0) rather than an error.
    pub fn average_transaction_amount(&self) -> f64 {
        self.total_amount() / self.transactions.len() as f64
    }

    pub fn total_debit_amount(&self) -> f64 {
        sum_amounts(self.transactions.iter().filter(|t| t.is_debit()))
    }

    pub fn transactions_by_type(&self, tx_type: &str) -> Vec<&Transaction> {
        self.select(|t| t.transaction_type == tx_type)
    }

    /// Records dated within `start..=end`. Invalid dates never match.
    pub fn transactions_in_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<&Transaction> {
        self.select(|t| {
            t.transaction_date
                .as_naive()
                .is_some_and(|date| start <= date && date <= end)
        })
    }

    pub fn transactions_by_merchant(&self, merchant: &str) -> Vec<&Transaction> {
        self.select(|t| t.merchant_name == merchant)
    }

    /// Records with `min <= amount <= max`. `NaN` amounts never match.
    pub fn transactions_by_amount_range(&self, min: f64, max: f64) -> Vec<&Transaction> {
        self.select(|t| min <= t.transaction_amount && t.transaction_amount <= max)
    }

    /// Records dated strictly before `date`. Invalid dates never match.
    pub fn transactions_before_date(&self, date: NaiveDate) -> Vec<&Transaction> {
        self.select(|t| t.transaction_date.as_naive().is_some_and(|d| d < date))
    }

    /// First record in store order with the given id.
    pub fn find_transaction_by_id(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.transaction_id == id)
    }

    /// Month with the most records; ties go to the month seen first.
    /// Records with invalid dates are not grouped.
    pub fn most_transactions_month(&self) -> Result<MonthKey> {
        busiest_month(self.transactions.iter()).ok_or(Error::EmptyStore {
            operation: "most transactions month",
        })
    }

    /// Same as [`Self::most_transactions_month`], over debit records only.
    /// A store with records but no dated debits also yields
    /// [`Error::EmptyStore`].
    pub fn most_debit_transactions_month(&self) -> Result<MonthKey> {
        busiest_month(self.transactions.iter().filter(|t| t.is_debit())).ok_or(
            Error::EmptyStore {
                operation: "most debit transactions month",
            },
        )
    }

    /// Compares debit and credit counts. Other types are ignored.
    pub fn most_transaction_types(&self) -> DominantType {
        let mut debits = 0usize;
        let mut credits = 0usize;
        for t in &self.transactions {
            if t.is_debit() {
                debits += 1;
            } else if t.is_credit() {
                credits += 1;
            }
        }
        match debits.cmp(&credits) {
            Ordering::Greater => DominantType::Debit,
            Ordering::Less => DominantType::Credit,
            Ordering::Equal => DominantType::Equal,
        }
    }

    fn select<F>(&self, predicate: F) -> Vec<&Transaction>
    where
        F: Fn(&Transaction) -> bool,
    {
        self.transactions.iter().filter(|t| predicate(t)).collect()
    }
}

fn sum_amounts<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> f64 {
    transactions.map(|t| t.transaction_amount).sum()
}

fn busiest_month<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Option<MonthKey> {
    transactions
        .filter_map(|t| t.transaction_date.month_key())
        .collect::<Tally<_>>()
        .most_frequent()
        .copied()
}

impl FromIterator<Transaction> for TransactionStore {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Transaction> for TransactionStore {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        for transaction in iter {
            self.add_transaction(transaction);
        }
    }
}
