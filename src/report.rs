use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::{
    date::DateFilter,
    error::Result,
    loader::{load_store, write_csv},
    Transaction, TransactionStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON summary
    Json,
    /// Every stored transaction as CSV
    Csv,
}

/// Parameters for the parameterised queries. A query whose parameter is not
/// set is left out of the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOptions {
    pub transaction_type: Option<String>,
    pub merchant: Option<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub before: Option<NaiveDate>,
    pub amount_range: Option<(f64, f64)>,
    pub transaction_id: Option<String>,
    pub date_filter: DateFilter,
}

#[derive(Debug, Serialize)]
pub struct Selection<'a> {
    pub criteria: String,
    pub transactions: Vec<&'a Transaction>,
}

#[derive(Debug, Serialize)]
pub struct Lookup<'a> {
    pub transaction_id: String,
    pub transaction: Option<&'a Transaction>,
}

#[derive(Debug, Serialize)]
pub struct DateTotal {
    pub filter: String,
    pub total: f64,
}

/// Results of every store query, ready to be rendered.
/// `NaN` values are written as `null` in JSON.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub transaction_count: usize,
    pub unique_transaction_types: Vec<&'a str>,
    pub transaction_descriptions: Vec<&'a str>,
    pub total_amount: f64,
    pub total_debit_amount: f64,
    pub average_transaction_amount: f64,
    pub total_amount_by_date: DateTotal,
    pub most_transactions_month: Option<String>,
    pub most_debit_transactions_month: Option<String>,
    pub most_transaction_types: String,
    pub transactions_by_type: Option<Selection<'a>>,
    pub transactions_by_merchant: Option<Selection<'a>>,
    pub transactions_in_date_range: Option<Selection<'a>>,
    pub transactions_before_date: Option<Selection<'a>>,
    pub transactions_by_amount_range: Option<Selection<'a>>,
    pub transaction_by_id: Option<Lookup<'a>>,
}

impl<'a> Report<'a> {
    pub fn build(store: &'a TransactionStore, options: &ReportOptions) -> Self {
        // Distinct types have no inherent order; sort them for stable output.
        let mut unique_transaction_types: Vec<_> =
            store.unique_transaction_types().into_iter().collect();
        unique_transaction_types.sort_unstable();

        let most_transactions_month = store
            .most_transactions_month()
            .map(|month| month.to_string())
            .map_err(|err| log::warn!("{}", err))
            .ok();
        let most_debit_transactions_month = store
            .most_debit_transactions_month()
            .map(|month| month.to_string())
            .map_err(|err| log::warn!("{}", err))
            .ok();

        Self {
            transaction_count: store.len(),
            unique_transaction_types,
            transaction_descriptions: store.transaction_descriptions(),
            total_amount: store.total_amount(),
            total_debit_amount: store.total_debit_amount(),
            average_transaction_amount: store.average_transaction_amount(),
            total_amount_by_date: DateTotal {
                filter: options.date_filter.to_string(),
                total: store.total_amount_by_date(options.date_filter),
            },
            most_transactions_month,
            most_debit_transactions_month,
            most_transaction_types: store.most_transaction_types().to_string(),
            transactions_by_type: options.transaction_type.as_deref().map(|tx_type| Selection {
                criteria: format!("type = {}", tx_type),
                transactions: store.transactions_by_type(tx_type),
            }),
            transactions_by_merchant: options.merchant.as_deref().map(|merchant| Selection {
                criteria: format!("merchant = {}", merchant),
                transactions: store.transactions_by_merchant(merchant),
            }),
            transactions_in_date_range: options.date_range.map(|(start, end)| Selection {
                criteria: format!("{} <= date <= {}", start, end),
                transactions: store.transactions_in_date_range(start, end),
            }),
            transactions_before_date: options.before.map(|date| Selection {
                criteria: format!("date < {}", date),
                transactions: store.transactions_before_date(date),
            }),
            transactions_by_amount_range: options.amount_range.map(|(min, max)| Selection {
                criteria: format!("{} <= amount <= {}", min, max),
                transactions: store.transactions_by_amount_range(min, max),
            }),
            transaction_by_id: options.transaction_id.as_deref().map(|id| Lookup {
                transaction_id: id.to_string(),
                transaction: store.find_transaction_by_id(id),
            }),
        }
    }

    pub fn render_text<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "Transactions: {}", self.transaction_count)?;
        writeln!(
            writer,
            "Unique transaction types: {}",
            self.unique_transaction_types.join(", ")
        )?;
        writeln!(
            writer,
            "Descriptions: {}",
            self.transaction_descriptions.join(", ")
        )?;
        writeln!(writer, "Total amount: {:.2}", self.total_amount)?;
        writeln!(writer, "Total debit amount: {:.2}", self.total_debit_amount)?;
        writeln!(
            writer,
            "Average transaction amount: {:.2}",
            self.average_transaction_amount
        )?;
        writeln!(
            writer,
            "Total amount for {}: {:.2}",
            self.total_amount_by_date.filter, self.total_amount_by_date.total
        )?;
        writeln!(
            writer,
            "Month with most transactions: {}",
            self.most_transactions_month.as_deref().unwrap_or("n/a")
        )?;
        writeln!(
            writer,
            "Month with most debit transactions: {}",
            self.most_debit_transactions_month.as_deref().unwrap_or("n/a")
        )?;
        writeln!(
            writer,
            "Most common transaction type: {}",
            self.most_transaction_types
        )?;

        for selection in [
            &self.transactions_by_type,
            &self.transactions_by_merchant,
            &self.transactions_in_date_range,
            &self.transactions_before_date,
            &self.transactions_by_amount_range,
        ]
        .into_iter()
        .flatten()
        {
            writeln!(
                writer,
                "Transactions where {}: {}",
                selection.criteria,
                selection.transactions.len()
            )?;
            for transaction in &selection.transactions {
                write_transaction_line(&mut writer, transaction)?;
            }
        }

        if let Some(lookup) = &self.transaction_by_id {
            match lookup.transaction {
                Some(transaction) => {
                    writeln!(writer, "Transaction {}:", lookup.transaction_id)?;
                    write_transaction_line(&mut writer, transaction)?;
                }
                None => writeln!(writer, "Transaction {}: not found", lookup.transaction_id)?,
            }
        }
        Ok(())
    }

    pub fn render_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

fn write_transaction_line<W: Write>(writer: &mut W, t: &Transaction) -> std::io::Result<()> {
    writeln!(
        writer,
        "  {} | {} | {:.2} | {} | {} | {}",
        t.transaction_id,
        t.transaction_date,
        t.transaction_amount,
        t.transaction_type,
        t.merchant_name,
        t.transaction_description
    )
}

/// Loads the ledger at `input_path` and writes a report to `writer`.
///
/// # Errors
/// Returns an error if:
/// * The input file cannot be read or has an unknown extension
/// * The JSON or CSV is malformed
/// * Writing to the output fails
pub fn run<P, W>(
    input_path: P,
    options: &ReportOptions,
    format: ReportFormat,
    mut writer: W,
) -> Result<()>
where
    P: AsRef<Path>,
    W: Write,
{
    let store = load_store(input_path)?;

    match format {
        ReportFormat::Text => Report::build(&store, options).render_text(&mut writer)?,
        ReportFormat::Json => {
            Report::build(&store, options).render_json(&mut writer)?;
            writeln!(writer)?;
        }
        ReportFormat::Csv => write_csv(&mut writer, store.all_transactions().iter())?,
    }
    Ok(())
}
