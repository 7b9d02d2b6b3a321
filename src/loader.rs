//! Dataset loading and CSV output.
//!
//! The initial ledger is read once, before a store is built. JSON input is a
//! single array of objects; CSV input has a header row with the same field
//! names.

use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::{Transaction, TransactionStore};

/// Reads transactions from `path`, picking the format by file extension.
pub fn load_transactions<P>(path: P) -> Result<Vec<Transaction>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let transactions = match extension.as_deref() {
        Some("json") => read_json(BufReader::new(File::open(path)?))?,
        Some("csv") => read_csv(File::open(path)?)?,
        _ => return Err(Error::UnsupportedFormat(path.to_owned())),
    };
    log::info!(
        "loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

/// Loads a dataset and wraps it in a fresh store.
pub fn load_store<P>(path: P) -> Result<TransactionStore>
where
    P: AsRef<Path>,
{
    load_transactions(path).map(TransactionStore::new)
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize()
        .collect::<csv::Result<_>>()?;
    Ok(transactions)
}

/// Writes an iterator of records to a CSV writer.
/// Each record must implement Serialize.
pub fn write_csv<T, W>(writer: W, records: impl Iterator<Item = T>) -> csv::Result<()>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LedgerDate;

    fn assert_sample_ledger(transactions: &[Transaction]) {
        assert_eq!(transactions.len(), 8);
        let first = &transactions[0];
        assert_eq!(first.transaction_id, "1");
        assert_eq!(first.transaction_date, LedgerDate::from("2019-01-01"));
        assert_eq!(first.transaction_amount, 100.0);
        assert_eq!(first.transaction_type, "debit");
        assert_eq!(first.transaction_description, "Groceries");
        assert_eq!(first.merchant_name, "SuperMart");
        assert_eq!(first.card_type, "Visa");
        assert_eq!(transactions[7].transaction_id, "3");
    }

    #[test]
    fn test_load_json() -> Result<()> {
        let transactions = load_transactions("data/transactions.json")?;
        assert_sample_ledger(&transactions);
        Ok(())
    }

    #[test]
    fn test_load_csv() -> Result<()> {
        let transactions = load_transactions("data/transactions.csv")?;
        assert_sample_ledger(&transactions);
        Ok(())
    }

    #[test]
    fn test_json_and_csv_agree() -> Result<()> {
        let json = load_transactions("data/transactions.json")?;
        let csv = load_transactions("data/transactions.csv")?;
        assert_eq!(json, csv);
        Ok(())
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_transactions("data/transactions.txt"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_transactions("data/does_not_exist.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = read_json(r#"{"transaction_id": "1"}"#.as_bytes());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_read_json_lenient_values() -> Result<()> {
        let transactions = read_json(
            r#"[{"transaction_id": "x", "transaction_date": "soon", "transaction_amount": "n/a"}]"#
                .as_bytes(),
        )?;
        assert_eq!(transactions.len(), 1);
        assert!(!transactions[0].transaction_date.is_valid());
        assert!(transactions[0].transaction_amount.is_nan());
        Ok(())
    }

    #[test]
    fn test_odd_values_do_not_fail_the_load() -> Result<()> {
        let transactions = read_json(
            r#"[
                {"transaction_id": "a", "transaction_date": 20190101, "transaction_amount": [1]},
                {"transaction_id": "b", "transaction_date": "2019-01-02", "transaction_amount": "5"}
            ]"#
            .as_bytes(),
        )?;
        assert_eq!(transactions.len(), 2);
        assert!(!transactions[0].transaction_date.is_valid());
        assert!(transactions[0].transaction_amount.is_nan());
        assert_eq!(transactions[1].transaction_amount, 5.0);

        let transactions = read_csv(
            "transaction_id,transaction_date,transaction_amount,transaction_type\n\
             c,2019-01-03,123456789012345678901234,debit\n"
                .as_bytes(),
        )?;
        assert_eq!(transactions.len(), 1);
        assert!(transactions[0].transaction_amount > 1e23);
        Ok(())
    }

    #[test]
    fn test_write_csv() -> csv::Result<()> {
        let records = vec![
            Transaction::new("1", "2019-01-01", 100.0, "debit").with_merchant("SuperMart"),
            Transaction::new("2", "bad-date", 2.5, "credit"),
        ];
        let mut output = Vec::new();
        write_csv(&mut output, records.iter())?;

        let expected = "transaction_id,transaction_date,transaction_amount,transaction_type,\
transaction_description,merchant_name,card_type
1,2019-01-01,100.0,debit,,SuperMart,
2,bad-date,2.5,credit,,,
";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
        Ok(())
    }

    #[test]
    fn test_load_store() -> Result<()> {
        let store = load_store("data/transactions.json")?;
        assert_eq!(store.len(), 8);
        Ok(())
    }
}
