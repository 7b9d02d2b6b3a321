mod date;
mod dto;
mod error;
mod loader;
mod report;
mod stores;

pub use date::{DateFilter, LedgerDate, MonthKey};
pub use dto::{parse_amount, Transaction, CREDIT, DEBIT};
pub use error::{Error, Result};
pub use loader::{load_store, load_transactions, read_csv, read_json, write_csv};
pub use report::{run, Report, ReportFormat, ReportOptions};
pub use stores::{DominantType, Tally, TransactionStore};
