use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::Parser;
use rusty_tally::{run, DateFilter, ReportFormat, ReportOptions};

#[derive(Parser, Debug)]
#[command(name = "rusty-tally", version)]
#[command(about = "Query and summarise a ledger of financial transactions", long_about = None)]
struct Args {
    /// Transaction file (.json or .csv)
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// List transactions of this type
    #[arg(long = "type", value_name = "TYPE")]
    transaction_type: Option<String>,

    /// List transactions from this merchant
    #[arg(long)]
    merchant: Option<String>,

    /// Start of an inclusive date range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// End of an inclusive date range (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// List transactions dated strictly before this date (YYYY-MM-DD)
    #[arg(long)]
    before: Option<NaiveDate>,

    /// Lower bound of an inclusive amount range
    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,

    /// Upper bound of an inclusive amount range
    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,

    /// Look up a transaction by id
    #[arg(long)]
    id: Option<String>,

    /// Year for the by-date total
    #[arg(long)]
    year: Option<i32>,

    /// Month (1-12) for the by-date total
    #[arg(long)]
    month: Option<u32>,

    /// Day of month for the by-date total
    #[arg(long)]
    day: Option<u32>,
}

impl Args {
    fn report_options(&self) -> ReportOptions {
        let amount_range = match (self.min, self.max) {
            (None, None) => None,
            (min, max) => Some((
                min.unwrap_or(f64::NEG_INFINITY),
                max.unwrap_or(f64::INFINITY),
            )),
        };
        ReportOptions {
            transaction_type: self.transaction_type.clone(),
            merchant: self.merchant.clone(),
            date_range: self.from.zip(self.to),
            before: self.before,
            amount_range,
            transaction_id: self.id.clone(),
            date_filter: DateFilter::from_parts(self.year, self.month, self.day),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(err) = run_app() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run_app() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    log::debug!("{:?}", args);
    run(&args.input, &args.report_options(), args.format, io::stdout().lock())?;
    Ok(())
}
