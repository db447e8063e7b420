//! CLI tool for the card form.
//!
//! # Usage
//!
//! ```bash
//! # List fields, labels and selector options
//! cardform fields
//!
//! # Check one field the way the form does while typing
//! cardform check-field cvc 12a
//!
//! # Check a whole record the way the form does on submit
//! cardform check --card-number 4444555566667777 --cvc 123 --name "John Doe" \
//!     --month January --year 2020
//!
//! # Fill a form and submit it to the in-memory store
//! cardform submit --card-number 4444555566667777 --cvc 123 --name "John Doe" \
//!     --month January --year 2020 --latency-ms 500
//!
//! # Print generated sample records
//! cardform sample --count 3
//! ```

use std::time::Duration;

use card_form::catalog::{ACCEPTED_BRANDS, EXPIRATION_LABEL, PAY_LABEL};
use card_form::generate::generate_records;
use card_form::{
    validate_field, ExpirationPart, FormController, FormError, FormOptions, Record, SubmitError,
    TextField, TransactionStore, ValidationMode,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardform")]
#[command(author, version, about = "Payment card form validation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the field catalog
    Fields,

    /// Check a single text field value as typed
    CheckField {
        /// Field id: card_number, cvc or card_holder_name
        field: String,

        /// Value to check
        value: String,
    },

    /// Check a complete record with the submit-time rules
    Check {
        #[command(flatten)]
        record: RecordArgs,

        /// Report every failing field instead of the first one
        #[arg(short, long)]
        all: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Fill a form and submit it to an in-memory transaction store
    Submit {
        #[command(flatten)]
        record: RecordArgs,

        /// Simulated sink latency in milliseconds
        #[arg(short, long, default_value = "2000")]
        latency_ms: u64,
    },

    /// Print randomly generated valid records (for testing only)
    Sample {
        /// Number of records to generate
        #[arg(short, long, default_value = "1")]
        count: usize,
    },
}

#[derive(Args)]
struct RecordArgs {
    /// Card number
    #[arg(long, default_value = "")]
    card_number: String,

    /// Card verification code
    #[arg(long, default_value = "")]
    cvc: String,

    /// Card holder name
    #[arg(long, default_value = "")]
    name: String,

    /// Expiration month name
    #[arg(long, default_value = "")]
    month: String,

    /// Expiration year
    #[arg(long, default_value = "")]
    year: String,
}

impl RecordArgs {
    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.card_number = self.card_number.clone();
        record.cvc = self.cvc.clone();
        record.card_holder_name = self.name.clone();
        record.expiration.month = self.month.clone();
        record.expiration.year = self.year.clone();
        record
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fields => cmd_fields(),
        Commands::CheckField { field, value } => cmd_check_field(&field, &value),
        Commands::Check {
            record,
            all,
            output,
        } => cmd_check(&record, all, output),
        Commands::Submit { record, latency_ms } => cmd_submit(&record, latency_ms).await,
        Commands::Sample { count } => cmd_sample(count),
    }
}

fn cmd_fields() {
    println!("Accepted: {}", ACCEPTED_BRANDS.join(", "));
    println!();
    for field in TextField::ALL {
        println!("{} ({})", field.label(), field.id());
        println!("  Placeholder: {}", field.placeholder());
        println!("  Max Length: {}", field.max_length());
        println!("  Message: {}", field.error_message());
    }
    println!("{}", EXPIRATION_LABEL);
    for part in ExpirationPart::ALL {
        println!("  {}: {}", part.id(), part.options().join(", "));
    }
    println!("Button: {}", PAY_LABEL);
}

fn cmd_check_field(field: &str, value: &str) {
    let field: TextField = match field.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if validate_field(field, value) {
        println!("Flagged: yes");
        println!("Message: {}", field.error_message());
        std::process::exit(1);
    }
    println!("Flagged: no");
}

fn cmd_check(args: &RecordArgs, all: bool, output: OutputFormat) {
    let record = args.to_record();
    let mode = if all {
        ValidationMode::AllFailures
    } else {
        ValidationMode::FirstFailure
    };
    let report = card_form::validate::validate_record_with(&record, mode);

    match output {
        OutputFormat::Text => {
            println!("Valid: {}", if report.is_valid() { "yes" } else { "no" });
            for failure in report.failures() {
                println!("  {}: {}", failure.field, failure.error);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        },
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
}

/// Builds a form holding the values given on the command line.
///
/// Values are taken whole, so over-long input fails validation instead of
/// being truncated.
fn fill_form(
    args: &RecordArgs,
    store: TransactionStore,
) -> Result<FormController<TransactionStore>, FormError> {
    let mut form = FormController::with_options(store, FormOptions::whole_values());

    form.on_field_edit(TextField::CardNumber, args.card_number.as_str());
    form.on_field_edit(TextField::Cvc, args.cvc.as_str());
    form.on_field_edit(TextField::CardHolderName, args.name.as_str());
    form.on_expiration_edit(ExpirationPart::Month, args.month.as_str())?;
    form.on_expiration_edit(ExpirationPart::Year, args.year.as_str())?;
    Ok(form)
}

async fn cmd_submit(args: &RecordArgs, latency_ms: u64) {
    let store = TransactionStore::with_latency(Duration::from_millis(latency_ms));
    let mut form = match fill_form(args, store.clone()) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    match form.submit().await {
        Ok(receipt) => {
            println!("Submitted: yes");
            println!("Sequence: {}", receipt.sequence);
            for summary in store.summaries() {
                println!(
                    "  #{} {} {} ({})",
                    summary.sequence,
                    summary.card_number,
                    summary.card_holder_name,
                    summary.expiration
                );
            }
        }
        Err(SubmitError::Invalid(report)) => {
            println!("Submitted: no");
            for failure in report.failures() {
                let key = failure.field;
                println!(
                    "  {}: {}{}",
                    key,
                    failure.error,
                    key.error_message()
                        .map(|m| format!(" ({})", m))
                        .unwrap_or_default()
                );
            }
            std::process::exit(1);
        }
        Err(e) => {
            println!("Submitted: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_sample(count: usize) {
    for record in generate_records(count) {
        println!(
            "{} {} {} {} {}",
            record.card_number,
            record.cvc,
            record.card_holder_name,
            record.expiration.month,
            record.expiration.year
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_form::{FieldKey, RecordError};

    fn args(card_number: &str) -> RecordArgs {
        RecordArgs {
            card_number: card_number.into(),
            cvc: "123".into(),
            name: "John Doe".into(),
            month: "January".into(),
            year: "2020".into(),
        }
    }

    #[tokio::test]
    async fn test_submit_accepts_valid_record() {
        let store = TransactionStore::with_latency(Duration::ZERO);
        let mut form = fill_form(&args("4444555566667777"), store.clone()).unwrap();
        assert!(form.submit().await.is_ok());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_refuses_over_long_card_number() {
        let store = TransactionStore::with_latency(Duration::ZERO);
        let mut form = fill_form(&args("44445555666677778888"), store.clone()).unwrap();

        match form.submit().await {
            Err(SubmitError::Invalid(report)) => assert_eq!(
                report.error(FieldKey::CardNumber),
                Some(&RecordError::WrongLength {
                    length: 20,
                    expected: 16
                })
            ),
            other => panic!("Expected Invalid, got {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_month_is_refused() {
        let mut bad = args("4444555566667777");
        bad.month = "Smarch".into();
        let store = TransactionStore::with_latency(Duration::ZERO);
        assert!(fill_form(&bad, store).is_err());
    }

    #[test]
    fn test_check_uses_all_fields() {
        let record = args("1").to_record();
        assert_eq!(record.card_number, "1");
        assert_eq!(record.expiration.year, "2020");
    }
}
