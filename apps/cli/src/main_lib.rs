use std::sync::Arc;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pumpdesk_client::LedgerApiClient;
use pumpdesk_core::{
    BankTransaction, CustomerTransaction, EntityKind, LedgerOutcome, LedgerQuery, LedgerRecord,
    LedgerReport, LedgerStore, LedgerStoreOptions, SupplierTransaction, TankTransaction,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};
use crate::output::OutputFormat;

/// Ledger reports for the pumpdesk fuel station back office.
#[derive(Parser, Debug)]
#[command(name = "pumpdesk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute an entity's ledger with running balances over a date range
    Ledger(LedgerArgs),
}

#[derive(Args, Debug)]
pub struct LedgerArgs {
    /// Which kind of ledger to compute
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Backend id of the bank account, tank, supplier or customer
    pub id: String,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,

    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: NaiveDate,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also report true before-range and till-date totals
    #[arg(long)]
    pub prior_totals: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    BankAccount,
    Tank,
    Supplier,
    Customer,
}

impl From<EntityArg> for EntityKind {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::BankAccount => EntityKind::BankAccount,
            EntityArg::Tank => EntityKind::Tank,
            EntityArg::Supplier => EntityKind::Supplier,
            EntityArg::Customer => EntityKind::Customer,
        }
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Runs one ledger report against the configured backend.
pub async fn run_ledger(config: &Config, args: &LedgerArgs) -> anyhow::Result<LedgerReport> {
    let client = Arc::new(LedgerApiClient::new(&config.client_config())?);
    let options = LedgerStoreOptions {
        include_prior_totals: args.prior_totals || config.prior_totals,
    };
    let query = LedgerQuery::new(args.from, args.to);
    let kind = EntityKind::from(args.entity);

    tracing::info!(
        "Computing {} ledger for {} from {} to {}",
        kind,
        args.id,
        args.from,
        args.to
    );

    match kind {
        EntityKind::BankAccount => {
            compute::<BankTransaction>(client, options, &args.id, query).await
        }
        EntityKind::Tank => compute::<TankTransaction>(client, options, &args.id, query).await,
        EntityKind::Supplier => {
            compute::<SupplierTransaction>(client, options, &args.id, query).await
        }
        EntityKind::Customer => {
            compute::<CustomerTransaction>(client, options, &args.id, query).await
        }
    }
}

async fn compute<R: LedgerRecord>(
    client: Arc<LedgerApiClient>,
    options: LedgerStoreOptions,
    entity_id: &str,
    query: LedgerQuery,
) -> anyhow::Result<LedgerReport> {
    let store = LedgerStore::<R>::new(client, options);

    match store.compute_ledger(entity_id, query).await {
        LedgerOutcome::Applied(report) => Ok(report),
        LedgerOutcome::Failed(message) => Err(anyhow!(message)),
        LedgerOutcome::Superseded => Err(anyhow!("ledger request was superseded")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_ledger_command() {
        let cli = Cli::try_parse_from([
            "pumpdesk",
            "ledger",
            "bank-account",
            "42",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--format",
            "csv",
            "--prior-totals",
        ])
        .unwrap();

        let Command::Ledger(args) = cli.command;
        assert_eq!(args.entity, EntityArg::BankAccount);
        assert_eq!(EntityKind::from(args.entity), EntityKind::BankAccount);
        assert_eq!(args.id, "42");
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(args.format, OutputFormat::Csv);
        assert!(args.prior_totals);
    }

    #[test]
    fn test_defaults_to_text_output() {
        let cli = Cli::try_parse_from([
            "pumpdesk", "ledger", "tank", "7", "--from", "2024-03-01", "--to", "2024-03-31",
        ])
        .unwrap();

        let Command::Ledger(args) = cli.command;
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.prior_totals);
    }

    #[test]
    fn test_rejects_bad_dates_and_entities() {
        assert!(Cli::try_parse_from([
            "pumpdesk", "ledger", "tank", "7", "--from", "01/03/2024", "--to", "2024-03-31",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "pumpdesk", "ledger", "pump", "7", "--from", "2024-03-01", "--to", "2024-03-31",
        ])
        .is_err());
    }
}
