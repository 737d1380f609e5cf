mod config;
mod main_lib;
mod output;

use clap::Parser;
use config::Config;
use main_lib::{init_tracing, run_ledger, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    match cli.command {
        Command::Ledger(args) => {
            let report = run_ledger(&config, &args).await?;
            let stdout = std::io::stdout();
            output::render(&report, args.format, stdout.lock())?;
        }
    }
    Ok(())
}
