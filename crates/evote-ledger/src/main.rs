//! eVoteLedger: wallet session and ballot submission from the command line

mod app;
mod fixtures;

use clap::Parser;
use evote_ledger_adapters::EvoteAdapterConfig;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = app::Cli::parse();
    let command = cli.command.unwrap_or(app::Command::Status);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting eVoteLedger");

    let app = app::App::new(EvoteAdapterConfig::from_env());
    if let Err(e) = app.run(command).await {
        app::show(&e.notice());
        return Err(e.into());
    }
    Ok(())
}
