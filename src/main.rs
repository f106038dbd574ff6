mod api;
mod artifacts;
mod attachments;
mod cli;
mod config;
mod error;
mod model;
mod translate;
mod util;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the user-facing progress lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = cli::run(cli).await {
        let code = error::exit_code_for(&err);
        eprintln!("Error: {err:#}");
        tracing::debug!(exit_code = code, "exiting");
        std::process::exit(code);
    }
}
