//! Entry point for kilo, a terminal support agent that answers questions and
//! runs local tools on the model's behalf.
//!
//! Loads `.env`, parses CLI arguments via [`cli`], installs file logging and
//! dispatches to the chosen surface.

mod agent;
mod chat;
mod cli;
mod config;
mod constants;
mod format;
mod gateway;
mod logging;
mod output;
mod provider;
mod tools;
mod transcript;
mod tui;

use anyhow::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    let _guard = logging::init(cli.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting kilo");
    cli::run(cli).await
}
