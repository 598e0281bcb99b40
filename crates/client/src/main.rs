//! Skirmish encounter runner.
//!
//! Loads an encounter from a data directory, lets the configured providers
//! fight it out, and prints every event to stdout as a JSON line.
//!
//! # Configuration
//!
//! - `SKIRMISH_DATA_DIR`: content directory (defaults to the bundled `data/`)
//! - `SKIRMISH_TURN_SECS`, `SKIRMISH_TIMEOUT_ACTION`, `SKIRMISH_SEED`,
//!   `SKIRMISH_EQUIPMENT`: override `config.toml`
//! - `RUST_LOG`: log filter for stderr
//!
//! ```bash
//! SKIRMISH_SEED=7 cargo run -p skirmish-cli
//! ```

use std::path::PathBuf;

use anyhow::Result;
use skirmish_cli::{Client, logging};

const DATA_DIR_ENV: &str = "SKIRMISH_DATA_DIR";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::setup_logging()?;

    let data_dir = std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")));
    tracing::info!(data_dir = %data_dir.display(), "Starting skirmish");

    let client = Client::builder().data_dir(data_dir).build().await?;

    let mut stdout = std::io::stdout().lock();
    let summary = client.run(&mut stdout).await?;

    tracing::info!(
        reason = %summary.reason,
        survivors = summary.survivors.len(),
        "Skirmish complete"
    );
    Ok(())
}
