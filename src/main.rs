//! Entry point: wires configuration, logging, and the shared API client,
//! then hands the terminal to the application model.

use std::sync::Mutex;

use bubbletea_rs::Program;
use tracing_subscriber::EnvFilter;

use userdeck::api::{self, ApiClient};
use userdeck::app::App;
use userdeck::config::Config;

/// Log destination. Stdout belongs to the TUI, so diagnostics go to a
/// file next to the binary.
const LOG_FILE: &str = "userdeck.log";

fn init_logging() {
    let filter = EnvFilter::try_from_env("USERDECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("userdeck=info"));
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
    else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_logging();

    let config = Config::from_env();
    tracing::info!(base_url = %config.base_url, "starting userdeck");
    api::install(ApiClient::new(&config)?);

    let program = Program::<App>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()?;
    program.run().await?;
    Ok(())
}
