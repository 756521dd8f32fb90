//! # Fiado Ledger
//!
//! Process startup: opens the ledger and reports where it stands.
//!
//! ## Usage
//! ```bash
//! # Ledger in the platform data directory
//! fiado
//!
//! # Specify database path
//! fiado --db ./fiado_dev.db
//! ```
//!
//! ## Startup Sequence
//! ```text
//! 1. Initialize logging (RUST_LOG, default "info,fiado=debug,sqlx=warn")
//! 2. Resolve configuration and the database path
//! 3. Open the database, applying pending migrations
//! 4. Report first-run status (setup required or not)
//! 5. Log the global summary
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info, warn};

use fiado_app::commands::{admin, ledger};
use fiado_app::state::{AppConfig, SessionState};
use fiado_app::{default_database_path, init_tracing, open_database, StartupError};

#[tokio::main]
async fn main() -> ExitCode {
    let mut db_override: Option<PathBuf> = None;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_override = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fiado Ledger");
                println!();
                println!("Usage: fiado [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: platform data dir)");
                println!("  -h, --help         Show this help message");
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
        i += 1;
    }

    init_tracing();
    info!("Starting Fiado Ledger");

    match run(db_override).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Startup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(db_override: Option<PathBuf>) -> Result<(), StartupError> {
    let db_path = match db_override {
        Some(path) => path,
        None => default_database_path()?,
    };
    let config = AppConfig::default().with_database_path(db_path);

    let db = open_database(&config).await?;
    let (total, applied) = db.migration_status().await?;
    info!(total, applied, "Migration status");

    let session = SessionState::new();

    match admin::get_admin_state(&db, &session).await {
        Ok(status) if status.admin_name.is_none() => {
            warn!("First run: administrator setup required");
        }
        Ok(status) => {
            info!(admin = ?status.admin_name, state = ?status.state, "Administrator configured");
        }
        Err(e) => error!(code = ?e.code, "Could not read administrator settings: {}", e.message),
    }

    match ledger::get_global_summary(&db).await {
        Ok(summary) => info!(
            gross = %config.format_currency(summary.gross_total_cents),
            paid = %config.format_currency(summary.paid_total_cents),
            "Ledger summary"
        ),
        Err(e) => error!(code = ?e.code, "Could not compute summary: {}", e.message),
    }

    db.close().await;
    info!("Startup checks complete");
    Ok(())
}
