//! # Fiado App Library
//!
//! The command surface of the fiado ledger, plus the startup helpers the
//! `fiado` binary uses. A presentation shell links against this crate and
//! calls [`commands`] directly.
//!
//! ## Module Organization
//! ```text
//! fiado_app/
//! ├── lib.rs          ◄─── You are here (startup helpers)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Login state and current selection
//! │   └── config.rs   ◄─── Application configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── client.rs   ◄─── Client search/add/delete
//! │   ├── product.rs  ◄─── Product search/add/delete, sale quotes
//! │   ├── sale.rs     ◄─── Sale entry and deletion
//! │   ├── payment.rs  ◄─── Credit payments
//! │   ├── admin.rs    ◄─── Setup, login, settings, factory reset
//! │   ├── ledger.rs   ◄─── Balances and extracts
//! │   └── export.rs   ◄─── Backup document
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! Each command takes only the state it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │    Database      │ │   SessionState   │ │     AppConfig        │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • SQLite pool   │ │  • Admin login   │ │  • Database path     │   │
//! │  │  • Repositories  │ │  • Selected      │ │  • Reset phrase      │   │
//! │  │                  │ │    client/product│ │  • Export prefix     │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fiado_db::{Database, DbConfig, DbError};
use state::AppConfig;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,fiado=debug,sqlx=warn";

/// Errors that stop the process before the ledger is usable.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The platform reports no per-user data directory.
    #[error("could not determine app data directory")]
    NoDataDir,

    #[error("could not create data directory: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fiado_db=trace` - Trace the store only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves the platform data directory path for the ledger file.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.fiado.ledger/fiado.db`
/// - **Windows**: `%APPDATA%\fiado\ledger\data\fiado.db`
/// - **Linux**: `~/.local/share/ledger/fiado.db`
pub fn default_database_path() -> Result<PathBuf, StartupError> {
    let proj_dirs = ProjectDirs::from("com", "fiado", "ledger").ok_or(StartupError::NoDataDir)?;
    Ok(proj_dirs.data_dir().join(state::config::DATABASE_FILE))
}

/// Opens the ledger named by `config`, creating its directory and applying
/// pending migrations.
pub async fn open_database(config: &AppConfig) -> Result<Database, StartupError> {
    let path = config.database_path.clone();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    info!(?path, "Opening ledger database");
    let db = Database::new(DbConfig::new(path)).await?;
    info!("Database connected and migrations applied");

    Ok(db)
}
