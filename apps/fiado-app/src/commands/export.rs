//! # Export Commands
//!
//! Backup of the whole ledger as one JSON document. There is no import.
//!
//! ```text
//! {
//!   "export_date": "2024-03-01T18:00:00Z",
//!   "clients":  [...],
//!   "products": [...],
//!   "sales":    [... with client_name, product_name],
//!   "payments": [... with client_name],
//!   "settings": [...]
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppConfig;
use fiado_core::ExportDocument;
use fiado_db::Database;

/// `<prefix>_export_<YYYY-MM-DD>.json`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_export_{}.json", prefix, date.format("%Y-%m-%d"))
}

/// Snapshot of every collection.
pub async fn export_data(db: &Database) -> Result<ExportDocument, ApiError> {
    debug!("export_data command");
    Ok(db.export_snapshot().await?)
}

/// Writes the snapshot as pretty JSON into `dir` and returns the file path.
///
/// An export from earlier the same day is overwritten.
pub async fn write_export(
    db: &Database,
    config: &AppConfig,
    dir: &Path,
) -> Result<PathBuf, ApiError> {
    let document = export_data(db).await?;
    let name = export_file_name(&config.export_prefix, document.export_date.date_naive());
    let path = dir.join(name);

    let json = serde_json::to_string_pretty(&document)?;
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, json)?;

    info!(?path, sales = document.sales.len(), "Export written");
    Ok(path)
}
