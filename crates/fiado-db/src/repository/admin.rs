//! # Admin Repository
//!
//! The administrator singleton. The row always has id
//! [`ADMIN_SETTINGS_ID`]; a second setup collides on the primary key.
//!
//! ```text
//!   get()    → None           first run, setup required
//!   create() → row id = 1     setup
//!   create() → UniqueViolation (already configured)
//!   update() → overwrite      NotFound when no row exists
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use fiado_core::{AdminSettings, ADMIN_SETTINGS_ID};

/// Repository for the administrator settings row.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    /// Creates a new AdminRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AdminRepository { pool }
    }

    /// Reads the singleton, if setup has happened.
    pub async fn get(&self) -> DbResult<Option<AdminSettings>> {
        let settings = sqlx::query_as::<_, AdminSettings>(
            "SELECT id, admin_password, admin_name FROM admin_settings WHERE id = ?1",
        )
        .bind(ADMIN_SETTINGS_ID)
        .fetch_optional(&self.pool)
        .await?;

        debug!(configured = settings.is_some(), "Read admin settings");
        Ok(settings)
    }

    /// Every settings row as stored (zero or one), for export.
    pub async fn list(&self) -> DbResult<Vec<AdminSettings>> {
        let rows = sqlx::query_as::<_, AdminSettings>(
            "SELECT id, admin_password, admin_name FROM admin_settings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Creates the singleton.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Setup already ran
    pub async fn create(&self, name: &str, password: &str) -> DbResult<AdminSettings> {
        debug!(name = %name, "Creating admin settings");

        sqlx::query(
            "INSERT INTO admin_settings (id, admin_password, admin_name) VALUES (?1, ?2, ?3)",
        )
        .bind(ADMIN_SETTINGS_ID)
        .bind(password)
        .bind(name)
        .execute(&self.pool)
        .await?;

        info!("Administrator configured");
        Ok(AdminSettings {
            id: ADMIN_SETTINGS_ID,
            admin_password: password.to_string(),
            admin_name: name.to_string(),
        })
    }

    /// Overwrites name and password.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Setup never ran
    pub async fn update(&self, name: &str, password: &str) -> DbResult<()> {
        debug!(name = %name, "Updating admin settings");

        let result = sqlx::query(
            "UPDATE admin_settings SET admin_password = ?1, admin_name = ?2 WHERE id = ?3",
        )
        .bind(password)
        .bind(name)
        .bind(ADMIN_SETTINGS_ID)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("AdminSettings", ADMIN_SETTINGS_ID));
        }

        info!("Administrator settings updated");
        Ok(())
    }

    /// Whether setup has happened.
    pub async fn is_configured(&self) -> DbResult<bool> {
        Ok(self.get().await?.is_some())
    }
}
