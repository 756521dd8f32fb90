//! # Administrator Commands
//!
//! First-run setup, login, settings and the factory reset.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Uninitialized ──setup_admin──► LoggedOut ──login──► LoggedIn           │
//! │        ▲                            ▲                    │              │
//! │        │                            └──────logout────────┘              │
//! │        │                                                                │
//! │        └──────────── factory_reset (any state) ─────────────────────    │
//! │                                                                         │
//! │  login before setup         → SETUP_REQUIRED                            │
//! │  setup after setup          → CONFLICT                                  │
//! │  wrong password             → UNAUTHORIZED (logged as a warning)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The secret is stored and compared in plaintext, case-sensitive.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{AdminLogin, AdminState, AppConfig, SessionState};
use fiado_core::validation::{
    validate_admin_setup, validate_reset_request, validate_settings_update,
};
use fiado_core::{AdminSettings, CoreError};
use fiado_db::{Database, DbError};

/// Where the administrator stands, for the shell's first screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatusDto {
    pub state: AdminState,
    pub admin_name: Option<String>,
}

/// Input for [`setup_admin`] and [`update_admin_settings`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredentialsRequest {
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Input for [`factory_reset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryResetRequest {
    pub password: String,
    pub password_confirmation: String,
    pub confirmation_phrase: String,
}

async fn require_settings(db: &Database) -> Result<AdminSettings, ApiError> {
    db.admin()
        .get()
        .await?
        .ok_or_else(|| CoreError::SetupRequired.into())
}

/// True until administrator setup has happened.
pub async fn is_first_run(db: &Database) -> Result<bool, ApiError> {
    let configured = db.admin().is_configured().await?;
    debug!(configured, "is_first_run command");
    Ok(!configured)
}

/// Uninitialized, LoggedOut or LoggedIn, plus the administrator's name.
pub async fn get_admin_state(
    db: &Database,
    session: &SessionState,
) -> Result<AdminStatusDto, ApiError> {
    let settings = db.admin().get().await?;
    let state = session.with_session(|s| s.admin_state(settings.is_some()));
    Ok(AdminStatusDto {
        state,
        admin_name: settings.map(|s| s.admin_name),
    })
}

/// Creates the administrator on first run.
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - Blank name, short password or mismatched
///   confirmation
/// * `Err(CONFLICT)` - Setup already happened
pub async fn setup_admin(db: &Database, req: AdminCredentialsRequest) -> Result<(), ApiError> {
    let name = validate_admin_setup(&req.name, &req.password, &req.confirm_password)?;
    debug!(name = %name, "setup_admin command");

    match db.admin().create(&name, &req.password).await {
        Ok(_) => Ok(()),
        Err(DbError::UniqueViolation { .. }) => {
            warn!("Administrator setup attempted twice");
            Err(CoreError::AlreadyConfigured.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Logs the administrator in.
///
/// ## Returns
/// * `Err(SETUP_REQUIRED)` - No administrator yet
/// * `Err(UNAUTHORIZED)` - Password differs from the stored one
pub async fn login(
    db: &Database,
    session: &SessionState,
    password: &str,
) -> Result<AdminLogin, ApiError> {
    let settings = require_settings(db).await?;
    if !settings.password_matches(password) {
        warn!("Administrator login rejected");
        return Err(CoreError::InvalidCredentials.into());
    }

    let login = session.with_session_mut(|s| s.login(settings.admin_name.clone()));
    info!(login_id = %login.login_id, "Administrator logged in");
    Ok(login)
}

/// Ends the administrator login. Always succeeds.
pub fn logout(session: &SessionState) {
    if let Some(ended) = session.with_session_mut(|s| s.logout()) {
        info!(login_id = %ended.login_id, "Administrator logged out");
    }
}

/// Checks a password without changing the session.
///
/// The shell calls this before any administrator-gated delete.
pub async fn verify_admin_password(db: &Database, password: &str) -> Result<bool, ApiError> {
    let settings = require_settings(db).await?;
    let ok = settings.password_matches(password);
    if !ok {
        warn!("Administrator password check failed");
    }
    Ok(ok)
}

/// Overwrites the administrator name and password.
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - Blank fields or mismatched confirmation
/// * `Err(SETUP_REQUIRED)` - No administrator yet
pub async fn update_admin_settings(
    db: &Database,
    session: &SessionState,
    req: AdminCredentialsRequest,
) -> Result<(), ApiError> {
    let name = validate_settings_update(&req.name, &req.password, &req.confirm_password)?;
    debug!(name = %name, "update_admin_settings command");

    match db.admin().update(&name, &req.password).await {
        Ok(()) => {}
        Err(DbError::NotFound { .. }) => return Err(CoreError::SetupRequired.into()),
        Err(e) => return Err(e.into()),
    }

    session.with_session_mut(|s| {
        if s.is_logged_in() {
            s.login(name);
        }
    });
    Ok(())
}

/// Deletes every row in every collection, administrator included.
///
/// ## Checks (in order, nothing is deleted unless all pass)
/// 1. password, confirmation and phrase all filled in
/// 2. password equals its confirmation
/// 3. phrase equals `config.reset_phrase`, ignoring case (spaces count)
/// 4. password equals the stored administrator password
///
/// On success the session is back to a fresh state and the ledger is in
/// first-run state.
pub async fn factory_reset(
    db: &Database,
    session: &SessionState,
    config: &AppConfig,
    req: FactoryResetRequest,
) -> Result<(), ApiError> {
    validate_reset_request(
        &req.password,
        &req.password_confirmation,
        &req.confirmation_phrase,
        &config.reset_phrase,
    )?;

    let settings = require_settings(db).await?;
    if !settings.password_matches(&req.password) {
        warn!("Factory reset rejected: wrong administrator password");
        return Err(CoreError::InvalidCredentials.into());
    }

    db.delete_all_rows().await?;
    session.with_session_mut(|s| s.reset());

    info!("Factory reset complete");
    Ok(())
}
