//! # Session State
//!
//! The operator's session: administrator login plus the client and product
//! currently selected on the sale entry form. Passed into every command that
//! needs it; nothing lives in process-wide variables.
//!
//! ## Administrator State Machine
//! ```text
//!                  setup_admin                 login
//!  ┌───────────────┐ ───────► ┌─────────────┐ ───────► ┌────────────┐
//!  │ Uninitialized │          │  LoggedOut  │          │  LoggedIn  │
//!  │ (no settings) │          │             │ ◄─────── │            │
//!  └───────────────┘          └─────────────┘  logout  └────────────┘
//!          ▲                                                 │
//!          └──────────────── factory_reset ──────────────────┘
//! ```
//!
//! `Uninitialized` is not stored here: it is the absence of the settings row,
//! which only the store knows. [`Session::admin_state`] combines both.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fiado_core::{Client, Product};

/// Where the administrator stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdminState {
    /// First run: setup is required before anything admin-gated.
    Uninitialized,
    LoggedOut,
    LoggedIn,
}

/// An active administrator login.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLogin {
    /// Tags log lines from this login.
    pub login_id: Uuid,
    pub admin_name: String,
    pub since: DateTime<Utc>,
}

/// Session contents.
#[derive(Debug, Clone, Default)]
pub struct Session {
    login: Option<AdminLogin>,
    selected_client: Option<Client>,
    selected_product: Option<Product>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combines login state with whether setup has happened.
    pub fn admin_state(&self, configured: bool) -> AdminState {
        match (configured, &self.login) {
            (false, _) => AdminState::Uninitialized,
            (true, None) => AdminState::LoggedOut,
            (true, Some(_)) => AdminState::LoggedIn,
        }
    }

    pub fn login(&mut self, admin_name: impl Into<String>) -> AdminLogin {
        let login = AdminLogin {
            login_id: Uuid::new_v4(),
            admin_name: admin_name.into(),
            since: Utc::now(),
        };
        self.login = Some(login.clone());
        login
    }

    /// Clears the login. Returns the login that ended, if any.
    pub fn logout(&mut self) -> Option<AdminLogin> {
        self.login.take()
    }

    pub fn current_login(&self) -> Option<&AdminLogin> {
        self.login.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.login.is_some()
    }

    // -------------------------------------------------------------------------
    // Sale entry selection
    // -------------------------------------------------------------------------

    pub fn select_client(&mut self, client: Client) {
        self.selected_client = Some(client);
    }

    pub fn select_product(&mut self, product: Product) {
        self.selected_product = Some(product);
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.selected_client.as_ref()
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    /// Empties the sale form selection (after a sale is registered).
    pub fn clear_selection(&mut self) {
        self.selected_client = None;
        self.selected_product = None;
    }

    /// Forgets a client that no longer exists.
    pub fn forget_client(&mut self, client_id: i64) {
        if self.selected_client.as_ref().is_some_and(|c| c.id == client_id) {
            self.selected_client = None;
        }
    }

    /// Forgets a product that no longer exists.
    pub fn forget_product(&mut self, product_id: i64) {
        if self.selected_product.as_ref().is_some_and(|p| p.id == product_id) {
            self.selected_product = None;
        }
    }

    /// Back to a fresh session (after a factory reset).
    pub fn reset(&mut self) {
        *self = Session::default();
    }
}

/// Shared handle on the session.
///
/// ## Thread Safety
/// `Arc<Mutex<Session>>`: every operation is a short field update, and the
/// guard is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let logged_in = session.with_session(|s| s.is_logged_in());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let guard = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut guard = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}
