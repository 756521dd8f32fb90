//! # State Module
//!
//! State handed to commands. Each concern is its own type so a command
//! declares exactly what it touches:
//!
//! ```text
//! ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐
//! │   Database   │  │   SessionState   │  │    AppConfig     │
//! │  (fiado-db)  │  │  Arc<Mutex<      │  │  read-only after │
//! │  SQLite pool │  │    Session>>     │  │  startup         │
//! └──────────────┘  └──────────────────┘  └──────────────────┘
//! ```

pub mod config;
pub mod session;

pub use config::AppConfig;
pub use session::{AdminLogin, AdminState, Session, SessionState};
