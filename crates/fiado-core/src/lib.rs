//! # fiado-core: Pure Business Logic for the Fiado Ledger
//!
//! This crate is the **heart** of the ledger. It holds the entity types, the
//! validation rules, and the balance engine as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fiado Ledger Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation Shell (not in this repo)           │   │
//! │  │    Sale form ──► Client profile ──► Extract ──► Admin panel     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    fiado-app (Command Layer)                    │   │
//! │  │    register_sale, register_payment, setup_admin, export, ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fiado-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  balance  │  │ validation│  │   │
//! │  │   │  Client   │  │   Money   │  │  Summary  │  │   rules   │  │   │
//! │  │   │   Sale    │  │  Quantity │  │  Debt     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  │  Extract  │  └───────────┘  │   │
//! │  │                                 └───────────┘                  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  fiado-db (Ledger Store)                        │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Product, Sale, Payment, AdminSettings)
//! - [`money`] - `Money` (integer cents) and `Quantity` (integer thousandths)
//! - [`balance`] - Global summary, client debt, client statement
//! - [`extract`] - Merged chronological transaction feed
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use fiado_core::money::{Money, Quantity};
//!
//! // 1.250 kg at R$ 8.00/kg
//! let price = Money::from_cents(800);
//! let total = price.times_quantity(Quantity::from_milli(1250)).unwrap();
//! assert_eq!(total.cents(), 1000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod extract;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use balance::{client_debt, client_statement, global_summary, ClientStatement, GlobalSummary};
pub use error::{CoreError, CoreResult, ValidationError};
pub use extract::{merged_extract, ExtractEntry};
pub use money::{Money, Quantity};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fixed identifier of the single administrator settings row.
pub const ADMIN_SETTINGS_ID: i64 = 1;

/// Minimum length of the administrator password chosen at setup.
pub const MIN_ADMIN_PASSWORD_LEN: usize = 4;

/// Largest price, sale total or payment amount accepted, in cents
/// (R$ 1 000 000 000,00).
///
/// Keeps any realistic number of summed rows well inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Minimum trimmed length of a name query before suggestions are offered.
///
/// One-letter queries would list most of the book on every keystroke.
pub const MIN_SEARCH_LEN: usize = 2;

/// Default phrase the operator types to confirm a factory reset.
pub const DEFAULT_RESET_PHRASE: &str = "RESETAR";
