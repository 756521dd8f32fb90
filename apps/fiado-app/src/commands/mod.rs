//! # Commands Module
//!
//! Every operation the presentation shell can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── client.rs   ◄─── Client list, suggestions, add, delete
//! ├── product.rs  ◄─── Product list, suggestions, add, delete, quote
//! ├── sale.rs     ◄─── Sale entry and deletion
//! ├── payment.rs  ◄─── Credit payments
//! ├── ledger.rs   ◄─── Summary, statements, extracts
//! ├── admin.rs    ◄─── Setup, login, settings, factory reset
//! └── export.rs   ◄─── Backup document
//! ```
//!
//! ## Calling Convention
//! Commands are plain async functions. Each one takes only the state it
//! needs and returns `Result<T, ApiError>`:
//! ```rust,ignore
//! // Only needs the database
//! let clients = commands::client::list_clients(&db).await?;
//!
//! // Needs the session too
//! commands::sale::register_sale(&db, &session, request).await?;
//!
//! // Needs configuration
//! commands::admin::factory_reset(&db, &session, &config, request).await?;
//! ```
//!
//! Results are camelCase DTOs with money as integer cents.

pub mod admin;
pub mod client;
pub mod export;
pub mod ledger;
pub mod payment;
pub mod product;
pub mod sale;
