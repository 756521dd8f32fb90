//! # Repository Module
//!
//! One repository per ledger collection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Command (fiado-app)                                                   │
//! │       │                                                                 │
//! │       │  db.clients().search("an")                                     │
//! │       ▼                                                                 │
//! │  ClientRepository                                                      │
//! │  ├── list / search / find_exact / get_by_id                            │
//! │  ├── insert(name)                                                      │
//! │  └── delete(id)  ← refuses while sales or payments reference it        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`](client::ClientRepository) - Clients, name search, guarded delete
//! - [`ProductRepository`](product::ProductRepository) - Price list, name search, guarded delete
//! - [`SaleRepository`](sale::SaleRepository) - Sales and joined sale rows
//! - [`PaymentRepository`](payment::PaymentRepository) - Credit payments
//! - [`AdminRepository`](admin::AdminRepository) - Administrator singleton

pub mod admin;
pub mod client;
pub mod payment;
pub mod product;
pub mod sale;

/// Builds a `LIKE` pattern matching `query` anywhere in the column.
///
/// `%`, `_` and `\` in the query are matched literally; pair the pattern
/// with `ESCAPE '\'`.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
