//! # Merged Extract
//!
//! The chronological transaction feed: sales and payments interleaved,
//! most recent first.
//!
//! ```text
//!   sales    [s1 10:00] [s2 09:00]
//!   payments [p1 09:30]
//!                 │
//!                 ▼  stable sort by occurred_at, descending
//!   extract  [s1 10:00] [p1 09:30] [s2 09:00]
//! ```
//!
//! Ties keep input order, with sales ahead of payments. The feed is rebuilt
//! from current rows on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Payment, Sale};

/// One line of the extract, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractEntry<S, P> {
    Sale(S),
    Payment(P),
}

impl<S: AsRef<Sale>, P: AsRef<Payment>> ExtractEntry<S, P> {
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ExtractEntry::Sale(s) => s.as_ref().occurred_at,
            ExtractEntry::Payment(p) => p.as_ref().occurred_at,
        }
    }

    /// Sale total or payment amount.
    pub fn amount(&self) -> Money {
        match self {
            ExtractEntry::Sale(s) => s.as_ref().total(),
            ExtractEntry::Payment(p) => p.as_ref().amount(),
        }
    }

    pub fn client_id(&self) -> i64 {
        match self {
            ExtractEntry::Sale(s) => s.as_ref().client_id,
            ExtractEntry::Payment(p) => p.as_ref().client_id,
        }
    }

    pub fn is_sale(&self) -> bool {
        matches!(self, ExtractEntry::Sale(_))
    }
}

/// Merges sales and payments into one feed ordered by occurrence, newest
/// first.
///
/// Filter the inputs to one client beforehand for a client extract.
pub fn merged_extract<S, P>(sales: Vec<S>, payments: Vec<P>) -> Vec<ExtractEntry<S, P>>
where
    S: AsRef<Sale>,
    P: AsRef<Payment>,
{
    let mut entries: Vec<ExtractEntry<S, P>> = Vec::with_capacity(sales.len() + payments.len());
    entries.extend(sales.into_iter().map(ExtractEntry::Sale));
    entries.extend(payments.into_iter().map(ExtractEntry::Payment));

    // sort_by is stable
    entries.sort_by(|a, b| b.occurred_at().cmp(&a.occurred_at()));
    entries
}
