//! # Domain Types
//!
//! Core domain types used throughout the ledger.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Client       │   │      Sale       │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  client_id      │   │  client_id ─────┼──►    │
//! │  │  name (unique)  │   │  product_id ────┼─┐ │  amount_cents   │       │
//! │  └─────────────────┘   │  quantity_milli │ │ │  description    │       │
//! │                        │  unit_kind      │ │ │  occurred_at    │       │
//! │  ┌─────────────────┐   │  total_cents    │ │ └─────────────────┘       │
//! │  │    Product      │◄──┼─────────────────┘ │                           │
//! │  │  ─────────────  │   │  payment_method │   ┌─────────────────┐       │
//! │  │  name (unique)  │   │  occurred_at    │   │  AdminSettings  │       │
//! │  │  price_cents    │   └─────────────────┘   │  (singleton)    │       │
//! │  │  unit_kind      │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Rule
//! A sale stores its own `unit_kind` and `total_cents`. Later changes to the
//! product never alter a historical sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{Money, Quantity};

// =============================================================================
// Enumerations
// =============================================================================

/// How a product is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Counted items.
    #[default]
    Unit,
    /// Weighed in kilograms.
    Kg,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Unit => "unit",
            UnitKind::Kg => "kg",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a sale is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Collected at the counter when the sale happens.
    Cash,
    /// Fiado: deferred; adds to the client's debt until paid.
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Client
// =============================================================================

/// A customer who buys, possibly on credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    pub id: i64,

    /// Unique, non-empty, trimmed.
    pub name: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product on the price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Unique, non-empty, trimmed.
    pub name: String,

    /// Current price per unit (or per kg) in cents.
    pub price_cents: i64,

    pub unit_kind: UnitKind,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for registering a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub unit_kind: UnitKind,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once stored; only deletion removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub client_id: i64,
    pub product_id: i64,

    /// Quantity in thousandths of `unit_kind`.
    pub quantity_milli: i64,

    /// Unit at sale time (frozen).
    pub unit_kind: UnitKind,

    /// Total at sale time (frozen, never recomputed).
    pub total_cents: i64,

    pub payment_method: PaymentMethod,

    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }

    #[inline]
    pub fn is_credit(&self) -> bool {
        self.payment_method == PaymentMethod::Credit
    }
}

impl AsRef<Sale> for Sale {
    fn as_ref(&self) -> &Sale {
        self
    }
}

/// A sale joined with the names it references.
///
/// Names are optional: the join is outer so no sale row is ever dropped from
/// an extract or an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub sale: Sale,

    pub client_name: Option<String>,
    pub product_name: Option<String>,

    /// The product's *current* price, for display next to the frozen total.
    pub product_price_cents: Option<i64>,
}

impl AsRef<Sale> for SaleDetail {
    fn as_ref(&self) -> &Sale {
        &self.sale
    }
}

/// Input for registering a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub client_id: i64,
    pub product_id: i64,
    pub quantity: Quantity,
    pub unit_kind: UnitKind,
    /// Quantity × unit price as quoted at entry time.
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
}

// =============================================================================
// Payment
// =============================================================================

/// Money received against a client's aggregate credit debt.
///
/// Not linked to any particular sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: i64,
    pub client_id: i64,
    pub amount_cents: i64,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

impl AsRef<Payment> for Payment {
    fn as_ref(&self) -> &Payment {
        self
    }
}

/// A payment joined with its client's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PaymentDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub payment: Payment,

    pub client_name: Option<String>,
}

impl AsRef<Payment> for PaymentDetail {
    fn as_ref(&self) -> &Payment {
        &self.payment
    }
}

/// Input for registering a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPayment {
    pub client_id: i64,
    pub amount: Money,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
}

// =============================================================================
// Administrator Settings
// =============================================================================

/// The singleton administrator record. Its absence means "first run".
///
/// The password is stored and compared as plaintext.
#[derive(Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AdminSettings {
    pub id: i64,
    pub admin_password: String,
    pub admin_name: String,
}

impl AdminSettings {
    /// Exact, case-sensitive comparison.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.admin_password == candidate
    }
}

impl fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSettings")
            .field("id", &self.id)
            .field("admin_password", &"***")
            .field("admin_name", &self.admin_name)
            .finish()
    }
}

// =============================================================================
// Export
// =============================================================================

/// Full snapshot of the ledger, for backup. There is no import path.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExportDocument {
    #[ts(as = "String")]
    pub export_date: DateTime<Utc>,
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub sales: Vec<SaleDetail>,
    pub payments: Vec<PaymentDetail>,
    pub settings: Vec<AdminSettings>,
}

// =============================================================================
// Unit Tests
// =============================================================================
