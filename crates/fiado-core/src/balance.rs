//! # Balance Engine
//!
//! Derives every balance the ledger shows from the stored sales and payments.
//! Nothing here is cached or persisted: each call reduces the rows it is
//! given.
//!
//! ## Reductions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Balance Engine                                  │
//! │                                                                         │
//! │   sales ────────┬─────────────────► gross  = Σ sale.total              │
//! │                 │                                                       │
//! │                 ├── cash ─────┐                                         │
//! │                 │             ├───► paid   = Σ cash totals + Σ payments │
//! │   payments ─────┼─────────────┘                                         │
//! │                 │                                                       │
//! │   (one client)  └── credit ───────► debt   = max(0, Σ credit − Σ paid)  │
//! │                                                                         │
//! │   Every exposed total is floored at zero.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overpayment
//! A client who pays more than they owe ends with a debt of zero. The
//! surplus is not carried forward as credit.
//!
//! Sums saturate at the `i64` range rather than wrapping, so even rows that
//! bypassed validation cannot turn a total negative.
//!
//! The functions are generic over `AsRef<Sale>` / `AsRef<Payment>`, so both
//! plain rows and the joined detail rows can be passed in.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Quantity};
use crate::types::{Payment, PaymentMethod, Sale};
use crate::validation::{validate_sale_total, ValidationResult};

// =============================================================================
// Result Types
// =============================================================================

/// Shop-wide totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GlobalSummary {
    /// Revenue booked: every sale, whatever the payment method.
    pub gross_total: Money,
    /// Cash actually collected: cash sales plus all payments.
    pub paid_total: Money,
}

/// What the client profile shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientStatement {
    pub client_id: i64,
    /// All of the client's sales, cash and credit.
    pub total_sales: Money,
    /// Credit sales only; the gross debt before payments.
    pub credit_sales: Money,
    pub total_paid: Money,
    /// `max(0, credit_sales − total_paid)`.
    pub outstanding: Money,
}

// =============================================================================
// Reductions
// =============================================================================

/// Computes the shop-wide gross and paid totals.
///
/// ## Example
/// ```rust
/// use fiado_core::balance::global_summary;
/// use fiado_core::types::{Payment, Sale};
///
/// let summary = global_summary::<Sale, Payment>(&[], &[]);
/// assert!(summary.gross_total.is_zero());
/// assert!(summary.paid_total.is_zero());
/// ```
pub fn global_summary<S, P>(sales: &[S], payments: &[P]) -> GlobalSummary
where
    S: AsRef<Sale>,
    P: AsRef<Payment>,
{
    let gross: Money = sales.iter().map(|s| s.as_ref().total()).sum();

    let cash: Money = sales
        .iter()
        .map(|s| s.as_ref())
        .filter(|s: &&Sale| s.payment_method == PaymentMethod::Cash)
        .map(Sale::total)
        .sum();

    let received: Money = payments.iter().map(|p| p.as_ref().amount()).sum();

    GlobalSummary {
        gross_total: gross.floor_zero(),
        paid_total: (cash + received).floor_zero(),
    }
}

/// Computes one client's outstanding credit debt.
///
/// Rows for other clients are ignored, so the full collections may be
/// passed. Cash sales never contribute.
pub fn client_debt<S, P>(client_id: i64, sales: &[S], payments: &[P]) -> Money
where
    S: AsRef<Sale>,
    P: AsRef<Payment>,
{
    client_statement(client_id, sales, payments).outstanding
}

/// Computes the full per-client statement.
pub fn client_statement<S, P>(client_id: i64, sales: &[S], payments: &[P]) -> ClientStatement
where
    S: AsRef<Sale>,
    P: AsRef<Payment>,
{
    let mut total_sales = Money::zero();
    let mut credit_sales = Money::zero();

    for sale in sales {
        let sale: &Sale = sale.as_ref();
        if sale.client_id != client_id {
            continue;
        }
        total_sales += sale.total();
        if sale.is_credit() {
            credit_sales += sale.total();
        }
    }

    let total_paid: Money = payments
        .iter()
        .map(|p| p.as_ref())
        .filter(|p: &&Payment| p.client_id == client_id)
        .map(Payment::amount)
        .sum();

    ClientStatement {
        client_id,
        total_sales: total_sales.floor_zero(),
        credit_sales: credit_sales.floor_zero(),
        total_paid: total_paid.floor_zero(),
        outstanding: (credit_sales - total_paid).floor_zero(),
    }
}

// =============================================================================
// Entry Helpers
// =============================================================================

/// Whether a payment would exceed what the client owes.
///
/// Advisory only: the shell uses it to warn; registration still accepts the
/// payment.
#[inline]
pub fn payment_exceeds_debt(amount: Money, debt: Money) -> bool {
    amount > debt
}

/// Quotes a sale total at entry time: quantity × current unit price.
///
/// The result is stored on the sale and never recomputed.
///
/// ## Returns
/// * `Err(ValidationError::TooLarge)` - The total exceeds
///   [`MAX_AMOUNT_CENTS`](crate::MAX_AMOUNT_CENTS)
pub fn quote_sale_total(unit_price: Money, quantity: Quantity) -> ValidationResult<Money> {
    let total = unit_price.times_quantity(quantity)?;
    validate_sale_total(total)?;
    Ok(total)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnitKind;
    use chrono::{Duration, Utc};

    fn sale(id: i64, client_id: i64, cents: i64, method: PaymentMethod) -> Sale {
        Sale {
            id,
            client_id,
            product_id: 1,
            quantity_milli: 1000,
            unit_kind: UnitKind::Unit,
            total_cents: cents,
            payment_method: method,
            occurred_at: Utc::now() - Duration::minutes(id),
        }
    }

    fn payment(id: i64, client_id: i64, cents: i64) -> Payment {
        Payment {
            id,
            client_id,
            amount_cents: cents,
            description: None,
            occurred_at: Utc::now() - Duration::minutes(id),
        }
    }

    #[test]
    fn test_empty_inputs_give_zero() {
        let summary = global_summary::<Sale, Payment>(&[], &[]);
        assert_eq!(summary, GlobalSummary::default());
        assert_eq!(client_debt::<Sale, Payment>(1, &[], &[]), Money::zero());
    }

    #[test]
    fn test_gross_total_without_payments_is_sum_of_sales() {
        let mut sales = Vec::new();
        let mut previous = Money::zero();
        for (i, cents) in [1000, 0, 250, 99_999].into_iter().enumerate() {
            let method = if i % 2 == 0 {
                PaymentMethod::Cash
            } else {
                PaymentMethod::Credit
            };
            sales.push(sale(i as i64, 1, cents, method));
            let gross = global_summary::<Sale, Payment>(&sales, &[]).gross_total;
            assert!(gross >= previous);
            previous = gross;
        }
        assert_eq!(previous, Money::from_cents(1000 + 250 + 99_999));
    }

    #[test]
    fn test_paid_total_counts_cash_once_and_credit_never() {
        let sales = vec![
            sale(1, 1, 500, PaymentMethod::Cash),
            sale(2, 1, 700, PaymentMethod::Credit),
            sale(3, 2, 300, PaymentMethod::Cash),
        ];
        let payments = vec![payment(1, 1, 100), payment(2, 2, 50)];

        let summary = global_summary(&sales, &payments);
        assert_eq!(summary.gross_total, Money::from_cents(1500));
        assert_eq!(summary.paid_total, Money::from_cents(500 + 300 + 100 + 50));
    }

    #[test]
    fn test_debt_ignores_cash_sales_and_other_clients() {
        let sales = vec![
            sale(1, 1, 5000, PaymentMethod::Credit),
            sale(2, 1, 2000, PaymentMethod::Cash),
            sale(3, 2, 9000, PaymentMethod::Credit),
        ];
        let payments = vec![payment(1, 1, 1000), payment(2, 2, 9000)];

        assert_eq!(client_debt(1, &sales, &payments), Money::from_cents(4000));
        assert_eq!(client_debt(2, &sales, &payments), Money::zero());
        assert_eq!(client_debt(3, &sales, &payments), Money::zero());
    }

    #[test]
    fn test_debt_is_order_independent() {
        let mut sales = vec![
            sale(1, 1, 1234, PaymentMethod::Credit),
            sale(2, 1, 4321, PaymentMethod::Credit),
            sale(3, 1, 100, PaymentMethod::Cash),
        ];
        let mut payments = vec![payment(1, 1, 500), payment(2, 1, 34)];

        let before = client_debt(1, &sales, &payments);
        sales.reverse();
        payments.reverse();
        assert_eq!(client_debt(1, &sales, &payments), before);
        assert_eq!(before, Money::from_cents(1234 + 4321 - 534));
    }

    #[test]
    fn test_overpayment_is_clamped_to_zero() {
        let sales = vec![sale(1, 1, 1000, PaymentMethod::Credit)];
        let payments = vec![payment(1, 1, 2500)];

        let statement = client_statement(1, &sales, &payments);
        assert_eq!(statement.outstanding, Money::zero());
        assert_eq!(statement.total_paid, Money::from_cents(2500));
        assert_eq!(statement.credit_sales, Money::from_cents(1000));
    }

    #[test]
    fn test_statement_for_ana() {
        let sales = vec![
            sale(1, 7, 5000, PaymentMethod::Credit),
            sale(2, 7, 2000, PaymentMethod::Cash),
        ];
        let payments = vec![payment(1, 7, 3000)];

        let statement = client_statement(7, &sales, &payments);
        assert_eq!(statement.total_sales, Money::from_cents(7000));
        assert_eq!(statement.credit_sales, Money::from_cents(5000));
        assert_eq!(statement.outstanding, Money::from_cents(2000));

        let summary = global_summary(&sales, &payments);
        assert_eq!(summary.gross_total, Money::from_cents(7000));
        assert_eq!(summary.paid_total, Money::from_cents(5000));
    }

    #[test]
    fn test_entry_helpers() {
        assert!(payment_exceeds_debt(Money::from_cents(2001), Money::from_cents(2000)));
        assert!(!payment_exceeds_debt(Money::from_cents(2000), Money::from_cents(2000)));

        let total = quote_sale_total(Money::from_cents(799), Quantity::from_milli(333)).unwrap();
        assert_eq!(total, Money::from_cents(266));

        let price = Money::from_cents(crate::MAX_AMOUNT_CENTS);
        assert!(quote_sale_total(price, Quantity::units(2)).is_err());
        assert!(quote_sale_total(Money::from_cents(i64::MAX), Quantity::units(3)).is_err());
    }

    #[test]
    fn test_huge_totals_do_not_overflow() {
        let half = i64::MAX / 2 + 1;
        let sales = vec![
            sale(1, 1, half, PaymentMethod::Credit),
            sale(2, 1, half, PaymentMethod::Cash),
        ];
        let payments = vec![payment(1, 1, half), payment(2, 1, half)];

        let summary = global_summary(&sales, &payments);
        assert_eq!(summary.gross_total, Money::from_cents(i64::MAX));
        assert_eq!(summary.paid_total, Money::from_cents(i64::MAX));

        let statement = client_statement(1, &sales, &payments);
        assert_eq!(statement.total_sales, Money::from_cents(i64::MAX));
        assert_eq!(statement.outstanding, Money::zero());
    }
}
