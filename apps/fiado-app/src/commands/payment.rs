//! # Payment Commands
//!
//! Money received against a client's credit debt.
//!
//! The shell caps the amount field at [`max_payment`](super::ledger::max_payment),
//! but registration accepts any positive amount. An overpayment is logged and
//! stored; the client's debt then floors at zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::commands::ledger::current_debt;
use crate::error::ApiError;
use fiado_core::balance::payment_exceeds_debt;
use fiado_core::validation::{normalize_description, validate_payment_amount};
use fiado_core::{Money, NewPayment, Payment, PaymentDetail};
use fiado_db::Database;

/// Payment DTO for the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: i64,
    pub client_id: i64,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub occurred_at: String,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        PaymentDto {
            id: p.id,
            client_id: p.client_id,
            amount_cents: p.amount_cents,
            description: p.description,
            occurred_at: p.occurred_at.to_rfc3339(),
        }
    }
}

/// A payment with its client's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailDto {
    #[serde(flatten)]
    pub payment: PaymentDto,
    pub client_name: Option<String>,
}

impl From<PaymentDetail> for PaymentDetailDto {
    fn from(d: PaymentDetail) -> Self {
        PaymentDetailDto {
            payment: PaymentDto::from(d.payment),
            client_name: d.client_name,
        }
    }
}

/// Input for [`register_payment`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentRequest {
    pub client_id: i64,
    pub amount_cents: i64,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to now.
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Records a payment.
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - Amount zero or negative
/// * `Err(REFERENCE_ERROR)` - Client id does not exist
pub async fn register_payment(
    db: &Database,
    req: RegisterPaymentRequest,
) -> Result<PaymentDto, ApiError> {
    let amount = Money::from_cents(req.amount_cents);
    validate_payment_amount(amount)?;

    debug!(client_id = req.client_id, amount = amount.cents(), "register_payment command");

    let debt = current_debt(db, req.client_id).await?;
    if payment_exceeds_debt(amount, debt) {
        warn!(
            client_id = req.client_id,
            amount = amount.cents(),
            debt = debt.cents(),
            "Payment exceeds current debt; accepting anyway"
        );
    }

    let payment = db
        .payments()
        .insert(&NewPayment {
            client_id: req.client_id,
            amount,
            description: normalize_description(req.description.as_deref()),
            occurred_at: req.occurred_at.unwrap_or_else(Utc::now),
        })
        .await?;

    Ok(PaymentDto::from(payment))
}

/// Every payment with its client's name, newest first.
pub async fn list_payments(db: &Database) -> Result<Vec<PaymentDetailDto>, ApiError> {
    debug!("list_payments command");
    let payments = db.payments().list_detailed().await?;
    Ok(payments.into_iter().map(PaymentDetailDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ledger::max_payment;
    use crate::commands::test_support::{credit_sale, test_db};
    use crate::error::ErrorCode;

    fn request(client_id: i64, amount_cents: i64) -> RegisterPaymentRequest {
        RegisterPaymentRequest {
            client_id,
            amount_cents,
            description: Some("  pix  ".to_string()),
            occurred_at: None,
        }
    }

    #[tokio::test]
    async fn test_payment_reduces_debt() {
        let db = test_db().await;
        let (client_id, _) = credit_sale(&db, "Ana", 5000).await;

        let payment = register_payment(&db, request(client_id, 3000)).await.unwrap();
        assert_eq!(payment.description.as_deref(), Some("pix"));
        assert_eq!(max_payment(&db, client_id).await.unwrap().debt_cents, 2000);
    }

    #[tokio::test]
    async fn test_overpayment_is_accepted_and_debt_floors() {
        let db = test_db().await;
        let (client_id, _) = credit_sale(&db, "Ana", 1000).await;

        register_payment(&db, request(client_id, 2500)).await.unwrap();
        assert_eq!(max_payment(&db, client_id).await.unwrap().debt_cents, 0);
        assert_eq!(list_payments(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_amount_must_be_positive() {
        let db = test_db().await;
        let (client_id, _) = credit_sale(&db, "Ana", 1000).await;

        for cents in [0, -100] {
            let err = register_payment(&db, request(client_id, cents)).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }
        assert!(list_payments(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_client_is_rejected() {
        let db = test_db().await;
        let err = register_payment(&db, request(404, 100)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReferenceError);
    }
}
