//! # Sale Commands
//!
//! Sale entry and administrator-gated deletion.
//!
//! ## Sale Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  select_client ──► select_product ──► quote_sale ──► register_sale      │
//! │        │                 │                 │               │            │
//! │        ▼                 ▼                 ▼               ▼            │
//! │   session holds     session holds    quantity × price   row appended,   │
//! │   the client        the product      (frozen total)     selection       │
//! │                                                         cleared         │
//! │                                                                         │
//! │  Credit ("fiado") sales add to the client's debt; cash sales do not.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are never edited. Deletion is the only correction, and the shell
//! asks for the administrator password first (`verify_admin_password`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::SessionState;
use fiado_core::validation::{validate_quantity, validate_sale_total};
use fiado_core::{Money, NewSale, PaymentMethod, Quantity, Sale, SaleDetail, UnitKind};
use fiado_db::Database;

/// Sale DTO for the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: i64,
    pub client_id: i64,
    pub product_id: i64,
    pub quantity_milli: i64,
    pub unit_kind: UnitKind,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub occurred_at: String,
}

impl From<Sale> for SaleDto {
    fn from(s: Sale) -> Self {
        SaleDto {
            id: s.id,
            client_id: s.client_id,
            product_id: s.product_id,
            quantity_milli: s.quantity_milli,
            unit_kind: s.unit_kind,
            total_cents: s.total_cents,
            payment_method: s.payment_method,
            occurred_at: s.occurred_at.to_rfc3339(),
        }
    }
}

/// A sale with the names it references, for lists and extracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetailDto {
    #[serde(flatten)]
    pub sale: SaleDto,
    pub client_name: Option<String>,
    pub product_name: Option<String>,
    pub product_price_cents: Option<i64>,
}

impl From<SaleDetail> for SaleDetailDto {
    fn from(d: SaleDetail) -> Self {
        SaleDetailDto {
            sale: SaleDto::from(d.sale),
            client_name: d.client_name,
            product_name: d.product_name,
            product_price_cents: d.product_price_cents,
        }
    }
}

/// Input for [`register_sale`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSaleRequest {
    pub client_id: i64,
    pub product_id: i64,
    pub quantity_milli: i64,
    pub unit_kind: UnitKind,
    /// As quoted at entry time; stored, never recomputed.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    /// Defaults to now. The operator may backdate.
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Appends a sale.
///
/// ## Returns
/// * `Ok(SaleDto)` - The stored sale with its new id
/// * `Err(VALIDATION_ERROR)` - Quantity not positive or negative total
/// * `Err(REFERENCE_ERROR)` - Client or product id does not exist
///
/// On success the session's client/product selection is cleared for the
/// next sale.
pub async fn register_sale(
    db: &Database,
    session: &SessionState,
    req: RegisterSaleRequest,
) -> Result<SaleDto, ApiError> {
    let quantity = Quantity::from_milli(req.quantity_milli);
    let total = Money::from_cents(req.total_cents);
    validate_quantity(quantity)?;
    validate_sale_total(total)?;

    debug!(
        client_id = req.client_id,
        product_id = req.product_id,
        method = %req.payment_method,
        total = total.cents(),
        "register_sale command"
    );

    let sale = db
        .sales()
        .insert(&NewSale {
            client_id: req.client_id,
            product_id: req.product_id,
            quantity,
            unit_kind: req.unit_kind,
            total,
            payment_method: req.payment_method,
            occurred_at: req.occurred_at.unwrap_or_else(Utc::now),
        })
        .await?;

    session.with_session_mut(|s| s.clear_selection());
    Ok(SaleDto::from(sale))
}

/// Every sale with names, newest first.
pub async fn list_sales(db: &Database) -> Result<Vec<SaleDetailDto>, ApiError> {
    debug!("list_sales command");
    let sales = db.sales().list_detailed().await?;
    Ok(sales.into_iter().map(SaleDetailDto::from).collect())
}

/// Deletes a sale.
///
/// Unconditional here; the shell gates it behind the administrator
/// password.
pub async fn delete_sale(db: &Database, id: i64) -> Result<(), ApiError> {
    debug!(id, "delete_sale command");
    db.sales().delete(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::client::{add_client, select_client};
    use crate::commands::product::{add_product, select_product, AddProductRequest};
    use crate::commands::test_support::test_db;
    use crate::error::ErrorCode;

    async fn setup(db: &Database) -> (i64, i64) {
        let ana = add_client(db, "Ana").await.unwrap();
        let leite = add_product(
            db,
            AddProductRequest {
                name: "Leite".to_string(),
                price_cents: 600,
                unit_kind: UnitKind::Unit,
            },
        )
        .await
        .unwrap();
        (ana.id, leite.id)
    }

    fn request(client_id: i64, product_id: i64) -> RegisterSaleRequest {
        RegisterSaleRequest {
            client_id,
            product_id,
            quantity_milli: 2000,
            unit_kind: UnitKind::Unit,
            total_cents: 1200,
            payment_method: PaymentMethod::Credit,
            occurred_at: None,
        }
    }

    #[tokio::test]
    async fn test_register_clears_selection() {
        let db = test_db().await;
        let session = SessionState::new();
        let (client_id, product_id) = setup(&db).await;
        select_client(&db, &session, client_id).await.unwrap();
        select_product(&db, &session, product_id).await.unwrap();

        let sale = register_sale(&db, &session, request(client_id, product_id))
            .await
            .unwrap();
        assert_eq!(sale.total_cents, 1200);
        assert!(session.with_session(|s| s.selected_client().is_none()
            && s.selected_product().is_none()));

        let listed = list_sales(&db).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].client_name.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_register_validates_before_store() {
        let db = test_db().await;
        let session = SessionState::new();
        let (client_id, product_id) = setup(&db).await;

        let mut req = request(client_id, product_id);
        req.quantity_milli = 0;
        let err = register_sale(&db, &session, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut req = request(client_id, product_id);
        req.total_cents = -1;
        let err = register_sale(&db, &session, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Zero total is a valid (free) sale
        let mut req = request(client_id, product_id);
        req.total_cents = 0;
        register_sale(&db, &session, req).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_references_are_rejected() {
        let db = test_db().await;
        let session = SessionState::new();
        let (client_id, product_id) = setup(&db).await;

        let err = register_sale(&db, &session, request(999, product_id))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReferenceError);

        let err = register_sale(&db, &session, request(client_id, 999))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReferenceError);
    }

    #[tokio::test]
    async fn test_request_accepts_shell_json() {
        let req: RegisterSaleRequest = serde_json::from_str(
            r#"{"clientId":1,"productId":2,"quantityMilli":1250,"unitKind":"kg",
                "totalCents":6238,"paymentMethod":"credit",
                "occurredAt":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.unit_kind, UnitKind::Kg);
        assert_eq!(req.payment_method, PaymentMethod::Credit);
        assert!(req.occurred_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_sale() {
        let db = test_db().await;
        let session = SessionState::new();
        let (client_id, product_id) = setup(&db).await;
        let sale = register_sale(&db, &session, request(client_id, product_id))
            .await
            .unwrap();

        delete_sale(&db, sale.id).await.unwrap();
        assert!(list_sales(&db).await.unwrap().is_empty());

        let err = delete_sale(&db, sale.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
