//! # Ledger Commands
//!
//! Balances and extracts, re-derived from the store on every call.
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   sales ────────┐                                                       │
//! │                 ├──► global_summary ──► gross total, paid total          │
//! │   payments ─────┤                                                       │
//! │                 ├──► client_statement ──► debt (floored at zero)         │
//! │                 │                                                       │
//! │                 └──► merged_extract ──► feed, newest first               │
//! │                                                                         │
//! │   Nothing is cached: each command reads current rows.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use crate::commands::payment::PaymentDetailDto;
use crate::commands::sale::SaleDetailDto;
use crate::error::ApiError;
use fiado_core::{
    client_statement, global_summary, merged_extract, ClientStatement, ExtractEntry, Money,
    PaymentDetail, SaleDetail,
};
use fiado_db::Database;

/// Shop-wide totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub gross_total_cents: i64,
    pub paid_total_cents: i64,
}

/// The client profile figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementDto {
    pub client_id: i64,
    pub total_sales_cents: i64,
    pub credit_sales_cents: i64,
    pub total_paid_cents: i64,
    pub outstanding_cents: i64,
}

impl From<ClientStatement> for StatementDto {
    fn from(s: ClientStatement) -> Self {
        StatementDto {
            client_id: s.client_id,
            total_sales_cents: s.total_sales.cents(),
            credit_sales_cents: s.credit_sales.cents(),
            total_paid_cents: s.total_paid.cents(),
            outstanding_cents: s.outstanding.cents(),
        }
    }
}

/// The ceiling the shell puts on the payment amount field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxPaymentDto {
    pub client_id: i64,
    pub debt_cents: i64,
}

/// One extract line, tagged `"kind": "sale" | "payment"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExtractEntryDto {
    Sale(SaleDetailDto),
    Payment(PaymentDetailDto),
}

impl From<ExtractEntry<SaleDetail, PaymentDetail>> for ExtractEntryDto {
    fn from(entry: ExtractEntry<SaleDetail, PaymentDetail>) -> Self {
        match entry {
            ExtractEntry::Sale(s) => ExtractEntryDto::Sale(s.into()),
            ExtractEntry::Payment(p) => ExtractEntryDto::Payment(p.into()),
        }
    }
}

/// Current debt of one client (zero for an unknown id).
pub(crate) async fn current_debt(db: &Database, client_id: i64) -> Result<Money, ApiError> {
    let sales = db.sales().for_client(client_id).await?;
    let payments = db.payments().for_client(client_id).await?;
    Ok(client_statement(client_id, &sales, &payments).outstanding)
}

/// Gross and paid totals over the whole ledger.
pub async fn get_global_summary(db: &Database) -> Result<SummaryDto, ApiError> {
    let sales = db.sales().list().await?;
    let payments = db.payments().list().await?;
    let summary = global_summary(&sales, &payments);

    debug!(
        sales = sales.len(),
        payments = payments.len(),
        gross = summary.gross_total.cents(),
        paid = summary.paid_total.cents(),
        "get_global_summary"
    );

    Ok(SummaryDto {
        gross_total_cents: summary.gross_total.cents(),
        paid_total_cents: summary.paid_total.cents(),
    })
}

/// Every sale and payment, newest first.
pub async fn get_general_extract(db: &Database) -> Result<Vec<ExtractEntryDto>, ApiError> {
    let sales = db.sales().list_detailed().await?;
    let payments = db.payments().list_detailed().await?;
    debug!(sales = sales.len(), payments = payments.len(), "get_general_extract");

    Ok(merged_extract(sales, payments)
        .into_iter()
        .map(ExtractEntryDto::from)
        .collect())
}

/// One client's sales and payments, newest first.
pub async fn get_client_extract(
    db: &Database,
    client_id: i64,
) -> Result<Vec<ExtractEntryDto>, ApiError> {
    let sales = db.sales().for_client(client_id).await?;
    let payments = db.payments().for_client(client_id).await?;
    debug!(client_id, sales = sales.len(), payments = payments.len(), "get_client_extract");

    Ok(merged_extract(sales, payments)
        .into_iter()
        .map(ExtractEntryDto::from)
        .collect())
}

/// The client profile: sales, credit, paid and outstanding.
///
/// ## Returns
/// * `Err(NOT_FOUND)` - No client with this id
pub async fn get_client_statement(db: &Database, client_id: i64) -> Result<StatementDto, ApiError> {
    if db.clients().get_by_id(client_id).await?.is_none() {
        return Err(ApiError::not_found("Client", client_id));
    }

    let sales = db.sales().for_client(client_id).await?;
    let payments = db.payments().for_client(client_id).await?;
    Ok(client_statement(client_id, &sales, &payments).into())
}

/// The client's current debt: the most the shell lets the operator enter
/// as a payment.
pub async fn max_payment(db: &Database, client_id: i64) -> Result<MaxPaymentDto, ApiError> {
    let debt = current_debt(db, client_id).await?;
    Ok(MaxPaymentDto {
        client_id,
        debt_cents: debt.cents(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::client::add_client;
    use crate::commands::payment::{register_payment, RegisterPaymentRequest};
    use crate::commands::product::{add_product, AddProductRequest};
    use crate::commands::sale::{register_sale, RegisterSaleRequest};
    use crate::commands::test_support::test_db;
    use crate::error::ErrorCode;
    use crate::state::SessionState;
    use chrono::{Duration, Utc};
    use fiado_core::{PaymentMethod, UnitKind, MAX_AMOUNT_CENTS};

    /// Ana: one 50.00 credit sale, one 20.00 cash sale, one 30.00 payment.
    #[tokio::test]
    async fn test_ana_scenario() {
        let db = test_db().await;
        let session = SessionState::new();
        let now = Utc::now();

        let ana = add_client(&db, "Ana").await.unwrap();
        let cesta = add_product(
            &db,
            AddProductRequest {
                name: "Cesta".to_string(),
                price_cents: 1000,
                unit_kind: UnitKind::Unit,
            },
        )
        .await
        .unwrap();

        let before = get_global_summary(&db).await.unwrap();

        for (total_cents, method, minutes_ago) in [
            (5000, PaymentMethod::Credit, 30),
            (2000, PaymentMethod::Cash, 20),
        ] {
            register_sale(
                &db,
                &session,
                RegisterSaleRequest {
                    client_id: ana.id,
                    product_id: cesta.id,
                    // 10.00 per unit, so 5 units and 2 units
                    quantity_milli: total_cents,
                    unit_kind: UnitKind::Unit,
                    total_cents,
                    payment_method: method,
                    occurred_at: Some(now - Duration::minutes(minutes_ago)),
                },
            )
            .await
            .unwrap();
        }
        register_payment(
            &db,
            RegisterPaymentRequest {
                client_id: ana.id,
                amount_cents: 3000,
                description: None,
                occurred_at: Some(now - Duration::minutes(10)),
            },
        )
        .await
        .unwrap();

        let statement = get_client_statement(&db, ana.id).await.unwrap();
        assert_eq!(statement.outstanding_cents, 2000);
        assert_eq!(statement.total_sales_cents, 7000);
        assert_eq!(statement.credit_sales_cents, 5000);
        assert_eq!(statement.total_paid_cents, 3000);

        let after = get_global_summary(&db).await.unwrap();
        assert_eq!(after.gross_total_cents - before.gross_total_cents, 7000);
        assert_eq!(after.paid_total_cents - before.paid_total_cents, 5000);

        let extract = get_client_extract(&db, ana.id).await.unwrap();
        assert_eq!(extract.len(), 3);
        assert!(matches!(extract[0], ExtractEntryDto::Payment(_)));
        assert!(matches!(extract[2], ExtractEntryDto::Sale(_)));
    }

    #[tokio::test]
    async fn test_general_extract_is_newest_first() {
        let db = test_db().await;
        let session = SessionState::new();
        let now = Utc::now();
        let ana = add_client(&db, "Ana").await.unwrap();
        let bia = add_client(&db, "Bia").await.unwrap();
        let pao = add_product(
            &db,
            AddProductRequest {
                name: "Pão".to_string(),
                price_cents: 1600,
                unit_kind: UnitKind::Kg,
            },
        )
        .await
        .unwrap();

        for (client_id, hours_ago) in [(ana.id, 5), (bia.id, 1), (ana.id, 3)] {
            register_sale(
                &db,
                &session,
                RegisterSaleRequest {
                    client_id,
                    product_id: pao.id,
                    quantity_milli: 500,
                    unit_kind: UnitKind::Kg,
                    total_cents: 800,
                    payment_method: PaymentMethod::Credit,
                    occurred_at: Some(now - Duration::hours(hours_ago)),
                },
            )
            .await
            .unwrap();
        }
        register_payment(
            &db,
            RegisterPaymentRequest {
                client_id: bia.id,
                amount_cents: 800,
                description: None,
                occurred_at: Some(now - Duration::hours(2)),
            },
        )
        .await
        .unwrap();

        let extract = get_general_extract(&db).await.unwrap();
        assert_eq!(extract.len(), 4);
        let kinds: Vec<bool> = extract
            .iter()
            .map(|e| matches!(e, ExtractEntryDto::Sale(_)))
            .collect();
        // 1h sale, 2h payment, 3h sale, 5h sale
        assert_eq!(kinds, vec![true, false, true, true]);

        let json = serde_json::to_value(&extract[1]).unwrap();
        assert_eq!(json["kind"], "payment");
        assert_eq!(json["clientName"], "Bia");
        assert_eq!(json["amountCents"], 800);
    }

    #[tokio::test]
    async fn test_empty_ledger() {
        let db = test_db().await;
        let summary = get_global_summary(&db).await.unwrap();
        assert_eq!(summary.gross_total_cents, 0);
        assert_eq!(summary.paid_total_cents, 0);
        assert!(get_general_extract(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_statement_for_missing_client() {
        let db = test_db().await;
        let err = get_client_statement(&db, 12).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(max_payment(&db, 12).await.unwrap().debt_cents, 0);
    }

    #[tokio::test]
    async fn test_oversized_amounts_never_reach_the_summary() {
        let db = test_db().await;
        let session = SessionState::new();
        let ana = add_client(&db, "Ana").await.unwrap();
        let ouro = add_product(
            &db,
            AddProductRequest {
                name: "Ouro".to_string(),
                price_cents: 100,
                unit_kind: UnitKind::Unit,
            },
        )
        .await
        .unwrap();

        let sale = |total_cents| RegisterSaleRequest {
            client_id: ana.id,
            product_id: ouro.id,
            quantity_milli: 1000,
            unit_kind: UnitKind::Unit,
            total_cents,
            payment_method: PaymentMethod::Credit,
            occurred_at: None,
        };

        for _ in 0..2 {
            let err = register_sale(&db, &session, sale(i64::MAX / 2 + 1))
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }
        let err = register_payment(
            &db,
            RegisterPaymentRequest {
                client_id: ana.id,
                amount_cents: i64::MAX,
                description: None,
                occurred_at: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        for _ in 0..2 {
            register_sale(&db, &session, sale(MAX_AMOUNT_CENTS)).await.unwrap();
        }
        let summary = get_global_summary(&db).await.unwrap();
        assert_eq!(summary.gross_total_cents, 2 * MAX_AMOUNT_CENTS);
        assert_eq!(summary.paid_total_cents, 0);
        assert_eq!(max_payment(&db, ana.id).await.unwrap().debt_cents, 2 * MAX_AMOUNT_CENTS);
    }
}
