//! # Payment Repository
//!
//! Credit payments. A payment belongs to a client, never to a sale.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use fiado_core::{NewPayment, Payment, PaymentDetail};

const SELECT_PAYMENT: &str =
    "SELECT id, client_id, amount_cents, description, occurred_at FROM payments";

const SELECT_PAYMENT_DETAIL: &str = "SELECT p.id, p.client_id, p.amount_cents, p.description, \
     p.occurred_at, c.name AS client_name \
     FROM payments p \
     LEFT JOIN clients c ON p.client_id = c.id";

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Appends a payment.
    ///
    /// Any positive amount is stored, even above the client's debt.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Client id unknown
    pub async fn insert(&self, payment: &NewPayment) -> DbResult<Payment> {
        debug!(
            client_id = payment.client_id,
            amount = payment.amount.cents(),
            "Inserting payment"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO payments (client_id, amount_cents, description, occurred_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(payment.client_id)
        .bind(payment.amount.cents())
        .bind(payment.description.as_deref())
        .bind(payment.occurred_at)
        .execute(&self.pool)
        .await?;

        let stored = Payment {
            id: result.last_insert_rowid(),
            client_id: payment.client_id,
            amount_cents: payment.amount.cents(),
            description: payment.description.clone(),
            occurred_at: payment.occurred_at,
        };

        info!(id = stored.id, "Payment recorded");
        Ok(stored)
    }

    /// Gets a payment by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(&format!("{SELECT_PAYMENT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    /// Every payment, newest first.
    pub async fn list(&self) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "{SELECT_PAYMENT} ORDER BY occurred_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = payments.len(), "Listed payments");
        Ok(payments)
    }

    /// Every payment with its client's name, newest first.
    pub async fn list_detailed(&self) -> DbResult<Vec<PaymentDetail>> {
        let payments = sqlx::query_as::<_, PaymentDetail>(&format!(
            "{SELECT_PAYMENT_DETAIL} ORDER BY p.occurred_at DESC, p.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = payments.len(), "Listed detailed payments");
        Ok(payments)
    }

    /// One client's payments, newest first.
    pub async fn for_client(&self, client_id: i64) -> DbResult<Vec<PaymentDetail>> {
        let payments = sqlx::query_as::<_, PaymentDetail>(&format!(
            "{SELECT_PAYMENT_DETAIL} WHERE p.client_id = ?1 ORDER BY p.occurred_at DESC, p.id DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(client_id, count = payments.len(), "Listed client payments");
        Ok(payments)
    }

    /// Counts payments (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use chrono::{Duration, Utc};
    use fiado_core::{Money, NewPayment};

    fn new_payment(client_id: i64, cents: i64, minutes_ago: i64) -> NewPayment {
        NewPayment {
            client_id,
            amount: Money::from_cents(cents),
            description: Some("dinheiro".to_string()),
            occurred_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ana = db.clients().insert("Ana").await.unwrap();

        let payment = db.payments().insert(&new_payment(ana.id, 3000, 0)).await.unwrap();
        let stored = db.payments().get_by_id(payment.id).await.unwrap().unwrap();
        assert_eq!(stored.amount(), Money::from_cents(3000));
        assert_eq!(stored.description.as_deref(), Some("dinheiro"));
    }

    #[tokio::test]
    async fn test_missing_description_is_null() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ana = db.clients().insert("Ana").await.unwrap();

        let mut p = new_payment(ana.id, 500, 0);
        p.description = None;
        let payment = db.payments().insert(&p).await.unwrap();
        let stored = db.payments().get_by_id(payment.id).await.unwrap().unwrap();
        assert!(stored.description.is_none());
    }

    #[tokio::test]
    async fn test_unknown_client_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.payments().insert(&new_payment(42, 100, 0)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_client_listing_is_filtered_and_ordered() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ana = db.clients().insert("Ana").await.unwrap();
        let bia = db.clients().insert("Bia").await.unwrap();

        let old = db.payments().insert(&new_payment(ana.id, 100, 60)).await.unwrap();
        let new = db.payments().insert(&new_payment(ana.id, 200, 1)).await.unwrap();
        db.payments().insert(&new_payment(bia.id, 300, 5)).await.unwrap();

        let ana_payments = db.payments().for_client(ana.id).await.unwrap();
        let ids: Vec<i64> = ana_payments.iter().map(|p| p.payment.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);
        assert_eq!(ana_payments[0].client_name.as_deref(), Some("Ana"));

        assert_eq!(db.payments().list_detailed().await.unwrap().len(), 3);
        assert_eq!(db.payments().list().await.unwrap().len(), 3);
    }
}
