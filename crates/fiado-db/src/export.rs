//! # Export Snapshot
//!
//! Reads every collection into one [`ExportDocument`] for backup.
//!
//! All reads share a single transaction, so the snapshot is consistent even
//! if a write lands between them. Sales and payments use the joined row
//! shapes; the outer joins guarantee no row is dropped.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use fiado_core::{AdminSettings, Client, ExportDocument, PaymentDetail, Product, SaleDetail};

impl Database {
    /// Builds a full snapshot of the ledger.
    pub async fn export_snapshot(&self) -> DbResult<ExportDocument> {
        debug!("Building export snapshot");

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let clients = sqlx::query_as::<_, Client>(
            "SELECT id, name, created_at FROM clients ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, unit_kind, created_at FROM products ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let sales = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT s.id, s.client_id, s.product_id, s.quantity_milli, s.unit_kind,
                   s.total_cents, s.payment_method, s.occurred_at,
                   c.name AS client_name, p.name AS product_name,
                   p.price_cents AS product_price_cents
            FROM sales s
            LEFT JOIN clients c ON s.client_id = c.id
            LEFT JOIN products p ON s.product_id = p.id
            ORDER BY s.id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let payments = sqlx::query_as::<_, PaymentDetail>(
            r#"
            SELECT p.id, p.client_id, p.amount_cents, p.description, p.occurred_at,
                   c.name AS client_name
            FROM payments p
            LEFT JOIN clients c ON p.client_id = c.id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let settings = sqlx::query_as::<_, AdminSettings>(
            "SELECT id, admin_password, admin_name FROM admin_settings ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            clients = clients.len(),
            products = products.len(),
            sales = sales.len(),
            payments = payments.len(),
            "Export snapshot built"
        );

        Ok(ExportDocument {
            export_date: Utc::now(),
            clients,
            products,
            sales,
            payments,
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use chrono::Utc;
    use fiado_core::{Money, NewPayment, NewProduct, NewSale, PaymentMethod, Quantity, UnitKind};

    #[tokio::test]
    async fn test_snapshot_keeps_every_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.admin().create("Rosa", "1234").await.unwrap();

        let ana = db.clients().insert("Ana").await.unwrap();
        let bia = db.clients().insert("Bia").await.unwrap();
        let leite = db
            .products()
            .insert(&NewProduct {
                name: "Leite".to_string(),
                price: Money::from_cents(600),
                unit_kind: UnitKind::Unit,
            })
            .await
            .unwrap();

        for (client_id, method) in [
            (ana.id, PaymentMethod::Credit),
            (ana.id, PaymentMethod::Cash),
            (bia.id, PaymentMethod::Credit),
        ] {
            db.sales()
                .insert(&NewSale {
                    client_id,
                    product_id: leite.id,
                    quantity: Quantity::units(1),
                    unit_kind: UnitKind::Unit,
                    total: Money::from_cents(600),
                    payment_method: method,
                    occurred_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        db.payments()
            .insert(&NewPayment {
                client_id: bia.id,
                amount: Money::from_cents(600),
                description: None,
                occurred_at: Utc::now(),
            })
            .await
            .unwrap();

        let doc = db.export_snapshot().await.unwrap();
        assert_eq!(doc.clients.len(), 2);
        assert_eq!(doc.products.len(), 1);
        assert_eq!(doc.sales.len() as i64, db.sales().count().await.unwrap());
        assert_eq!(doc.payments.len() as i64, db.payments().count().await.unwrap());
        assert_eq!(doc.settings.len(), 1);
        assert!(doc.sales.iter().all(|s| s.client_name.is_some()));
    }

    #[tokio::test]
    async fn test_snapshot_of_empty_ledger() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let doc = db.export_snapshot().await.unwrap();
        assert!(doc.clients.is_empty());
        assert!(doc.sales.is_empty());
        assert!(doc.settings.is_empty());
    }
}
