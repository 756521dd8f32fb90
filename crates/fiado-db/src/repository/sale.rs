//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. QUOTE (command layer)                                              │
//! │     └── total = unit price × quantity, computed once                   │
//! │                                                                         │
//! │  2. INSERT                                                             │
//! │     └── insert() → Sale  (client/product ids checked by FOREIGN KEY)   │
//! │                                                                         │
//! │  3. READ                                                               │
//! │     └── list_detailed() / for_client() → SaleDetail (LEFT JOIN names)  │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                  │
//! │     └── delete() → row gone; no edit operation exists                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use fiado_core::{NewSale, Sale, SaleDetail};

const SELECT_SALE: &str = "SELECT id, client_id, product_id, quantity_milli, unit_kind, \
     total_cents, payment_method, occurred_at FROM sales";

// LEFT JOIN: a sale whose client or product row is gone still shows up.
const SELECT_SALE_DETAIL: &str = "SELECT s.id, s.client_id, s.product_id, s.quantity_milli, \
     s.unit_kind, s.total_cents, s.payment_method, s.occurred_at, \
     c.name AS client_name, p.name AS product_name, p.price_cents AS product_price_cents \
     FROM sales s \
     LEFT JOIN clients c ON s.client_id = c.id \
     LEFT JOIN products p ON s.product_id = p.id";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!("{SELECT_SALE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Appends a sale.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The stored row with its new id
    /// * `Err(DbError::ForeignKeyViolation)` - Client or product id unknown
    pub async fn insert(&self, sale: &NewSale) -> DbResult<Sale> {
        debug!(
            client_id = sale.client_id,
            product_id = sale.product_id,
            total = sale.total.cents(),
            method = %sale.payment_method,
            "Inserting sale"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                client_id, product_id, quantity_milli, unit_kind,
                total_cents, payment_method, occurred_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(sale.client_id)
        .bind(sale.product_id)
        .bind(sale.quantity.milli())
        .bind(sale.unit_kind)
        .bind(sale.total.cents())
        .bind(sale.payment_method)
        .bind(sale.occurred_at)
        .execute(&self.pool)
        .await?;

        let stored = Sale {
            id: result.last_insert_rowid(),
            client_id: sale.client_id,
            product_id: sale.product_id,
            quantity_milli: sale.quantity.milli(),
            unit_kind: sale.unit_kind,
            total_cents: sale.total.cents(),
            payment_method: sale.payment_method,
            occurred_at: sale.occurred_at,
        };

        info!(id = stored.id, "Sale recorded");
        Ok(stored)
    }

    /// Deletes a sale. No dependency check: nothing references sales.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        info!(id, "Sale deleted");
        Ok(())
    }

    /// Every sale, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "{SELECT_SALE} ORDER BY occurred_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Every sale with client and product names, newest first.
    pub async fn list_detailed(&self) -> DbResult<Vec<SaleDetail>> {
        let sales = sqlx::query_as::<_, SaleDetail>(&format!(
            "{SELECT_SALE_DETAIL} ORDER BY s.occurred_at DESC, s.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), "Listed detailed sales");
        Ok(sales)
    }

    /// One client's sales with names and current product price, newest first.
    pub async fn for_client(&self, client_id: i64) -> DbResult<Vec<SaleDetail>> {
        let sales = sqlx::query_as::<_, SaleDetail>(&format!(
            "{SELECT_SALE_DETAIL} WHERE s.client_id = ?1 ORDER BY s.occurred_at DESC, s.id DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(client_id, count = sales.len(), "Listed client sales");
        Ok(sales)
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
