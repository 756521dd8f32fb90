//! # Product Repository
//!
//! Database operations for the price list.
//!
//! A product's price can be read at sale entry to quote a total; the total is
//! then frozen on the sale, so nothing here ever touches historical sales.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::contains_pattern;
use crate::error::{DbError, DbResult};
use fiado_core::{NewProduct, Product};

const SELECT_PRODUCT: &str = "SELECT id, name, price_cents, unit_kind, created_at FROM products";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let matches = repo.search("arr").await?;
/// let arroz = repo.find_exact("ARROZ").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, name ascending.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Finds every product whose name contains `query`, name ascending.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        debug!(query = %query, "Searching products");

        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name"
        ))
        .bind(contains_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Finds the product whose name equals `name`, ignoring case.
    ///
    /// Full scan with Unicode lowercasing, as in
    /// [`ClientRepository::find_exact`](super::client::ClientRepository::find_exact).
    pub async fn find_exact(&self, name: &str) -> DbResult<Option<Product>> {
        let wanted = name.trim().to_lowercase();
        let found = self
            .list()
            .await?
            .into_iter()
            .find(|p| p.name.to_lowercase() == wanted);

        Ok(found)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored row
    /// * `Err(DbError::UniqueViolation)` - The name is taken
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, price = product.price.cents(), "Inserting product");

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO products (name, price_cents, unit_kind, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(product.unit_kind)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_value(&product.name))?;

        let stored = Product {
            id: result.last_insert_rowid(),
            name: product.name.clone(),
            price_cents: product.price.cents(),
            unit_kind: product.unit_kind,
            created_at,
        };

        info!(id = stored.id, "Product created");
        Ok(stored)
    }

    /// Deletes a product that no sale references.
    ///
    /// Count and delete share one transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::HasDependents)` - Sales still point here
    /// * `Err(DbError::NotFound)` - No such product
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE product_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if sales > 0 {
            debug!(id, sales, "Product delete refused");
            return Err(DbError::HasDependents {
                entity: "Product".to_string(),
                id,
                sales,
                payments: 0,
            });
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id, "Product deleted");
        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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
    use chrono::Utc;
    use fiado_core::{Money, NewProduct, NewSale, PaymentMethod, Quantity, UnitKind};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, cents: i64, unit_kind: UnitKind) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Money::from_cents(cents),
            unit_kind,
        }
    }

    #[tokio::test]
    async fn test_insert_round_trips_unit_kind() {
        let db = db().await;
        let queijo = db
            .products()
            .insert(&new_product("Queijo", 4990, UnitKind::Kg))
            .await
            .unwrap();

        let stored = db.products().get_by_id(queijo.id).await.unwrap().unwrap();
        assert_eq!(stored.unit_kind, UnitKind::Kg);
        assert_eq!(stored.price(), Money::from_cents(4990));
        assert_eq!(stored.name, "Queijo");
    }

    #[tokio::test]
    async fn test_free_product_is_allowed() {
        let db = db().await;
        let brinde = db
            .products()
            .insert(&new_product("Brinde", 0, UnitKind::Unit))
            .await
            .unwrap();
        assert_eq!(brinde.price_cents, 0);
    }

    #[tokio::test]
    async fn test_duplicate_product_name() {
        let db = db().await;
        db.products()
            .insert(&new_product("Leite", 599, UnitKind::Unit))
            .await
            .unwrap();

        let err = db
            .products()
            .insert(&new_product("Leite", 650, UnitKind::Unit))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_and_find_exact() {
        let db = db().await;
        for name in ["Feijão preto", "Arroz", "Feijão carioca"] {
            db.products()
                .insert(&new_product(name, 800, UnitKind::Kg))
                .await
                .unwrap();
        }

        let found: Vec<String> = db
            .products()
            .search("feij")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(found, vec!["Feijão carioca", "Feijão preto"]);

        let arroz = db.products().find_exact("arroz").await.unwrap();
        assert!(arroz.is_some());

        let feijao = db.products().find_exact("FEIJÃO PRETO").await.unwrap();
        assert_eq!(feijao.map(|p| p.name), Some("Feijão preto".to_string()));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_sale() {
        let db = db().await;
        let ana = db.clients().insert("Ana").await.unwrap();
        let pao = db
            .products()
            .insert(&new_product("Pão", 50, UnitKind::Unit))
            .await
            .unwrap();
        let unused = db
            .products()
            .insert(&new_product("Café", 1200, UnitKind::Unit))
            .await
            .unwrap();

        db.sales()
            .insert(&NewSale {
                client_id: ana.id,
                product_id: pao.id,
                quantity: Quantity::units(10),
                unit_kind: UnitKind::Unit,
                total: Money::from_cents(500),
                payment_method: PaymentMethod::Cash,
                occurred_at: Utc::now(),
            })
            .await
            .unwrap();

        let err = db.products().delete(pao.id).await.unwrap_err();
        assert!(matches!(err, DbError::HasDependents { sales: 1, .. }));
        assert!(db.products().get_by_id(pao.id).await.unwrap().is_some());

        db.products().delete(unused.id).await.unwrap();
        assert_eq!(db.products().count().await.unwrap(), 1);
    }
}
