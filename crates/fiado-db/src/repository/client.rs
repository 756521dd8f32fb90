//! # Client Repository
//!
//! Database operations for clients.
//!
//! ## Guarded Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete(id)                                                             │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    COUNT sales    WHERE client_id = id ──┐                             │
//! │    COUNT payments WHERE client_id = id ──┼── any > 0 → HasDependents   │
//! │                                          │   (rollback, row intact)    │
//! │    DELETE FROM clients WHERE id = id ◄───┘                             │
//! │    rows_affected = 0 → NotFound                                        │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::contains_pattern;
use crate::error::{DbError, DbResult};
use fiado_core::Client;

const SELECT_CLIENT: &str = "SELECT id, name, created_at FROM clients";

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists every client, name ascending.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(&format!("{SELECT_CLIENT} ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = clients.len(), "Listed clients");
        Ok(clients)
    }

    /// Finds every client whose name contains `query`, name ascending.
    ///
    /// Matching ignores ASCII case (SQLite `LIKE`). The result is never
    /// truncated.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Client>> {
        debug!(query = %query, "Searching clients");

        let clients = sqlx::query_as::<_, Client>(&format!(
            "{SELECT_CLIENT} WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name"
        ))
        .bind(contains_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = clients.len(), "Search returned clients");
        Ok(clients)
    }

    /// Gets a client by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!("{SELECT_CLIENT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Finds the client whose name equals `name`, ignoring case.
    ///
    /// Compared with full Unicode lowercasing, so "JOÃO" finds "João".
    /// SQLite `LIKE` and `lower()` fold ASCII only, so candidates cannot be
    /// narrowed in SQL without missing such names; the whole list is scanned.
    pub async fn find_exact(&self, name: &str) -> DbResult<Option<Client>> {
        let wanted = name.trim().to_lowercase();
        let found = self
            .list()
            .await?
            .into_iter()
            .find(|c| c.name.to_lowercase() == wanted);

        Ok(found)
    }

    /// Inserts a new client.
    ///
    /// ## Returns
    /// * `Ok(Client)` - The stored row
    /// * `Err(DbError::UniqueViolation)` - The name is taken
    pub async fn insert(&self, name: &str) -> DbResult<Client> {
        debug!(name = %name, "Inserting client");

        let created_at = Utc::now();
        let result = sqlx::query("INSERT INTO clients (name, created_at) VALUES (?1, ?2)")
            .bind(name)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_value(name))?;

        let client = Client {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            created_at,
        };

        info!(id = client.id, "Client created");
        Ok(client)
    }

    /// Deletes a client that no sale or payment references.
    ///
    /// ## Returns
    /// * `Err(DbError::HasDependents)` - Sales or payments still point here
    /// * `Err(DbError::NotFound)` - No such client
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting client");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE client_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let payments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE client_id = ?1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if sales > 0 || payments > 0 {
            debug!(id, sales, payments, "Client delete refused");
            return Err(DbError::HasDependents {
                entity: "Client".to_string(),
                id,
                sales,
                payments,
            });
        }

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id, "Client deleted");
        Ok(())
    }

    /// Counts clients (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
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
    use fiado_core::{Money, NewPayment};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list_by_name() {
        let db = db().await;
        db.clients().insert("Carla").await.unwrap();
        db.clients().insert("Ana").await.unwrap();
        db.clients().insert("Bruno").await.unwrap();

        let names: Vec<String> = db
            .clients()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let db = db().await;
        db.clients().insert("Ana").await.unwrap();

        let err = db.clients().insert("Ana").await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "clients.name");
                assert_eq!(value, "Ana");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Uniqueness is case-sensitive as stored.
        assert!(db.clients().insert("ana").await.is_ok());
    }

    #[tokio::test]
    async fn test_search_is_substring_and_ordered() {
        let db = db().await;
        for name in ["Mariana", "Ana Paula", "José", "Adriana"] {
            db.clients().insert(name).await.unwrap();
        }

        let found: Vec<String> = db
            .clients()
            .search("ana")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(found, vec!["Adriana", "Ana Paula", "Mariana"]);

        assert!(db.clients().search("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_returns_every_match() {
        let db = db().await;
        for n in 0..25 {
            db.clients().insert(&format!("Ana {n:02}")).await.unwrap();
        }
        db.clients().insert("Bruno").await.unwrap();

        let found = db.clients().search("Ana").await.unwrap();
        assert_eq!(found.len(), 25);
        assert_eq!(found[0].name, "Ana 00");
        assert_eq!(found[24].name, "Ana 24");
    }

    #[tokio::test]
    async fn test_find_exact_ignores_case() {
        let db = db().await;
        let joao = db.clients().insert("João").await.unwrap();

        let found = db.clients().find_exact("  JOÃO ").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(joao.id));
        assert!(db.clients().find_exact("Jo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_exact_folds_non_ascii_case() {
        let db = db().await;
        let agua = db.clients().insert("Água Ltda").await.unwrap();
        db.clients().insert("Agua Ltda").await.unwrap();

        // SQLite LIKE would not match 'Á' against 'á'
        let found = db.clients().find_exact("ÁGUA LTDA").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(agua.id));
        let found = db.clients().find_exact("água ltda").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(agua.id));
    }

    #[tokio::test]
    async fn test_delete_without_dependents() {
        let db = db().await;
        let ana = db.clients().insert("Ana").await.unwrap();

        db.clients().delete(ana.id).await.unwrap();
        assert!(db.clients().get_by_id(ana.id).await.unwrap().is_none());

        let err = db.clients().delete(ana.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_with_payment_is_refused() {
        let db = db().await;
        let ana = db.clients().insert("Ana").await.unwrap();
        db.payments()
            .insert(&NewPayment {
                client_id: ana.id,
                amount: Money::from_cents(1000),
                description: None,
                occurred_at: Utc::now(),
            })
            .await
            .unwrap();

        let err = db.clients().delete(ana.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::HasDependents {
                sales: 0,
                payments: 1,
                ..
            }
        ));
        assert!(db.clients().get_by_id(ana.id).await.unwrap().is_some());
    }
}
