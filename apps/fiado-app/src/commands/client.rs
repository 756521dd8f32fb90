//! # Client Commands
//!
//! Client list, suggestions, inline registration and deletion.
//!
//! ## Sale Entry Lookup
//! ```text
//!  operator types "an"
//!       │
//!       ▼
//!  search_clients ── shorter than min_search_len? ──► [] (store untouched)
//!       │
//!       ▼
//!  name LIKE '%an%' ORDER BY name ──► suggestions
//!       │
//!       ▼ operator confirms a name
//!  resolve_or_register_client ── exact match (any case)? ──► existing client
//!                                         │
//!                                         └── no ──► add_client
//! ```

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppConfig, SessionState};
use fiado_core::validation::{normalize_search_query, validate_client_name};
use fiado_core::Client;
use fiado_db::Database;

/// Client DTO for the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

impl From<Client> for ClientDto {
    fn from(c: Client) -> Self {
        ClientDto {
            id: c.id,
            name: c.name,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Every client, name ascending.
pub async fn list_clients(db: &Database) -> Result<Vec<ClientDto>, ApiError> {
    debug!("list_clients command");
    let clients = db.clients().list().await?;
    Ok(clients.into_iter().map(ClientDto::from).collect())
}

/// Name suggestions for the sale and payment forms.
///
/// ## Returns
/// Clients whose name contains the query, name ascending. All of them
/// unless `config.suggestion_limit` sets a cap. Empty for queries shorter
/// than `config.min_search_len`.
pub async fn search_clients(
    db: &Database,
    config: &AppConfig,
    query: &str,
) -> Result<Vec<ClientDto>, ApiError> {
    let start = Instant::now();
    let Some(query) = normalize_search_query(query, config.min_search_len) else {
        debug!("search_clients: query too short");
        return Ok(Vec::new());
    };

    let clients = db.clients().search(&query).await?;
    let dtos: Vec<ClientDto> = clients
        .into_iter()
        .take(config.suggestion_limit.unwrap_or(usize::MAX))
        .map(ClientDto::from)
        .collect();

    debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        query = %query,
        "search_clients complete"
    );
    Ok(dtos)
}

/// The client whose name matches exactly, ignoring case.
pub async fn find_client_exact(db: &Database, name: &str) -> Result<Option<ClientDto>, ApiError> {
    debug!(name = %name, "find_client_exact command");
    let client = db.clients().find_exact(name.trim()).await?;
    Ok(client.map(ClientDto::from))
}

/// Registers a client.
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - Blank or overlong name
/// * `Err(CONFLICT)` - A client with this exact name exists
pub async fn add_client(db: &Database, name: &str) -> Result<ClientDto, ApiError> {
    let name = validate_client_name(name)?;
    debug!(name = %name, "add_client command");

    let client = db.clients().insert(&name).await?;
    Ok(ClientDto::from(client))
}

/// Returns the existing client with this name (any case), or registers it.
///
/// Used when the operator types a new name straight into the sale form.
pub async fn resolve_or_register_client(db: &Database, name: &str) -> Result<ClientDto, ApiError> {
    let name = validate_client_name(name)?;
    if let Some(existing) = db.clients().find_exact(&name).await? {
        debug!(id = existing.id, "resolve_or_register_client: existing client");
        return Ok(ClientDto::from(existing));
    }
    add_client(db, &name).await
}

/// Puts a client on the sale entry form.
pub async fn select_client(
    db: &Database,
    session: &SessionState,
    id: i64,
) -> Result<ClientDto, ApiError> {
    let client = db
        .clients()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client", id))?;

    session.with_session_mut(|s| s.select_client(client.clone()));
    Ok(ClientDto::from(client))
}

/// Deletes a client that has no sales and no payments.
///
/// ## Returns
/// * `Err(CONSTRAINT_ERROR)` - The client still has sales or payments
/// * `Err(NOT_FOUND)` - No client with this id
pub async fn delete_client(db: &Database, session: &SessionState, id: i64) -> Result<(), ApiError> {
    debug!(id, "delete_client command");
    db.clients().delete(id).await?;
    session.with_session_mut(|s| s.forget_client(id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{credit_sale, test_db};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_trims_and_rejects_duplicates() {
        let db = test_db().await;

        let ana = add_client(&db, "  Ana  ").await.unwrap();
        assert_eq!(ana.name, "Ana");

        let err = add_client(&db, "Ana").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = add_client(&db, "   ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_short_query_returns_nothing() {
        let db = test_db().await;
        let config = AppConfig::default();
        add_client(&db, "Ana").await.unwrap();

        assert!(search_clients(&db, &config, "a").await.unwrap().is_empty());
        assert!(search_clients(&db, &config, " a ").await.unwrap().is_empty());
        assert_eq!(search_clients(&db, &config, "an").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_returns_all_matches_unless_capped() {
        let db = test_db().await;
        for n in 0..12 {
            add_client(&db, &format!("Ana {n:02}")).await.unwrap();
        }

        let all = search_clients(&db, &AppConfig::default(), "Ana").await.unwrap();
        assert_eq!(all.len(), 12);
        assert_eq!(all[0].name, "Ana 00");
        assert_eq!(all[11].name, "Ana 11");

        let capped = AppConfig::default().with_suggestion_limit(5);
        let first = search_clients(&db, &capped, "Ana").await.unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first[4].name, "Ana 04");
    }

    #[tokio::test]
    async fn test_resolve_reuses_exact_match_any_case() {
        let db = test_db().await;
        let ana = add_client(&db, "Ana").await.unwrap();

        let resolved = resolve_or_register_client(&db, "ANA").await.unwrap();
        assert_eq!(resolved.id, ana.id);

        let bia = resolve_or_register_client(&db, "Bia").await.unwrap();
        assert_ne!(bia.id, ana.id);
        assert_eq!(list_clients(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_client_without_history() {
        let db = test_db().await;
        let session = SessionState::new();
        let ana = add_client(&db, "Ana").await.unwrap();
        select_client(&db, &session, ana.id).await.unwrap();

        delete_client(&db, &session, ana.id).await.unwrap();
        assert!(list_clients(&db).await.unwrap().is_empty());
        assert!(session.with_session(|s| s.selected_client().is_none()));
    }

    #[tokio::test]
    async fn test_delete_client_with_sale_is_blocked() {
        let db = test_db().await;
        let session = SessionState::new();
        let (client_id, _) = credit_sale(&db, "Ana", 5000).await;

        let err = delete_client(&db, &session, client_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConstraintError);
        assert!(find_client_exact(&db, "Ana").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_client() {
        let db = test_db().await;
        let err = delete_client(&db, &SessionState::new(), 77).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
