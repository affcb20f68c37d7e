use std::sync::Arc;
use std::time::Duration;

use common::DocumentStore;
use common::storage::memory::MemoryDocumentStore;
use common::storage::unavailable::UnavailableStore;
use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::entity::document;
use crate::store::SeaOrmDocumentStore;

/// Connection string that selects the in-process store.
pub const MEMORY_URL: &str = "memory://";

pub async fn init_db(db_url: &str, connect_timeout: Duration) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(connect_timeout)
        .acquire_timeout(connect_timeout)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("diary_server::entity::*")
        .sync(&db)
        .await?;
    ensure_indexes(&db).await?;

    Ok(db)
}

/// Ensure the unique `(collection, natural_key)` index exists.
///
/// Upserts rely on it as their `ON CONFLICT` target, so failure is fatal for
/// the connection.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_document_collection_key")
        .table(document::Entity)
        .col(document::Column::Collection)
        .col(document::Column::NaturalKey)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_document_collection_key exists");

    Ok(())
}

/// Open the document store named by `config`.
///
/// Never fails: a missing or unreachable store is replaced by an
/// [`UnavailableStore`] so the server still starts in a degraded state.
pub async fn connect_store(config: &DatabaseConfig) -> Arc<dyn DocumentStore> {
    let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        warn!("No database url configured; storage-backed routes will fail");
        return Arc::new(UnavailableStore::new("database url not configured"));
    };

    if url == MEMORY_URL {
        info!("Using in-memory document store");
        return Arc::new(MemoryDocumentStore::new());
    }

    let timeout = Duration::from_secs(config.connect_timeout_secs);
    match tokio::time::timeout(timeout, init_db(url, timeout)).await {
        Ok(Ok(db)) => {
            info!("Successfully connected to document store");
            Arc::new(SeaOrmDocumentStore::new(db))
        }
        Ok(Err(e)) => {
            error!("Failed to connect to document store: {e}");
            Arc::new(UnavailableStore::new(e.to_string()))
        }
        Err(_) => {
            error!(
                "Timed out connecting to document store after {}s",
                config.connect_timeout_secs
            );
            Arc::new(UnavailableStore::new(format!(
                "connection timed out after {}s",
                config.connect_timeout_secs
            )))
        }
    }
}
