use async_trait::async_trait;
use chrono::Utc;
use common::{Document, DocumentStore, Fields, KeyFilter, StorageError, UpsertOutcome};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde_json::Value;
use uuid::Uuid;

use crate::entity::document;

/// Update/insert rounds before an upsert gives up under write contention.
const UPSERT_ATTEMPTS: usize = 3;

/// PostgreSQL-backed document store: one `document` table shared by all collections.
pub struct SeaOrmDocumentStore {
    db: DatabaseConnection,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Overwrite the body of the row holding `key`. Returns rows affected.
    async fn update_body(
        &self,
        collection: &str,
        key: &str,
        body: &Fields,
    ) -> Result<u64, StorageError> {
        let result = document::Entity::update_many()
            .col_expr(
                document::Column::Body,
                Expr::value(Value::Object(body.clone())),
            )
            .filter(document::Column::Collection.eq(collection))
            .filter(document::Column::NaturalKey.eq(key))
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected)
    }
}

fn storage_error(err: DbErr) -> StorageError {
    match &err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StorageError::Unavailable(err.to_string()),
        _ => StorageError::Query(err.to_string()),
    }
}

fn to_document(model: document::Model) -> Result<Document, StorageError> {
    match model.body {
        Value::Object(body) => Ok(Document {
            id: model.id.to_string(),
            body,
        }),
        _ => Err(StorageError::Corrupt {
            collection: model.collection,
            detail: format!("document {} body is not a JSON object", model.id),
        }),
    }
}

fn new_row(collection: &str, key: String, body: &Fields) -> document::ActiveModel {
    document::ActiveModel {
        id: Set(Uuid::now_v7()),
        collection: Set(collection.to_string()),
        natural_key: Set(key),
        body: Set(Value::Object(body.clone())),
        created_at: Set(Utc::now()),
    }
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn replace_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
        body: &Fields,
    ) -> Result<UpsertOutcome, StorageError> {
        let key = filter.natural_key();

        // Each round either updates an existing row or inserts a fresh one. A
        // conflicting insert means another writer created the key after our
        // update, so the next round replaces their row.
        for _ in 0..UPSERT_ATTEMPTS {
            if self.update_body(collection, &key, body).await? > 0 {
                return Ok(UpsertOutcome::Replaced);
            }

            let inserted = document::Entity::insert(new_row(collection, key.clone(), body))
                .on_conflict(
                    OnConflict::columns([
                        document::Column::Collection,
                        document::Column::NaturalKey,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
                .map_err(storage_error)?;

            if inserted > 0 {
                return Ok(UpsertOutcome::Created);
            }
        }

        Err(StorageError::Query(format!(
            "upsert of {key} in '{collection}' kept conflicting with concurrent writers"
        )))
    }

    async fn insert_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
        body: &Fields,
    ) -> Result<Document, StorageError> {
        let key = filter.natural_key();

        let model = new_row(collection, key.clone(), body)
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => StorageError::DuplicateKey {
                    collection: collection.to_string(),
                    key,
                },
                _ => storage_error(e),
            })?;

        to_document(model)
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>, StorageError> {
        document::Entity::find()
            .filter(document::Column::Collection.eq(collection))
            .order_by_asc(document::Column::CreatedAt)
            .order_by_asc(document::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(to_document)
            .collect()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
    ) -> Result<Option<Document>, StorageError> {
        document::Entity::find()
            .filter(document::Column::Collection.eq(collection))
            .filter(document::Column::NaturalKey.eq(filter.natural_key()))
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .map(to_document)
            .transpose()
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &KeyFilter,
    ) -> Result<bool, StorageError> {
        let result = document::Entity::delete_many()
            .filter(document::Column::Collection.eq(collection))
            .filter(document::Column::NaturalKey.eq(filter.natural_key()))
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected > 0)
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.db.clone().close().await.map_err(storage_error)
    }
}
