use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One JSON document of a logical collection.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    /// UUIDv7 primary key, exposed to clients as `_id`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Logical collection name (e.g. "images").
    pub collection: String,

    /// Canonical rendering of the family's key values. Unique per collection.
    pub natural_key: String,

    pub body: Json,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
