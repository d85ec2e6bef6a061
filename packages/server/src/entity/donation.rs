use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning user. Never changes after insert.
    #[sea_orm(indexed)]
    pub user_id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub condition: String,

    /// Free-form lifecycle label (`pending`, `verified_for_donation`, ...).
    #[sea_orm(indexed)]
    pub status: String,

    /// Photo URLs as a JSON array, in upload order.
    #[sea_orm(column_type = "JsonBinary")]
    pub photos: Json,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
