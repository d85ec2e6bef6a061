use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Record that a donation was handed over. Several records may reference one donation.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "final_donation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub donation_id: i32,

    #[sea_orm(column_type = "Text")]
    pub notes: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
