use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub user_id: i32,

    /// Merchant order id sent to the gateway (`YDR-<n>`).
    #[sea_orm(unique)]
    pub order_id: String,

    pub amount: i64,
    pub auction_item_id: Option<i32>,

    pub transaction_id: Option<String>,
    pub payment_link_url: Option<String>,

    /// Last known gateway status (`pending`, `settlement`, `expire`, ...).
    pub status: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
