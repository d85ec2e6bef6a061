use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use thiserror::Error;

use crate::entity::donation;

use super::{Donation, DonationPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("corrupt donation row {id}: {reason}")]
    Corrupt { id: i32, reason: String },
}

/// Fields of a donation about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonation {
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub status: String,
    pub photos: Vec<String>,
}

/// Durable storage for donations.
#[async_trait]
pub trait DonationStore: Send + Sync {
    async fn insert(&self, new: NewDonation) -> Result<Donation, StoreError>;

    async fn find(&self, id: i32) -> Result<Option<Donation>, StoreError>;

    /// All donations, or only those owned by `owner`, ordered by id.
    async fn list(&self, owner: Option<i32>) -> Result<Vec<Donation>, StoreError>;

    /// Apply the fields present in `patch`. Returns `None` when the row is gone.
    async fn update(&self, id: i32, patch: &DonationPatch) -> Result<Option<Donation>, StoreError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

/// [`DonationStore`] backed by the `donation` table.
#[derive(Clone)]
pub struct SeaDonationStore {
    db: DatabaseConnection,
}

impl SeaDonationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TryFrom<donation::Model> for Donation {
    type Error = StoreError;

    fn try_from(model: donation::Model) -> Result<Self, Self::Error> {
        let photos = serde_json::from_value(model.photos).map_err(|e| StoreError::Corrupt {
            id: model.id,
            reason: e.to_string(),
        })?;
        Ok(Donation {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            category: model.category,
            condition: model.condition,
            status: model.status,
            photos,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn photos_json(photos: &[String]) -> serde_json::Value {
    serde_json::Value::from(photos.to_vec())
}

#[async_trait]
impl DonationStore for SeaDonationStore {
    async fn insert(&self, new: NewDonation) -> Result<Donation, StoreError> {
        let now = Utc::now();
        let model = donation::ActiveModel {
            user_id: Set(new.user_id),
            title: Set(new.title),
            description: Set(new.description),
            category: Set(new.category),
            condition: Set(new.condition),
            status: Set(new.status),
            photos: Set(photos_json(&new.photos)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        model.try_into()
    }

    async fn find(&self, id: i32) -> Result<Option<Donation>, StoreError> {
        donation::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Donation::try_from)
            .transpose()
    }

    async fn list(&self, owner: Option<i32>) -> Result<Vec<Donation>, StoreError> {
        let mut query = donation::Entity::find();
        if let Some(owner) = owner {
            query = query.filter(donation::Column::UserId.eq(owner));
        }
        query
            .order_by_asc(donation::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Donation::try_from)
            .collect()
    }

    async fn update(&self, id: i32, patch: &DonationPatch) -> Result<Option<Donation>, StoreError> {
        let txn = self.db.begin().await?;

        let Some(existing) = donation::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: donation::ActiveModel = existing.into();
        if let Some(ref title) = patch.title {
            active.title = Set(title.clone());
        }
        if let Some(ref description) = patch.description {
            active.description = Set(description.clone());
        }
        if let Some(ref category) = patch.category {
            active.category = Set(category.clone());
        }
        if let Some(ref condition) = patch.condition {
            active.condition = Set(condition.clone());
        }
        if let Some(ref status) = patch.status {
            active.status = Set(status.trim().to_string());
        }
        if let Some(ref photos) = patch.photos {
            active.photos = Set(photos_json(photos));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        updated.try_into().map(Some)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = donation::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
