use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::identity::Identity;

use super::policy::{Access, ListScope, authorize, list_scope};
use super::store::{DonationStore, NewDonation, StoreError};
use super::{Donation, DonationPatch, DonationPayload};

#[derive(Debug, Error)]
pub enum DonationError {
    #[error("donation not found")]
    NotFound,
    #[error("caller may not access this donation")]
    Forbidden,
    #[error("authentication required")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Donation CRUD with ownership enforcement.
///
/// Every read and mutation fetches the row first, so a missing donation is
/// reported as `NotFound` before any permission decision.
#[derive(Clone)]
pub struct DonationService {
    store: Arc<dyn DonationStore>,
}

impl DonationService {
    pub fn new(store: Arc<dyn DonationStore>) -> Self {
        Self { store }
    }

    /// Persist a new donation owned by the caller.
    #[instrument(skip(self, payload), fields(caller = ?caller.user_id()))]
    pub async fn create(
        &self,
        payload: DonationPayload,
        caller: &Identity,
    ) -> Result<Donation, DonationError> {
        let owner = caller.user_id().ok_or(DonationError::Unauthorized)?;
        payload.validate()?;

        if payload.user_id.is_some_and(|claimed| claimed != owner) {
            debug!(claimed = ?payload.user_id, owner, "ignoring client-supplied owner");
        }

        let status = payload.effective_status();
        let donation = self
            .store
            .insert(NewDonation {
                user_id: owner,
                title: payload.title,
                description: payload.description,
                category: payload.category,
                condition: payload.condition,
                status,
                photos: payload.photos,
            })
            .await?;
        Ok(donation)
    }

    /// Everything for admins, the caller's own donations otherwise.
    pub async fn get_all(&self, identity: &Identity) -> Result<Vec<Donation>, DonationError> {
        let owner = match list_scope(identity)? {
            ListScope::All => None,
            ListScope::Owner(id) => Some(id),
        };
        Ok(self.store.list(owner).await?)
    }

    /// Fetch without any permission check.
    pub async fn get_by_id(&self, id: i32) -> Result<Donation, DonationError> {
        self.store.find(id).await?.ok_or(DonationError::NotFound)
    }

    /// Fetch, then apply the read rule against the stored owner.
    pub async fn get_for(&self, id: i32, identity: &Identity) -> Result<Donation, DonationError> {
        let donation = self.get_by_id(id).await?;
        authorize(identity, donation.user_id, Access::Read)?;
        Ok(donation)
    }

    /// Replace every mutable field. The owner never changes.
    #[instrument(skip(self, payload))]
    pub async fn update(
        &self,
        id: i32,
        payload: DonationPayload,
        identity: &Identity,
    ) -> Result<Donation, DonationError> {
        payload.validate()?;
        self.apply(id, payload.into_full_patch(), identity).await
    }

    /// Overwrite only the fields present in `patch`.
    #[instrument(skip(self, patch))]
    pub async fn patch(
        &self,
        id: i32,
        patch: DonationPatch,
        identity: &Identity,
    ) -> Result<Donation, DonationError> {
        patch.validate()?;
        self.apply(id, patch, identity).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32, identity: &Identity) -> Result<(), DonationError> {
        let donation = self.get_by_id(id).await?;
        authorize(identity, donation.user_id, Access::Mutate)?;
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(DonationError::NotFound)
        }
    }

    async fn apply(
        &self,
        id: i32,
        patch: DonationPatch,
        identity: &Identity,
    ) -> Result<Donation, DonationError> {
        let donation = self.get_by_id(id).await?;
        authorize(identity, donation.user_id, Access::Mutate)?;
        if patch.is_empty() {
            return Ok(donation);
        }
        self.store
            .update(id, &patch)
            .await?
            .ok_or(DonationError::NotFound)
    }
}
