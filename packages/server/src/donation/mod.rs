//! Donation lifecycle: access policy, persistence capability and the service
//! that ties them together.

mod policy;
mod service;
mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use policy::{Access, ListScope, authorize, list_scope};
pub use service::{DonationError, DonationService};
pub use store::{DonationStore, NewDonation, SeaDonationStore, StoreError};

/// Status assigned when a donation is created without one.
pub const DEFAULT_STATUS: &str = "pending";

/// Status a donation must carry to appear in final-donation listings.
pub const FINALIZED_STATUS: &str = "verified_for_donation";

const MAX_TITLE_LEN: usize = 256;
const MAX_STATUS_LEN: usize = 64;

/// A donated item as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Donation {
    #[schema(example = 12)]
    pub id: i32,
    /// Owning user.
    #[schema(example = 3)]
    pub user_id: i32,
    #[schema(example = "Wooden chair")]
    pub title: String,
    #[schema(example = "Sturdy oak chair, lightly used")]
    pub description: String,
    #[schema(example = "furniture")]
    pub category: String,
    #[schema(example = "used")]
    pub condition: String,
    #[schema(example = "pending")]
    pub status: String,
    /// Photo URLs in upload order.
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full donation body accepted by create and update.
///
/// Missing fields take their defaults. Any client-supplied `user_id` is
/// ignored in favor of the caller's identity.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct DonationPayload {
    /// Ignored; the owner is always the authenticated caller.
    pub user_id: Option<i32>,
    #[schema(example = "Wooden chair")]
    pub title: String,
    pub description: String,
    #[schema(example = "furniture")]
    pub category: String,
    #[schema(example = "used")]
    pub condition: String,
    /// Defaults to `pending` when empty.
    pub status: String,
    pub photos: Vec<String>,
}

impl DonationPayload {
    pub fn validate(&self) -> Result<(), DonationError> {
        validate_title(&self.title)?;
        if self.status.trim().chars().count() > MAX_STATUS_LEN {
            return Err(DonationError::Validation(format!(
                "Status must be at most {MAX_STATUS_LEN} characters"
            )));
        }
        Ok(())
    }

    /// The status to store, substituting the default for a blank value.
    pub fn effective_status(&self) -> String {
        let status = self.status.trim();
        if status.is_empty() {
            DEFAULT_STATUS.to_string()
        } else {
            status.to_string()
        }
    }

    /// Turn the payload into a patch that overwrites every mutable field.
    pub fn into_full_patch(self) -> DonationPatch {
        let status = self.effective_status();
        DonationPatch {
            title: Some(self.title),
            description: Some(self.description),
            category: Some(self.category),
            condition: Some(self.condition),
            status: Some(status),
            photos: Some(self.photos),
        }
    }
}

/// Partial donation update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
pub struct DonationPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub status: Option<String>,
    pub photos: Option<Vec<String>>,
}

impl DonationPatch {
    pub fn validate(&self) -> Result<(), DonationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(status) = &self.status {
            let len = status.trim().chars().count();
            if len == 0 || len > MAX_STATUS_LEN {
                return Err(DonationError::Validation(format!(
                    "Status must be 1-{MAX_STATUS_LEN} characters"
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn validate_title(title: &str) -> Result<(), DonationError> {
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DonationError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}
