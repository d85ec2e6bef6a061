use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for finalizing a donation.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateFinalDonationRequest {
    #[schema(example = 12)]
    pub donation_id: i32,
    /// Handover notes (recipient, date, remarks).
    #[serde(default)]
    #[schema(example = "Delivered to Panti Asuhan Harapan")]
    pub notes: String,
}

pub fn validate_create_final_donation(payload: &CreateFinalDonationRequest) -> Result<(), AppError> {
    if payload.donation_id <= 0 {
        return Err(AppError::Validation("donation_id must be positive".into()));
    }
    if payload.notes.chars().count() > 4096 {
        return Err(AppError::Validation(
            "Notes must be at most 4096 characters".into(),
        ));
    }
    Ok(())
}

/// A finalized donation record.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FinalDonationResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = 12)]
    pub donation_id: i32,
    pub notes: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<crate::entity::final_donation::Model> for FinalDonationResponse {
    fn from(m: crate::entity::final_donation::Model) -> Self {
        Self {
            id: m.id,
            donation_id: m.donation_id,
            notes: m.notes,
            created_at: m.created_at,
        }
    }
}
