use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for starting a payment.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePaymentRequest {
    /// Amount in the smallest currency unit (IDR has none).
    #[schema(example = 150000)]
    pub amount: i64,
    #[serde(default)]
    #[schema(example = 1)]
    pub auction_item_id: Option<i32>,
}

pub fn validate_create_payment(payload: &CreatePaymentRequest) -> Result<(), AppError> {
    if payload.amount <= 0 {
        return Err(AppError::Validation("Amount must be greater than 0".into()));
    }
    Ok(())
}

/// Link the payer follows to complete the payment.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PaymentResponse {
    #[schema(example = "YDR-1234567890")]
    pub order_id: String,
    #[schema(example = "https://app.sandbox.midtrans.com/snap/v4/redirection/abc")]
    pub payment_link_url: String,
    #[schema(example = "abc-123")]
    pub transaction_id: String,
    /// RFC 3339 expiry of the payment link.
    pub expiry_time: String,
}

/// Latest known status of a payment.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PaymentStatusResponse {
    #[schema(example = "YDR-1234567890")]
    pub order_id: String,
    pub transaction_id: Option<String>,
    /// Gateway transaction status (`pending`, `settlement`, `expire`, ...).
    #[schema(example = "settlement")]
    pub status: String,
    pub amount: i64,
}
