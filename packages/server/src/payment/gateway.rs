use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected gateway response: {0}")]
    Decode(String),
}

/// A charge to open with the gateway.
#[derive(Debug, Clone)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: i64,
    pub customer: String,
}

/// Where the payer completes a charge.
#[derive(Debug, Clone)]
pub struct PaymentLink {
    pub transaction_id: String,
    pub redirect_url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TransactionStatus {
    pub transaction_id: Option<String>,
    pub status: String,
}

/// Hosted-checkout payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_transaction(&self, order: &PaymentOrder) -> Result<PaymentLink, GatewayError>;

    async fn transaction_status(&self, order_id: &str) -> Result<TransactionStatus, GatewayError>;
}

/// Merchant order id of the form `YDR-<n>`, `n` being the first 32 bits of `uuid`.
pub fn new_order_id(uuid: Uuid) -> String {
    let bytes = uuid.as_bytes();
    let n = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    format!("YDR-{n}")
}
