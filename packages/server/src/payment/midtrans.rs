use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::gateway::{GatewayError, PaymentGateway, PaymentLink, PaymentOrder, TransactionStatus};
use crate::config::PaymentConfig;

/// Midtrans reports times in Western Indonesia Time.
const WIB_OFFSET_SECS: i32 = 7 * 3600;

/// Midtrans Snap client.
pub struct MidtransGateway {
    client: reqwest::Client,
    server_key: String,
    snap_url: String,
    api_url: String,
    expiry_hours: u32,
}

#[derive(Deserialize)]
struct SnapResponse {
    token: String,
    redirect_url: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status_code: Option<String>,
    status_message: Option<String>,
    transaction_id: Option<String>,
    transaction_status: Option<String>,
}

impl MidtransGateway {
    /// Returns `None` when no server key is configured.
    pub fn from_config(config: &PaymentConfig) -> Result<Option<Self>, GatewayError> {
        let Some(server_key) = config
            .server_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Some(Self {
            client,
            server_key: server_key.to_string(),
            snap_url: config.snap_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            expiry_hours: config.expiry_hours,
        }))
    }

    async fn rejected(response: reqwest::Response) -> GatewayError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        GatewayError::Rejected { status, body }
    }
}

#[async_trait]
impl PaymentGateway for MidtransGateway {
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn create_transaction(&self, order: &PaymentOrder) -> Result<PaymentLink, GatewayError> {
        let wib = FixedOffset::east_opt(WIB_OFFSET_SECS)
            .ok_or_else(|| GatewayError::Decode("invalid timezone offset".into()))?;
        let started = Utc::now();
        let body = json!({
            "transaction_details": {
                "order_id": order.order_id,
                "gross_amount": order.amount,
            },
            "customer_details": { "first_name": order.customer },
            "expiry": {
                "start_time": started.with_timezone(&wib).format("%Y-%m-%d %H:%M:%S %z").to_string(),
                "unit": "hour",
                "duration": self.expiry_hours,
            },
        });

        let response = self
            .client
            .post(format!("{}/transactions", self.snap_url))
            .basic_auth(&self.server_key, Some(""))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let snap: SnapResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        debug!("snap transaction created");

        Ok(PaymentLink {
            transaction_id: snap.token,
            redirect_url: snap.redirect_url,
            expires_at: started + chrono::Duration::hours(i64::from(self.expiry_hours)),
        })
    }

    #[instrument(skip(self))]
    async fn transaction_status(&self, order_id: &str) -> Result<TransactionStatus, GatewayError> {
        let response = self
            .client
            .get(format!("{}/v2/{}/status", self.api_url, order_id))
            .basic_auth(&self.server_key, Some(""))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        // Midtrans reports lookup failures with HTTP 200 and a non-2xx status_code.
        if let Some(code) = body.status_code.as_deref()
            && !code.starts_with('2')
        {
            return Err(GatewayError::Rejected {
                status: code.parse().unwrap_or(0),
                body: body.status_message.unwrap_or_default(),
            });
        }

        let status = body
            .transaction_status
            .ok_or_else(|| GatewayError::Decode("missing transaction_status".into()))?;

        Ok(TransactionStatus {
            transaction_id: body.transaction_id,
            status,
        })
    }
}
