use std::sync::Arc;

use anyhow::Context;
use common::storage::{ObjectUploader, s3::S3Uploader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use donation_server::config::AppConfig;
use donation_server::database::init_db;
use donation_server::payment::{MidtransGateway, PaymentGateway};
use donation_server::seed::ensure_admin;
use donation_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    ensure_admin(&db, &config.auth).await?;

    let uploader: Option<Arc<dyn ObjectUploader>> = match S3Uploader::from_config(&config.storage)? {
        Some(uploader) => {
            info!(bucket = ?config.storage.bucket_name(), "Photo uploads enabled");
            Some(Arc::new(uploader))
        }
        None => {
            warn!("No storage bucket configured; photo uploads are disabled");
            None
        }
    };

    let payments: Option<Arc<dyn PaymentGateway>> =
        match MidtransGateway::from_config(&config.payment)? {
            Some(gateway) => Some(Arc::new(gateway)),
            None => {
                warn!("No payment server key configured; payments are disabled");
                None
            }
        };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(db, config, uploader, payments);
    let app = donation_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/scalar", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
