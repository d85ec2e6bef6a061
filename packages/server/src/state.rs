use std::sync::Arc;

use common::storage::ObjectUploader;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::donation::{DonationService, SeaDonationStore};
use crate::payment::PaymentGateway;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub donations: DonationService,
    /// `None` when no storage bucket is configured.
    pub uploader: Option<Arc<dyn ObjectUploader>>,
    /// `None` when no gateway server key is configured.
    pub payments: Option<Arc<dyn PaymentGateway>>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: AppConfig,
        uploader: Option<Arc<dyn ObjectUploader>>,
        payments: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        let donations = DonationService::new(Arc::new(SeaDonationStore::new(db.clone())));
        Self {
            db,
            config,
            donations,
            uploader,
            payments,
        }
    }
}
