use std::sync::Arc;

use crate::{db::OrmConn, paypal::PaypalClient, services::upload_service::UploadPolicy};

#[derive(Clone)]
pub struct AppState {
    pub orm: Arc<OrmConn>,
    pub jwt_secret: Arc<str>,
    pub uploads: Arc<UploadPolicy>,
    pub payments: Arc<PaypalClient>,
}
