use std::env;

pub const DEFAULT_PAYPAL_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub upload_dir: String,
    pub paypal: PaypalConfig,
}

#[derive(Debug, Clone)]
pub struct PaypalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
    pub currency: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads/products".to_string());
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            upload_dir,
            paypal: PaypalConfig::from_env(),
        })
    }
}

impl PaypalConfig {
    /// Missing credentials are not fatal at startup; the provider rejects the
    /// token request and the order endpoints answer 502.
    pub fn from_env() -> Self {
        let client_id = env::var("PAYPAL_CLIENT_ID").unwrap_or_default();
        let client_secret = env::var("PAYPAL_CLIENT_SECRET").unwrap_or_default();
        if client_id.is_empty() || client_secret.is_empty() {
            tracing::warn!("PAYPAL_CLIENT_ID or PAYPAL_CLIENT_SECRET is not set");
        }
        Self {
            client_id,
            client_secret,
            base_url: env::var("PAYPAL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PAYPAL_BASE_URL.to_string()),
            currency: env::var("PAYPAL_CURRENCY").unwrap_or_else(|_| "USD".to_string()),
        }
    }
}
