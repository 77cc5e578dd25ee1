use storefront_api::{config::AppConfig, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    db::with_connection(&config.database_url, |conn| {
        Box::pin(async move { db::run_migrations(conn).await })
    })
    .await?;
    tracing::info!("migrations applied");
    Ok(())
}
