//! Populate a database with demo catalog data. Safe to run repeatedly.

use storefront_api::{db, seed};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_api=debug".into()),
        )
        .init();

    // Only the database is needed here, so the full app config is not loaded.
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    let outcome = db::with_connection(&database_url, |conn| {
        Box::pin(async move {
            db::run_migrations(conn).await?;
            seed::run(conn).await
        })
    })
    .await;

    match outcome {
        Ok(report) => {
            tracing::info!(inserted = report.inserted(), ?report, "seed completed");
            for user in &seed::USERS {
                tracing::info!(
                    email = user.email,
                    password = user.password,
                    role = user.role.as_str(),
                    "seeded login"
                );
            }
        }
        Err(err) => {
            tracing::error!(error = ?err, "seed failed");
            std::process::exit(1);
        }
    }
}
