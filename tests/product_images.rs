use std::{path::Path, sync::Arc};

use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use storefront_api::{
    config::{DEFAULT_PAYPAL_BASE_URL, PaypalConfig},
    entity::products,
    middleware::auth::AdminUser,
    paypal::PaypalClient,
    services::{admin_service, upload_service::UploadPolicy},
    state::AppState,
};
use uuid::Uuid;

const BOUNDARY: &str = "IMAGEBOUNDARY";

fn state(orm: sea_orm::DatabaseConnection, dir: &Path) -> AppState {
    AppState {
        orm: Arc::new(orm),
        jwt_secret: Arc::from("images-test-secret"),
        uploads: Arc::new(UploadPolicy::new(dir)),
        payments: Arc::new(PaypalClient::new(PaypalConfig {
            client_id: String::new(),
            client_secret: String::new(),
            base_url: DEFAULT_PAYPAL_BASE_URL.to_string(),
            currency: "USD".to_string(),
        })),
    }
}

fn product(id: Uuid) -> products::Model {
    products::Model {
        id,
        category_id: Uuid::new_v4(),
        name: "Zip Hoodie".into(),
        slug: "zip-hoodie".into(),
        sku: "HOD-ZIP".into(),
        description: None,
        old_price: None,
        new_price: 5499,
        cost_price: None,
        stock: 10,
        is_featured: false,
        is_on_sale: false,
        created_at: Utc::now().fixed_offset(),
        updated_at: Utc::now().fixed_offset(),
    }
}

async fn two_images() -> Multipart {
    let mut body: Vec<u8> = Vec::new();
    for name in ["front.jpg", "back.jpg"] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    let req = Request::builder()
        .method("POST")
        .uri("/images")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    Multipart::from_request(req, &()).await.unwrap()
}

#[tokio::test]
async fn stored_files_are_removed_when_image_rows_fail() {
    let tmp = tempfile::tempdir().unwrap();
    let product_id = Uuid::new_v4();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![product(product_id)]])
        .append_query_errors([DbErr::Custom("connection dropped".into())])
        .into_connection();
    let state = state(orm, tmp.path());
    let admin = AdminUser {
        user_id: Uuid::new_v4(),
    };

    let err = admin_service::upload_product_images(&state, &admin, product_id, two_images().await)
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let left = std::fs::read_dir(tmp.path()).map(|d| d.count()).unwrap_or(0);
    assert_eq!(left, 0, "uploaded files left behind without image rows");
}

#[tokio::test]
async fn unknown_product_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<products::Model>::new()])
        .into_connection();
    let state = state(orm, tmp.path());
    let admin = AdminUser {
        user_id: Uuid::new_v4(),
    };

    let err = admin_service::upload_product_images(&state, &admin, Uuid::new_v4(), two_images().await)
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}
