use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
use serde_json::Value;
use storefront_api::{
    config::{DEFAULT_PAYPAL_BASE_URL, PaypalConfig},
    entity::{
        sea_orm_active_enums::{Role, SettingType},
        settings, users,
    },
    error::ADMIN_REQUIRED,
    paypal::PaypalClient,
    routes::build_router,
    services::{auth_service::issue_token, upload_service::UploadPolicy},
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "gate-test-secret";

fn app(orm: DatabaseConnection) -> Router {
    let state = AppState {
        orm: Arc::new(orm),
        jwt_secret: Arc::from(SECRET),
        uploads: Arc::new(UploadPolicy::new(std::env::temp_dir().join("storefront-gate"))),
        payments: Arc::new(PaypalClient::new(PaypalConfig {
            client_id: String::new(),
            client_secret: String::new(),
            base_url: DEFAULT_PAYPAL_BASE_URL.to_string(),
            currency: "USD".to_string(),
        })),
    };
    build_router(state)
}

fn user(id: Uuid, role: Role) -> users::Model {
    users::Model {
        id,
        email: format!("{}@example.com", role.as_str().to_lowercase()),
        password_hash: "not-a-real-hash".into(),
        role,
        first_name: None,
        last_name: None,
        phone: None,
        created_at: Utc::now().fixed_offset(),
    }
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn customer_gets_403_with_fixed_message() {
    let id = Uuid::new_v4();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user(id, Role::Customer)]])
        .into_connection();
    let token = issue_token(id, Role::Customer, SECRET).unwrap();

    let response = app(orm)
        .oneshot(get("/api/admin/settings", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["message"], ADMIN_REQUIRED);
}

#[tokio::test]
async fn role_claim_in_token_is_not_trusted() {
    // Token claims admin, the stored row says customer.
    let id = Uuid::new_v4();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user(id, Role::Customer)]])
        .into_connection();
    let token = issue_token(id, Role::Admin, SECRET).unwrap();

    let response = app(orm)
        .oneshot(get("/api/admin/coupons", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_user_is_forbidden() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();
    let token = issue_token(Uuid::new_v4(), Role::Admin, SECRET).unwrap();

    let response = app(orm)
        .oneshot(get("/api/admin/settings", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_reaches_the_handler() {
    let id = Uuid::new_v4();
    let setting = settings::Model {
        id: Uuid::new_v4(),
        key: "store_name".into(),
        value: "Demo Store".into(),
        kind: SettingType::Text,
        updated_at: Utc::now().fixed_offset(),
    };
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user(id, Role::Admin)]])
        .append_query_results([vec![setting]])
        .into_connection();
    let token = issue_token(id, Role::Admin, SECRET).unwrap();

    let response = app(orm)
        .oneshot(get("/api/admin/settings", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"][0]["key"], "store_name");
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn missing_or_bad_token_is_401() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(orm);

    let response = app
        .clone()
        .oneshot(get("/api/admin/settings", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/api/admin/settings", Some("not.a.jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_lookup_failure_is_a_generic_500() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset by peer".into())])
        .into_connection();
    let token = issue_token(Uuid::new_v4(), Role::Admin, SECRET).unwrap();

    let response = app(orm)
        .oneshot(get("/api/admin/settings", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Internal Server Error");
    assert!(!body.to_string().contains("connection reset"));
}
