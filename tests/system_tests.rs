//! Integration tests for the health probes.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use monitorias::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("monitorias-system-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = monitorias::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    monitorias::api::router(state)
}

#[tokio::test]
async fn test_health_live() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(body_json["success"].as_bool().unwrap_or(false));
    assert_eq!(body_json["data"]["status"], "alive");
}

#[tokio::test]
async fn test_health_ready() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body_json["data"]["ready"], true);
    assert_eq!(body_json["data"]["checks"]["database"], true);
    assert_eq!(body_json["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_metrics_requires_token() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seed_demo_users_is_idempotent() {
    let db_path =
        std::env::temp_dir().join(format!("monitorias-seed-test-{}.db", uuid::Uuid::new_v4()));
    let store = monitorias::db::Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .unwrap();

    let mut security = Config::default().security;
    security.argon2_memory_cost_kib = 1024;
    security.argon2_time_cost = 1;

    assert_eq!(store.seed_demo_users(&security).await.unwrap(), 3);
    assert_eq!(store.seed_demo_users(&security).await.unwrap(), 0);

    let admin = store
        .get_user_by_email("admin@ejemplo.com")
        .await
        .unwrap()
        .unwrap();
    assert!(admin.email_verified_at.is_some());
    assert_eq!(admin.name, "Administrador");

    for (email, name) in [
        ("usuario@ejemplo.com", "Usuario Normal"),
        ("prueba@ejemplo.com", "Usuario Prueba"),
    ] {
        let user = store.get_user_by_email(email).await.unwrap().unwrap();
        assert_eq!(user.name, name);
    }
}

#[tokio::test]
async fn test_health_ready_reports_database_down() {
    let db_path =
        std::env::temp_dir().join(format!("monitorias-system-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = monitorias::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let app = monitorias::api::router(state.clone());

    // Closing a clone closes the shared pool.
    state.store().conn.clone().close().await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/system/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body_json["success"], false);
    assert_eq!(body_json["data"]["ready"], false);
    assert_eq!(body_json["data"]["checks"]["database"], false);
}
