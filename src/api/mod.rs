use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

pub mod auth;
mod catalogs;
mod error;
mod justificaciones;
mod monitorias;
mod observability;
mod system;
pub mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.auth_service
    }
}

pub fn create_app_state(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let auth_service = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        config.security.clone(),
    ));

    Arc::new(AppState {
        config,
        store,
        auth_service,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(create_app_state(config, store, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    // Outermost first; the request span must enclose the auth gate.
    Router::new().nest("/api", api_router).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer.allow_methods(Any).allow_headers(Any))
            .layer(middleware::from_fn(observability::logging_middleware)),
    )
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .route("/logout-all", post(auth::logout_all))
        .route("/refresh", post(auth::refresh))
        .route(
            "/personas",
            get(catalogs::list_personas).post(catalogs::create_persona),
        )
        .route(
            "/personas/{id}",
            get(catalogs::get_persona)
                .put(catalogs::update_persona)
                .delete(catalogs::delete_persona),
        )
        .route(
            "/dependencias",
            get(catalogs::list_dependencias).post(catalogs::create_dependencia),
        )
        .route(
            "/dependencias/{id}",
            get(catalogs::get_dependencia)
                .put(catalogs::update_dependencia)
                .delete(catalogs::delete_dependencia),
        )
        .route(
            "/tipos-monitoria",
            get(catalogs::list_tipos_monitoria).post(catalogs::create_tipo_monitoria),
        )
        .route(
            "/tipos-monitoria/{id}",
            get(catalogs::get_tipo_monitoria)
                .put(catalogs::update_tipo_monitoria)
                .delete(catalogs::delete_tipo_monitoria),
        )
        .route(
            "/periodos-academicos",
            get(catalogs::list_periodos).post(catalogs::create_periodo),
        )
        .route(
            "/periodos-academicos/{id}",
            get(catalogs::get_periodo)
                .put(catalogs::update_periodo)
                .delete(catalogs::delete_periodo),
        )
        .route(
            "/tipos-justificacion",
            get(catalogs::list_tipos_justificacion).post(catalogs::create_tipo_justificacion),
        )
        .route(
            "/tipos-justificacion/{id}",
            get(catalogs::get_tipo_justificacion)
                .put(catalogs::update_tipo_justificacion)
                .delete(catalogs::delete_tipo_justificacion),
        )
        .route(
            "/monitorias",
            get(monitorias::list_monitorias).post(monitorias::create_monitoria),
        )
        .route(
            "/monitorias/{id}",
            get(monitorias::get_monitoria)
                .put(monitorias::update_monitoria)
                .delete(monitorias::delete_monitoria),
        )
        .route(
            "/monitorias/{id}/justificaciones",
            get(justificaciones::list_for_monitoria),
        )
        .route(
            "/justificaciones",
            get(justificaciones::list_justificaciones)
                .post(justificaciones::create_justificacion),
        )
        .route(
            "/justificaciones/{id}",
            get(justificaciones::get_justificacion)
                .delete(justificaciones::delete_justificacion),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
