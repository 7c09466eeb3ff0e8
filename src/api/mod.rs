use axum::{Router, http::HeaderValue, middleware, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use tokio::sync::RwLock;

use crate::config::Config;
use crate::services::ReportingService;
use crate::state::SharedState;

mod admin;
mod assets;
pub mod auth;
mod charts;
mod employee;
mod error;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub reporting: ReportingService,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub const fn reporting(&self) -> &ReportingService {
        &self.reporting
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    let reporting = ReportingService::new(shared.store.clone());

    Arc::new(AppState { shared, reporting })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_minutes,
        )
    };

    let admin_routes = Router::new()
        .route("/admin/summary", get(admin::summary))
        .route("/admin/dashboard", get(admin::dashboard))
        .route(
            "/admin/create_employee",
            get(admin::create_employee_page).post(admin::create_employee),
        )
        .route("/admin/view_employees", get(admin::view_employees))
        .route("/admin/tracker", get(admin::tracker))
        .route_layer(middleware::from_fn(auth::require_admin));

    let employee_routes = Router::new()
        .route("/employee/dashboard", get(employee::dashboard))
        .route(
            "/employee/update",
            get(employee::list_logs).post(employee::submit_log),
        )
        .route("/employee/summary", get(employee::summary))
        .route_layer(middleware::from_fn(auth::require_employee));

    let authenticated_routes = Router::new()
        .route("/summary", get(auth::summary_redirect))
        .route("/logout", get(auth::logout))
        .route("/chart-data", get(charts::chart_data))
        .route_layer(middleware::from_fn(auth::require_login));

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_minutes,
        )));

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(admin_routes)
        .merge(employee_routes)
        .merge(authenticated_routes)
        .route("/", get(assets::login_page))
        .route("/login", get(assets::login_page).post(auth::login))
        .route("/logo.png", get(assets::logo))
        .route("/favicon.ico", get(assets::favicon))
        .layer(session_layer)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
