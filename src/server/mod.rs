//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::middleware::{normalize_error_response, ObservabilityLayer, SanitizedMakeSpan};
use crate::migration;
use crate::openapi::ApiDoc;
use crate::repository::{
    linked_identity::LinkedIdentityRepositoryImpl, restaurant::RestaurantRepositoryImpl,
    session::SessionRepositoryImpl, submission::SubmissionRepositoryImpl,
    user::UserRepositoryImpl,
};
use crate::service::{AuthService, OAuthService, RestaurantService, SubmissionService};
use crate::state::HasServices;
use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa_swagger_ui::SwaggerUi;

/// How often expired sessions are swept from the store
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub restaurant_service: Arc<RestaurantService<RestaurantRepositoryImpl>>,
    pub submission_service:
        Arc<SubmissionService<SubmissionRepositoryImpl, RestaurantRepositoryImpl>>,
    pub auth_service: Arc<AuthService<UserRepositoryImpl, SessionRepositoryImpl>>,
    pub oauth_service: Arc<OAuthService<UserRepositoryImpl, LinkedIdentityRepositoryImpl>>,
}

impl AppState {
    /// Wire repositories and services on top of a connection pool
    pub fn new(config: Config, db_pool: MySqlPool) -> Self {
        let restaurant_repo = Arc::new(RestaurantRepositoryImpl::new(db_pool.clone()));
        let submission_repo = Arc::new(SubmissionRepositoryImpl::new(db_pool.clone()));
        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let session_repo = Arc::new(SessionRepositoryImpl::new(db_pool.clone()));
        let linked_identity_repo = Arc::new(LinkedIdentityRepositoryImpl::new(db_pool.clone()));

        let restaurant_service = Arc::new(RestaurantService::new(restaurant_repo.clone()));
        let submission_service = Arc::new(SubmissionService::new(
            submission_repo,
            restaurant_repo,
        ));
        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            session_repo,
            &config.session,
        ));
        let oauth_service = Arc::new(OAuthService::new(
            user_repo,
            linked_identity_repo,
            config.oauth.clone(),
        ));

        Self {
            config: Arc::new(config),
            db_pool,
            restaurant_service,
            submission_service,
            auth_service,
            oauth_service,
        }
    }
}

impl HasServices for AppState {
    type RestaurantRepo = RestaurantRepositoryImpl;
    type SubmissionRepo = SubmissionRepositoryImpl;
    type UserRepo = UserRepositoryImpl;
    type SessionRepo = SessionRepositoryImpl;
    type LinkedIdentityRepo = LinkedIdentityRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn restaurant_service(&self) -> &RestaurantService<Self::RestaurantRepo> {
        &self.restaurant_service
    }

    fn submission_service(
        &self,
    ) -> &SubmissionService<Self::SubmissionRepo, Self::RestaurantRepo> {
        &self.submission_service
    }

    fn auth_service(&self) -> &AuthService<Self::UserRepo, Self::SessionRepo> {
        &self.auth_service
    }

    fn oauth_service(&self) -> &OAuthService<Self::UserRepo, Self::LinkedIdentityRepo> {
        &self.oauth_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.db_pool)
            .await
            .is_ok()
    }
}

pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    migration::run_migrations(&config).await?;

    // Create database connection pool
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    info!("Connected to database");

    let state = AppState::new(config.clone(), db_pool);
    spawn_session_purge(state.clone());

    let mut app = build_router(state);

    if config.telemetry.metrics_enabled {
        let metrics_router = Router::new()
            .route("/metrics", get(api::metrics::metrics_handler))
            .with_state(Arc::new(prometheus_handle));
        app = app.merge(metrics_router);
    }

    if !config.is_production() {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::build()),
        );
        info!("Swagger UI available at /swagger-ui");
    }

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Periodically delete sessions whose expiry has passed. Lookups already
/// ignore them; this keeps the table from growing without bound.
fn spawn_session_purge<S: HasServices>(state: S) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match state.auth_service().purge_expired_sessions().await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "Purged expired sessions"),
                Err(e) => warn!(error = %e, "Failed to purge expired sessions"),
            }
        }
    });
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

/// CORS for the browser client. Session cookies need credentials, which rules
/// out wildcard origins, so an empty allow-list falls back to `CLIENT_URL`.
fn cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    let configured = if config.cors_allowed_origins.is_empty() {
        std::slice::from_ref(&config.client_url)
    } else {
        config.cors_allowed_origins.as_slice()
    };

    let origins: Vec<HeaderValue> = configured
        .iter()
        .map(|origin| origin.trim_end_matches('/'))
        .filter_map(|origin| match origin.parse() {
            // A wildcard cannot be combined with credentials
            Ok(_) if origin == "*" => {
                warn!("Ignoring wildcard CORS origin");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

/// Build the HTTP router with generic state type
///
/// This function is generic over the state type, allowing it to work with
/// both production `AppState` and test implementations that implement `HasServices`.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = cors_layer(state.config());

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // Restaurant catalog
        .route(
            "/api/restaurants",
            get(api::restaurant::list::<S>).post(api::restaurant::create::<S>),
        )
        .route(
            "/api/restaurants/popular",
            get(api::restaurant::popular::<S>),
        )
        .route(
            "/api/restaurants/{id}",
            get(api::restaurant::get::<S>)
                .patch(api::restaurant::update::<S>)
                .delete(api::restaurant::delete::<S>),
        )
        // Submissions
        .route(
            "/api/submissions",
            get(api::submission::list::<S>).post(api::submission::create::<S>),
        )
        .route(
            "/api/submissions/{id}",
            get(api::submission::get::<S>)
                .patch(api::submission::update::<S>)
                .delete(api::submission::remove::<S>),
        )
        // Local accounts and sessions
        .route("/api/auth/register", post(api::auth::register::<S>))
        .route("/api/auth/login", post(api::auth::login::<S>))
        .route("/api/auth/logout", post(api::auth::logout::<S>))
        .route("/api/auth/me", get(api::auth::me::<S>))
        // Social login
        .route("/api/auth/google", get(api::auth::google::<S>))
        .route(
            "/api/auth/google/callback",
            get(api::auth::google_callback::<S>),
        )
        .route("/api/auth/naver", get(api::auth::naver::<S>))
        .route(
            "/api/auth/naver/callback",
            get(api::auth::naver_callback::<S>),
        )
        // Add middleware
        .layer(from_fn(normalize_error_response))
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(cors)
        .with_state(state)
}
