//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware in pipeline order (request ID, tracing, metrics,
//!   limits, rate limiting, security headers, CORS)
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{Credentials, SessionCodec};
use crate::config::AppConfig;
use crate::http::handlers::{auth, health, vendors};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::security::{
    apply_security_headers, cors_middleware, rate_limit_middleware, CorsPolicy, RateLimiter,
};
use crate::vendors::{MemoryVendorStore, StoreError, VendorStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionCodec>,
    pub credentials: Arc<Credentials>,
    pub vendors: Arc<dyn VendorStore>,
}

impl AppState {
    pub fn new(config: AppConfig, vendors: Arc<dyn VendorStore>) -> Self {
        Self {
            sessions: Arc::new(SessionCodec::new(config.auth.jwt_secret.as_bytes())),
            credentials: Arc::new(Credentials::from_config(&config.auth)),
            config: Arc::new(config),
            vendors,
        }
    }
}

/// HTTP server for the vendor portal.
pub struct HttpServer {
    router: Router,
    state: AppState,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a server over an existing vendor store.
    pub fn new(config: AppConfig, vendors: Arc<dyn VendorStore>) -> Self {
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
        let state = AppState::new(config, vendors);
        let router = Self::build_router(&state, limiter.clone());
        Self {
            router,
            state,
            limiter,
        }
    }

    /// Create a server with the in-memory store described by `config.storage`.
    pub fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let store = match &config.storage.snapshot_path {
            Some(path) => MemoryVendorStore::load_from_file(path)?,
            None => MemoryVendorStore::new(None),
        };
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers added later wrap earlier ones, so the rate limiter sees a
    /// request before the security headers, CORS and the handler do.
    fn build_router(state: &AppState, limiter: Arc<RateLimiter>) -> Router {
        let config = &state.config;
        let cors = Arc::new(CorsPolicy::new(&config.cors, config.environment));

        let mut router = Router::new()
            .route("/health", get(health::get_status))
            .route("/api/auth/login", post(auth::login))
            .route("/api/auth/logout", get(auth::logout))
            .route("/api/auth/session", get(auth::session))
            .route("/api/vendors", get(vendors::list).post(vendors::create))
            .route(
                "/api/vendors/{id}",
                get(vendors::get)
                    .put(vendors::update)
                    .delete(vendors::delete),
            )
            .with_state(state.clone())
            .layer(middleware::from_fn_with_state(cors, cors_middleware));

        if config.security.enable_headers {
            router = apply_security_headers(router, config.environment);
        }
        if config.rate_limit.enabled {
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Run the server until `shutdown` fires or Ctrl+C is received, then
    /// flush the vendor store.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = ?self.state.config.environment,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        if let Err(e) = self.state.vendors.flush().await {
            tracing::error!(error = %e, "Failed to flush vendor store");
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
