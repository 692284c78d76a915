//! HTTP transport implementation

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::{future::Future, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::GatewayError;
use crate::security::{SecurityConfig, SecurityProvider, rate_limit_middleware};
use crate::server::{SearchRequest, TarawihService};

/// Prefix shared by all application routes
pub const ROUTE_PREFIX: &str = "/tarawihdimana";

/// HTTP transport serving the gateway routes
#[derive(Clone)]
pub struct HttpTransport {
    port: u16,
    host: String,
    cors_origins: Vec<String>,
    security_provider: Arc<SecurityProvider>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Query string of the prayer-times route
#[derive(Debug, Default, Deserialize)]
pub struct PrayerTimesParams {
    pub city: Option<String>,
}

/// Application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TarawihService>,
}

impl HttpTransport {
    /// Create a new HTTP transport instance
    pub fn new(port: u16) -> Self {
        Self::with_config("0.0.0.0".to_string(), port, vec!["*".to_string()], SecurityConfig::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(
        host: String,
        port: u16,
        cors_origins: Vec<String>,
        security: SecurityConfig,
    ) -> Self {
        Self::with_security(host, port, cors_origins, Arc::new(SecurityProvider::new(security)))
    }

    /// Create a new HTTP transport sharing an existing security provider
    pub fn with_security(
        host: String,
        port: u16,
        cors_origins: Vec<String>,
        security_provider: Arc<SecurityProvider>,
    ) -> Self {
        Self {
            port,
            host,
            cors_origins,
            security_provider,
        }
    }

    /// Transport for a loaded server configuration
    pub fn from_config(config: &ServerConfig, security_provider: Arc<SecurityProvider>) -> Self {
        Self::with_security(
            config.host.clone(),
            config.port,
            config.allowed_origins.clone(),
            security_provider,
        )
    }

    pub fn security_provider(&self) -> &Arc<SecurityProvider> {
        &self.security_provider
    }

    fn cors_layer(&self) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                HeaderName::from_static("x-requested-with"),
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
            ]);

        if self.cors_origins.iter().any(|origin| origin == "*") {
            return cors.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        cors.allow_origin(AllowOrigin::list(origins))
    }

    /// Create the Axum router with all routes and middleware
    pub fn create_router(&self, service: Arc<TarawihService>) -> Router {
        let app_state = AppState { service };

        Router::new()
            .route(
                &format!("{}/random-nearest-mosque", ROUTE_PREFIX),
                post(handle_random_nearest_mosque),
            )
            .route(&format!("{}/prayer-times", ROUTE_PREFIX), get(handle_prayer_times))
            .route("/health", get(handle_health_check))
            .with_state(app_state)
            // Every route, /health included, draws from the one global bucket.
            .layer(middleware::from_fn_with_state(
                self.security_provider.rate_limiter(),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn(request_logging_middleware))
            // Outermost, so preflights bypass the limiter and 429s carry CORS headers.
            .layer(self.cors_layer())
    }

    /// Serve until `shutdown` resolves
    pub async fn start<F>(&self, service: Arc<TarawihService>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.create_router(service);
        let addr = format!("{}:{}", self.host, self.port);

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;

        info!("HTTP server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;

        debug!("HTTP transport shutdown completed");
        Ok(())
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(9999)
    }
}

/// Pick a random mosque near the posted coordinates
async fn handle_random_nearest_mosque(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            debug!("Rejected search body: {}", rejection);
            return GatewayError::bad_request("Invalid JSON format").into_response();
        }
    };

    match state.service.random_nearest_mosque(request).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Today's prayer schedule for `?city=`
async fn handle_prayer_times(
    State(state): State<AppState>,
    Query(params): Query<PrayerTimesParams>,
) -> Response {
    match state.service.prayer_times(params.city.as_deref()).await {
        Ok(schedule) => (StatusCode::OK, Json(schedule)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn handle_health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now(),
    };
    (StatusCode::OK, Json(response))
}

fn error_response(e: GatewayError) -> Response {
    if e.status_code().is_server_error() {
        error!("Request failed: {}", e);
    }
    e.into_response()
}

/// Request logging middleware
async fn request_logging_middleware(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let start_time = std::time::Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    debug!(
        "Request {} {} completed in {}ms with status {}",
        method,
        path,
        start_time.elapsed().as_millis(),
        response.status()
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new(3001);
        assert_eq!(transport.port, 3001);
        assert_eq!(transport.host, "0.0.0.0");
        assert_eq!(transport.cors_origins, vec!["*"]);
    }

    #[test]
    fn test_http_transport_with_config() {
        let transport = HttpTransport::with_config(
            "127.0.0.1".to_string(),
            8080,
            vec!["http://localhost:3000".to_string()],
            SecurityConfig {
                rate_limit_max: 4,
            },
        );

        assert_eq!(transport.port, 8080);
        assert_eq!(transport.host, "127.0.0.1");
        assert_eq!(transport.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(transport.security_provider().rate_limiter().requests_per_second(), 4);
    }

    #[test]
    fn test_from_config_uses_allowed_origins() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 7000,
            allowed_origins: vec!["https://tarawih.example".to_string()],
            ..ServerConfig::default()
        };
        let transport = HttpTransport::from_config(
            &config,
            Arc::new(SecurityProvider::new(SecurityConfig::default())),
        );
        assert_eq!(transport.port, 7000);
        assert_eq!(transport.cors_origins, vec!["https://tarawih.example"]);
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "1.0.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&response).expect("Should serialize");
        assert!(json.contains("healthy"));
        assert!(json.contains("1.0.0"));
    }
}
