//! Axum server setup
//!
//! Server skeleton with:
//! - CORS restricted to the configured origins, credentials allowed
//! - Request tracing and a request timeout
//! - Problem-details fallbacks for unknown routes and methods
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::time::Duration;

use axum::http::{HeaderValue, StatusCode, Uri};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::config::Settings;
use crate::db::{schema, PgTodoStore};
use crate::error::{Error, Result};
use crate::state::AppState;

/// Build the application router with all routes and middleware.
///
/// Fails when a configured CORS origin isn't a valid header value.
pub fn build_router(state: AppState, settings: &Settings) -> Result<Router> {
    let cors = cors_layer(&settings.cors_origins)?;

    // Middleware stack
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer(settings.request_timeout))
        .layer(cors);

    Ok(Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::todos::router())
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware)
        .with_state(state))
}

/// Run the HTTP server.
///
/// Creates the schema before accepting traffic, then serves until a
/// shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&settings.database_url).await?;
/// run_server(pool, settings).await?;
/// ```
pub async fn run_server(pool: PgPool, settings: Settings) -> Result<()> {
    schema::init(&pool).await?;

    let state = AppState::new(PgTodoStore::new(pool), settings.app_name.clone());
    let app = build_router(state, &settings)?;

    // Bind listener
    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!(
        app = %settings.app_name,
        addr = %listener.local_addr()?,
        "Server listening"
    );

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Requests running past `timeout` are answered with 408.
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// CORS for the configured origins; `*` mirrors whatever origin asks.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: wildcard origin configured - every origin is allowed");
        return Ok(layer.allow_origin(AllowOrigin::mirror_request()));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| Error::InvalidOrigin {
                origin: origin.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(origins))
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

async fn method_not_allowed(uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        path: uri.path().to_string(),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
