//! HTTP transport: axum router, CORS and server lifecycle.

pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::context::ServiceContext;
use crate::error::AppError;

/// Largest multipart body accepted by `POST /qr`.
pub const MAX_FORM_BYTES: usize = 20 << 20;

/// Create the axum router with all routes.
pub fn create_router(ctx: ServiceContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/qr", get(handlers::qr_query).post(handlers::qr_form))
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(handlers::openapi))
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
        .layer(cors)
        .with_state(ctx)
}

/// Bind `addr` and serve until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn start_server(ctx: ServiceContext, addr: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("failed to bind {addr}: {e}")))?;
    tracing::info!("qrmint listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(ctx)).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            tracing::warn!(error = %self, "request rejected");
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.to_string()).into_response()
    }
}
