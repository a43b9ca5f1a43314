//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::operations::{ExecuteError, Operation, OperationRegistry};

use super::types::*;

/// Shared application state. Read-only once the server is running.
pub struct AppState {
    pub config: Config,
    /// Operations mounted as POST routes
    pub operations: OperationRegistry,
}

impl AppState {
    pub fn new(config: Config, operations: OperationRegistry) -> Self {
        Self { config, operations }
    }
}

/// Build the application router: one POST route per registered operation
/// plus the discovery endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let mut operation_routes: Router<Arc<AppState>> = Router::new();
    for operation in state.operations.iter() {
        let path = format!("/{}", operation.name());
        let operation = Arc::clone(operation);
        operation_routes = operation_routes.route(
            &path,
            post(move |payload: Result<Json<OperationRequest>, JsonRejection>| {
                run_operation(Arc::clone(&operation), payload)
            }),
        );
    }

    Router::new()
        .route("/health", get(health))
        .route("/operations", get(list_operations))
        .merge(operation_routes)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let operations = OperationRegistry::with_limits(config.matrix_limits);
    tracing::info!(
        "Registered {} operations: {}",
        operations.len(),
        operations
            .list()
            .iter()
            .map(|op| op.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config, operations));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Setup graceful shutdown on SIGTERM/SIGINT
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}

/// Validate the body, run the operation and map the outcome onto the
/// response convention.
async fn run_operation(
    operation: Arc<dyn Operation>,
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::warn!(operation = operation.name(), "Rejected request body: {}", message);
            // Oversized bodies keep their own status; every other rejection
            // is a plain bad request.
            let status = match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return (status, Json(ErrorResponse::new(message))).into_response();
        }
    };

    // Matrix products are CPU-bound; keep them off the async workers.
    let name = operation.name();
    let outcome = tokio::task::spawn_blocking(move || operation.execute(request.data)).await;

    match outcome {
        Ok(Ok(value)) => (StatusCode::OK, Json(value)).into_response(),
        Ok(Err(ExecuteError::InvalidInput(message))) => {
            tracing::warn!(operation = name, "Invalid input: {}", message);
            bad_request(message)
        }
        Ok(Err(ExecuteError::Operation(e))) => {
            tracing::debug!(operation = name, "Operation error: {}", e);
            (StatusCode::OK, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
        Err(e) => {
            tracing::error!(operation = name, "Operation task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Internal error while computing {}", name))),
            )
                .into_response()
        }
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        operations: state.operations.len(),
    })
}

/// List registered operations.
async fn list_operations(State(state): State<Arc<AppState>>) -> Json<OperationsResponse> {
    Json(OperationsResponse {
        operations: state.operations.list(),
    })
}
