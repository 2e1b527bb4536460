//! HTTP API.
//!
//! Serves the shared model over JSON:
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /` | service descriptor |
//! | `GET /health` | liveness plus model readiness, never loads the model |
//! | `GET /model_info`, `GET /describe` | static model metadata |
//! | `POST /extract` | entity extraction, loads the model on first use |
//!
//! Every failure is answered with a JSON body carrying a readable cause;
//! nothing a client sends can take the process down.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use crate::config::ServerSettings;
use crate::error::{ExtractError, HandleError, ServeError};
use crate::extract::{ExtractRequest, ExtractResponse, extract};
use crate::handle::{LazyResourceHandle, ResourceInfo, ResourceLoader};
use crate::model::EntityModel;
use crate::observability::metrics;

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "gazette NER service";

// ============================================================================
// State
// ============================================================================

/// State shared by every handler.
pub struct AppState<L: ResourceLoader> {
    /// The one model handle for this process.
    pub handle: Arc<LazyResourceHandle<L>>,
    /// Threshold applied when a request omits one.
    pub default_threshold: f64,
}

impl<L: ResourceLoader> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            default_threshold: self.default_threshold,
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Response for `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests
    pub status: String,
    /// Whether the model has been loaded
    pub model_loaded: bool,
    /// Model identifier
    pub model_name: String,
}

/// Error body for every non-2xx answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error kind
    pub error: String,
    /// Human-readable cause
    pub detail: String,
}

/// An error answer: status plus [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    detail: String,
}

impl ApiError {
    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind.to_string(),
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Validation(e) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                kind: "validation_error",
                detail: e.to_string(),
            },
            ExtractError::Handle(HandleError::Initialization(e)) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                kind: "initialization_error",
                detail: format!("Extraction failed: {e}"),
            },
            ExtractError::Handle(HandleError::Operation(e)) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                kind: "operation_error",
                detail: format!("Extraction failed: {e}"),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        Self {
            status,
            kind: "invalid_request",
            detail: rejection.body_text(),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Builds the API router around `state`.
///
/// Request bodies larger than `settings.max_body_bytes` are rejected with
/// 413. Browser origins listed in `settings.cors_allow_origins` get CORS
/// headers.
///
/// # Errors
///
/// Returns [`ServeError::InvalidOrigin`] if a configured origin is not a
/// valid header value.
pub fn build_router<L>(state: AppState<L>, settings: &ServerSettings) -> Result<Router, ServeError>
where
    L: ResourceLoader,
    L::Resource: EntityModel,
{
    let mut router = Router::new()
        .route("/", get(root::<L>))
        .route("/health", get(health::<L>))
        .route("/model_info", get(model_info::<L>))
        .route("/describe", get(model_info::<L>))
        .route("/extract", post(extract_entities::<L>))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(settings.max_body_bytes));

    if !settings.cors_allow_origins.is_empty() {
        router = router.layer(cors_layer(&settings.cors_allow_origins)?);
    }

    Ok(router.with_state(state))
}

/// CORS policy allowing `origins` (`"*"` for any) with any method and
/// header.
///
/// # Errors
///
/// Returns [`ServeError::InvalidOrigin`] for an origin that is not a valid
/// header value.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServeError> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ServeError::InvalidOrigin {
                origin: origin.clone(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(origins))
}

async fn root<L: ResourceLoader>(State(state): State<AppState<L>>) -> Json<Value> {
    metrics::record_request("/");
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.handle.name(),
        "endpoints": {
            "health": "/health",
            "model_info": "/model_info",
            "describe": "/describe",
            "extract": "/extract (POST)"
        }
    }))
}

async fn health<L: ResourceLoader>(State(state): State<AppState<L>>) -> Json<HealthResponse> {
    metrics::record_request("/health");
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.handle.is_ready(),
        model_name: state.handle.name().to_string(),
    })
}

async fn model_info<L: ResourceLoader>(
    State(state): State<AppState<L>>,
    uri: Uri,
) -> Json<ResourceInfo> {
    metrics::record_request(uri.path());
    Json(state.handle.describe())
}

async fn extract_entities<L>(
    State(state): State<AppState<L>>,
    body: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, ApiError>
where
    L: ResourceLoader,
    L::Resource: EntityModel,
{
    metrics::record_request("/extract");
    let request_id = Uuid::new_v4();
    let span = info_span!("extract", %request_id);

    async move {
        let Json(request) = body.map_err(|rejection| {
            debug!(error = %rejection.body_text(), "rejected request body");
            metrics::record_extract_error("validation");
            ApiError::from(rejection)
        })?;

        match extract(&state.handle, &request, state.default_threshold).await {
            Ok(response) => Ok(Json(response)),
            Err(e @ ExtractError::Validation(_)) => {
                debug!(error = %e, "rejected extraction request");
                Err(e.into())
            }
            Err(e) => {
                error!(error = %e, "entity extraction failed");
                Err(e.into())
            }
        }
    }
    .instrument(span)
    .await
}

async fn not_found(uri: Uri) -> ApiError {
    metrics::record_request(uri.path());
    ApiError {
        status: StatusCode::NOT_FOUND,
        kind: "not_found",
        detail: format!("no route for {}", uri.path()),
    }
}

// ============================================================================
// Server
// ============================================================================

/// Normalizes a bind address.
///
/// Accepts `host:port`, `:port` (all interfaces), or a bare port.
///
/// # Errors
///
/// Returns [`ServeError::InvalidAddress`] if the result is not a socket
/// address.
pub fn parse_bind_addr(input: &str) -> Result<String, ServeError> {
    let addr = if input.starts_with(':') {
        format!("0.0.0.0{input}")
    } else if input.parse::<u16>().is_ok() {
        format!("0.0.0.0:{input}")
    } else {
        input.to_string()
    };
    addr.parse::<SocketAddr>()
        .map_err(|e| ServeError::InvalidAddress {
            addr: input.to_string(),
            reason: e.to_string(),
        })?;
    Ok(addr)
}

/// Binds the listening socket.
///
/// Returns the listener and the actual bound address (useful when binding
/// to port 0).
///
/// # Errors
///
/// Returns a [`ServeError`] if the address is invalid or cannot be bound.
pub async fn bind(addr: &str) -> Result<(TcpListener, SocketAddr), ServeError> {
    let addr = parse_bind_addr(addr)?;
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;
    let bound = listener
        .local_addr()
        .map_err(|source| ServeError::Bind { addr, source })?;
    Ok((listener, bound))
}

/// Serves `router` on `listener` until `cancel` fires, then drains
/// in-flight requests.
///
/// # Errors
///
/// Returns [`ServeError::Server`] if the accept loop fails.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<(), ServeError> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;
    info!("HTTP server shut down");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
