use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dotenvy::dotenv;
use prometheus::{Encoder, IntCounter, TextEncoder};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use ovendash_core::{Command, CommandPolicy, TemperatureUnit};
use ovendash_thinq::{ThinqClient, ThinqConfig};

mod models;
mod services;

use models::*;
use services::{save_env_config, DispatchError, OvenService};

#[derive(Clone)]
struct AppState {
    policy: CommandPolicy,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Credentials are re-read per request so a config save takes effect
    /// without a restart.
    fn service(&self) -> Result<OvenService, Response> {
        let config = ThinqConfig::from_env()
            .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response())?;
        let client = ThinqClient::new(config)
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())?;
        Ok(OvenService::new(client, self.policy.clone()))
    }
}

struct Metrics {
    upstream_requests_total: IntCounter,
    upstream_failures_total: IntCounter,
    commands_total: IntCounter,
    commands_rejected_total: IntCounter,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let upstream_requests_total = IntCounter::new(
            "ovendash_upstream_requests_total",
            "Total vendor API request chains started",
        )
        .unwrap();
        let upstream_failures_total = IntCounter::new(
            "ovendash_upstream_failures_total",
            "Total vendor API calls that failed",
        )
        .unwrap();
        let commands_total = IntCounter::new(
            "ovendash_commands_total",
            "Total oven commands received",
        )
        .unwrap();
        let commands_rejected_total = IntCounter::new(
            "ovendash_commands_rejected_total",
            "Total oven commands rejected by local validation",
        )
        .unwrap();

        let registry = prometheus::default_registry();
        let _ = registry.register(Box::new(upstream_requests_total.clone()));
        let _ = registry.register(Box::new(upstream_failures_total.clone()));
        let _ = registry.register(Box::new(commands_total.clone()));
        let _ = registry.register(Box::new(commands_rejected_total.clone()));

        Arc::new(Self {
            upstream_requests_total,
            upstream_failures_total,
            commands_total,
            commands_rejected_total,
        })
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let policy = policy_from_env();
    info!(
        allowed = ?policy.allowed,
        f_range = ?policy.fahrenheit,
        c_range = ?policy.celsius,
        "Command policy loaded"
    );
    let state = AppState {
        policy,
        metrics: Metrics::new(),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/version", get(version))
        .route("/metrics", get(metrics_handler))
        // Read API
        .route("/api/devices", get(api_get_devices))
        .route("/api/devices/:device_id/snapshot", get(api_get_snapshot))
        // Control API
        .route("/api/devices/:device_id/command", post(api_post_command))
        .route("/api/devices/:device_id/preheat", post(api_post_preheat))
        // Settings
        .route("/api/config", get(api_get_config).post(api_save_config))
        .with_state(state);

    let addr: SocketAddr = std::env::var("OVENDASH_HTTP_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()
        .expect("Invalid OVENDASH_HTTP_ADDR");

    info!(%addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,axum=info,hyper=info,reqwest=warn"))
        .unwrap();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Allow-list and temperature bounds are model-specific, so they come from
/// the environment; unset values keep the defaults.
fn policy_from_env() -> CommandPolicy {
    let mut policy = CommandPolicy::default();
    if let Ok(v) = std::env::var("OVENDASH_ALLOWED_COMMANDS") {
        let allowed: Vec<String> = v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !allowed.is_empty() {
            policy.allowed = allowed;
        }
    }
    if let Ok(v) = std::env::var("OVENDASH_COOK_MODES") {
        policy.cook_modes = v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    for (key, slot) in [
        ("OVENDASH_TEMP_MIN_F", &mut policy.fahrenheit.min),
        ("OVENDASH_TEMP_MAX_F", &mut policy.fahrenheit.max),
        ("OVENDASH_TEMP_MIN_C", &mut policy.celsius.min),
        ("OVENDASH_TEMP_MAX_C", &mut policy.celsius.max),
    ] {
        if let Ok(v) = std::env::var(key) {
            if let Ok(n) = v.parse::<i32>() {
                *slot = n;
            }
        }
    }
    policy
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install signal handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ----- Service endpoints -----

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz() -> StatusCode {
    // Ready once credentials are present; every data call hits the vendor.
    if ThinqConfig::from_env().is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buf = Vec::new();
    encoder.encode(&metric_families, &mut buf).unwrap();
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, encoder.format_type())
        .body(axum::body::Body::from(buf))
        .unwrap()
}

async fn index() -> Response {
    let body = include_str!("static/index.html");
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(axum::body::Body::from(body))
        .unwrap()
}

// ----- Read API -----

async fn api_get_devices(State(state): State<AppState>) -> Response {
    let service = match state.service() {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    state.metrics.upstream_requests_total.inc();
    match service.devices().await {
        Ok(devices) => Json(DevicesResponse { devices }).into_response(),
        Err(e) => upstream_error_response(&state, e.to_string()),
    }
}

async fn api_get_snapshot(
    Path(device_id): Path<String>,
    State(state): State<AppState>,
    Query(q): Query<LocationQuery>,
) -> Response {
    let service = match state.service() {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    state.metrics.upstream_requests_total.inc();
    match service.snapshot(Some(&device_id), q.location.as_deref()).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => upstream_error_response(&state, e.to_string()),
    }
}

// ----- Control API -----

async fn api_post_command(
    Path(device_id): Path<String>,
    State(state): State<AppState>,
    Query(q): Query<LocationQuery>,
    Json(command): Json<Command>,
) -> Response {
    let service = match state.service() {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    state.metrics.commands_total.inc();
    state.metrics.upstream_requests_total.inc();
    match service
        .dispatch(&device_id, q.location.as_deref(), command)
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(e) => dispatch_error_response(&state, &device_id, e),
    }
}

async fn api_post_preheat(
    Path(device_id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<PreheatRequest>,
) -> Response {
    let unit = match req.unit.as_deref() {
        None | Some("") => TemperatureUnit::Fahrenheit,
        Some(s) => match TemperatureUnit::parse(s) {
            Some(u) => u,
            None => {
                return (StatusCode::BAD_REQUEST, format!("unknown unit '{s}'")).into_response()
            }
        },
    };
    let service = match state.service() {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    state.metrics.commands_total.inc();
    state.metrics.upstream_requests_total.inc();
    match service
        .preheat(
            &device_id,
            &req.cook_mode,
            req.temperature,
            unit,
            req.location.as_deref(),
            req.refresh.unwrap_or(false),
        )
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(e) => dispatch_error_response(&state, &device_id, e),
    }
}

fn dispatch_error_response(state: &AppState, device_id: &str, err: DispatchError) -> Response {
    match err {
        DispatchError::Invalid(e) => {
            state.metrics.commands_rejected_total.inc();
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        DispatchError::Upstream(e) => {
            tracing::warn!(device_id, error = %e, "vendor call failed");
            state.metrics.upstream_failures_total.inc();
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

fn upstream_error_response(state: &AppState, message: String) -> Response {
    tracing::warn!(error = %message, "vendor call failed");
    state.metrics.upstream_failures_total.inc();
    (StatusCode::BAD_GATEWAY, message).into_response()
}

// ----- Settings -----

async fn api_get_config() -> Json<ConfigStatusResponse> {
    match ThinqConfig::from_env() {
        Ok(cfg) => Json(ConfigStatusResponse {
            configured: true,
            country: Some(cfg.country),
            error: None,
            suggested_client_id: None,
        }),
        Err(e) => Json(ConfigStatusResponse {
            configured: false,
            country: None,
            error: Some(e.to_string()),
            suggested_client_id: Some(Uuid::new_v4().to_string()),
        }),
    }
}

async fn api_save_config(Json(req): Json<SaveConfigRequest>) -> Response {
    if req.access_token.trim().is_empty() || req.client_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "Access token and client ID are required.",
        )
            .into_response();
    }
    match save_env_config(
        &req.access_token,
        &req.client_id,
        req.country.as_deref().unwrap_or(""),
    ) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to write .env");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save configuration").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_env_overrides_are_applied() {
        std::env::set_var("OVENDASH_ALLOWED_COMMANDS", "start, stop");
        std::env::set_var("OVENDASH_TEMP_MAX_F", "500");
        std::env::set_var("OVENDASH_COOK_MODES", "BAKE,ROAST");
        let policy = policy_from_env();
        assert_eq!(policy.allowed, vec!["start", "stop"]);
        assert_eq!(policy.fahrenheit.max, 500);
        assert_eq!(policy.cook_modes, vec!["BAKE", "ROAST"]);
        std::env::remove_var("OVENDASH_ALLOWED_COMMANDS");
        std::env::remove_var("OVENDASH_TEMP_MAX_F");
        std::env::remove_var("OVENDASH_COOK_MODES");
    }
}
