//! Drowsiness Monitor Control Surface
//!
//! HTTP endpoints for operating the session timer and reading or clearing
//! the drowsiness alert, plus service wiring (logging, metrics, workers).

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod routes;

pub use config::AppConfig;
pub use error::ApiError;

use config::LoggingConfig;
use dms::DetectionState;
use landmark_source::ReplaySource;
use monitor::{
    spawn_ticker, MonitorSnapshot, SensingHandle, SensingLoop, SensingStats, SharedStore,
};

/// Application state shared across handlers
pub struct AppState {
    /// Timer and detection state
    pub store: SharedStore,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Sensing loop counters, if a landmark source is attached
    pub sensing: Option<Arc<SensingStats>>,
    /// Prometheus exposition, if metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            sensing: None,
            metrics: None,
        }
    }

    pub fn with_sensing(mut self, stats: Arc<SensingStats>) -> Self {
        self.sensing = Some(stats);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub monitor: MonitorSnapshot,
    pub sensing: Option<SensingHealth>,
}

/// Sensing loop health
#[derive(Debug, Serialize)]
pub struct SensingHealth {
    pub alive: bool,
    pub cycles: u64,
    pub acquisition_failures: u64,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", get(routes::timer::start).post(routes::timer::start))
        .route("/stop", get(routes::timer::stop).post(routes::timer::stop))
        .route("/reset", get(routes::timer::reset).post(routes::timer::reset))
        .route("/get_time", get(routes::timer::get_time))
        .route("/update_time", post(routes::timer::update_time))
        .route(
            "/clear_drowsiness",
            get(routes::drowsiness::clear).post(routes::drowsiness::clear),
        )
        .route("/detect_drowsiness", get(routes::drowsiness::detect))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let sensing = state.sensing.as_ref().map(|stats| SensingHealth {
        alive: stats.is_alive(),
        cycles: stats.cycles(),
        acquisition_failures: stats.acquisition_failures(),
    });

    let status = match &sensing {
        Some(s) if !s.alive => "degraded",
        _ => "healthy",
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        monitor: state.store.snapshot(),
        sensing,
    })
}

/// Prometheus exposition handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Attach the configured landmark source, if any
fn start_sensing(
    config: &AppConfig,
    store: &SharedStore,
) -> anyhow::Result<Option<SensingHandle>> {
    let Some(path) = &config.source.replay_path else {
        warn!("No landmark source configured; sensing loop disabled");
        return Ok(None);
    };

    let source = ReplaySource::open(path, config.source.looping)?;
    info!("Replaying landmark recording {}", path);
    Ok(Some(SensingLoop::spawn(source, store.clone())?))
}

/// Run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let detection = DetectionState::new(config.detection.clone())?;
    let store = SharedStore::new(detection);

    let mut state = AppState::new(store.clone());

    if config.metrics.enabled {
        state = state.with_metrics(PrometheusBuilder::new().install_recorder()?);
    }

    let sensing = start_sensing(&config, &store)?;
    if let Some(handle) = &sensing {
        state = state.with_sensing(handle.stats());
    }

    let ticker = spawn_ticker(store, config.timer.tick_interval());
    let app = create_router(Arc::new(state));

    let addr = config.server.addr();
    info!("Starting control surface on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ticker.abort();
    // Not joined: the source may be blocked waiting for its next frame.
    if let Some(handle) = &sensing {
        handle.stop();
    }

    info!("Control surface stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
