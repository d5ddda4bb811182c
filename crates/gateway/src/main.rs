//! ItemSearch API Gateway
//!
//! The HTTP entry point for search calls.
//! Handles:
//! - Search argument decoding and the search endpoint
//! - Loading fixture indexes into memory
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use itemsearch_common::{
    config::{AppConfig, ObservabilityConfig},
    metrics::{self, LATENCY_BUCKETS},
    VERSION,
};
use itemsearch_search::{MemoryIndexProvider, OrchestratorSettings, QueryOrchestrator, TagLanguages};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::oneshot};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub indexes: Arc<MemoryIndexProvider>,
    pub orchestrator: Arc<QueryOrchestrator>,
}

impl AppState {
    /// Wire the orchestrator over the loaded indexes
    pub fn new(config: Arc<AppConfig>, indexes: Arc<MemoryIndexProvider>) -> Self {
        let items = Arc::new(indexes.item_tree());
        let languages = Arc::new(TagLanguages::new(config.search.default_language.clone()));
        let orchestrator = QueryOrchestrator::new(
            indexes.clone(),
            items,
            languages,
            OrchestratorSettings::from(&config.search),
        );

        Self {
            config,
            indexes,
            orchestrator: Arc::new(orchestrator),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize tracing
    init_tracing(&config.observability);

    info!(
        service = %config.observability.service_name,
        "Starting ItemSearch Gateway v{}", VERSION
    );

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        match install_metrics_exporter(config.observability.metrics_port) {
            Ok(()) => info!(port = config.observability.metrics_port, "Prometheus exporter listening"),
            Err(e) => warn!("Failed to install Prometheus exporter, metrics disabled: {}", e),
        }
    }
    metrics::register_metrics();

    // Load indexes
    info!(dir = %config.search.index_dir, "Loading indexes...");
    let indexes = match MemoryIndexProvider::load_dir(&config.search.index_dir) {
        Ok(indexes) => indexes,
        Err(e) => {
            warn!("Failed to load indexes, starting empty: {:#}", e);
            MemoryIndexProvider::new()
        }
    };

    // Create app state
    let state = AppState::new(config.clone(), Arc::new(indexes));

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    // In-flight requests get `shutdown_timeout` to drain once a signal arrives
    tokio::select! {
        biased;
        result = &mut server => result?,
        _ = signalled_rx => {
            let drain = config.shutdown_timeout();
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(timeout_secs = drain.as_secs(), "Shutdown timed out, dropping open connections"),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Log level from `RUST_LOG` when set, otherwise from configuration
fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn install_metrics_exporter(port: u16) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(SocketAddr::from(([0, 0, 0, 0], port)))
        .set_buckets(LATENCY_BUCKETS)?
        .install()
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let timeout = TimeoutLayer::new(state.config.request_timeout());

    // API routes
    let api_routes = Router::new()
        .route("/search", post(handlers::search::search))
        .route("/indexes", get(handlers::search::list_indexes));

    // Compose the app
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/v1", api_routes)
        .layer(axum::middleware::from_fn(middleware::request_metrics::track_requests))
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
