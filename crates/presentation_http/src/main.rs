//! Job processor HTTP server
//!
//! Main entry point: starts the queue consumer, the throughput sampler and
//! the HTTP API, then waits for a shutdown signal.

use std::{future::IntoFuture, sync::Arc};

use anyhow::Context;
use application::{
    JobConsumer, ThroughputCounter, ThroughputSampler,
    ports::{JobHandler, JobQueuePort, MetricsPort},
};
use infrastructure::{
    AppConfig, InMemoryJobQueue, LogFormat, PrometheusMetrics, QueueBackend, RedisJobQueue,
    SimulatedWorkHandler, init_logging,
};
use presentation_http::{
    RequestIdLayer, create_router, spawn_job_consumer, spawn_throughput_sampler, state::AppState,
};
use tokio::{net::TcpListener, signal, sync::Notify};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging comes first so a configuration error is still reported
    let loaded = AppConfig::load();
    let log_format = loaded
        .as_ref()
        .map(|config| config.server.log_format)
        .unwrap_or(LogFormat::Text);
    init_logging(log_format)?;

    info!("🚀 Job processor v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.context("Failed to load configuration")?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        backend = ?config.queue.backend,
        source_queue = %config.queue.source_queue,
        processed_queue = %config.queue.processed_queue,
        "Configuration loaded"
    );

    let queue: Arc<dyn JobQueuePort> = match config.queue.backend {
        QueueBackend::Redis => Arc::new(
            RedisJobQueue::new(config.queue.connection_url())
                .context("Invalid Redis address")?
                .with_block_timeout(config.queue.block_timeout_secs),
        ),
        QueueBackend::Memory => {
            warn!("Using the in-memory queue, jobs are not shared with other processes");
            Arc::new(InMemoryJobQueue::new())
        },
    };

    let metrics = Arc::new(PrometheusMetrics::new());
    let throughput = Arc::new(ThroughputCounter::new());
    let handler: Arc<dyn JobHandler> =
        Arc::new(SimulatedWorkHandler::new(config.consumer.work_cost()));

    let consumer = JobConsumer::new(
        queue,
        handler,
        Arc::clone(&metrics) as Arc<dyn MetricsPort>,
        Arc::clone(&throughput),
    )
    .with_settings(config.consumer_settings());
    let sampler = ThroughputSampler::new(throughput, Arc::clone(&metrics) as Arc<dyn MetricsPort>)
        .with_window(config.consumer.throughput_window());

    let consumer_handle = spawn_job_consumer(consumer);
    let sampler_handle = spawn_throughput_sampler(sampler);

    let app = create_router(AppState::new(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer::new());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Server listening on http://{}", addr);

    let shutdown = Arc::new(Notify::new());
    let trigger = Arc::clone(&shutdown);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            trigger.notify_one();
        })
        .into_future();

    let timeout = config.server.shutdown_timeout();
    let deadline = async {
        shutdown.notified().await;
        info!("⏳ Waiting up to {:?} for connections to close...", timeout);
        tokio::time::sleep(timeout).await;
    };

    tokio::select! {
        result = server => result.context("HTTP server failed")?,
        () = deadline => warn!(
            timeout_secs = timeout.as_secs(),
            "Graceful shutdown timed out, dropping open connections"
        ),
    }

    consumer_handle.abort();
    sampler_handle.abort();

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
