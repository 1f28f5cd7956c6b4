// exporter/src/main.rs

//! NEAR exporter binary.
//!
//! Serves Prometheus metrics for one NEAR node and one validator account:
//!
//! - `GET /metrics` (a fresh scrape of the node per request)
//! - `GET /health`
//!
//! Each scrape queries the node's `status`, `validators` and the staking
//! pool's `get_accounts` view method over JSON-RPC.

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::signal;

use near_collector::{
    ExporterConfig, HttpNodeRpc, MetricsRegistry, NodeRpcCollector, PrometheusNodeCollector,
    run_prometheus_http_server,
};

use cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "near_exporter=info,near_collector=info".to_string()),
        )
        .init();

    let cfg = Cli::parse().into_config();

    if let Err(e) = run(cfg) {
        eprintln!("fatal error: {e}");
        std::process::exit(1);
    }
}

fn run(cfg: ExporterConfig) -> Result<(), String> {
    // ---------------------------
    // Node RPC client + collector
    // ---------------------------

    // The blocking RPC client is built and finally dropped outside the
    // async runtime; scrapes run on the runtime's blocking pool.
    let rpc = HttpNodeRpc::new(cfg.rpc.url.clone(), cfg.rpc.timeout)
        .map_err(|e| format!("failed to create node RPC client: {e}"))?;

    let collector = PrometheusNodeCollector::new(NodeRpcCollector::new(rpc, cfg.account_id.clone()))
        .map_err(|e| format!("failed to build metric descriptors: {e}"))?;

    let metrics = Arc::new(
        MetricsRegistry::new(collector)
            .map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    tracing::info!(
        account_id = %cfg.account_id,
        rpc_url = %cfg.rpc.url,
        timeout_secs = cfg.rpc.timeout.as_secs(),
        "starting exporter"
    );

    // ---------------------------
    // Metrics exporter
    // ---------------------------

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start tokio runtime: {e}"))?;

    let addr = cfg.metrics.listen_addr;
    let served = runtime.block_on({
        let metrics = metrics.clone();
        async move {
            tokio::select! {
                res = run_prometheus_http_server(metrics, addr) => {
                    res.map_err(|e| format!("metrics HTTP server error on {addr}: {e}"))
                }
                _ = shutdown_signal() => Ok(()),
            }
        }
    });

    drop(runtime);
    drop(metrics);
    served
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
