//! NEAR node collector library.
//!
//! This crate provides the pieces a NEAR Prometheus exporter is built from:
//!
//! - a node RPC client abstraction and its HTTP implementation (`rpc`),
//! - stake normalisation and build hashing helpers (`stake`),
//! - the static set of metric identities and the Prometheus bridge (`metrics`),
//! - the per-scrape collection routine (`scrape`),
//! - and top-level exporter configuration (`config`).
//!
//! The `near-exporter` binary wires these together behind a `/metrics`
//! endpoint.

pub mod config;
pub mod metrics;
pub mod rpc;
pub mod scrape;
pub mod stake;

// Re-export top-level configuration types.
pub use config::{ExporterConfig, MetricsConfig, NodeRpcConfig};

// Re-export the RPC seam and its HTTP client.
pub use rpc::{
    CallFunctionRequest, CallResult, DelegatorAccount, EpochReference, EpochValidatorInfo,
    HttpNodeRpc, NodeRpc, NodeStatus, RpcError,
};

// Re-export metric identities and the Prometheus exporter.
pub use metrics::{
    MetricIdentity, MetricsRegistry, NodeMetrics, Observation, ObservationSink,
    PrometheusNodeCollector, run_prometheus_http_server,
};

// Re-export the scrape collector.
pub use scrape::NodeRpcCollector;

pub use stake::{hash_build, min_stake, stake_from_string};

/// Collector stack used by the exporter binary: HTTP RPC client bridged
/// into Prometheus.
pub type DefaultNodeCollector = PrometheusNodeCollector<HttpNodeRpc>;
