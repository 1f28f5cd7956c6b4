//! Metric identities and Prometheus exposition for the node collector.
//!
//! This module declares the static set of gauges the exporter publishes,
//! the observation type a scrape produces, and the bridge that turns a
//! scrape into Prometheus metric families served on `/metrics`.
//!
//! Typical usage in the exporter:
//!
//! ```ignore
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use near_collector::{HttpNodeRpc, MetricsRegistry, NodeRpcCollector, PrometheusNodeCollector};
//! use near_collector::run_prometheus_http_server;
//!
//! let rpc = HttpNodeRpc::new("http://localhost:3030", timeout)?;
//! let collector = PrometheusNodeCollector::new(NodeRpcCollector::new(rpc, "pool.poolv1.near"))?;
//! let registry = Arc::new(MetricsRegistry::new(collector)?);
//! let addr: SocketAddr = "0.0.0.0:9333".parse()?;
//!
//! tokio::spawn(run_prometheus_http_server(registry.clone(), addr));
//! ```

pub mod observation;
pub mod prometheus;
pub mod registry;

pub use observation::{Observation, ObservationSink};
pub use self::prometheus::{MetricsRegistry, PrometheusNodeCollector, run_prometheus_http_server};
pub use registry::{MetricIdentity, NodeMetrics};
