//! Top-level configuration for the exporter.
//!
//! This module aggregates configuration for:
//!
//! - the node RPC client (endpoint URL + request timeout),
//! - the metrics exporter (listen address),
//! - the account whose validator and delegator figures are reported.
//!
//! The binary fills an [`ExporterConfig`] from command-line flags and
//! environment variables; everything else falls back to the defaults here.

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the NEAR node JSON-RPC client.
#[derive(Clone, Debug)]
pub struct NodeRpcConfig {
    /// JSON-RPC endpoint of the node, e.g. `"http://localhost:3030"`.
    pub url: String,
    /// Request timeout applied to every RPC call.
    pub timeout: Duration,
}

impl Default for NodeRpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3030".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Configuration for the Prometheus metrics exporter.
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP server to.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9333)),
        }
    }
}

/// Top-level configuration for the exporter process.
#[derive(Clone, Debug)]
pub struct ExporterConfig {
    /// Account id of the validator / staking pool being monitored.
    pub account_id: String,
    pub rpc: NodeRpcConfig,
    pub metrics: MetricsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_node() {
        let rpc = NodeRpcConfig::default();
        assert_eq!(rpc.url, "http://localhost:3030");
        assert_eq!(rpc.timeout, Duration::from_secs(10));
        assert_eq!(MetricsConfig::default().listen_addr.port(), 9333);
    }
}
