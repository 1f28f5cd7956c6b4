//! Command-line flags for the exporter.
//!
//! Every flag can also be supplied through an environment variable; the
//! resulting [`ExporterConfig`] falls back to the library defaults for
//! anything left unset.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use near_collector::{ExporterConfig, MetricsConfig, NodeRpcConfig};

/// Prometheus exporter for a NEAR node and one validator account.
#[derive(Debug, Parser)]
#[command(name = "near-exporter", version, about)]
pub struct Cli {
    /// Address the `/metrics` endpoint listens on.
    #[arg(long, env = "NEAR_EXPORTER_ADDR", default_value_t = MetricsConfig::default().listen_addr)]
    pub addr: SocketAddr,

    /// JSON-RPC endpoint of the NEAR node.
    #[arg(long, env = "NEAR_EXPORTER_RPC_URL", default_value_t = NodeRpcConfig::default().url)]
    pub url: String,

    /// Validator / staking pool account to report on.
    #[arg(long, env = "NEAR_EXPORTER_ACCOUNT_ID")]
    pub account_id: String,

    /// Timeout for each RPC call, in seconds.
    #[arg(long, env = "NEAR_EXPORTER_TIMEOUT_SECS", default_value_t = NodeRpcConfig::default().timeout.as_secs())]
    pub timeout_secs: u64,
}

impl Cli {
    pub fn into_config(self) -> ExporterConfig {
        ExporterConfig {
            account_id: self.account_id,
            rpc: NodeRpcConfig {
                url: self.url,
                timeout: Duration::from_secs(self.timeout_secs.max(1)),
            },
            metrics: MetricsConfig {
                listen_addr: self.addr,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_is_required() {
        assert!(Cli::try_parse_from(["near-exporter"]).is_err());
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "near-exporter",
            "--account-id",
            "pool.poolv1.near",
            "--url",
            "http://10.0.0.5:3030",
            "--addr",
            "127.0.0.1:9000",
            "--timeout-secs",
            "3",
        ])
        .expect("flags should parse");

        let cfg = cli.into_config();
        assert_eq!(cfg.account_id, "pool.poolv1.near");
        assert_eq!(cfg.rpc.url, "http://10.0.0.5:3030");
        assert_eq!(cfg.rpc.timeout, Duration::from_secs(3));
        assert_eq!(cfg.metrics.listen_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
    }

    #[test]
    fn unset_flags_fall_back_to_config_defaults() {
        let cfg = Cli::try_parse_from(["near-exporter", "--account-id", "a.near"])
            .expect("flags should parse")
            .into_config();
        assert_eq!(cfg.rpc.url, NodeRpcConfig::default().url);
        assert_eq!(cfg.rpc.timeout, NodeRpcConfig::default().timeout);
        assert_eq!(cfg.metrics.listen_addr, MetricsConfig::default().listen_addr);
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let cli = Cli::try_parse_from(["near-exporter", "--account-id", "a.near", "--timeout-secs", "0"])
            .expect("flags should parse");
        assert_eq!(cli.into_config().rpc.timeout, Duration::from_secs(1));
    }
}
