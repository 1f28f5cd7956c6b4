//! Prometheus-backed exposition and HTTP exporter.
//!
//! This module defines [`PrometheusNodeCollector`], which implements the
//! `prometheus` crate's `Collector` trait by running one scrape per
//! gather, a [`MetricsRegistry`] that owns the Prometheus registry, and an
//! async HTTP exporter that serves `/metrics` using `hyper`.

use std::{collections::HashMap, convert::Infallible, net::SocketAddr, sync::Arc};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    Method, Request, Response, StatusCode, body::Incoming, header, server::conn::http1,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use prometheus::{
    self, Encoder, GaugeVec, Opts, Registry, TextEncoder,
    core::{Collector, Desc},
    proto::MetricFamily,
};

use super::observation::Observation;
use super::registry::{MetricIdentity, NodeMetrics};
use crate::rpc::NodeRpc;
use crate::scrape::NodeRpcCollector;

const LANDING_PAGE: &str = "<html>\n<head><title>NEAR Exporter</title></head>\n<body>\n<h1>NEAR Exporter</h1>\n<p><a href=\"/metrics\">Metrics</a></p>\n</body>\n</html>\n";

/// Bridges [`NodeRpcCollector`] into a Prometheus registry.
///
/// Every `collect` call performs a full scrape against the node. Gauges are
/// grouped per identity in declaration order; invalid observations are
/// logged and their series left out of the output.
pub struct PrometheusNodeCollector<R> {
    inner: NodeRpcCollector<R>,
    descs: Vec<Desc>,
}

impl<R> PrometheusNodeCollector<R> {
    /// Wraps `inner`, building one descriptor per declared identity.
    pub fn new(inner: NodeRpcCollector<R>) -> Result<Self, prometheus::Error> {
        let descs = inner
            .metrics()
            .all()
            .into_iter()
            .map(identity_desc)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { inner, descs })
    }
}

fn identity_desc(metric: &MetricIdentity) -> Result<Desc, prometheus::Error> {
    Desc::new(
        metric.name.to_string(),
        metric.help.to_string(),
        metric.label_names.iter().map(|l| l.to_string()).collect(),
        HashMap::new(),
    )
}

impl<R> Collector for PrometheusNodeCollector<R>
where
    R: NodeRpc,
{
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut observations = Vec::new();
        self.inner.collect(&mut observations);
        encode_observations(self.inner.metrics(), &observations)
    }
}

/// Converts one scrape's observations into metric families.
fn encode_observations(metrics: &NodeMetrics, observations: &[Observation]) -> Vec<MetricFamily> {
    let mut families = Vec::new();

    for metric in metrics.all() {
        let mut gauges: Option<GaugeVec> = None;

        for observation in observations.iter().filter(|o| o.metric() == metric) {
            match observation {
                Observation::Gauge { value, labels, .. } => {
                    if gauges.is_none() {
                        match GaugeVec::new(Opts::new(metric.name, metric.help), metric.label_names)
                        {
                            Ok(vec) => gauges = Some(vec),
                            Err(e) => {
                                tracing::error!(metric = metric.name, "failed to build gauge: {e}");
                                break;
                            }
                        }
                    }
                    let Some(vec) = gauges.as_ref() else {
                        break;
                    };

                    let label_values: Vec<&str> = labels.iter().map(String::as_str).collect();
                    match vec.get_metric_with_label_values(label_values.as_slice()) {
                        Ok(gauge) => gauge.set(*value),
                        Err(e) => {
                            tracing::warn!(metric = metric.name, "dropping sample: {e}");
                        }
                    }
                }
                Observation::Invalid { cause, .. } => {
                    tracing::warn!(metric = metric.name, "metric not collected: {cause}");
                }
            }
        }

        if let Some(vec) = gauges {
            families.extend(vec.collect());
        }
    }

    families
}

/// Wrapper around a Prometheus registry holding the node collector.
///
/// This is the handle the HTTP exporter serves from. It can be wrapped in
/// an [`Arc`] and shared across tasks.
pub struct MetricsRegistry {
    registry: Registry,
}

impl MetricsRegistry {
    /// Creates a fresh `Registry` and registers `collector` into it.
    pub fn new<R>(collector: PrometheusNodeCollector<R>) -> Result<Self, prometheus::Error>
    where
        R: NodeRpc + 'static,
    {
        let registry = Registry::new();
        registry.register(Box::new(collector))?;
        Ok(Self { registry })
    }

    /// Runs a scrape and encodes the result in the Prometheus text format.
    ///
    /// Blocks on node RPC; call it from a blocking context.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("failed to encode Prometheus metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Runs an HTTP server that exposes Prometheus metrics.
///
/// The server listens on `addr` and serves:
///
/// - `GET /metrics`: a fresh scrape in the Prometheus text format,
/// - `GET /health`: `ok`,
/// - `GET /`: a landing page linking to `/metrics`.
///
/// All other paths return 404. Scrapes run on the blocking thread pool.
pub async fn run_prometheus_http_server(
    metrics: Arc<MetricsRegistry>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("metrics exporter listening on http://{}/metrics", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let metrics = metrics.clone();
                handle_request(req, metrics)
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, svc).await {
                tracing::debug!(%peer, "prometheus HTTP connection error: {err}");
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    metrics: Arc<MetricsRegistry>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/metrics") => {
            match tokio::task::spawn_blocking(move || metrics.gather_text()).await {
                Ok(body) => text_response(StatusCode::OK, TextEncoder::new().format_type(), body),
                Err(e) => {
                    tracing::error!("scrape task failed: {e}");
                    text_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "text/plain",
                        "scrape failed".to_string(),
                    )
                }
            }
        }
        (&Method::GET, "/health") => text_response(StatusCode::OK, "text/plain", "ok".to_string()),
        (&Method::GET, "/") => {
            text_response(StatusCode::OK, "text/html", LANDING_PAGE.to_string())
        }
        _ => text_response(StatusCode::NOT_FOUND, "text/plain", "not found".to_string()),
    };
    Ok(response)
}

fn text_response(status: StatusCode, content_type: &str, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    if let Ok(value) = header::HeaderValue::from_str(content_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{
        CallFunctionRequest, CallResult, EpochReference, EpochValidatorInfo, NodeStatus, RpcError,
    };

    /// Node whose status works but whose validators call always fails.
    struct HalfUpNode;

    impl NodeRpc for HalfUpNode {
        fn status(&self) -> Result<NodeStatus, RpcError> {
            serde_json::from_str(
                r#"{"sync_info": {"syncing": false, "latest_block_height": 99},
                    "version": {"version": "1.35.0", "build": "abc"}}"#,
            )
            .map_err(|e| RpcError::Protocol(e.to_string()))
        }

        fn validators(&self, _epoch: EpochReference) -> Result<EpochValidatorInfo, RpcError> {
            Err(RpcError::Transport("connection reset".to_string()))
        }

        fn call_function(&self, _request: &CallFunctionRequest) -> Result<CallResult, RpcError> {
            Err(RpcError::Transport("unreachable".to_string()))
        }
    }

    fn half_up_collector() -> PrometheusNodeCollector<HalfUpNode> {
        PrometheusNodeCollector::new(NodeRpcCollector::new(HalfUpNode, "pool.near"))
            .expect("descriptors should build")
    }

    #[test]
    fn describes_every_identity() {
        let collector = half_up_collector();
        let names: Vec<_> = collector.desc().iter().map(|d| d.fq_name.clone()).collect();
        assert_eq!(names.len(), 14);
        assert!(names.contains(&"near_account_delegator_stake".to_string()));
        assert!(names.contains(&"near_version_build".to_string()));
    }

    #[test]
    fn encodes_gauges_in_declaration_order() {
        let metrics = NodeMetrics::new();
        let observations = vec![
            Observation::Gauge {
                metric: metrics.block_number,
                value: 10.0,
                labels: Vec::new(),
            },
            Observation::Gauge {
                metric: metrics.delegator_stake,
                value: 1.5,
                labels: vec!["alice.near".to_string()],
            },
            Observation::Gauge {
                metric: metrics.delegator_stake,
                value: 2.5,
                labels: vec!["bob.near".to_string()],
            },
            Observation::Invalid {
                metric: metrics.seat_price,
                cause: "boom".to_string(),
            },
        ];

        let families = encode_observations(&metrics, &observations);
        let names: Vec<_> = families.iter().map(|f| f.get_name().to_string()).collect();
        assert_eq!(names, vec!["near_account_delegator_stake", "near_block_number"]);
        assert_eq!(families[0].get_metric().len(), 2);
        assert_eq!(families[1].get_metric()[0].get_gauge().get_value(), 10.0);
    }

    #[test]
    fn registry_serves_partial_scrape() {
        let registry = MetricsRegistry::new(half_up_collector()).expect("registry should build");
        let text = registry.gather_text();

        assert!(text.contains("# HELP near_block_number The number of most recent block"));
        assert!(text.contains("near_block_number 99"));
        assert!(text.contains("near_sync_state 0"));
        assert!(text.contains(r#"near_version_build{build="abc",version="1.35.0"}"#));
        assert!(!text.contains("near_seat_price"));
        assert!(!text.contains("near_account_delegator_stake"));
    }

    #[test]
    fn text_response_sets_content_type() {
        let resp = text_response(StatusCode::NOT_FOUND, "text/plain", "not found".to_string());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"text/plain"[..])
        );
    }
}
