//! HTTP-based node RPC client.
//!
//! This implementation of [`NodeRpc`] talks JSON-RPC 2.0 to a NEAR node:
//!
//! ```json
//! POST /
//! { "jsonrpc": "2.0", "id": "dontcare", "method": "status", "params": [] }
//!
//! Response:
//! { "jsonrpc": "2.0", "id": "dontcare", "result": { ... } }
//! or
//! { "jsonrpc": "2.0", "id": "dontcare", "error": { "code": -32000, "message": "...", "data": ... } }
//! ```

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::types::{CallFunctionRequest, CallResult, EpochReference, EpochValidatorInfo, NodeStatus};
use super::{NodeRpc, RpcError};

const JSONRPC_VERSION: &str = "2.0";
const REQUEST_ID: &str = "dontcare";

/// Blocking JSON-RPC client for a single NEAR node.
///
/// The underlying `reqwest` client is `Send + Sync`; a single instance is
/// shared by every scrape.
pub struct HttpNodeRpc {
    url: String,
    client: Client,
    timeout: Duration,
}

impl HttpNodeRpc {
    /// Constructs a client for the node RPC endpoint at `url`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let req_body = RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: REQUEST_ID,
            method,
            params,
        };

        let resp = self
            .client
            .post(&self.url)
            .json(&req_body)
            .send()
            .map_err(|e| RpcError::Transport(format!("HTTP POST {} failed: {e}", self.url)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Service(format!(
                "node returned HTTP status {status} for {method}"
            )));
        }

        let envelope = resp
            .json::<RpcResponse<T>>()
            .map_err(|e| RpcError::Protocol(format!("failed to parse {method} response: {e}")))?;

        envelope.into_result(method)
    }
}

/// JSON-RPC request envelope.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'a str,
    id: &'a str,
    method: &'a str,
    params: Value,
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl<T> RpcResponse<T> {
    fn into_result(self, method: &str) -> Result<T, RpcError> {
        if let Some(err) = self.error {
            let detail = match err.data {
                Some(Value::String(s)) => format!(": {s}"),
                Some(other) => format!(": {other}"),
                None => String::new(),
            };
            return Err(RpcError::Node(format!(
                "{method} failed with code {}: {}{detail}",
                err.code, err.message
            )));
        }

        self.result
            .ok_or_else(|| RpcError::Protocol(format!("{method} response has no result")))
    }
}

impl NodeRpc for HttpNodeRpc {
    fn status(&self) -> Result<NodeStatus, RpcError> {
        self.call("status", json!([]))
    }

    fn validators(&self, epoch: EpochReference) -> Result<EpochValidatorInfo, RpcError> {
        self.call("validators", epoch.params())
    }

    fn call_function(&self, request: &CallFunctionRequest) -> Result<CallResult, RpcError> {
        let params = serde_json::to_value(request)
            .map_err(|e| RpcError::Protocol(format!("failed to encode query params: {e}")))?;
        self.call("query", params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_shape() {
        let req = RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: REQUEST_ID,
            method: "validators",
            params: EpochReference::Latest.params(),
        };
        let value = serde_json::to_value(&req).expect("request should serialize");
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": "dontcare", "method": "validators", "params": [null]})
        );
    }

    #[test]
    fn status_response_can_be_deserialized() {
        let json = r#"
        {
          "jsonrpc": "2.0",
          "id": "dontcare",
          "result": {
            "chain_id": "testnet",
            "sync_info": {
              "latest_block_hash": "abc",
              "latest_block_height": 123456,
              "syncing": false
            },
            "version": {"version": "1.35.0", "build": "crates-0.17.0"}
          }
        }
        "#;

        let resp: RpcResponse<NodeStatus> = serde_json::from_str(json).expect("status should parse");
        let status = resp.into_result("status").expect("status should be ok");
        assert!(!status.sync_info.syncing);
        assert_eq!(status.sync_info.latest_block_height, 123456);
        assert_eq!(status.version.build, "crates-0.17.0");
    }

    #[test]
    fn error_envelope_becomes_node_error() {
        let json = r#"
        {
          "jsonrpc": "2.0",
          "id": "dontcare",
          "error": {"code": -32000, "message": "Server error", "data": "Contract not found"}
        }
        "#;

        let resp: RpcResponse<CallResult> = serde_json::from_str(json).expect("error should parse");
        let err = resp.into_result("query").unwrap_err();
        assert_eq!(
            err,
            RpcError::Node("query failed with code -32000: Server error: Contract not found".to_string())
        );
    }

    #[test]
    fn missing_result_is_protocol_error() {
        let resp: RpcResponse<CallResult> =
            serde_json::from_str(r#"{"jsonrpc": "2.0", "id": "dontcare"}"#).expect("should parse");
        assert!(matches!(resp.into_result("query"), Err(RpcError::Protocol(_))));
    }

    #[test]
    fn unreachable_node_is_transport_error() {
        let rpc = HttpNodeRpc::new("http://127.0.0.1:1", Duration::from_millis(200))
            .expect("client should build");
        assert_eq!(rpc.url(), "http://127.0.0.1:1");
        assert_eq!(rpc.timeout(), Duration::from_millis(200));
        assert!(matches!(rpc.status(), Err(RpcError::Transport(_))));
    }
}
