use std::fmt;

/// Errors that can occur while querying the node.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    /// Transport-level error (connection refused, timeout, ...).
    Transport(String),
    /// The node answered with a non-success HTTP status.
    Service(String),
    /// The response body was not the JSON-RPC envelope we expected.
    Protocol(String),
    /// The node returned a JSON-RPC `error` object.
    Node(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::Transport(msg) => write!(f, "rpc transport error: {msg}"),
            RpcError::Service(msg) => write!(f, "rpc service error: {msg}"),
            RpcError::Protocol(msg) => write!(f, "rpc protocol error: {msg}"),
            RpcError::Node(msg) => write!(f, "node error: {msg}"),
        }
    }
}

impl std::error::Error for RpcError {}
