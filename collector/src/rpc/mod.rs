//! Client side of the NEAR node JSON-RPC interface.
//!
//! The collector only depends on the [`NodeRpc`] trait, which covers the
//! three calls a scrape makes. [`HttpNodeRpc`] is the production
//! implementation; tests substitute canned responses.

pub mod error;
pub mod http;
pub mod types;

pub use error::RpcError;
pub use http::HttpNodeRpc;
pub use types::{
    CallFunctionRequest, CallResult, CurrentValidator, DelegatorAccount, EpochReference,
    EpochValidatorInfo, GetAccountsArgs, NodeStatus, StakeEntry, SyncInfo, ValidatorKickout,
    VersionInfo,
};

/// Abstract node RPC used by [`crate::scrape::NodeRpcCollector`].
///
/// Calls are blocking; any deadline is the implementation's business.
pub trait NodeRpc: Send + Sync {
    /// `status`: sync state, latest block height, node version.
    fn status(&self) -> Result<NodeStatus, RpcError>;

    /// `validators`: validator set for the given epoch.
    fn validators(&self, epoch: EpochReference) -> Result<EpochValidatorInfo, RpcError>;

    /// `query` with `request_type = call_function`.
    fn call_function(&self, request: &CallFunctionRequest) -> Result<CallResult, RpcError>;
}
