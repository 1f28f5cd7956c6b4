//! Request and response payloads for the node JSON-RPC calls the collector
//! makes.
//!
//! Only the fields the collector reads are modelled; everything else the
//! node returns is ignored during deserialisation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Result of the `status` call.
#[derive(Clone, Debug, Deserialize)]
pub struct NodeStatus {
    pub sync_info: SyncInfo,
    pub version: VersionInfo,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SyncInfo {
    pub syncing: bool,
    pub latest_block_height: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub build: String,
}

/// Which epoch a `validators` call refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpochReference {
    /// The epoch of the latest block.
    Latest,
}

impl EpochReference {
    /// JSON-RPC `params` for the `validators` method.
    pub fn params(&self) -> Value {
        match self {
            EpochReference::Latest => json!([null]),
        }
    }
}

/// Result of the `validators` call.
#[derive(Clone, Debug, Deserialize)]
pub struct EpochValidatorInfo {
    pub epoch_start_height: u64,
    #[serde(default)]
    pub current_validators: Vec<CurrentValidator>,
    #[serde(default)]
    pub next_validators: Vec<StakeEntry>,
    #[serde(default)]
    pub current_proposals: Vec<StakeEntry>,
    #[serde(default)]
    pub prev_epoch_kick_out: Vec<ValidatorKickout>,
}

/// Entry of `current_validators`.
#[derive(Clone, Debug, Deserialize)]
pub struct CurrentValidator {
    pub account_id: String,
    /// Yocto-denominated stake as a decimal string.
    pub stake: String,
    pub num_produced_blocks: u64,
    pub num_expected_blocks: u64,
    pub num_produced_chunks: u64,
    pub num_expected_chunks: u64,
}

/// Entry of `next_validators` or `current_proposals`.
#[derive(Clone, Debug, Deserialize)]
pub struct StakeEntry {
    pub account_id: String,
    pub stake: String,
}

/// Entry of `prev_epoch_kick_out`.
#[derive(Clone, Debug, Deserialize)]
pub struct ValidatorKickout {
    pub account_id: String,
    /// Either a bare string (`"Slashed"`) or an object such as
    /// `{"NotEnoughBlocks": {"produced": 1, "expected": 10}}`.
    pub reason: Value,
}

impl ValidatorKickout {
    /// Renders the kickout reason for use as a label value.
    pub fn reason_label(&self) -> String {
        match &self.reason {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Arguments of the staking pool `get_accounts` view method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountsArgs {
    pub from_index: u64,
    pub limit: u64,
}

impl Default for GetAccountsArgs {
    fn default() -> Self {
        Self {
            from_index: 0,
            limit: 100,
        }
    }
}

/// `query` request with `request_type = call_function`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallFunctionRequest {
    pub request_type: String,
    pub finality: String,
    pub account_id: String,
    pub method_name: String,
    pub args_base64: String,
}

impl CallFunctionRequest {
    /// View call of `method_name` on `account_id` against final state.
    pub fn new(
        account_id: impl Into<String>,
        method_name: impl Into<String>,
        args: &impl Serialize,
    ) -> Self {
        // Serialising a plain struct of integers cannot fail.
        let args_json = serde_json::to_vec(args).unwrap_or_default();
        Self {
            request_type: "call_function".to_string(),
            finality: "final".to_string(),
            account_id: account_id.into(),
            method_name: method_name.into(),
            args_base64: STANDARD.encode(args_json),
        }
    }

    /// First page of delegators of the staking pool `account_id`.
    pub fn get_accounts(account_id: impl Into<String>) -> Self {
        Self::new(account_id, "get_accounts", &GetAccountsArgs::default())
    }
}

/// Result of a `call_function` query.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CallResult {
    /// Raw bytes returned by the contract method.
    #[serde(default)]
    pub result: Vec<u8>,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl CallResult {
    /// Parses the returned bytes as the `get_accounts` delegator list.
    ///
    /// A payload that is not a JSON array of delegator records yields an
    /// empty list.
    pub fn delegators(&self) -> Vec<DelegatorAccount> {
        let text = String::from_utf8_lossy(&self.result);
        serde_json::from_str(&text).unwrap_or_default()
    }
}

/// One delegator of a staking pool, as returned by `get_accounts`.
///
/// Missing fields take their zero value so one sparse record does not
/// discard the whole page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DelegatorAccount {
    pub account_id: String,
    pub unstaked_balance: String,
    pub staked_balance: String,
    pub can_withdraw: bool,
}
