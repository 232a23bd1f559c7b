//! JSON bodies exchanged with the Stacks node HTTP API.
//!
//! The devnode serves the same shapes, so both sides share them.

use {
  fundraiser_primitives::{ClarityError, ClarityValue},
  serde::{Deserialize, Serialize},
};

/// Body of `POST /v2/contracts/call-read/{address}/{name}/{function}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOnlyRequest {
  pub sender: String,

  /// `0x`-prefixed hex serialized Clarity values.
  pub arguments: Vec<String>,
}

/// Reply to a read-only call. `result` is set when `okay`,
/// `cause` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOnlyResponse {
  pub okay: bool,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub result: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cause: Option<String>,
}

impl ReadOnlyResponse {
  pub fn okay(result: String) -> Self {
    Self {
      okay: true,
      result: Some(result),
      cause: None,
    }
  }

  pub fn failed(cause: impl Into<String>) -> Self {
    Self {
      okay: false,
      result: None,
      cause: Some(cause.into()),
    }
  }
}

/// Body of `POST /v2/dev/contract-call`, a contract call attributed
/// to `sender` that the devnode executes without a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevContractCall {
  pub sender: String,
  pub contract_address: String,
  pub contract_name: String,
  pub function_name: String,
  pub function_args: Vec<String>,
  pub post_condition_mode: String,
}

/// Reply to an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
  pub txid: String,
}

/// Reply to a rejected transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRejection {
  pub error: String,
  pub reason: String,
}

/// Body of `GET /extended/v1/tx/{txid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStatusResponse {
  pub tx_id: String,

  /// One of `pending`, `success` or `abort_by_response`.
  pub tx_status: String,

  /// Result of the contract call once mined.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tx_result: Option<TxResult>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub block_height: Option<u64>,
}

/// A mined call result, both serialized and as a Clarity literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
  pub hex: String,
  pub repr: String,
}

impl TxResult {
  pub fn new(value: &ClarityValue) -> Result<Self, ClarityError> {
    Ok(Self {
      hex: value.to_hex()?,
      repr: value.to_string(),
    })
  }

  pub fn value(&self) -> Result<ClarityValue, ClarityError> {
    ClarityValue::from_hex(&self.hex)
  }
}
