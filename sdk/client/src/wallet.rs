use {
  crate::{Error, Outcome},
  async_trait::async_trait,
  fundraiser_primitives::{
    from_prefixed_hex,
    ClarityValue,
    ContractId,
    Network,
    ToPrefixedHex,
  },
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    str::FromStr,
  },
};

/// Whether a transaction may move assets beyond what its post
/// conditions declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostConditionMode {
  /// Unrestricted, the contract alone decides what moves.
  Allow,
  Deny,
}

impl Display for PostConditionMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PostConditionMode::Allow => write!(f, "allow"),
      PostConditionMode::Deny => write!(f, "deny"),
    }
  }
}

/// A public contract function invocation that a wallet is asked to
/// sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
  pub contract: ContractId,
  pub function: String,
  pub args: Vec<ClarityValue>,
  pub network: Network,
  pub post_condition_mode: PostConditionMode,
}

/// Identifier of a broadcast transaction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxId([u8; 32]);

impl TxId {
  pub fn new(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }

  pub fn as_bytes(&self) -> &[u8; 32] {
    &self.0
  }

  /// First characters of the id, enough to recognize it.
  pub fn short(&self) -> String {
    let mut full = self.to_string();
    full.truncate(10);
    full
  }
}

impl Display for TxId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0.to_prefixed_hex())
  }
}

impl Debug for TxId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "txid({self})")
  }
}

impl FromStr for TxId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bytes = from_prefixed_hex(s)
      .map_err(|e| Error::Wallet(format!("malformed txid {s:?}: {e}")))?;
    let bytes: [u8; 32] = bytes
      .try_into()
      .map_err(|_| Error::Wallet(format!("txid {s:?} is not 32 bytes")))?;
    Ok(Self(bytes))
  }
}

impl TryFrom<String> for TxId {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    FromStr::from_str(&value)
  }
}

impl From<TxId> for String {
  fn from(id: TxId) -> Self {
    id.to_string()
  }
}

/// The signing side of an active wallet session.
///
/// Implementations prompt the user to approve the call, sign it and
/// hand it to the network. The returned outcome is final from the
/// client's point of view: a submitted transaction is a success, no
/// confirmation is awaited.
#[async_trait]
pub trait Wallet: Send + Sync {
  async fn sign_and_submit(&self, call: ContractCall) -> Outcome<TxId>;
}
