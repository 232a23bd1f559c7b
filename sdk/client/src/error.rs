use {
  fundraiser_primitives::{ClarityError, PrincipalError},
  thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Node transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Node responded with HTTP {status}: {body}")]
  Http { status: u16, body: String },

  #[error("Read-only call to {function} failed: {cause}")]
  CallFailed { function: String, cause: String },

  #[error("Clarity error: {0}")]
  Clarity(#[from] ClarityError),

  #[error("Unexpected result from {function}: {value}")]
  UnexpectedResult { function: String, value: String },

  #[error("Invalid principal: {0}")]
  Principal(#[from] PrincipalError),

  #[error("Transaction rejected: {0}")]
  Rejected(String),

  #[error("Wallet error: {0}")]
  Wallet(String),

  #[error("Session storage IO error: {0}")]
  Storage(#[from] std::io::Error),

  #[error("Session serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("WalletConnect project id is not configured")]
  MissingProjectId,

  #[error("No wallet session is active")]
  NoSession,

  #[error("Invalid amount {0:?}. Expected a number of STX greater than 0")]
  InvalidAmount(String),

  #[error("Another transaction is awaiting the wallet")]
  WriteInFlight,

  #[error("Only the contract owner can withdraw")]
  NotOwner,

  #[error("The contract balance is currently 0 STX")]
  NothingToWithdraw,
}
