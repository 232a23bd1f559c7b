pub mod api;
mod config;
mod dashboard;
pub mod dev;
mod error;
mod node;
mod outcome;
pub mod reader;
pub mod session;
mod wallet;
pub mod writer;

pub use {
  config::{
    AppDetails,
    ClientConfig,
    ContractConfig,
    CONTRACT_ADDRESS,
    CONTRACT_NAME,
    CONTRACT_OWNER,
  },
  dashboard::{parse_donation, ContractState, Dashboard, DashboardView},
  error::Error,
  node::{HttpNode, ReadOnlyCall, ReadOnlyNode},
  outcome::Outcome,
  reader::ContractReader,
  session::{BackendKind, Session, SessionBackend, SessionResolver},
  wallet::{ContractCall, PostConditionMode, TxId, Wallet},
  writer::{ContractWriter, PendingTransaction, TxKind, TxStatus},
};
