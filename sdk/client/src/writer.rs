use {
  crate::{
    wallet::{ContractCall, PostConditionMode, TxId, Wallet},
    Outcome,
  },
  fundraiser_primitives::{ClarityValue, ContractId, Network},
  std::{fmt::Display, sync::Arc},
  tracing::{error, info},
};

/// Public functions of the fund-raiser contract.
pub mod functions {
  pub const FUND: &str = "fund";
  pub const WITHDRAW: &str = "withdraw";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
  Fund,
  Withdraw,
}

impl Display for TxKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TxKind::Fund => write!(f, "donation"),
      TxKind::Withdraw => write!(f, "withdrawal"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
  Submitted(TxId),
  Cancelled,
  Failed,
}

impl From<&Outcome<TxId>> for TxStatus {
  fn from(outcome: &Outcome<TxId>) -> Self {
    match outcome {
      Outcome::Success(txid) => TxStatus::Submitted(*txid),
      Outcome::Cancelled => TxStatus::Cancelled,
      Outcome::Failed(_) => TxStatus::Failed,
    }
  }
}

/// A write that is being put through the wallet. It lives only for
/// the duration of one submit-and-await cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransaction {
  pub kind: TxKind,

  /// Donated amount in micro-STX, only set for donations.
  pub amount_micro: Option<u128>,
}

impl PendingTransaction {
  pub fn fund(amount_micro: u128) -> Self {
    Self {
      kind: TxKind::Fund,
      amount_micro: Some(amount_micro),
    }
  }

  pub fn withdraw() -> Self {
    Self {
      kind: TxKind::Withdraw,
      amount_micro: None,
    }
  }

  /// The contract call that carries out this transaction.
  ///
  /// Post conditions are left unrestricted: the contract is
  /// trusted to move exactly what its logic says.
  pub fn contract_call(
    &self,
    contract: &ContractId,
    network: Network,
  ) -> ContractCall {
    let (function, args) = match self.kind {
      TxKind::Fund => (
        functions::FUND,
        vec![ClarityValue::UInt(self.amount_micro.unwrap_or_default())],
      ),
      TxKind::Withdraw => (functions::WITHDRAW, vec![]),
    };

    ContractCall {
      contract: contract.clone(),
      function: function.into(),
      args,
      network,
      post_condition_mode: PostConditionMode::Allow,
    }
  }
}

/// Submits fund-raiser transactions through the active wallet.
///
/// No authorization or amount checks happen here. Callers validate
/// input, and the contract rejects what it does not allow.
#[derive(Clone)]
pub struct ContractWriter {
  wallet: Arc<dyn Wallet>,
  contract: ContractId,
  network: Network,
}

impl ContractWriter {
  pub fn new(
    wallet: Arc<dyn Wallet>,
    contract: ContractId,
    network: Network,
  ) -> Self {
    Self {
      wallet,
      contract,
      network,
    }
  }

  /// Donates `amount_micro` micro-STX to the contract.
  pub async fn fund(&self, amount_micro: u128) -> Outcome<TxId> {
    self.submit(PendingTransaction::fund(amount_micro)).await
  }

  /// Moves the whole contract balance to the owner.
  pub async fn withdraw(&self) -> Outcome<TxId> {
    self.submit(PendingTransaction::withdraw()).await
  }

  pub async fn submit(&self, pending: PendingTransaction) -> Outcome<TxId> {
    let call = pending.contract_call(&self.contract, self.network);
    info!(
      "requesting signature for {} via {}::{}",
      pending.kind, self.contract, call.function
    );

    let outcome = self.wallet.sign_and_submit(call).await;
    match &outcome {
      Outcome::Success(txid) => info!("{} submitted: {txid}", pending.kind),
      Outcome::Cancelled => info!("{} cancelled by user", pending.kind),
      Outcome::Failed(e) => error!("{} failed: {e}", pending.kind),
    }
    outcome
  }
}
