use {
  crate::{
    block::{Block, Transaction},
    contract::{self, FundRaiser},
    mempool::Mempool,
  },
  dashmap::DashMap,
  fundraiser_client_sdk::{
    api::{DevContractCall, ReadOnlyRequest, ReadOnlyResponse},
    TxId,
  },
  fundraiser_primitives::{
    ClarityError,
    ClarityValue,
    ContractId,
    Principal,
    PrincipalError,
  },
  metrics::{counter, gauge, increment_counter},
  parking_lot::{Mutex, RwLock},
  std::{
    fmt::Display,
    sync::atomic::{AtomicU64, Ordering},
  },
  thiserror::Error,
  tracing::{info, warn},
};

/// Why a submitted call was refused before reaching the mempool.
#[derive(Debug, Error)]
pub enum Rejection {
  #[error("Contract {0} is not deployed on this node")]
  NoSuchContract(String),

  #[error("Invalid sender: {0}")]
  Sender(#[from] PrincipalError),

  #[error("Malformed argument: {0}")]
  Argument(#[from] ClarityError),

  #[error(transparent)]
  Call(#[from] contract::Error),
}

impl Rejection {
  /// Short machine readable reason, the way the node API reports it.
  pub fn code(&self) -> &'static str {
    match self {
      Rejection::NoSuchContract(_) => "NoSuchContract",
      Rejection::Sender(_) => "BadPrincipal",
      Rejection::Argument(_) => "Deserialization",
      Rejection::Call(_) => "BadFunctionArgument",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
  Pending,
  Success,
  AbortByResponse,
}

impl Display for TxState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TxState::Pending => write!(f, "pending"),
      TxState::Success => write!(f, "success"),
      TxState::AbortByResponse => write!(f, "abort_by_response"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRecord {
  pub state: TxState,
  pub result: Option<ClarityValue>,
  pub block_height: Option<u64>,
}

/// A single node chain hosting one fund-raiser contract.
pub struct Devnode {
  contract_id: ContractId,
  contract: FundRaiser,
  mempool: Mutex<Mempool>,
  /// Every submitted transaction, kept for the lifetime of the process
  /// so its status stays queryable. Nothing is ever evicted.
  transactions: DashMap<TxId, TxRecord>,
  tip: RwLock<Block>,
  nonce: AtomicU64,
}

impl Devnode {
  pub fn new(contract_id: ContractId, owner: Principal, goal: u128) -> Self {
    info!("deploying {contract_id} owned by {owner} with goal {goal}");
    Self {
      contract_id,
      contract: FundRaiser::new(owner, goal),
      mempool: Mutex::new(Mempool::default()),
      transactions: DashMap::new(),
      tip: RwLock::new(Block::zero()),
      nonce: AtomicU64::new(0),
    }
  }

  pub fn contract_id(&self) -> &ContractId {
    &self.contract_id
  }

  pub fn contract(&self) -> &FundRaiser {
    &self.contract
  }

  pub fn height(&self) -> u64 {
    self.tip.read().height
  }

  pub fn pending(&self) -> usize {
    self.mempool.lock().len()
  }

  pub fn transaction(&self, txid: &TxId) -> Option<TxRecord> {
    self.transactions.get(txid).map(|r| r.value().clone())
  }

  /// Evaluates a read-only function against the current state.
  /// Failures are reported in the response, never as an error.
  pub fn call_read_only(
    &self,
    address: &str,
    name: &str,
    function: &str,
    request: &ReadOnlyRequest,
  ) -> ReadOnlyResponse {
    increment_counter!("devnode_read_only_calls");

    if !self.is_deployed(address, name) {
      return ReadOnlyResponse::failed(format!(
        "Unchecked(NoSuchContract(\"{address}.{name}\"))"
      ));
    }

    let args = match decode_args(&request.arguments) {
      Ok(args) => args,
      Err(e) => return ReadOnlyResponse::failed(e.to_string()),
    };

    let result = self
      .contract
      .read_only(function, &args)
      .map_err(|e| e.to_string())
      .and_then(|value| value.to_hex().map_err(|e| e.to_string()));

    match result {
      Ok(hex) => ReadOnlyResponse::okay(hex),
      Err(cause) => ReadOnlyResponse::failed(cause),
    }
  }

  /// Validates a call and queues it for the next block.
  pub fn submit(&self, call: &DevContractCall) -> Result<TxId, Rejection> {
    if !self.is_deployed(&call.contract_address, &call.contract_name) {
      return Err(Rejection::NoSuchContract(format!(
        "{}.{}",
        call.contract_address, call.contract_name
      )));
    }

    let sender: Principal = call.sender.parse()?;
    let args = decode_args(&call.function_args)?;
    self.contract.check_call(&call.function_name, &args)?;

    let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
    let tx = Transaction::new(sender, call.function_name.clone(), args, nonce)?;
    let txid = tx.txid;

    self.transactions.insert(txid, TxRecord {
      state: TxState::Pending,
      result: None,
      block_height: None,
    });
    self.mempool.lock().consume(tx);

    increment_counter!("devnode_transactions_submitted");
    info!("accepted {} from {} as {txid}", call.function_name, call.sender);
    Ok(txid)
  }

  /// Mines everything in the mempool into a new block.
  pub fn produce_block(&self) -> Block {
    let mut tip = self.tip.write();
    let block = self.mempool.lock().produce(&self.contract, &tip);

    for receipt in &block.receipts {
      let state = match receipt.committed() {
        true => TxState::Success,
        false => {
          warn!("{} aborted with {}", receipt.txid, receipt.result);
          TxState::AbortByResponse
        }
      };
      self.transactions.insert(receipt.txid, TxRecord {
        state,
        result: Some(receipt.result.clone()),
        block_height: Some(block.height),
      });
    }

    counter!("devnode_transactions_mined", block.receipts.len() as u64);
    gauge!("devnode_block_height", block.height as f64);
    gauge!("devnode_contract_balance", self.contract.balance() as f64);

    *tip = block.clone();
    block
  }

  fn is_deployed(&self, address: &str, name: &str) -> bool {
    self.contract_id.address().to_string() == address
      && self.contract_id.name() == name
  }
}

fn decode_args(args: &[String]) -> Result<Vec<ClarityValue>, ClarityError> {
  args.iter().map(|a| ClarityValue::from_hex(a)).collect()
}
