use {
  async_trait::async_trait,
  dashmap::DashMap,
  fundraiser_client_sdk::{
    reader::functions,
    ContractCall,
    ContractReader,
    ContractWriter,
    Dashboard,
    Error,
    Outcome,
    ReadOnlyCall,
    ReadOnlyNode,
    Session,
    TxId,
    Wallet,
  },
  fundraiser_primitives::{ClarityValue, ContractId, Network, Principal},
  parking_lot::Mutex,
  std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  tokio::sync::{watch, Notify},
};

pub const OWNER: &str = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y";
pub const DONOR: &str = "ST000000000000000000002AMW42H";

/// Answers read-only calls from fixed values and counts them.
#[derive(Default)]
pub struct ScriptedNode {
  pub balance: Mutex<u128>,
  pub goal: Mutex<u128>,
  pub donors: DashMap<String, u128>,
  pub failing: AtomicBool,
  calls: DashMap<String, usize>,
}

impl ScriptedNode {
  pub fn new(balance: u128, goal: u128) -> Arc<Self> {
    let node = Self::default();
    *node.balance.lock() = balance;
    *node.goal.lock() = goal;
    Arc::new(node)
  }

  pub fn calls(&self, function: &str) -> usize {
    self.calls.get(function).map(|c| *c).unwrap_or_default()
  }
}

#[async_trait]
impl ReadOnlyNode for ScriptedNode {
  async fn call_read_only(
    &self,
    call: &ReadOnlyCall,
  ) -> Result<ClarityValue, Error> {
    *self.calls.entry(call.function.clone()).or_default() += 1;

    if self.failing.load(Ordering::SeqCst) {
      return Err(Error::CallFailed {
        function: call.function.clone(),
        cause: "node unavailable".into(),
      });
    }

    Ok(match call.function.as_str() {
      functions::GET_BALANCE => ClarityValue::ok((*self.balance.lock()).into()),
      functions::GET_GOAL => ClarityValue::ok((*self.goal.lock()).into()),
      functions::GET_OWNER => ClarityValue::Principal(OWNER.parse()?),
      functions::GET_DONOR_AMOUNT => {
        let donor = call.args[0].to_string();
        let donor = donor.trim_start_matches('\'');
        ClarityValue::UInt(self.donors.get(donor).map(|v| *v).unwrap_or(0))
      }
      other => {
        return Err(Error::CallFailed {
          function: other.into(),
          cause: "unknown function".into(),
        })
      }
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
  Approve,
  Cancel,
  Fail,
}

/// A wallet whose user always gives the same answer. While `hold`
/// is set, submissions wait until `release` is notified.
pub struct ScriptedWallet {
  pub response: Mutex<Response>,
  pub calls: Mutex<Vec<ContractCall>>,
  pub hold: AtomicBool,
  pub release: Notify,
}

impl ScriptedWallet {
  pub fn new(response: Response) -> Arc<Self> {
    Arc::new(Self {
      response: Mutex::new(response),
      calls: Mutex::new(vec![]),
      hold: AtomicBool::new(false),
      release: Notify::new(),
    })
  }
}

#[async_trait]
impl Wallet for ScriptedWallet {
  async fn sign_and_submit(&self, call: ContractCall) -> Outcome<TxId> {
    self.calls.lock().push(call);
    if self.hold.load(Ordering::SeqCst) {
      self.release.notified().await;
    }

    let response = *self.response.lock();
    match response {
      Response::Approve => Outcome::Success(TxId::new([0xab; 32])),
      Response::Cancel => Outcome::Cancelled,
      Response::Fail => {
        Outcome::Failed(Error::Wallet("signing request failed".into()))
      }
    }
  }
}

pub struct Harness {
  pub node: Arc<ScriptedNode>,
  pub wallet: Arc<ScriptedWallet>,
  pub session: watch::Sender<Session>,
  pub dashboard: Arc<Dashboard>,
}

pub fn harness(session: Session, balance: u128, goal: u128) -> Harness {
  let node = ScriptedNode::new(balance, goal);
  let wallet = ScriptedWallet::new(Response::Approve);
  let (sender, receiver) = watch::channel(session);

  let contract: ContractId = format!("{OWNER}.fund-raiser").parse().unwrap();
  let owner: Principal = OWNER.parse().unwrap();
  let dashboard = Dashboard::new(
    ContractReader::new(node.clone(), contract.clone()),
    ContractWriter::new(wallet.clone(), contract, Network::Testnet),
    receiver,
    &owner,
  );

  Harness {
    node,
    wallet,
    session: sender,
    dashboard: Arc::new(dashboard),
  }
}
