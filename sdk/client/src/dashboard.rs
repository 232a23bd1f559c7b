use {
  crate::{
    reader::ContractReader,
    session::Session,
    wallet::TxId,
    writer::{ContractWriter, PendingTransaction, TxStatus},
    Error,
    Outcome,
  },
  fundraiser_primitives::{units, Principal},
  parking_lot::RwLock,
  std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  tokio::{sync::watch, task::JoinHandle},
  tracing::{debug, info, warn},
};

/// Balance and goal of the contract, both in micro-STX.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractState {
  pub balance: u128,
  pub goal: u128,
}

impl ContractState {
  /// Progress towards the goal, capped at 100. Zero when no goal is set.
  pub fn percentage(&self) -> f64 {
    if self.goal == 0 {
      return 0.0;
    }
    (self.balance as f64 / self.goal as f64 * 100.0).min(100.0)
  }

  pub fn remaining(&self) -> u128 {
    self.goal.saturating_sub(self.balance)
  }

  pub fn goal_reached(&self) -> bool {
    self.percentage() >= 100.0
  }
}

/// Everything a frontend needs to render the fund-raiser page.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
  pub session: Session,
  pub state: ContractState,
  pub percentage: f64,

  /// Donations of the session's account, in micro-STX.
  pub contribution: u128,

  /// Whether to offer the withdraw action.
  pub is_owner: bool,
  pub last_transaction: Option<(PendingTransaction, TxStatus)>,
}

/// Headless view model of the fund-raiser page.
///
/// Holds the last fetched contract state and runs the donate and
/// withdraw flows. State is only ever re-fetched from the contract,
/// never updated locally.
pub struct Dashboard {
  reader: ContractReader,
  writer: ContractWriter,
  session: watch::Receiver<Session>,
  owner: Principal,
  state: RwLock<ContractState>,
  contribution: RwLock<u128>,
  last_transaction: RwLock<Option<(PendingTransaction, TxStatus)>>,
  writing: AtomicBool,
}

impl Dashboard {
  pub fn new(
    reader: ContractReader,
    writer: ContractWriter,
    session: watch::Receiver<Session>,
    owner: &Principal,
  ) -> Self {
    Self {
      reader,
      writer,
      session,
      owner: owner.clone(),
      state: RwLock::new(ContractState::default()),
      contribution: RwLock::new(0),
      last_transaction: RwLock::new(None),
      writing: AtomicBool::new(false),
    }
  }

  pub fn session(&self) -> Session {
    self.session.borrow().clone()
  }

  pub fn state(&self) -> ContractState {
    *self.state.read()
  }

  pub fn contribution(&self) -> u128 {
    *self.contribution.read()
  }

  pub fn last_transaction(&self) -> Option<(PendingTransaction, TxStatus)> {
    *self.last_transaction.read()
  }

  /// Advisory only, the contract decides who may withdraw.
  ///
  /// Addresses are compared as principals, so any spelling that
  /// decodes to the owner's account counts.
  pub fn is_owner(&self) -> bool {
    self
      .session()
      .address()
      .and_then(|address| address.parse::<Principal>().ok())
      .map_or(false, |principal| principal == self.owner)
  }

  pub fn view(&self) -> DashboardView {
    let state = self.state();
    DashboardView {
      session: self.session(),
      state,
      percentage: state.percentage(),
      contribution: self.contribution(),
      is_owner: self.is_owner(),
      last_transaction: self.last_transaction(),
    }
  }

  /// Fetches balance and goal concurrently and replaces the cached
  /// state once both have arrived.
  pub async fn refresh(&self) -> ContractState {
    let (balance, goal) =
      futures::join!(self.reader.get_balance(), self.reader.get_goal());
    let state = ContractState { balance, goal };
    debug!("contract state: {state:?}");
    *self.state.write() = state;
    state
  }

  /// Fetches the donations of the session's account. Without a
  /// session the contribution is zero and nothing is queried.
  pub async fn refresh_contribution(&self) -> u128 {
    let address = self.session().address().map(ToOwned::to_owned);
    let amount = match address {
      Some(address) => self.reader.get_donor_amount(&address).await,
      None => 0,
    };
    *self.contribution.write() = amount;
    amount
  }

  /// Donates the STX amount typed by the user.
  ///
  /// Input that is not a finite positive number, or that is too small
  /// to be represented in micro-STX, is rejected without invoking the
  /// wallet. A successful submission refreshes the contract state once.
  pub async fn donate(&self, input: &str) -> Outcome<TxId> {
    if !self.session().is_connected() {
      return Outcome::Failed(Error::NoSession);
    }

    let amount_micro = match parse_donation(input) {
      Ok(amount) => amount,
      Err(e) => {
        warn!("{e}");
        return Outcome::Failed(e);
      }
    };

    self.write(PendingTransaction::fund(amount_micro)).await
  }

  /// Withdraws the whole balance to the owner.
  ///
  /// Offered only to the owner and only when there is something to
  /// withdraw, judged from the cached state.
  pub async fn withdraw(&self) -> Outcome<TxId> {
    if !self.is_owner() {
      warn!("withdraw requested by a non-owner session");
      return Outcome::Failed(Error::NotOwner);
    }

    if self.state().balance == 0 {
      return Outcome::Failed(Error::NothingToWithdraw);
    }

    self.write(PendingTransaction::withdraw()).await
  }

  /// Re-fetches whatever depends on the session each time the
  /// session is invalidated. The task ends when the publisher is
  /// dropped.
  ///
  /// The receiver is cloned before the task is spawned, so changes
  /// published before the task first runs are still observed.
  pub fn follow_session(self: Arc<Self>) -> JoinHandle<()> {
    let mut updates = self.session.clone();
    let mut address = updates.borrow().address().map(ToOwned::to_owned);

    tokio::spawn(async move {
      while updates.changed().await.is_ok() {
        let current =
          updates.borrow_and_update().address().map(ToOwned::to_owned);
        info!("session changed, now {:?}", current);

        self.refresh().await;
        if current != address {
          address = current;
          self.refresh_contribution().await;
        }
      }
    })
  }

  async fn write(&self, pending: PendingTransaction) -> Outcome<TxId> {
    let Some(_guard) = WriteGuard::acquire(&self.writing) else {
      return Outcome::Failed(Error::WriteInFlight);
    };

    let outcome = self.writer.submit(pending).await;
    *self.last_transaction.write() = Some((pending, TxStatus::from(&outcome)));

    if outcome.is_success() {
      self.refresh().await;
    }
    outcome
  }
}

/// Parses user input in STX into micro-STX.
pub fn parse_donation(input: &str) -> Result<u128, Error> {
  let invalid = || Error::InvalidAmount(input.to_owned());
  let stx: f64 = input.trim().parse().map_err(|_| invalid())?;
  if !stx.is_finite() || stx <= 0.0 {
    return Err(invalid());
  }

  match units::to_minor_units(stx) {
    0 => Err(invalid()),
    micro => Ok(micro),
  }
}

/// Marks a write as outstanding until dropped.
struct WriteGuard<'a>(&'a AtomicBool);

impl<'a> WriteGuard<'a> {
  fn acquire(flag: &'a AtomicBool) -> Option<Self> {
    flag
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| Self(flag))
  }
}

impl Drop for WriteGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}
