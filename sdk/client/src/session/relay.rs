use {
  super::{BackendKind, SessionBackend, SessionStore, SessionStoreExt},
  crate::{Error, Outcome},
  async_trait::async_trait,
  fundraiser_primitives::Network,
  parking_lot::RwLock,
  serde::{Deserialize, Serialize},
  std::sync::Arc,
  tracing::{info, warn},
};

const STORE_KEY: &str = "relay";

/// Account exposed by the remote wallet over the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayAccount {
  pub address: String,

  /// Chain the remote wallet reported for the pairing.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub chain_id: Option<String>,
}

/// The relay transport: a pairing modal on one side, a remote wallet
/// on the other.
#[async_trait]
pub trait RelayConnector: Send + Sync {
  /// Opens the pairing flow and waits for the remote wallet.
  async fn pair(&self, project_id: &str) -> Outcome<RelayAccount>;

  async fn unpair(&self, account: &RelayAccount) -> Result<(), Error>;
}

/// Session backend for a WalletConnect-style relay.
///
/// Pairing needs a project id. Without one, `connect` fails but a
/// previously stored session is still restored and usable.
pub struct RelaySession {
  project_id: Option<String>,
  store: Arc<dyn SessionStore>,
  connector: Arc<dyn RelayConnector>,
  account: RwLock<Option<RelayAccount>>,
}

impl RelaySession {
  pub fn new(
    project_id: Option<String>,
    store: Arc<dyn SessionStore>,
    connector: Arc<dyn RelayConnector>,
  ) -> Self {
    Self {
      project_id: project_id.filter(|id| !id.trim().is_empty()),
      store,
      connector,
      account: RwLock::new(None),
    }
  }

  pub fn account(&self) -> Option<RelayAccount> {
    self.account.read().clone()
  }
}

#[async_trait]
impl SessionBackend for RelaySession {
  fn kind(&self) -> BackendKind {
    BackendKind::Relay
  }

  fn init(&self) -> Result<(), Error> {
    if self.project_id.is_none() {
      warn!("WalletConnect project id is not set, relay pairing is disabled");
    }

    let restored: Option<RelayAccount> = self.store.load_json(STORE_KEY)?;
    if let Some(ref account) = restored {
      info!("restored relay session for {}", account.address);
    }
    *self.account.write() = restored;
    Ok(())
  }

  fn shutdown(&self) {
    self.account.write().take();
  }

  fn is_connected(&self) -> bool {
    self.account.read().is_some()
  }

  /// The remote wallet reports a single account, whatever the network.
  fn address(&self, _: Network) -> Option<String> {
    self.account.read().as_ref().map(|a| a.address.clone())
  }

  async fn connect(&self) -> Outcome<()> {
    let Some(project_id) = self.project_id.as_deref() else {
      return Outcome::Failed(Error::MissingProjectId);
    };

    match self.connector.pair(project_id).await {
      Outcome::Success(account) => {
        if let Err(e) = self.store.save_json(STORE_KEY, &account) {
          return Outcome::Failed(e);
        }
        *self.account.write() = Some(account);
        Outcome::Success(())
      }
      Outcome::Cancelled => Outcome::Cancelled,
      Outcome::Failed(e) => Outcome::Failed(e),
    }
  }

  async fn disconnect(&self) -> Result<(), Error> {
    let account = self.account.read().clone();
    if let Some(account) = account {
      self.connector.unpair(&account).await?;
    }
    self.store.remove(STORE_KEY)?;
    *self.account.write() = None;
    Ok(())
  }
}
