use {
  super::{BackendKind, SessionBackend, SessionStore, SessionStoreExt},
  crate::{AppDetails, Error, Outcome},
  async_trait::async_trait,
  fundraiser_primitives::Network,
  parking_lot::RwLock,
  serde::{Deserialize, Serialize},
  std::sync::Arc,
  tracing::info,
};

const STORE_KEY: &str = "direct-wallet";

/// Per-network addresses of the signed-in account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StxAddress {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mainnet: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub testnet: Option<String>,
}

impl StxAddress {
  pub fn for_network(&self, network: Network) -> Option<&str> {
    match network {
      Network::Mainnet => self.mainnet.as_deref(),
      Network::Testnet => self.testnet.as_deref(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub stx_address: StxAddress,
}

/// What the wallet hands back after the user approves the app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
  pub profile: Profile,
}

/// The wallet side of the direct authentication flow.
///
/// The implementation presents `app` to the user and waits for them
/// to approve or dismiss the request.
#[async_trait]
pub trait Authenticator: Send + Sync {
  async fn authenticate(&self, app: &AppDetails) -> Outcome<UserData>;
}

/// Session backend for a wallet that talks to the app directly.
pub struct DirectWallet {
  app: AppDetails,
  store: Arc<dyn SessionStore>,
  authenticator: Arc<dyn Authenticator>,
  user: RwLock<Option<UserData>>,
}

impl DirectWallet {
  pub fn new(
    app: AppDetails,
    store: Arc<dyn SessionStore>,
    authenticator: Arc<dyn Authenticator>,
  ) -> Self {
    Self {
      app,
      store,
      authenticator,
      user: RwLock::new(None),
    }
  }

  /// Profile of the signed-in user, if any.
  pub fn user_data(&self) -> Option<UserData> {
    self.user.read().clone()
  }
}

#[async_trait]
impl SessionBackend for DirectWallet {
  fn kind(&self) -> BackendKind {
    BackendKind::DirectWallet
  }

  fn init(&self) -> Result<(), Error> {
    let restored: Option<UserData> = self.store.load_json(STORE_KEY)?;
    if restored.is_some() {
      info!("restored direct wallet session");
    }
    *self.user.write() = restored;
    Ok(())
  }

  fn shutdown(&self) {
    self.user.write().take();
  }

  fn is_connected(&self) -> bool {
    self.user.read().is_some()
  }

  fn address(&self, network: Network) -> Option<String> {
    self
      .user
      .read()
      .as_ref()
      .and_then(|u| u.profile.stx_address.for_network(network))
      .map(ToOwned::to_owned)
  }

  async fn connect(&self) -> Outcome<()> {
    match self.authenticator.authenticate(&self.app).await {
      Outcome::Success(user) => {
        if let Err(e) = self.store.save_json(STORE_KEY, &user) {
          return Outcome::Failed(e);
        }
        *self.user.write() = Some(user);
        Outcome::Success(())
      }
      Outcome::Cancelled => Outcome::Cancelled,
      Outcome::Failed(e) => Outcome::Failed(e),
    }
  }

  async fn disconnect(&self) -> Result<(), Error> {
    self.store.remove(STORE_KEY)?;
    *self.user.write() = None;
    Ok(())
  }
}
