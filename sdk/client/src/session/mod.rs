mod direct;
mod relay;
mod store;

pub use {
  direct::{Authenticator, DirectWallet, Profile, StxAddress, UserData},
  relay::{RelayAccount, RelayConnector, RelaySession},
  store::{
    FileSessionStore,
    MemorySessionStore,
    SessionStore,
    SessionStoreExt,
  },
};
use {
  crate::{Error, Outcome},
  async_trait::async_trait,
  fundraiser_primitives::Network,
  std::{fmt::Display, sync::Arc},
  tokio::sync::watch,
  tracing::{info, warn},
};

/// The two independent ways a user can be connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
  /// A Stacks wallet extension talking to the app directly.
  DirectWallet,

  /// A WalletConnect-style session relayed through a bridge.
  Relay,
}

impl Display for BackendKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      BackendKind::DirectWallet => write!(f, "direct wallet"),
      BackendKind::Relay => write!(f, "relay"),
    }
  }
}

/// The wallet identity the app currently acts for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
  DirectWallet(String),
  Relay(String),
  #[default]
  None,
}

impl Session {
  pub fn is_connected(&self) -> bool {
    !matches!(self, Session::None)
  }

  pub fn address(&self) -> Option<&str> {
    match self {
      Session::DirectWallet(address) | Session::Relay(address) => {
        Some(address)
      }
      Session::None => None,
    }
  }

  pub fn kind(&self) -> Option<BackendKind> {
    match self {
      Session::DirectWallet(_) => Some(BackendKind::DirectWallet),
      Session::Relay(_) => Some(BackendKind::Relay),
      Session::None => None,
    }
  }
}

/// A source of wallet sessions.
///
/// Backends own their session state and its persistence. They are
/// constructed explicitly, brought up with [`SessionBackend::init`]
/// and torn down with [`SessionBackend::shutdown`].
#[async_trait]
pub trait SessionBackend: Send + Sync {
  fn kind(&self) -> BackendKind;

  /// Restores any persisted session.
  fn init(&self) -> Result<(), Error>;

  fn shutdown(&self);

  fn is_connected(&self) -> bool;

  /// Address of the connected account on the given network.
  fn address(&self, network: Network) -> Option<String>;

  /// Runs the backend's authentication flow. This usually waits on
  /// the user acting in some UI outside of this process.
  async fn connect(&self) -> Outcome<()>;

  async fn disconnect(&self) -> Result<(), Error>;
}

/// Picks the session to act for. The direct wallet takes precedence
/// when both backends are connected. A backend that is connected but
/// has no address on `network` does not yield a session.
pub fn resolve(
  direct: &dyn SessionBackend,
  relay: &dyn SessionBackend,
  network: Network,
) -> Session {
  if direct.is_connected() {
    if let Some(address) = direct.address(network) {
      return Session::DirectWallet(address);
    }
    warn!("direct wallet is signed in but has no {network} address");
  }

  if relay.is_connected() {
    if let Some(address) = relay.address(network) {
      return Session::Relay(address);
    }
  }

  Session::None
}

/// Owns both session backends and publishes the resolved session.
///
/// Every connect and disconnect invalidates the published session,
/// which notifies all subscribers so they can re-fetch whatever
/// depends on the user's identity.
pub struct SessionResolver {
  direct: Arc<dyn SessionBackend>,
  relay: Arc<dyn SessionBackend>,
  network: Network,
  current: watch::Sender<Session>,
}

impl SessionResolver {
  /// Initializes both backends and resolves the initial session.
  pub fn start(
    direct: Arc<dyn SessionBackend>,
    relay: Arc<dyn SessionBackend>,
    network: Network,
  ) -> Result<Self, Error> {
    direct.init()?;
    relay.init()?;

    let initial = resolve(&*direct, &*relay, network);
    info!("initial session: {initial:?}");

    let (current, _) = watch::channel(initial);
    Ok(Self {
      direct,
      relay,
      network,
      current,
    })
  }

  pub fn network(&self) -> Network {
    self.network
  }

  /// Resolves the session from the backends' current state.
  pub fn resolve(&self) -> Session {
    resolve(&*self.direct, &*self.relay, self.network)
  }

  /// The last published session.
  pub fn current(&self) -> Session {
    self.current.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<Session> {
    self.current.subscribe()
  }

  /// Re-resolves and publishes the session, notifying subscribers
  /// even if it did not change.
  pub fn invalidate(&self) -> Session {
    let session = self.resolve();
    self.current.send_replace(session.clone());
    session
  }

  /// Connects one of the backends. On success the published session
  /// is invalidated, a cancelled or failed attempt changes nothing.
  pub async fn connect(&self, kind: BackendKind) -> Outcome<Session> {
    info!("connecting {kind}");
    match self.backend(kind).connect().await {
      Outcome::Success(()) => Outcome::Success(self.invalidate()),
      Outcome::Cancelled => {
        info!("{kind} connection cancelled");
        Outcome::Cancelled
      }
      Outcome::Failed(e) => {
        warn!("{kind} connection failed: {e}");
        Outcome::Failed(e)
      }
    }
  }

  /// Disconnects the backend that produced the active session, then
  /// invalidates the published session. Without an active session any
  /// backend that is still signed in is cleared.
  pub async fn disconnect(&self) -> Result<Session, Error> {
    match self.resolve().kind() {
      Some(kind) => {
        info!("disconnecting {kind}");
        self.backend(kind).disconnect().await?;
      }
      None => {
        for backend in [&self.direct, &self.relay] {
          if backend.is_connected() {
            info!("clearing {} without an active session", backend.kind());
            backend.disconnect().await?;
          }
        }
      }
    }
    Ok(self.invalidate())
  }

  /// Shuts both backends down.
  pub fn shutdown(self) {
    self.direct.shutdown();
    self.relay.shutdown();
  }

  fn backend(&self, kind: BackendKind) -> &dyn SessionBackend {
    match kind {
      BackendKind::DirectWallet => &*self.direct,
      BackendKind::Relay => &*self.relay,
    }
  }
}
