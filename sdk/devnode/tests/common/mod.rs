use {
  async_trait::async_trait,
  fundraiser_client_sdk::{
    dev::DevWallet,
    session::{
      Authenticator,
      DirectWallet,
      MemorySessionStore,
      Profile,
      RelayAccount,
      RelayConnector,
      RelaySession,
      StxAddress,
      UserData,
    },
    AppDetails,
    BackendKind,
    ContractReader,
    ContractWriter,
    Dashboard,
    Error,
    HttpNode,
    Outcome,
    SessionResolver,
  },
  fundraiser_devnode::{start, Devnode, Running},
  fundraiser_primitives::{Network, Principal},
  std::{sync::Arc, time::Duration},
};

pub const OWNER: &str = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y";
pub const DONOR: &str = "ST000000000000000000002AMW42H";
pub const GOAL: u128 = 10_000_000;

/// A devnode on an ephemeral local port. Blocks are only produced
/// when a test asks for one.
pub fn devnode() -> anyhow::Result<Running> {
  let node = Arc::new(Devnode::new(
    format!("{OWNER}.fund-raiser").parse()?,
    OWNER.parse()?,
    GOAL,
  ));
  start(
    node,
    &["127.0.0.1:0".parse()?],
    Duration::from_secs(60 * 60),
  )
}

/// Signs the user in with a fixed testnet address, no questions asked.
pub struct Preset(pub String);

#[async_trait]
impl Authenticator for Preset {
  async fn authenticate(&self, _: &AppDetails) -> Outcome<UserData> {
    Outcome::Success(UserData {
      profile: Profile {
        stx_address: StxAddress {
          mainnet: None,
          testnet: Some(self.0.clone()),
        },
      },
    })
  }
}

/// A relay nobody ever pairs with.
pub struct Unpaired;

#[async_trait]
impl RelayConnector for Unpaired {
  async fn pair(&self, _: &str) -> Outcome<RelayAccount> {
    Outcome::Cancelled
  }

  async fn unpair(&self, _: &RelayAccount) -> Result<(), Error> {
    Ok(())
  }
}

/// A dashboard acting for `address` against the running devnode.
pub async fn dashboard_for(
  running: &Running,
  address: &str,
) -> anyhow::Result<(Arc<Dashboard>, SessionResolver)> {
  let url = running.url().ok_or_else(|| anyhow::anyhow!("not bound"))?;
  let contract = running.node().contract_id().clone();

  let direct = Arc::new(DirectWallet::new(
    AppDetails::default(),
    Arc::new(MemorySessionStore::default()),
    Arc::new(Preset(address.to_owned())),
  ));
  let relay = Arc::new(RelaySession::new(
    None,
    Arc::new(MemorySessionStore::default()),
    Arc::new(Unpaired),
  ));
  let resolver = SessionResolver::start(direct, relay, Network::Testnet)?;
  resolver
    .connect(BackendKind::DirectWallet)
    .await
    .into_result()?;

  let sender: Principal = address.parse()?;
  let reader =
    ContractReader::new(Arc::new(HttpNode::new(&url)), contract.clone());
  let writer = ContractWriter::new(
    Arc::new(DevWallet::new(&url, sender)),
    contract,
    Network::Testnet,
  );
  let owner: Principal = OWNER.parse()?;
  let dashboard = Dashboard::new(reader, writer, resolver.subscribe(), &owner);
  Ok((Arc::new(dashboard), resolver))
}
