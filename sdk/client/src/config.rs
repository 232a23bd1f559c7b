use {
  fundraiser_primitives::{ContractId, Network, Principal},
  serde::{Deserialize, Serialize},
};

/// Deployer of the fund-raiser contract.
pub const CONTRACT_ADDRESS: &str = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y";

/// Name under which the contract is deployed.
pub const CONTRACT_NAME: &str = "fund-raiser";

/// The only principal the contract lets withdraw.
pub const CONTRACT_OWNER: &str = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y";

/// Identifies the on-chain contract this client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
  /// The contract all reads and writes target.
  pub contract: ContractId,

  /// Principal allowed to withdraw. Used only to decide whether
  /// to offer the withdraw action, the contract enforces it.
  pub owner: Principal,

  /// Network the contract is deployed on. Fixed at compile time
  /// by the `mainnet` feature.
  pub network: Network,
}

impl Default for ContractConfig {
  fn default() -> Self {
    Self {
      contract: format!("{CONTRACT_ADDRESS}.{CONTRACT_NAME}")
        .parse()
        .expect("constructed at compile time"),
      owner: CONTRACT_OWNER.parse().expect("constructed at compile time"),
      network: Network::CONFIGURED,
    }
  }
}

/// Identity shown by wallets when the app asks to connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDetails {
  pub name: String,
  pub icon: String,
}

impl Default for AppDetails {
  fn default() -> Self {
    Self {
      name: "FundRaiser dApp".into(),
      icon: "/favicon.ico".into(),
    }
  }
}

/// Client wide configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the Stacks node API serving read-only calls.
  pub node_url: String,

  pub contract: ContractConfig,

  pub app: AppDetails,

  /// Project identifier required by the WalletConnect relay.
  /// The relay backend refuses to pair without one.
  pub walletconnect_project_id: Option<String>,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      node_url: Network::CONFIGURED.default_api_url().into(),
      contract: ContractConfig::default(),
      app: AppDetails::default(),
      walletconnect_project_id: None,
    }
  }
}
