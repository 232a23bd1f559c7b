use {
  crate::principal::{
    MAINNET_MULTISIG,
    MAINNET_SINGLESIG,
    TESTNET_MULTISIG,
    TESTNET_SINGLESIG,
  },
  serde::{Deserialize, Serialize},
  std::fmt::Display,
};

/// The Stacks network a build talks to.
///
/// The choice is made at compile time through the `mainnet` cargo
/// feature, there is no runtime switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
  Mainnet,
  Testnet,
}

impl Network {
  /// The network selected for this build.
  #[cfg(feature = "mainnet")]
  pub const CONFIGURED: Network = Network::Mainnet;

  /// The network selected for this build.
  #[cfg(not(feature = "mainnet"))]
  pub const CONFIGURED: Network = Network::Testnet;

  pub fn is_mainnet(&self) -> bool {
    matches!(self, Network::Mainnet)
  }

  /// Address version of single-signature accounts on this network.
  pub fn singlesig_version(&self) -> u8 {
    match self {
      Network::Mainnet => MAINNET_SINGLESIG,
      Network::Testnet => TESTNET_SINGLESIG,
    }
  }

  /// Address version of multi-signature accounts on this network.
  pub fn multisig_version(&self) -> u8 {
    match self {
      Network::Mainnet => MAINNET_MULTISIG,
      Network::Testnet => TESTNET_MULTISIG,
    }
  }

  /// Public Stacks API endpoint for this network.
  pub fn default_api_url(&self) -> &'static str {
    match self {
      Network::Mainnet => "https://api.hiro.so",
      Network::Testnet => "https://api.testnet.hiro.so",
    }
  }
}

impl Default for Network {
  fn default() -> Self {
    Self::CONFIGURED
  }
}

impl Display for Network {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Network::Mainnet => write!(f, "Mainnet"),
      Network::Testnet => write!(f, "Testnet"),
    }
  }
}
