use {
  crate::{c32check, Network},
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    str::FromStr,
  },
  thiserror::Error,
};

/// Mainnet single-signature address version (`SP...`).
pub const MAINNET_SINGLESIG: u8 = 22;
/// Mainnet multi-signature address version (`SM...`).
pub const MAINNET_MULTISIG: u8 = 20;
/// Testnet single-signature address version (`ST...`).
pub const TESTNET_SINGLESIG: u8 = 26;
/// Testnet multi-signature address version (`SN...`).
pub const TESTNET_MULTISIG: u8 = 21;

/// Longest contract name accepted by the Clarity VM.
pub const MAX_CONTRACT_NAME_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Principal must start with 'S'")]
  MissingPrefix,

  #[error("Invalid address encoding: {0}")]
  Encoding(#[from] c32check::Error),

  #[error("Address hash must be 20 bytes, got {0}")]
  InvalidHashLength(usize),

  #[error("Invalid contract name {0:?}")]
  InvalidContractName(String),
}

/// An account on the Stacks chain.
///
/// It is identified by the 20-byte hash160 of its public key(s)
/// and an address version byte that encodes both the network and
/// the signature scheme (single or multisig).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardPrincipal {
  version: u8,
  hash: [u8; 20],
}

impl StandardPrincipal {
  pub fn new(version: u8, hash: [u8; 20]) -> Result<Self, Error> {
    if version >= 32 {
      return Err(c32check::Error::InvalidVersion(version).into());
    }
    Ok(Self { version, hash })
  }

  pub fn version(&self) -> u8 {
    self.version
  }

  pub fn hash(&self) -> &[u8; 20] {
    &self.hash
  }

  /// The network this address version belongs to, if it is one of the
  /// four well known versions.
  pub fn network(&self) -> Option<Network> {
    match self.version {
      MAINNET_SINGLESIG | MAINNET_MULTISIG => Some(Network::Mainnet),
      TESTNET_SINGLESIG | TESTNET_MULTISIG => Some(Network::Testnet),
      _ => None,
    }
  }
}

impl Display for StandardPrincipal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // versions are validated on construction, so encoding cannot fail
    match c32check::check_encode(self.version, &self.hash) {
      Ok(encoded) => write!(f, "S{encoded}"),
      Err(_) => Err(std::fmt::Error),
    }
  }
}

impl Debug for StandardPrincipal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "principal({self})")
  }
}

impl FromStr for StandardPrincipal {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let encoded = s
      .strip_prefix('S')
      .or_else(|| s.strip_prefix('s'))
      .ok_or(Error::MissingPrefix)?;
    let (version, payload) = c32check::check_decode(encoded)?;
    let hash: [u8; 20] = payload
      .as_slice()
      .try_into()
      .map_err(|_| Error::InvalidHashLength(payload.len()))?;
    Self::new(version, hash)
  }
}

/// Represents any identity that can own assets or be called:
/// either a standard account or a contract deployed by one.
///
/// The textual form is `ST...` for accounts and `ST....contract-name`
/// for contracts.
#[derive(
  Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Principal {
  Standard(StandardPrincipal),
  Contract(StandardPrincipal, String),
}

impl Principal {
  /// The account that owns this principal. For contracts
  /// that is the deployer.
  pub fn account(&self) -> &StandardPrincipal {
    match self {
      Principal::Standard(account) => account,
      Principal::Contract(account, _) => account,
    }
  }

  pub fn is_contract(&self) -> bool {
    matches!(self, Principal::Contract(..))
  }
}

impl From<StandardPrincipal> for Principal {
  fn from(account: StandardPrincipal) -> Self {
    Principal::Standard(account)
  }
}

impl Display for Principal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Principal::Standard(account) => write!(f, "{account}"),
      Principal::Contract(account, name) => write!(f, "{account}.{name}"),
    }
  }
}

impl Debug for Principal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "principal({self})")
  }
}

impl From<Principal> for String {
  fn from(p: Principal) -> Self {
    p.to_string()
  }
}

impl FromStr for Principal {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.split_once('.') {
      None => Ok(Principal::Standard(s.parse()?)),
      Some((account, name)) => {
        validate_contract_name(name)?;
        Ok(Principal::Contract(account.parse()?, name.to_owned()))
      }
    }
  }
}

impl TryFrom<&str> for Principal {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    FromStr::from_str(value)
  }
}

impl TryFrom<String> for Principal {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    FromStr::from_str(&value)
  }
}

/// Contract names start with a letter, followed by letters, digits,
/// `-` or `_`, at most [`MAX_CONTRACT_NAME_LEN`] characters long.
pub fn validate_contract_name(name: &str) -> Result<(), Error> {
  let mut chars = name.chars();
  let valid = name.len() <= MAX_CONTRACT_NAME_LEN
    && chars.next().map_or(false, |c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

  match valid {
    true => Ok(()),
    false => Err(Error::InvalidContractName(name.to_owned())),
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{Error, Principal, StandardPrincipal, TESTNET_SINGLESIG},
    crate::Network,
  };

  const OWNER: &str = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y";

  #[test]
  fn standard_principal_roundtrip() -> anyhow::Result<()> {
    let owner: StandardPrincipal = OWNER.parse()?;
    assert_eq!(owner.version(), TESTNET_SINGLESIG);
    assert_eq!(
      owner.hash().to_vec(),
      hex::decode("20dc83c13a4e3754ba646b184a4958c3de5cbeea")?
    );
    assert_eq!(owner.network(), Some(Network::Testnet));
    assert_eq!(owner.to_string(), OWNER);
    Ok(())
  }

  #[test]
  fn lowercase_spelling_decodes_to_same_account() -> anyhow::Result<()> {
    let owner: Principal = OWNER.parse()?;
    assert_eq!(OWNER.to_lowercase().parse::<Principal>()?, owner);
    Ok(())
  }

  #[test]
  fn same_hash_different_network() -> anyhow::Result<()> {
    let owner: StandardPrincipal = OWNER.parse()?;
    let mainnet = StandardPrincipal::new(22, *owner.hash())?;
    assert_eq!(
      mainnet.to_string(),
      "SPGDS0Y17973EN5TCHNHGJJ9B31XWQ5YX8A36C9B"
    );
    assert_eq!(mainnet.network(), Some(Network::Mainnet));
    Ok(())
  }

  #[test]
  fn contract_principal() -> anyhow::Result<()> {
    let contract: Principal = format!("{OWNER}.fund-raiser").parse()?;
    assert!(contract.is_contract());
    assert_eq!(contract.account().to_string(), OWNER);
    assert_eq!(contract.to_string(), format!("{OWNER}.fund-raiser"));
    Ok(())
  }

  #[test]
  fn rejects_malformed_principals() {
    assert_eq!(
      "0x52908400098527886E0F7030069857D2E4169EE7".parse::<Principal>(),
      Err(Error::MissingPrefix)
    );
    assert!(matches!(
      "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Z".parse::<Principal>(),
      Err(Error::Encoding(_))
    ));
    assert_eq!(
      format!("{OWNER}.9lives").parse::<Principal>(),
      Err(Error::InvalidContractName("9lives".into()))
    );
    assert!("".parse::<Principal>().is_err());
  }

  #[test]
  fn serde_uses_text_form() -> anyhow::Result<()> {
    let owner: Principal = OWNER.parse()?;
    let json = serde_json::to_string(&owner)?;
    assert_eq!(json, format!("\"{OWNER}\""));
    assert_eq!(serde_json::from_str::<Principal>(&json)?, owner);
    Ok(())
  }
}
