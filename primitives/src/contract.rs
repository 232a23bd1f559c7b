use {
  crate::{
    principal::{self, validate_contract_name, StandardPrincipal},
    Principal,
  },
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    str::FromStr,
  },
};

/// Fully qualified identifier of a deployed contract: the deployer
/// account and the contract name, written `ST....contract-name`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractId {
  address: StandardPrincipal,
  name: String,
}

impl ContractId {
  pub fn new(
    address: StandardPrincipal,
    name: impl Into<String>,
  ) -> Result<Self, principal::Error> {
    let name = name.into();
    validate_contract_name(&name)?;
    Ok(Self { address, name })
  }

  pub fn address(&self) -> &StandardPrincipal {
    &self.address
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl From<ContractId> for Principal {
  fn from(id: ContractId) -> Self {
    Principal::Contract(id.address, id.name)
  }
}

impl Display for ContractId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}.{}", self.address, self.name)
  }
}

impl Debug for ContractId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "contract({self})")
  }
}

impl From<ContractId> for String {
  fn from(id: ContractId) -> Self {
    id.to_string()
  }
}

impl FromStr for ContractId {
  type Err = principal::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.parse()? {
      Principal::Contract(address, name) => Ok(Self { address, name }),
      Principal::Standard(_) => {
        Err(principal::Error::InvalidContractName(String::new()))
      }
    }
  }
}

impl TryFrom<String> for ContractId {
  type Error = principal::Error;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    FromStr::from_str(&value)
  }
}
