use {
  clap::Parser,
  fundraiser_client_sdk::{CONTRACT_ADDRESS, CONTRACT_NAME, CONTRACT_OWNER},
  fundraiser_primitives::{ContractId, Principal},
  humantime::Duration,
  std::net::{IpAddr, Ipv4Addr, SocketAddr},
};

/// FundRaiser Local Devnode
///
/// A single node stand-in for the Stacks API hosting one fund-raiser
/// contract, with no consensus, for dev, CI and test scenarios.
#[derive(Debug, Parser)]
pub struct SystemSettings {
  /// TCP port for accepting HTTP RPC requests
  #[clap(long, short,
    default_value = "3999",
    value_name = "PORT")]
  rpc_port: u16,

  /// IP addresses for accepting RPC connections
  #[clap(long, short,
    value_name = "ADDRESS",
    default_values_t = vec![IpAddr::V4(Ipv4Addr::UNSPECIFIED)])]
  ip: Vec<IpAddr>,

  /// Block production interval
  #[clap(long, short = 't',
    value_name = "DURATION",
    default_value = "2s")]
  block_time: Duration,

  /// Identifier of the hosted contract
  #[clap(long,
    value_name = "CONTRACT_ID",
    default_value_t = default_contract())]
  contract: ContractId,

  /// Principal allowed to withdraw
  #[clap(long,
    value_name = "PRINCIPAL",
    default_value = CONTRACT_OWNER)]
  owner: Principal,

  /// Funding goal in micro-STX
  #[clap(long, short,
    value_name = "MICRO_STX",
    default_value = "10000000000")]
  goal: u128,
}

fn default_contract() -> ContractId {
  ContractId::new(
    CONTRACT_ADDRESS.parse().expect("constructed at compile time"),
    CONTRACT_NAME,
  )
  .expect("constructed at compile time")
}

impl SystemSettings {
  pub fn rpc_addrs(&self) -> Vec<SocketAddr> {
    self
      .ip
      .iter()
      .cloned()
      .map(|ip| SocketAddr::new(ip, self.rpc_port))
      .collect()
  }

  pub fn block_time(&self) -> std::time::Duration {
    self.block_time.into()
  }

  pub fn contract(&self) -> &ContractId {
    &self.contract
  }

  pub fn owner(&self) -> &Principal {
    &self.owner
  }

  pub fn goal(&self) -> u128 {
    self.goal
  }
}
