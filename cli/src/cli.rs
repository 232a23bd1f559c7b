use {
  clap::{Parser, Subcommand},
  fundraiser_client_sdk::{ClientConfig, TxId},
  fundraiser_primitives::Network,
  std::path::PathBuf,
};

/// FundRaiser
///
/// Follow the fund-raiser contract, donate STX to it and, as its
/// owner, withdraw what was raised.
#[derive(Debug, Parser)]
#[clap(name = "fundraiser", version)]
pub struct CliOptions {
  /// Base URL of the Stacks node API
  #[clap(long, env = "FUNDRAISER_NODE_URL",
    value_name = "URL",
    default_value = Network::CONFIGURED.default_api_url())]
  node_url: String,

  /// Directory wallet sessions are stored in
  #[clap(long, value_name = "PATH", default_value = ".fundraiser")]
  data_dir: PathBuf,

  /// Project id required to pair over WalletConnect
  #[clap(long, env = "WALLETCONNECT_PROJECT_ID", value_name = "ID")]
  walletconnect_project_id: Option<String>,

  /// Sign transactions without asking for confirmation
  #[clap(long, short)]
  yes: bool,

  #[clap(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Show the raised balance against the goal
  Status,

  /// Show how much an address has donated
  Contribution {
    /// Defaults to the connected wallet
    address: Option<String>,
  },

  /// Connect a wallet
  Connect {
    #[clap(subcommand)]
    backend: ConnectCommand,
  },

  /// Disconnect the active wallet
  Disconnect,

  /// Show the connected wallet
  Whoami,

  /// Donate STX to the contract
  Fund {
    /// Amount in STX, e.g. 2.5
    amount: String,
  },

  /// Withdraw the raised balance, owner only
  Withdraw,

  /// Look up a submitted transaction
  Tx { txid: TxId },
}

#[derive(Debug, Subcommand)]
pub enum ConnectCommand {
  /// Sign in with a Stacks wallet
  Direct {
    #[clap(long, value_name = "PRINCIPAL")]
    testnet_address: Option<String>,

    #[clap(long, value_name = "PRINCIPAL")]
    mainnet_address: Option<String>,
  },

  /// Pair a remote wallet over WalletConnect
  Relay {
    #[clap(long)]
    address: String,

    #[clap(long)]
    chain_id: Option<String>,
  },
}

impl CliOptions {
  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      node_url: self.node_url.clone(),
      walletconnect_project_id: self.walletconnect_project_id.clone(),
      ..Default::default()
    }
  }

  pub fn data_dir(&self) -> &PathBuf {
    &self.data_dir
  }

  pub fn assume_yes(&self) -> bool {
    self.yes
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{CliOptions, Command, ConnectCommand},
    clap::Parser,
  };

  #[test]
  fn parses_connect_direct() {
    let opts = CliOptions::parse_from([
      "fundraiser",
      "--node-url",
      "http://localhost:3999",
      "connect",
      "direct",
      "--testnet-address",
      "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y",
    ]);

    assert_eq!(opts.client_config().node_url, "http://localhost:3999");
    assert!(matches!(
      opts.command,
      Command::Connect {
        backend: ConnectCommand::Direct {
          testnet_address: Some(_),
          mainnet_address: None,
        }
      }
    ));
  }

  #[test]
  fn parses_fund_amount_verbatim() {
    let opts = CliOptions::parse_from(["fundraiser", "--yes", "fund", "2.5"]);
    assert!(opts.assume_yes());
    assert!(matches!(
      opts.command,
      Command::Fund { ref amount } if amount == "2.5"
    ));
  }
}
