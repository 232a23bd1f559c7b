use {
  crate::{
    cli::{CliOptions, Command, ConnectCommand},
    wallets::{confirm, FlagAuthenticator, FlagRelay, Unavailable},
  },
  clap::Parser,
  fundraiser_client_sdk::{
    dev::DevWallet,
    session::{
      DirectWallet,
      FileSessionStore,
      RelayAccount,
      RelaySession,
      StxAddress,
    },
    BackendKind,
    ClientConfig,
    ContractReader,
    ContractWriter,
    Dashboard,
    HttpNode,
    Outcome,
    Session,
    SessionResolver,
    Wallet,
  },
  fundraiser_primitives::{
    units::{format_stx, to_display, truncate_address},
    Principal,
  },
  std::sync::Arc,
  tracing::{info, subscriber::set_global_default},
  tracing_subscriber::{EnvFilter, FmtSubscriber},
};

mod cli;
mod wallets;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  set_global_default(
    FmtSubscriber::builder()
      .with_env_filter(
        EnvFilter::try_from_default_env()
          .unwrap_or_else(|_| EnvFilter::new("warn")),
      )
      .with_writer(std::io::stderr)
      .finish(),
  )?;

  let opts = CliOptions::parse();
  info!("options: {opts:?}");

  let config = opts.client_config();
  let (direct, relay) = match opts.command {
    Command::Connect {
      backend:
        ConnectCommand::Direct {
          ref testnet_address,
          ref mainnet_address,
        },
    } => (
      StxAddress {
        mainnet: mainnet_address.clone(),
        testnet: testnet_address.clone(),
      },
      None,
    ),
    Command::Connect {
      backend:
        ConnectCommand::Relay {
          ref address,
          ref chain_id,
        },
    } => (
      StxAddress::default(),
      Some(RelayAccount {
        address: address.clone(),
        chain_id: chain_id.clone(),
      }),
    ),
    _ => (StxAddress::default(), None),
  };

  let store = Arc::new(FileSessionStore::new(opts.data_dir())?);
  let resolver = SessionResolver::start(
    Arc::new(DirectWallet::new(
      config.app.clone(),
      store.clone(),
      Arc::new(FlagAuthenticator(direct)),
    )),
    Arc::new(RelaySession::new(
      config.walletconnect_project_id.clone(),
      store,
      Arc::new(FlagRelay(relay)),
    )),
    config.contract.network,
  )?;

  let result = run(&opts, &config, &resolver).await;
  resolver.shutdown();
  result
}

async fn run(
  opts: &CliOptions,
  config: &ClientConfig,
  resolver: &SessionResolver,
) -> anyhow::Result<()> {
  let session = resolver.current();
  let node = Arc::new(HttpNode::new(&config.node_url));
  let reader =
    ContractReader::new(node.clone(), config.contract.contract.clone());
  let writer = ContractWriter::new(
    signer(opts, config, &session),
    config.contract.contract.clone(),
    config.contract.network,
  );
  let dashboard = Dashboard::new(
    reader.clone(),
    writer,
    resolver.subscribe(),
    &config.contract.owner,
  );

  match opts.command {
    Command::Status => {
      let state = dashboard.refresh().await;
      println!("Contract:   {}", config.contract.contract);
      println!("Raised:     {} STX", format_stx(to_display(state.balance)));
      println!("Goal:       {} STX", format_stx(to_display(state.goal)));
      println!("Progress:   {:.1}%", state.percentage());
      if state.goal_reached() {
        println!("Goal reached! Thank you to all donors.");
      } else {
        println!(
          "{} STX remaining to reach goal",
          format_stx(to_display(state.remaining()))
        );
      }
    }
    Command::Contribution { ref address } => {
      let address = match address.as_deref().or_else(|| session.address()) {
        Some(address) => address.to_owned(),
        None => anyhow::bail!("no address given and no wallet connected"),
      };
      let amount = reader.get_donor_amount(&address).await;
      println!(
        "{} donated {} STX",
        truncate_address(&address),
        format_stx(to_display(amount))
      );
    }
    Command::Connect { ref backend } => {
      let kind = match backend {
        ConnectCommand::Direct { .. } => BackendKind::DirectWallet,
        ConnectCommand::Relay { .. } => BackendKind::Relay,
      };
      match resolver.connect(kind).await {
        Outcome::Success(session) => print_session(&session),
        Outcome::Cancelled => println!("Connection cancelled."),
        Outcome::Failed(e) => return Err(e.into()),
      }
    }
    Command::Disconnect => {
      let session = resolver.disconnect().await?;
      println!("Disconnected.");
      print_session(&session);
    }
    Command::Whoami => print_session(&session),
    Command::Fund { ref amount } => match dashboard.donate(amount).await {
      Outcome::Success(txid) => println!(
        "Your donation of {amount} STX has been submitted. Transaction \
         ID: {}...",
        txid.short()
      ),
      Outcome::Cancelled => println!("You cancelled the donation."),
      Outcome::Failed(e) => return Err(e.into()),
    },
    Command::Withdraw => {
      let balance = dashboard.refresh().await.balance;
      match dashboard.withdraw().await {
        Outcome::Success(txid) => println!(
          "Withdrawal of {} STX has been submitted. Transaction ID: {}...",
          format_stx(to_display(balance)),
          txid.short()
        ),
        Outcome::Cancelled => println!("You cancelled the withdrawal."),
        Outcome::Failed(e) => return Err(e.into()),
      }
    }
    Command::Tx { ref txid } => {
      let status = node.transaction(txid).await?;
      println!("{}: {}", status.tx_id, status.tx_status);
      if let Some(result) = status.tx_result {
        println!("result: {}", result.repr);
      }
      if let Some(height) = status.block_height {
        println!("block:  {height}");
      }
    }
  }

  Ok(())
}

/// The wallet transactions are signed with. Only sessions with a
/// Stacks address can submit calls to the devnode.
fn signer(
  opts: &CliOptions,
  config: &ClientConfig,
  session: &Session,
) -> Arc<dyn Wallet> {
  let Some(address) = session.address() else {
    return Arc::new(Unavailable("no wallet connected".into()));
  };

  match address.parse::<Principal>() {
    Ok(sender) => {
      let wallet = DevWallet::new(&config.node_url, sender);
      match opts.assume_yes() {
        true => Arc::new(wallet),
        false => Arc::new(wallet.with_approval(Arc::new(confirm))),
      }
    }
    Err(_) => Arc::new(Unavailable(format!(
      "{} cannot sign Stacks transactions",
      truncate_address(address)
    ))),
  }
}

fn print_session(session: &Session) {
  match session {
    Session::DirectWallet(address) => {
      println!("Connected with a Stacks wallet as {address}")
    }
    Session::Relay(address) => {
      println!("Connected over WalletConnect as {address}")
    }
    Session::None => println!("No wallet connected."),
  }
}
