mod block;
mod contract;
mod mempool;
mod node;
mod rpc;
mod settings;

pub use {
  block::{Block, Receipt, Transaction},
  contract::{FundRaiser, ERR_NOT_OWNER, ERR_ZERO_AMOUNT},
  node::{Devnode, Rejection, TxRecord, TxState},
  rpc::router,
  settings::SystemSettings,
};
use {
  std::{net::SocketAddr, sync::Arc, time::Duration},
  tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
  },
  tracing::info,
};

/// A devnode serving RPC and producing blocks in the background.
/// Dropping it stops both.
pub struct Running {
  node: Arc<Devnode>,
  addrs: Vec<SocketAddr>,
  tasks: Vec<JoinHandle<()>>,
}

impl Running {
  pub fn node(&self) -> &Arc<Devnode> {
    &self.node
  }

  /// Bound addresses, with ephemeral ports resolved.
  pub fn addrs(&self) -> &[SocketAddr] {
    &self.addrs
  }

  /// Base URL of the first bound address.
  pub fn url(&self) -> Option<String> {
    self.addrs.first().map(|addr| format!("http://{addr}"))
  }
}

impl Drop for Running {
  fn drop(&mut self) {
    for task in &self.tasks {
      task.abort();
    }
  }
}

/// Starts RPC listeners on all `addrs` and a block production loop
/// ticking every `block_time`.
pub fn start(
  node: Arc<Devnode>,
  addrs: &[SocketAddr],
  block_time: Duration,
) -> anyhow::Result<Running> {
  let mut tasks = vec![];
  let mut bound = vec![];

  for addr in addrs {
    let server = axum::Server::try_bind(addr)?
      .serve(router(node.clone()).into_make_service());
    let local = server.local_addr();
    info!("RPC listening on {local}");
    bound.push(local);

    tasks.push(tokio::spawn(async move {
      if let Err(e) = server.await {
        tracing::error!("RPC server on {local} failed: {e}");
      }
    }));
  }

  tasks.push(tokio::spawn({
    let node = node.clone();
    async move {
      let mut interval = interval(block_time);
      interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
      loop {
        interval.tick().await;
        let block = node.produce_block();
        info!(
          "produced block {} with {} transactions",
          block.height,
          block.receipts.len()
        );
      }
    }
  }));

  Ok(Running {
    node,
    addrs: bound,
    tasks,
  })
}
