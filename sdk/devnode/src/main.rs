use {
  clap::Parser,
  fundraiser_devnode::{start, Devnode, SystemSettings},
  metrics_exporter_prometheus::PrometheusBuilder,
  std::sync::Arc,
  tracing::{info, subscriber::set_global_default},
  tracing_subscriber::{EnvFilter, FmtSubscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // configure logging
  set_global_default(
    FmtSubscriber::builder()
      .with_env_filter(
        EnvFilter::try_from_default_env()
          .unwrap_or_else(|_| EnvFilter::new("info")),
      )
      .finish(),
  )?;

  PrometheusBuilder::new().install()?;

  // gather CLI parameters
  let settings = SystemSettings::parse();
  info!("startup settings: {settings:#?}");

  let node = Arc::new(Devnode::new(
    settings.contract().clone(),
    settings.owner().clone(),
    settings.goal(),
  ));

  let _running = start(node, &settings.rpc_addrs(), settings.block_time())?;

  tokio::signal::ctrl_c().await?;
  info!("shutting down");
  Ok(())
}
