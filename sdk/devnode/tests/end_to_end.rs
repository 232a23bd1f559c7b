use {
  common::{dashboard_for, devnode, DONOR, GOAL, OWNER},
  fundraiser_client_sdk::{
    api::ReadOnlyResponse,
    dev::DevWallet,
    ContractReader,
    ContractWriter,
    Error,
    HttpNode,
    Outcome,
    TxStatus,
  },
  fundraiser_primitives::{ClarityValue, Network},
  std::sync::Arc,
};

mod common;

#[tokio::test]
async fn reads_over_http() -> anyhow::Result<()> {
  let running = devnode()?;
  let url = running.url().unwrap();
  let reader = ContractReader::new(
    Arc::new(HttpNode::new(&url)),
    running.node().contract_id().clone(),
  );

  assert_eq!(reader.try_get_goal().await?, GOAL);
  assert_eq!(reader.try_get_balance().await?, 0);
  assert_eq!(reader.try_get_owner().await?, OWNER);
  assert_eq!(reader.try_get_donor_amount(DONOR).await?, 0);
  assert_eq!(reader.get_donor_amount("").await, 0);
  Ok(())
}

#[tokio::test]
async fn call_read_wire_format() -> anyhow::Result<()> {
  let running = devnode()?;
  let url = format!(
    "{}/v2/contracts/call-read/{OWNER}/fund-raiser/get-balance",
    running.url().unwrap()
  );

  let response: ReadOnlyResponse = reqwest::Client::new()
    .post(&url)
    .json(&serde_json::json!({ "sender": OWNER, "arguments": [] }))
    .send()
    .await?
    .json()
    .await?;

  assert!(response.okay);
  assert_eq!(
    ClarityValue::from_hex(&response.result.unwrap())?,
    ClarityValue::ok(ClarityValue::UInt(0))
  );
  Ok(())
}

#[tokio::test]
async fn failed_reads_fall_back_to_zero() -> anyhow::Result<()> {
  let running = devnode()?;
  let url = running.url().unwrap();
  let reader = ContractReader::new(
    Arc::new(HttpNode::new(&url)),
    format!("{OWNER}.not-deployed").parse()?,
  );

  assert!(matches!(
    reader.try_get_balance().await,
    Err(Error::CallFailed { .. })
  ));
  assert_eq!(reader.get_balance().await, 0);
  assert_eq!(reader.get_goal().await, 0);
  assert_eq!(reader.get_owner().await, "");
  Ok(())
}

#[tokio::test]
async fn donate_then_withdraw() -> anyhow::Result<()> {
  let running = devnode()?;
  let node = HttpNode::new(running.url().unwrap());

  let (donor, _donor_session) = dashboard_for(&running, DONOR).await?;
  assert_eq!(donor.refresh().await.goal, GOAL);

  let txid = donor.donate("2.5").await.into_result()?.unwrap();
  assert_eq!(
    donor.last_transaction().map(|(_, status)| status),
    Some(TxStatus::Submitted(txid))
  );

  running.node().produce_block();
  assert_eq!(node.transaction(&txid).await?.tx_status, "success");

  let state = donor.refresh().await;
  assert_eq!(state.balance, 2_500_000);
  assert_eq!(donor.view().percentage, 25.0);
  assert_eq!(donor.refresh_contribution().await, 2_500_000);

  // the donor is not offered the withdraw action at all
  assert!(!donor.is_owner());
  assert!(matches!(donor.withdraw().await, Outcome::Failed(Error::NotOwner)));

  let (owner, _owner_session) = dashboard_for(&running, OWNER).await?;
  assert!(owner.is_owner());
  owner.refresh().await;

  let txid = owner.withdraw().await.into_result()?.unwrap();
  running.node().produce_block();

  let status = node.transaction(&txid).await?;
  assert_eq!(status.tx_status, "success");
  let result = status.tx_result.expect("mined");
  assert_eq!(result.repr, "(ok u2500000)");
  assert_eq!(
    result.value()?,
    ClarityValue::ok(ClarityValue::UInt(2_500_000))
  );
  assert_eq!(owner.refresh().await.balance, 0);
  Ok(())
}

#[tokio::test]
async fn contract_rejects_foreign_withdraw() -> anyhow::Result<()> {
  let running = devnode()?;
  let node = HttpNode::new(running.url().unwrap());
  let (donor, _session) = dashboard_for(&running, DONOR).await?;

  donor.donate("1").await.into_result()?;
  running.node().produce_block();

  // bypass the dashboard's advisory owner check
  let writer = ContractWriter::new(
    Arc::new(DevWallet::new(running.url().unwrap(), DONOR.parse()?)),
    running.node().contract_id().clone(),
    Network::Testnet,
  );
  let txid = writer.withdraw().await.into_result()?.unwrap();
  running.node().produce_block();

  let status = node.transaction(&txid).await?;
  assert_eq!(status.tx_status, "abort_by_response");
  let result = status.tx_result.expect("mined");
  assert_eq!(result.repr, "(err u100)");
  assert_eq!(result.value()?, ClarityValue::err(ClarityValue::UInt(100)));
  assert_eq!(running.node().contract().balance(), 1_000_000);
  Ok(())
}
