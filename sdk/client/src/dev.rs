//! A wallet for local development against the devnode.
//!
//! The devnode accepts unsigned contract calls attributed to a
//! sender, which lets the full donate and withdraw flows run without
//! a browser wallet.

use {
  crate::{
    api::{BroadcastRejection, BroadcastResponse, DevContractCall},
    wallet::{ContractCall, TxId, Wallet},
    Error,
    Outcome,
  },
  async_trait::async_trait,
  fundraiser_primitives::{ClarityValue, Principal},
  std::sync::Arc,
  tracing::debug,
};

/// Asked before every submission, stands in for the wallet popup.
/// Returning `false` cancels the transaction.
pub type ApprovalPrompt = Arc<dyn Fn(&ContractCall) -> bool + Send + Sync>;

/// Submits contract calls to the devnode on behalf of `sender`.
#[derive(Clone)]
pub struct DevWallet {
  client: reqwest::Client,
  base_url: String,
  sender: Principal,
  approve: Option<ApprovalPrompt>,
}

impl DevWallet {
  pub fn new(base_url: impl Into<String>, sender: Principal) -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: base_url.into().trim_end_matches('/').to_owned(),
      sender,
      approve: None,
    }
  }

  pub fn with_approval(mut self, prompt: ApprovalPrompt) -> Self {
    self.approve = Some(prompt);
    self
  }

  pub fn sender(&self) -> &Principal {
    &self.sender
  }

  async fn submit(&self, call: &ContractCall) -> Result<TxId, Error> {
    let body = DevContractCall {
      sender: self.sender.to_string(),
      contract_address: call.contract.address().to_string(),
      contract_name: call.contract.name().to_owned(),
      function_name: call.function.clone(),
      function_args: call
        .args
        .iter()
        .map(ClarityValue::to_hex)
        .collect::<Result<_, _>>()?,
      post_condition_mode: call.post_condition_mode.to_string(),
    };

    let url = format!("{}/v2/dev/contract-call", self.base_url);
    debug!("submitting {body:?} to {url}");
    let response = self.client.post(&url).json(&body).send().await?;

    let status = response.status();
    if status.is_success() {
      let accepted: BroadcastResponse = response.json().await?;
      return accepted.txid.parse();
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<BroadcastRejection>(&body) {
      Ok(rejection) => Err(Error::Rejected(format!(
        "{}: {}",
        rejection.error, rejection.reason
      ))),
      Err(_) => Err(Error::Http {
        status: status.as_u16(),
        body,
      }),
    }
  }
}

#[async_trait]
impl Wallet for DevWallet {
  async fn sign_and_submit(&self, call: ContractCall) -> Outcome<TxId> {
    if let Some(ref approve) = self.approve {
      if !approve(&call) {
        return Outcome::Cancelled;
      }
    }
    self.submit(&call).await.into()
  }
}
