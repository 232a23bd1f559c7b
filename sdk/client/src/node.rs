use {
  crate::{
    api::{ReadOnlyRequest, ReadOnlyResponse, TxStatusResponse},
    wallet::TxId,
    Error,
  },
  async_trait::async_trait,
  fundraiser_primitives::{ClarityValue, ContractId, Network, Principal},
  tracing::debug,
};

/// A read-only contract function invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnlyCall {
  pub contract: ContractId,
  pub function: String,
  pub args: Vec<ClarityValue>,

  /// Principal the call is evaluated as (`tx-sender`).
  pub sender: Principal,
}

/// Anything that can evaluate read-only contract calls.
///
/// In production this is a Stacks node reached over HTTP, tests
/// substitute in-memory fakes.
#[async_trait]
pub trait ReadOnlyNode: Send + Sync {
  async fn call_read_only(
    &self,
    call: &ReadOnlyCall,
  ) -> Result<ClarityValue, Error>;
}

/// Stacks node HTTP API client.
#[derive(Debug, Clone)]
pub struct HttpNode {
  client: reqwest::Client,
  base_url: String,
}

impl HttpNode {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self::with_client(reqwest::Client::new(), base_url)
  }

  pub fn with_client(
    client: reqwest::Client,
    base_url: impl Into<String>,
  ) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_owned();
    Self { client, base_url }
  }

  /// Client for the public API of the given network.
  pub fn for_network(network: Network) -> Self {
    Self::new(network.default_api_url())
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Looks up a submitted transaction.
  pub async fn transaction(
    &self,
    txid: &TxId,
  ) -> Result<TxStatusResponse, Error> {
    let url = format!("{}/extended/v1/tx/{txid}", self.base_url);
    let response = self.client.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(Error::Http {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
      });
    }
    Ok(response.json().await?)
  }
}

#[async_trait]
impl ReadOnlyNode for HttpNode {
  async fn call_read_only(
    &self,
    call: &ReadOnlyCall,
  ) -> Result<ClarityValue, Error> {
    let url = format!(
      "{}/v2/contracts/call-read/{}/{}/{}",
      self.base_url,
      call.contract.address(),
      call.contract.name(),
      call.function
    );

    let request = ReadOnlyRequest {
      sender: call.sender.to_string(),
      arguments: call
        .args
        .iter()
        .map(ClarityValue::to_hex)
        .collect::<Result<_, _>>()?,
    };

    debug!("read-only call {url} {request:?}");
    let response = self.client.post(&url).json(&request).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(Error::Http {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
      });
    }

    match response.json::<ReadOnlyResponse>().await? {
      ReadOnlyResponse {
        okay: true,
        result: Some(result),
        ..
      } => Ok(ClarityValue::from_hex(&result)?),
      ReadOnlyResponse { cause, .. } => Err(Error::CallFailed {
        function: call.function.clone(),
        cause: cause.unwrap_or_else(|| "no result returned".into()),
      }),
    }
  }
}
