use {
  crate::{
    node::{ReadOnlyCall, ReadOnlyNode},
    Error,
  },
  fundraiser_primitives::{ClarityValue, ContractId, Principal},
  std::sync::Arc,
  tracing::{debug, error},
};

/// Read-only functions exposed by the fund-raiser contract.
pub mod functions {
  pub const GET_BALANCE: &str = "get-balance";
  pub const GET_GOAL: &str = "get-goal";
  pub const GET_OWNER: &str = "get-owner";
  pub const GET_DONOR_AMOUNT: &str = "get-donor-amount";
}

/// Queries the fund-raiser contract state.
///
/// The plain getters never fail: any error is logged and reported
/// as zero (or an empty owner). They are meant for display, where a
/// missing value is better than a broken view. Callers that need to
/// tell a failed query apart from a genuine zero use the `try_*`
/// variants.
#[derive(Clone)]
pub struct ContractReader {
  node: Arc<dyn ReadOnlyNode>,
  contract: ContractId,
  sender: Principal,
}

impl ContractReader {
  /// Reads are evaluated as the contract deployer.
  pub fn new(node: Arc<dyn ReadOnlyNode>, contract: ContractId) -> Self {
    let sender = Principal::Standard(*contract.address());
    Self {
      node,
      contract,
      sender,
    }
  }

  pub fn contract(&self) -> &ContractId {
    &self.contract
  }

  /// Current balance held by the contract, in micro-STX.
  pub async fn get_balance(&self) -> u128 {
    self
      .try_get_balance()
      .await
      .unwrap_or_else(|e| zero_on_failure("balance", e))
  }

  /// Funding goal of the contract, in micro-STX.
  pub async fn get_goal(&self) -> u128 {
    self
      .try_get_goal()
      .await
      .unwrap_or_else(|e| zero_on_failure("goal", e))
  }

  /// Total donated by `address`, in micro-STX.
  ///
  /// An empty address means there is nobody to look up, so this
  /// returns zero without contacting the node.
  pub async fn get_donor_amount(&self, address: &str) -> u128 {
    if address.trim().is_empty() {
      return 0;
    }

    self
      .try_get_donor_amount(address)
      .await
      .unwrap_or_else(|e| zero_on_failure("donor amount", e))
  }

  /// Contract owner principal, or an empty string on failure.
  pub async fn get_owner(&self) -> String {
    self.try_get_owner().await.unwrap_or_else(|e| {
      error!("Error fetching owner: {e}");
      String::new()
    })
  }

  pub async fn try_get_balance(&self) -> Result<u128, Error> {
    let value = self.call(functions::GET_BALANCE, vec![]).await?;
    decode_uint(functions::GET_BALANCE, value)
  }

  pub async fn try_get_goal(&self) -> Result<u128, Error> {
    let value = self.call(functions::GET_GOAL, vec![]).await?;
    decode_uint(functions::GET_GOAL, value)
  }

  pub async fn try_get_donor_amount(
    &self,
    address: &str,
  ) -> Result<u128, Error> {
    let donor: Principal = address.trim().parse()?;
    let value = self
      .call(functions::GET_DONOR_AMOUNT, vec![donor.into()])
      .await?;
    decode_uint(functions::GET_DONOR_AMOUNT, value)
  }

  pub async fn try_get_owner(&self) -> Result<String, Error> {
    let value = self.call(functions::GET_OWNER, vec![]).await?;
    match value.into_inner() {
      ClarityValue::Principal(owner) => Ok(owner.to_string()),
      ClarityValue::StringAscii(s) | ClarityValue::StringUtf8(s) => Ok(s),
      other => Err(Error::UnexpectedResult {
        function: functions::GET_OWNER.into(),
        value: other.to_string(),
      }),
    }
  }

  async fn call(
    &self,
    function: &str,
    args: Vec<ClarityValue>,
  ) -> Result<ClarityValue, Error> {
    let call = ReadOnlyCall {
      contract: self.contract.clone(),
      function: function.to_owned(),
      args,
      sender: self.sender.clone(),
    };
    let result = self.node.call_read_only(&call).await?;
    debug!("{}::{function} => {result}", self.contract);
    Ok(result)
  }
}

/// `(ok ..)` and `(some ..)` are unwrapped, `none` reads as zero.
fn decode_uint(function: &str, value: ClarityValue) -> Result<u128, Error> {
  match value.into_inner() {
    ClarityValue::OptionalNone => Ok(0),
    other => other.as_u128().ok_or_else(|| Error::UnexpectedResult {
      function: function.into(),
      value: other.to_string(),
    }),
  }
}

fn zero_on_failure(what: &str, e: Error) -> u128 {
  error!("Error fetching {what}: {e}");
  0
}

#[cfg(test)]
mod tests {
  use {
    super::{decode_uint, ContractReader},
    crate::{
      node::{ReadOnlyCall, ReadOnlyNode},
      Error,
    },
    async_trait::async_trait,
    fundraiser_primitives::ClarityValue,
    std::sync::{
      atomic::{AtomicUsize, Ordering},
      Arc,
    },
  };

  struct Fixed(ClarityValue, AtomicUsize);

  #[async_trait]
  impl ReadOnlyNode for Fixed {
    async fn call_read_only(
      &self,
      _: &ReadOnlyCall,
    ) -> Result<ClarityValue, Error> {
      self.1.fetch_add(1, Ordering::SeqCst);
      Ok(self.0.clone())
    }
  }

  fn reader_with(value: ClarityValue) -> (ContractReader, Arc<Fixed>) {
    let node = Arc::new(Fixed(value, AtomicUsize::new(0)));
    let contract = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y.fund-raiser"
      .parse()
      .unwrap();
    (ContractReader::new(node.clone(), contract), node)
  }

  #[test]
  fn uint_decoding() {
    assert_eq!(decode_uint("f", ClarityValue::UInt(7)).unwrap(), 7);
    assert_eq!(
      decode_uint("f", ClarityValue::ok(ClarityValue::UInt(7))).unwrap(),
      7
    );
    assert_eq!(decode_uint("f", ClarityValue::OptionalNone).unwrap(), 0);
    assert!(matches!(
      decode_uint("f", ClarityValue::err(ClarityValue::UInt(100))),
      Err(Error::UnexpectedResult { .. })
    ));
    assert!(decode_uint("f", ClarityValue::Bool(true)).is_err());
  }

  #[tokio::test]
  async fn unexpected_types_read_as_zero() {
    let (reader, node) = reader_with(ClarityValue::StringAscii("oops".into()));
    assert_eq!(reader.get_balance().await, 0);
    assert_eq!(reader.get_goal().await, 0);
    assert!(reader.try_get_goal().await.is_err());
    assert_eq!(node.1.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn donor_amount_requires_an_address() {
    let (reader, node) = reader_with(ClarityValue::UInt(3_000_000));
    assert_eq!(reader.get_donor_amount("").await, 0);
    assert_eq!(reader.get_donor_amount("   ").await, 0);
    assert_eq!(node.1.load(Ordering::SeqCst), 0);

    // not a stacks principal, fails before reaching the node
    assert_eq!(
      reader
        .get_donor_amount("0x52908400098527886E0F7030069857D2E4169EE7")
        .await,
      0
    );
    assert_eq!(node.1.load(Ordering::SeqCst), 0);

    assert_eq!(
      reader
        .get_donor_amount("STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y")
        .await,
      3_000_000
    );
    assert_eq!(node.1.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn owner_decoding() {
    let owner = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y";
    let (reader, _) = reader_with(ClarityValue::Principal(owner.parse().unwrap()));
    assert_eq!(reader.get_owner().await, owner);

    let (reader, _) = reader_with(ClarityValue::UInt(1));
    assert_eq!(reader.get_owner().await, "");
  }
}
