use {
  crate::block::Transaction,
  dashmap::DashMap,
  fundraiser_client_sdk::{reader, writer},
  fundraiser_primitives::{ClarityValue, Principal},
  parking_lot::RwLock,
  thiserror::Error,
};

/// `withdraw` called by anyone but the owner.
pub const ERR_NOT_OWNER: u128 = 100;

/// `fund` called with a zero amount.
pub const ERR_ZERO_AMOUNT: u128 = 101;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Function {0} does not exist")]
  UnknownFunction(String),

  #[error("Function {function} expects {expected} argument(s), got {got}")]
  ArgumentCount {
    function: String,
    expected: usize,
    got: usize,
  },

  #[error("Argument of {function} must be a {expected}")]
  ArgumentType {
    function: String,
    expected: &'static str,
  },
}

/// In-memory model of the fund-raiser contract.
///
/// Read-only functions see the state as of the last produced block.
/// Public functions only run when their transaction is mined.
#[derive(Debug)]
pub struct FundRaiser {
  owner: Principal,
  goal: u128,
  balance: RwLock<u128>,
  donors: DashMap<Principal, u128>,
}

impl FundRaiser {
  pub fn new(owner: Principal, goal: u128) -> Self {
    Self {
      owner,
      goal,
      balance: RwLock::new(0),
      donors: DashMap::new(),
    }
  }

  pub fn owner(&self) -> &Principal {
    &self.owner
  }

  pub fn goal(&self) -> u128 {
    self.goal
  }

  pub fn balance(&self) -> u128 {
    *self.balance.read()
  }

  pub fn donor_amount(&self, donor: &Principal) -> u128 {
    self.donors.get(donor).map(|v| *v).unwrap_or_default()
  }

  pub fn read_only(
    &self,
    function: &str,
    args: &[ClarityValue],
  ) -> Result<ClarityValue, Error> {
    match function {
      reader::functions::GET_BALANCE => {
        expect_args(function, args, 0)?;
        Ok(ClarityValue::ok(self.balance().into()))
      }
      reader::functions::GET_GOAL => {
        expect_args(function, args, 0)?;
        Ok(ClarityValue::ok(self.goal.into()))
      }
      reader::functions::GET_OWNER => {
        expect_args(function, args, 0)?;
        Ok(ClarityValue::ok(self.owner.clone().into()))
      }
      reader::functions::GET_DONOR_AMOUNT => {
        expect_args(function, args, 1)?;
        let donor = args[0].as_principal().ok_or(Error::ArgumentType {
          function: function.into(),
          expected: "principal",
        })?;
        Ok(self.donor_amount(donor).into())
      }
      other => Err(Error::UnknownFunction(other.into())),
    }
  }

  /// Rejects calls that could never execute, before they are queued.
  pub fn check_call(
    &self,
    function: &str,
    args: &[ClarityValue],
  ) -> Result<(), Error> {
    match function {
      writer::functions::FUND => {
        expect_args(function, args, 1)?;
        expect_uint(function, &args[0]).map(|_| ())
      }
      writer::functions::WITHDRAW => expect_args(function, args, 0),
      other => Err(Error::UnknownFunction(other.into())),
    }
  }

  /// Runs a mined transaction and returns its response.
  pub fn execute(&self, tx: &Transaction) -> ClarityValue {
    if let Err(e) = self.check_call(&tx.function, &tx.args) {
      return ClarityValue::err(ClarityValue::StringAscii(e.to_string()));
    }

    match tx.function.as_str() {
      writer::functions::FUND => {
        let amount = tx.args[0].as_u128().unwrap_or_default();
        self.fund(&tx.sender, amount)
      }
      _ => self.withdraw(&tx.sender),
    }
  }

  fn fund(&self, sender: &Principal, amount: u128) -> ClarityValue {
    if amount == 0 {
      return ClarityValue::err(ERR_ZERO_AMOUNT.into());
    }

    let mut balance = self.balance.write();
    *balance = balance.saturating_add(amount);
    let mut donated = self.donors.entry(sender.clone()).or_default();
    *donated = donated.saturating_add(amount);
    ClarityValue::ok(true.into())
  }

  fn withdraw(&self, sender: &Principal) -> ClarityValue {
    if sender != &self.owner {
      return ClarityValue::err(ERR_NOT_OWNER.into());
    }

    let amount = std::mem::take(&mut *self.balance.write());
    ClarityValue::ok(amount.into())
  }
}

fn expect_args(
  function: &str,
  args: &[ClarityValue],
  expected: usize,
) -> Result<(), Error> {
  match args.len() == expected {
    true => Ok(()),
    false => Err(Error::ArgumentCount {
      function: function.into(),
      expected,
      got: args.len(),
    }),
  }
}

fn expect_uint(function: &str, arg: &ClarityValue) -> Result<u128, Error> {
  match arg {
    ClarityValue::UInt(value) => Ok(*value),
    _ => Err(Error::ArgumentType {
      function: function.into(),
      expected: "uint",
    }),
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{Error, FundRaiser, ERR_NOT_OWNER, ERR_ZERO_AMOUNT},
    crate::block::Transaction,
    fundraiser_primitives::{ClarityValue, Principal},
  };

  const OWNER: &str = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y";
  const DONOR: &str = "ST000000000000000000002AMW42H";

  fn call(sender: &str, function: &str, args: Vec<ClarityValue>) -> Transaction {
    Transaction::new(sender.parse().unwrap(), function.into(), args, 0).unwrap()
  }

  #[test]
  fn fund_tracks_balance_and_donors() -> anyhow::Result<()> {
    let contract = FundRaiser::new(OWNER.parse()?, 10_000_000);
    let donor: Principal = DONOR.parse()?;

    let result =
      contract.execute(&call(DONOR, "fund", vec![ClarityValue::UInt(3)]));
    assert_eq!(result, ClarityValue::ok(ClarityValue::Bool(true)));
    contract.execute(&call(DONOR, "fund", vec![ClarityValue::UInt(4)]));

    assert_eq!(contract.balance(), 7);
    assert_eq!(contract.donor_amount(&donor), 7);
    assert_eq!(
      contract.read_only("get-donor-amount", &[donor.into()])?,
      ClarityValue::UInt(7)
    );
    assert_eq!(
      contract.read_only("get-balance", &[])?,
      ClarityValue::ok(ClarityValue::UInt(7))
    );
    assert_eq!(
      contract.read_only("get-goal", &[])?,
      ClarityValue::ok(ClarityValue::UInt(10_000_000))
    );
    Ok(())
  }

  #[test]
  fn zero_donation_aborts() -> anyhow::Result<()> {
    let contract = FundRaiser::new(OWNER.parse()?, 1);
    let result =
      contract.execute(&call(DONOR, "fund", vec![ClarityValue::UInt(0)]));
    assert_eq!(result, ClarityValue::err(ClarityValue::UInt(ERR_ZERO_AMOUNT)));
    assert_eq!(contract.balance(), 0);
    Ok(())
  }

  #[test]
  fn only_owner_withdraws() -> anyhow::Result<()> {
    let contract = FundRaiser::new(OWNER.parse()?, 1);
    contract.execute(&call(DONOR, "fund", vec![ClarityValue::UInt(9)]));

    let denied = contract.execute(&call(DONOR, "withdraw", vec![]));
    assert_eq!(denied, ClarityValue::err(ClarityValue::UInt(ERR_NOT_OWNER)));
    assert_eq!(contract.balance(), 9);

    let paid = contract.execute(&call(OWNER, "withdraw", vec![]));
    assert_eq!(paid, ClarityValue::ok(ClarityValue::UInt(9)));
    assert_eq!(contract.balance(), 0);
    Ok(())
  }

  #[test]
  fn malformed_calls_are_rejected() -> anyhow::Result<()> {
    let contract = FundRaiser::new(OWNER.parse()?, 1);
    assert!(matches!(
      contract.check_call("drain", &[]),
      Err(Error::UnknownFunction(_))
    ));
    assert!(matches!(
      contract.check_call("fund", &[]),
      Err(Error::ArgumentCount { expected: 1, got: 0, .. })
    ));
    assert!(matches!(
      contract.check_call("fund", &[ClarityValue::Int(5)]),
      Err(Error::ArgumentType { .. })
    ));
    assert!(contract.read_only("get-donor-amount", &[]).is_err());
    Ok(())
  }
}
