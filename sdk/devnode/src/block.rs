use {
  fundraiser_client_sdk::TxId,
  fundraiser_primitives::{ClarityError, ClarityValue, Principal},
  sha2::{Digest, Sha256},
};

/// A contract call waiting in the mempool to be mined.
///
/// The devnode trusts the declared sender, there is no signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
  pub txid: TxId,
  pub sender: Principal,
  pub function: String,
  pub args: Vec<ClarityValue>,
}

impl Transaction {
  /// `nonce` keeps otherwise identical calls apart.
  pub fn new(
    sender: Principal,
    function: String,
    args: Vec<ClarityValue>,
    nonce: u64,
  ) -> Result<Self, ClarityError> {
    let mut preimage = nonce.to_be_bytes().to_vec();
    preimage.extend_from_slice(sender.to_string().as_bytes());
    preimage.extend_from_slice(function.as_bytes());
    for arg in &args {
      preimage.extend(arg.serialize()?);
    }

    Ok(Self {
      txid: TxId::new(sha256(&preimage)),
      sender,
      function,
      args,
    })
  }
}

/// Result of executing one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
  pub txid: TxId,

  /// `(ok ..)` commits, `(err ..)` aborts the transaction.
  pub result: ClarityValue,
}

impl Receipt {
  pub fn committed(&self) -> bool {
    matches!(self.result, ClarityValue::ResponseOk(_))
  }
}

#[derive(Debug, Clone)]
pub struct Block {
  pub height: u64,
  pub parent: [u8; 32],
  pub receipts: Vec<Receipt>,
  hash: [u8; 32],
}

impl Block {
  pub fn new(parent: &Block, receipts: Vec<Receipt>) -> Self {
    let height = parent.height + 1;
    let mut preimage = height.to_be_bytes().to_vec();
    preimage.extend_from_slice(&parent.hash);
    for receipt in &receipts {
      preimage.extend_from_slice(receipt.txid.as_bytes());
    }

    Self {
      height,
      parent: parent.hash,
      receipts,
      hash: sha256(&preimage),
    }
  }

  pub fn zero() -> Self {
    Self {
      height: 0,
      parent: [0; 32],
      receipts: vec![],
      hash: [0; 32],
    }
  }

  pub fn hash(&self) -> &[u8; 32] {
    &self.hash
  }
}

fn sha256(bytes: &[u8]) -> [u8; 32] {
  Sha256::digest(bytes).into()
}
