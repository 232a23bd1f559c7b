use {
  crate::{
    block::{Block, Receipt, Transaction},
    contract::FundRaiser,
  },
  tracing::debug,
};

/// Contract calls accepted but not mined yet, in arrival order.
#[derive(Debug, Default)]
pub struct Mempool {
  txs: Vec<Transaction>,
}

impl Mempool {
  pub fn consume(&mut self, tx: Transaction) {
    self.txs.push(tx);
  }

  pub fn len(&self) -> usize {
    self.txs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.txs.is_empty()
  }

  /// Executes every queued call against the contract and packs the
  /// receipts into a block on top of `parent`.
  pub fn produce(&mut self, contract: &FundRaiser, parent: &Block) -> Block {
    let txs = std::mem::take(&mut self.txs);
    let receipts = txs
      .iter()
      .map(|tx| {
        let result = contract.execute(tx);
        debug!("{} {} => {result}", tx.txid, tx.function);
        Receipt {
          txid: tx.txid,
          result,
        }
      })
      .collect();

    Block::new(parent, receipts)
  }
}

#[cfg(test)]
mod tests {
  use {
    super::Mempool,
    crate::{
      block::{Block, Transaction},
      contract::FundRaiser,
    },
    fundraiser_primitives::{ClarityValue, Principal},
  };

  #[test]
  fn produce_drains_in_order() -> anyhow::Result<()> {
    let owner: Principal = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y".parse()?;
    let contract = FundRaiser::new(owner.clone(), 100);
    let mut mempool = Mempool::default();

    let fund = vec![ClarityValue::UInt(10)];
    mempool.consume(Transaction::new(owner.clone(), "fund".into(), fund, 0)?);
    mempool.consume(Transaction::new(owner, "withdraw".into(), vec![], 1)?);
    assert_eq!(mempool.len(), 2);

    let block = mempool.produce(&contract, &Block::zero());
    assert!(mempool.is_empty());
    assert_eq!(block.height, 1);
    assert_eq!(block.receipts.len(), 2);
    assert!(block.receipts.iter().all(|r| r.committed()));
    assert_eq!(
      block.receipts[1].result,
      ClarityValue::ok(ClarityValue::UInt(10))
    );
    assert_eq!(contract.balance(), 0);
    Ok(())
  }
}
