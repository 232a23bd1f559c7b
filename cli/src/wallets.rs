use {
  async_trait::async_trait,
  fundraiser_client_sdk::{
    session::{
      Authenticator,
      Profile,
      RelayAccount,
      RelayConnector,
      StxAddress,
      UserData,
    },
    AppDetails,
    ContractCall,
    Error,
    Outcome,
    TxId,
    Wallet,
  },
  fundraiser_primitives::Principal,
  std::io::{BufRead, Write},
  tracing::info,
};

/// Signs in with the addresses given on the command line.
///
/// Without any address there is nothing to approve, which reads as
/// the user dismissing the prompt.
pub struct FlagAuthenticator(pub StxAddress);

#[async_trait]
impl Authenticator for FlagAuthenticator {
  async fn authenticate(&self, app: &AppDetails) -> Outcome<UserData> {
    let addresses = [&self.0.mainnet, &self.0.testnet];
    if addresses.iter().all(|a| a.is_none()) {
      return Outcome::Cancelled;
    }

    for address in addresses.into_iter().flatten() {
      if let Err(e) = address.parse::<Principal>() {
        return Outcome::Failed(e.into());
      }
    }

    info!("signing in to {}", app.name);
    Outcome::Success(UserData {
      profile: Profile {
        stx_address: self.0.clone(),
      },
    })
  }
}

/// Pairs with the account given on the command line.
pub struct FlagRelay(pub Option<RelayAccount>);

#[async_trait]
impl RelayConnector for FlagRelay {
  async fn pair(&self, _: &str) -> Outcome<RelayAccount> {
    match self.0 {
      Some(ref account) => Outcome::Success(account.clone()),
      None => Outcome::Cancelled,
    }
  }

  async fn unpair(&self, account: &RelayAccount) -> Result<(), Error> {
    info!("unpaired {}", account.address);
    Ok(())
  }
}

/// Stands in for a wallet when the session cannot sign.
pub struct Unavailable(pub String);

#[async_trait]
impl Wallet for Unavailable {
  async fn sign_and_submit(&self, _: ContractCall) -> Outcome<TxId> {
    Outcome::Failed(Error::Wallet(self.0.clone()))
  }
}

/// Asks on the terminal before a transaction is submitted.
pub fn confirm(call: &ContractCall) -> bool {
  let args: Vec<_> = call.args.iter().map(ToString::to_string).collect();
  print!(
    "Call {}::{}({}) on {}? [y/N] ",
    call.contract,
    call.function,
    args.join(" "),
    call.network
  );
  if std::io::stdout().flush().is_err() {
    return false;
  }

  let mut answer = String::new();
  match std::io::stdin().lock().read_line(&mut answer) {
    Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
    Err(_) => false,
  }
}

#[cfg(test)]
mod tests {
  use {
    super::FlagAuthenticator,
    fundraiser_client_sdk::{
      session::{Authenticator, StxAddress},
      AppDetails,
      Error,
      Outcome,
    },
  };

  #[tokio::test]
  async fn flag_authenticator() {
    let app = AppDetails::default();

    let none = FlagAuthenticator(StxAddress::default());
    assert!(none.authenticate(&app).await.is_cancelled());

    let bad = FlagAuthenticator(StxAddress {
      mainnet: None,
      testnet: Some("not-an-address".into()),
    });
    assert!(matches!(
      bad.authenticate(&app).await,
      Outcome::Failed(Error::Principal(_))
    ));

    let good = FlagAuthenticator(StxAddress {
      mainnet: None,
      testnet: Some("STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y".into()),
    });
    assert!(good.authenticate(&app).await.is_success());
  }
}
