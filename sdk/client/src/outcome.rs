use crate::Error;

/// Result of an interaction that goes through a wallet prompt.
///
/// Cancellation by the user is a first-class outcome, distinct from
/// failure: nothing went wrong, the user just said no.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
  Success(T),
  Cancelled,
  Failed(Error),
}

impl<T> Outcome<T> {
  pub fn is_success(&self) -> bool {
    matches!(self, Outcome::Success(_))
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(self, Outcome::Cancelled)
  }

  pub fn is_failed(&self) -> bool {
    matches!(self, Outcome::Failed(_))
  }

  pub fn success(self) -> Option<T> {
    match self {
      Outcome::Success(value) => Some(value),
      _ => None,
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
    match self {
      Outcome::Success(value) => Outcome::Success(f(value)),
      Outcome::Cancelled => Outcome::Cancelled,
      Outcome::Failed(e) => Outcome::Failed(e),
    }
  }

  /// `Ok(None)` for a cancelled interaction.
  pub fn into_result(self) -> Result<Option<T>, Error> {
    match self {
      Outcome::Success(value) => Ok(Some(value)),
      Outcome::Cancelled => Ok(None),
      Outcome::Failed(e) => Err(e),
    }
  }
}

impl<T> From<Result<T, Error>> for Outcome<T> {
  fn from(result: Result<T, Error>) -> Self {
    match result {
      Ok(value) => Outcome::Success(value),
      Err(e) => Outcome::Failed(e),
    }
  }
}
