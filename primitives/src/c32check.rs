//! c32check, the text encoding used by Stacks for account and contract
//! addresses: a version character followed by Crockford base32 of the
//! payload and its double SHA-256 checksum.

use thiserror::Error;

const ALPHABET: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Invalid c32 character {0:?}")]
  InvalidCharacter(char),

  #[error("Invalid c32check version {0}. Expected a value below 32")]
  InvalidVersion(u8),

  #[error("Malformed c32check payload: {0}")]
  Malformed(String),
}

/// Encodes a version and payload as `<version char><c32(payload ++ checksum)>`.
pub fn check_encode(version: u8, data: &[u8]) -> Result<String, Error> {
  if version >= 32 {
    return Err(Error::InvalidVersion(version));
  }
  c32::encode_check(data, version)
    .map_err(|e| Error::Malformed(e.to_string()))
}

/// Inverse of [`check_encode`], verifies the checksum.
///
/// Lowercase input is accepted, and the ambiguous characters
/// `O`, `I` and `L` are read as `0`, `1` and `1`.
pub fn check_decode(input: &str) -> Result<(u8, Vec<u8>), Error> {
  let normalized = normalize(input)?;
  let (payload, version) = c32::decode_check(&normalized)
    .map_err(|e| Error::Malformed(e.to_string()))?;
  Ok((version, payload))
}

fn normalize(input: &str) -> Result<String, Error> {
  input
    .chars()
    .map(|c| {
      let upper = match c.to_ascii_uppercase() {
        'O' => '0',
        'I' | 'L' => '1',
        other => other,
      };
      match ALPHABET.contains(upper) {
        true => Ok(upper),
        false => Err(Error::InvalidCharacter(c)),
      }
    })
    .collect()
}
