/// `0x`-prefixed lowercase hex, the form the Stacks node API uses for
/// serialized Clarity values and transaction ids.
pub trait ToPrefixedHex {
  fn to_prefixed_hex(&self) -> String;
}

impl ToPrefixedHex for &[u8] {
  fn to_prefixed_hex(&self) -> String {
    format!("0x{}", hex::encode(self))
  }
}

impl<const N: usize> ToPrefixedHex for [u8; N] {
  fn to_prefixed_hex(&self) -> String {
    format!("0x{}", hex::encode(self))
  }
}

impl ToPrefixedHex for Vec<u8> {
  fn to_prefixed_hex(&self) -> String {
    format!("0x{}", hex::encode(self))
  }
}

/// Decodes hex with or without the `0x` prefix.
pub fn from_prefixed_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
  hex::decode(s.strip_prefix("0x").unwrap_or(s))
}
