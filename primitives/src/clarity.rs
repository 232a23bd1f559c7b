use {
  crate::{
    prefixed_hex::{from_prefixed_hex, ToPrefixedHex},
    principal::{validate_contract_name, StandardPrincipal},
    Principal,
  },
  std::{collections::BTreeMap, fmt::Display},
  thiserror::Error,
};

/// Deepest nesting of lists, tuples, responses and optionals that
/// the decoder will follow.
const MAX_DEPTH: usize = 32;

mod tag {
  pub const INT: u8 = 0x00;
  pub const UINT: u8 = 0x01;
  pub const BUFFER: u8 = 0x02;
  pub const TRUE: u8 = 0x03;
  pub const FALSE: u8 = 0x04;
  pub const STANDARD_PRINCIPAL: u8 = 0x05;
  pub const CONTRACT_PRINCIPAL: u8 = 0x06;
  pub const RESPONSE_OK: u8 = 0x07;
  pub const RESPONSE_ERR: u8 = 0x08;
  pub const NONE: u8 = 0x09;
  pub const SOME: u8 = 0x0a;
  pub const LIST: u8 = 0x0b;
  pub const TUPLE: u8 = 0x0c;
  pub const STRING_ASCII: u8 = 0x0d;
  pub const STRING_UTF8: u8 = 0x0e;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("Unexpected end of input")]
  UnexpectedEnd,

  #[error("Unknown Clarity type prefix {0:#04x}")]
  UnknownType(u8),

  #[error("{0} trailing bytes after Clarity value")]
  TrailingBytes(usize),

  #[error("Clarity value nested deeper than {MAX_DEPTH} levels")]
  TooDeep,

  #[error("Invalid string contents")]
  InvalidString,

  #[error("Invalid principal: {0}")]
  InvalidPrincipal(#[from] crate::principal::Error),

  #[error("Invalid hex: {0}")]
  InvalidHex(#[from] hex::FromHexError),

  #[error("Value too long to serialize")]
  TooLong,
}

/// A typed Clarity value as exchanged with contracts, either as a
/// function argument or as the result of a read-only call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClarityValue {
  Int(i128),
  UInt(u128),
  Buffer(Vec<u8>),
  Bool(bool),
  Principal(Principal),
  ResponseOk(Box<ClarityValue>),
  ResponseErr(Box<ClarityValue>),
  OptionalNone,
  OptionalSome(Box<ClarityValue>),
  List(Vec<ClarityValue>),
  Tuple(BTreeMap<String, ClarityValue>),
  StringAscii(String),
  StringUtf8(String),
}

impl ClarityValue {
  pub fn ok(value: ClarityValue) -> Self {
    ClarityValue::ResponseOk(Box::new(value))
  }

  pub fn err(value: ClarityValue) -> Self {
    ClarityValue::ResponseErr(Box::new(value))
  }

  pub fn some(value: ClarityValue) -> Self {
    ClarityValue::OptionalSome(Box::new(value))
  }

  /// Strips any number of `(ok ..)` and `(some ..)` wrappers.
  ///
  /// Read-only functions commonly wrap their result in a response
  /// or an optional, while clients are interested in the payload.
  pub fn into_inner(self) -> ClarityValue {
    match self {
      ClarityValue::ResponseOk(inner) | ClarityValue::OptionalSome(inner) => {
        (*inner).into_inner()
      }
      other => other,
    }
  }

  /// Unsigned view of integer values. Negative ints yield `None`.
  pub fn as_u128(&self) -> Option<u128> {
    match self {
      ClarityValue::UInt(v) => Some(*v),
      ClarityValue::Int(v) => u128::try_from(*v).ok(),
      _ => None,
    }
  }

  pub fn as_principal(&self) -> Option<&Principal> {
    match self {
      ClarityValue::Principal(p) => Some(p),
      _ => None,
    }
  }

  /// Consensus serialization of the value.
  pub fn serialize(&self) -> Result<Vec<u8>, Error> {
    let mut output = Vec::new();
    self.write_to(&mut output)?;
    Ok(output)
  }

  pub fn to_hex(&self) -> Result<String, Error> {
    Ok(self.serialize()?.to_prefixed_hex())
  }

  /// Decodes exactly one value, rejecting trailing bytes.
  pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
    let mut reader = Reader { bytes, pos: 0 };
    let value = reader.value(0)?;
    match reader.remaining() {
      0 => Ok(value),
      n => Err(Error::TrailingBytes(n)),
    }
  }

  pub fn from_hex(s: &str) -> Result<Self, Error> {
    Self::deserialize(&from_prefixed_hex(s)?)
  }

  fn write_to(&self, out: &mut Vec<u8>) -> Result<(), Error> {
    match self {
      ClarityValue::Int(v) => {
        out.push(tag::INT);
        out.extend_from_slice(&v.to_be_bytes());
      }
      ClarityValue::UInt(v) => {
        out.push(tag::UINT);
        out.extend_from_slice(&v.to_be_bytes());
      }
      ClarityValue::Buffer(bytes) => {
        out.push(tag::BUFFER);
        write_len(out, bytes.len())?;
        out.extend_from_slice(bytes);
      }
      ClarityValue::Bool(true) => out.push(tag::TRUE),
      ClarityValue::Bool(false) => out.push(tag::FALSE),
      ClarityValue::Principal(Principal::Standard(account)) => {
        out.push(tag::STANDARD_PRINCIPAL);
        write_account(out, account);
      }
      ClarityValue::Principal(Principal::Contract(account, name)) => {
        out.push(tag::CONTRACT_PRINCIPAL);
        write_account(out, account);
        write_name(out, name)?;
      }
      ClarityValue::ResponseOk(inner) => {
        out.push(tag::RESPONSE_OK);
        inner.write_to(out)?;
      }
      ClarityValue::ResponseErr(inner) => {
        out.push(tag::RESPONSE_ERR);
        inner.write_to(out)?;
      }
      ClarityValue::OptionalNone => out.push(tag::NONE),
      ClarityValue::OptionalSome(inner) => {
        out.push(tag::SOME);
        inner.write_to(out)?;
      }
      ClarityValue::List(items) => {
        out.push(tag::LIST);
        write_len(out, items.len())?;
        for item in items {
          item.write_to(out)?;
        }
      }
      ClarityValue::Tuple(fields) => {
        out.push(tag::TUPLE);
        write_len(out, fields.len())?;
        for (name, value) in fields {
          write_name(out, name)?;
          value.write_to(out)?;
        }
      }
      ClarityValue::StringAscii(s) => {
        if !s.is_ascii() {
          return Err(Error::InvalidString);
        }
        out.push(tag::STRING_ASCII);
        write_len(out, s.len())?;
        out.extend_from_slice(s.as_bytes());
      }
      ClarityValue::StringUtf8(s) => {
        out.push(tag::STRING_UTF8);
        write_len(out, s.len())?;
        out.extend_from_slice(s.as_bytes());
      }
    }
    Ok(())
  }
}

impl From<u128> for ClarityValue {
  fn from(v: u128) -> Self {
    ClarityValue::UInt(v)
  }
}

impl From<Principal> for ClarityValue {
  fn from(p: Principal) -> Self {
    ClarityValue::Principal(p)
  }
}

impl From<bool> for ClarityValue {
  fn from(v: bool) -> Self {
    ClarityValue::Bool(v)
  }
}

/// Clarity literal syntax, e.g. `(ok u5)` or `'ST...`.
impl Display for ClarityValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ClarityValue::Int(v) => write!(f, "{v}"),
      ClarityValue::UInt(v) => write!(f, "u{v}"),
      ClarityValue::Buffer(bytes) => write!(f, "0x{}", hex::encode(bytes)),
      ClarityValue::Bool(v) => write!(f, "{v}"),
      ClarityValue::Principal(p) => write!(f, "'{p}"),
      ClarityValue::ResponseOk(inner) => write!(f, "(ok {inner})"),
      ClarityValue::ResponseErr(inner) => write!(f, "(err {inner})"),
      ClarityValue::OptionalNone => write!(f, "none"),
      ClarityValue::OptionalSome(inner) => write!(f, "(some {inner})"),
      ClarityValue::List(items) => {
        write!(f, "(list")?;
        for item in items {
          write!(f, " {item}")?;
        }
        write!(f, ")")
      }
      ClarityValue::Tuple(fields) => {
        write!(f, "(tuple")?;
        for (name, value) in fields {
          write!(f, " ({name} {value})")?;
        }
        write!(f, ")")
      }
      ClarityValue::StringAscii(s) => write!(f, "{s:?}"),
      ClarityValue::StringUtf8(s) => write!(f, "u{s:?}"),
    }
  }
}

fn write_len(out: &mut Vec<u8>, len: usize) -> Result<(), Error> {
  let len = u32::try_from(len).map_err(|_| Error::TooLong)?;
  out.extend_from_slice(&len.to_be_bytes());
  Ok(())
}

fn write_account(out: &mut Vec<u8>, account: &StandardPrincipal) {
  out.push(account.version());
  out.extend_from_slice(account.hash());
}

fn write_name(out: &mut Vec<u8>, name: &str) -> Result<(), Error> {
  let len = u8::try_from(name.len()).map_err(|_| Error::TooLong)?;
  out.push(len);
  out.extend_from_slice(name.as_bytes());
  Ok(())
}

struct Reader<'a> {
  bytes: &'a [u8],
  pos: usize,
}

impl<'a> Reader<'a> {
  fn remaining(&self) -> usize {
    self.bytes.len() - self.pos
  }

  fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
    if self.remaining() < n {
      return Err(Error::UnexpectedEnd);
    }
    let slice = &self.bytes[self.pos..self.pos + n];
    self.pos += n;
    Ok(slice)
  }

  fn array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
    let mut output = [0u8; N];
    output.copy_from_slice(self.take(N)?);
    Ok(output)
  }

  fn byte(&mut self) -> Result<u8, Error> {
    Ok(self.take(1)?[0])
  }

  fn len(&mut self) -> Result<usize, Error> {
    Ok(u32::from_be_bytes(self.array()?) as usize)
  }

  fn account(&mut self) -> Result<StandardPrincipal, Error> {
    let version = self.byte()?;
    let hash = self.array::<20>()?;
    Ok(StandardPrincipal::new(version, hash)?)
  }

  fn name(&mut self) -> Result<String, Error> {
    let len = self.byte()? as usize;
    let name = std::str::from_utf8(self.take(len)?)
      .map_err(|_| Error::InvalidString)?
      .to_owned();
    Ok(name)
  }

  fn value(&mut self, depth: usize) -> Result<ClarityValue, Error> {
    if depth > MAX_DEPTH {
      return Err(Error::TooDeep);
    }

    Ok(match self.byte()? {
      tag::INT => ClarityValue::Int(i128::from_be_bytes(self.array()?)),
      tag::UINT => ClarityValue::UInt(u128::from_be_bytes(self.array()?)),
      tag::BUFFER => {
        let len = self.len()?;
        ClarityValue::Buffer(self.take(len)?.to_vec())
      }
      tag::TRUE => ClarityValue::Bool(true),
      tag::FALSE => ClarityValue::Bool(false),
      tag::STANDARD_PRINCIPAL => {
        ClarityValue::Principal(Principal::Standard(self.account()?))
      }
      tag::CONTRACT_PRINCIPAL => {
        let account = self.account()?;
        let name = self.name()?;
        validate_contract_name(&name)?;
        ClarityValue::Principal(Principal::Contract(account, name))
      }
      tag::RESPONSE_OK => ClarityValue::ok(self.value(depth + 1)?),
      tag::RESPONSE_ERR => ClarityValue::err(self.value(depth + 1)?),
      tag::NONE => ClarityValue::OptionalNone,
      tag::SOME => ClarityValue::some(self.value(depth + 1)?),
      tag::LIST => {
        let len = self.len()?;
        // every item takes at least one byte
        if len > self.remaining() {
          return Err(Error::UnexpectedEnd);
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
          items.push(self.value(depth + 1)?);
        }
        ClarityValue::List(items)
      }
      tag::TUPLE => {
        let len = self.len()?;
        let mut fields = BTreeMap::new();
        for _ in 0..len {
          let name = self.name()?;
          fields.insert(name, self.value(depth + 1)?);
        }
        ClarityValue::Tuple(fields)
      }
      tag::STRING_ASCII => {
        let len = self.len()?;
        let bytes = self.take(len)?;
        if !bytes.is_ascii() {
          return Err(Error::InvalidString);
        }
        ClarityValue::StringAscii(String::from_utf8_lossy(bytes).into_owned())
      }
      tag::STRING_UTF8 => {
        let len = self.len()?;
        ClarityValue::StringUtf8(
          String::from_utf8(self.take(len)?.to_vec())
            .map_err(|_| Error::InvalidString)?,
        )
      }
      other => return Err(Error::UnknownType(other)),
    })
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{ClarityValue, Error},
    std::collections::BTreeMap,
  };

  const OWNER: &str = "STGDS0Y17973EN5TCHNHGJJ9B31XWQ5YXBQ0KQ2Y";

  #[test]
  fn uint_wire_format() -> anyhow::Result<()> {
    let value = ClarityValue::UInt(5_000_000);
    assert_eq!(value.to_hex()?, "0x0100000000000000000000000000004c4b40");
    assert_eq!(
      ClarityValue::from_hex("0x0100000000000000000000000000004c4b40")?,
      value
    );
    Ok(())
  }

  #[test]
  fn principal_wire_format() -> anyhow::Result<()> {
    let standard = ClarityValue::Principal(OWNER.parse()?);
    assert_eq!(
      standard.to_hex()?,
      "0x051a20dc83c13a4e3754ba646b184a4958c3de5cbeea"
    );

    let contract =
      ClarityValue::Principal(format!("{OWNER}.fund-raiser").parse()?);
    let bytes = contract.serialize()?;
    assert_eq!(bytes[0], 0x06);
    assert_eq!(bytes[22], 11);
    assert_eq!(&bytes[23..], b"fund-raiser");
    assert_eq!(ClarityValue::deserialize(&bytes)?, contract);
    Ok(())
  }

  #[test]
  fn nested_values_survive_decoding() -> anyhow::Result<()> {
    let mut fields = BTreeMap::new();
    fields.insert("amount".to_owned(), ClarityValue::UInt(42));
    fields.insert("donor".to_owned(), ClarityValue::Principal(OWNER.parse()?));
    fields.insert(
      "memo".to_owned(),
      ClarityValue::some(ClarityValue::StringUtf8("merci ❤".into())),
    );
    fields.insert(
      "tags".to_owned(),
      ClarityValue::List(vec![
        ClarityValue::StringAscii("early".into()),
        ClarityValue::Buffer(vec![0xde, 0xad]),
        ClarityValue::Int(-7),
        ClarityValue::Bool(false),
        ClarityValue::OptionalNone,
      ]),
    );
    let value = ClarityValue::ok(ClarityValue::Tuple(fields));

    let decoded = ClarityValue::from_hex(&value.to_hex()?)?;
    assert_eq!(decoded, value);
    Ok(())
  }

  #[test]
  fn into_inner_strips_wrappers() {
    let wrapped =
      ClarityValue::ok(ClarityValue::some(ClarityValue::UInt(1_000_000)));
    assert_eq!(wrapped.into_inner().as_u128(), Some(1_000_000));

    let err = ClarityValue::err(ClarityValue::UInt(100));
    assert_eq!(err.clone().into_inner(), err);
    assert_eq!(ClarityValue::Int(-1).as_u128(), None);
  }

  #[test]
  fn malformed_input() {
    assert_eq!(
      ClarityValue::from_hex("0x01000000"),
      Err(Error::UnexpectedEnd)
    );
    assert_eq!(ClarityValue::from_hex("0x0f"), Err(Error::UnknownType(0x0f)));
    assert_eq!(ClarityValue::from_hex("0x0309"), Err(Error::TrailingBytes(1)));
    assert_eq!(
      ClarityValue::from_hex("0x0bffffffff"),
      Err(Error::UnexpectedEnd)
    );
    assert!(matches!(
      ClarityValue::from_hex("0xzz"),
      Err(Error::InvalidHex(_))
    ));

    let deep = vec![0x0a; 40].into_iter().chain([0x03]).collect::<Vec<_>>();
    assert_eq!(ClarityValue::deserialize(&deep), Err(Error::TooDeep));
  }

  #[test]
  fn literal_display() -> anyhow::Result<()> {
    assert_eq!(ClarityValue::ok(ClarityValue::UInt(5)).to_string(), "(ok u5)");
    assert_eq!(
      ClarityValue::Principal(OWNER.parse()?).to_string(),
      format!("'{OWNER}")
    );
    assert_eq!(ClarityValue::OptionalNone.to_string(), "none");
    Ok(())
  }
}
