mod c32check;
mod clarity;
mod contract;
mod network;
mod prefixed_hex;
mod principal;
pub mod units;

pub use {
  c32check::{
    check_decode as c32_check_decode,
    check_encode as c32_check_encode,
    Error as C32Error,
  },
  clarity::{ClarityValue, Error as ClarityError},
  contract::ContractId,
  network::Network,
  prefixed_hex::{from_prefixed_hex, ToPrefixedHex},
  principal::{
    validate_contract_name,
    Error as PrincipalError,
    Principal,
    StandardPrincipal,
  },
};
