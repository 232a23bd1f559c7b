//! Conversions between micro-STX, the integer unit contracts account
//! in, and STX, the decimal unit shown to people.

/// Number of micro-STX in one STX.
pub const MICRO_PER_STX: u128 = 1_000_000;

/// Converts micro-STX into STX.
///
/// This is a plain floating point division, formatting for display
/// is left to [`format_stx`] or the caller.
pub fn to_display(micro: u128) -> f64 {
  micro as f64 / MICRO_PER_STX as f64
}

/// Converts STX into micro-STX, truncating toward zero.
///
/// No validation happens here: callers must reject non-numeric and
/// non-positive amounts first. Out of range inputs saturate, so NaN
/// and negative values come out as zero.
pub fn to_minor_units(display: f64) -> u128 {
  (display * MICRO_PER_STX as f64).trunc() as u128
}

/// Renders an STX amount with thousands separators and up to six
/// fractional digits, trailing zeros removed, e.g. `1,234.5`.
pub fn format_stx(stx: f64) -> String {
  let fixed = format!("{:.6}", stx.abs());
  let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, ""));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, c) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }

  let fraction = fraction.trim_end_matches('0');
  let sign = if stx < 0.0 && (whole != "0" || !fraction.is_empty()) {
    "-"
  } else {
    ""
  };

  match fraction.is_empty() {
    true => format!("{sign}{grouped}"),
    false => format!("{sign}{grouped}.{fraction}"),
  }
}

/// Shortens a long address to `ABCDEF...WXYZ` for display.
/// Addresses of ten characters or fewer are returned unchanged.
pub fn truncate_address(address: &str) -> String {
  let chars: Vec<char> = address.chars().collect();
  if chars.len() <= 10 {
    return address.to_owned();
  }

  let head: String = chars[..6].iter().collect();
  let tail: String = chars[chars.len() - 4..].iter().collect();
  format!("{head}...{tail}")
}
