//! Hex "quantity" codec used for block heights and transaction positions.
//!
//! The chain API encodes unsigned integers as `0x`-prefixed, lowercase, minimal-width
//! hexadecimal strings (`0x0`, `0x1f`, never `0x01f`).

use core::num::ParseIntError;

/// Error returned by [`from_hex`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseQuantityError {
    /// Nothing to parse.
    #[error("empty quantity")]
    Empty,
    /// Sign, prefix or digit separator placement is not a valid integer literal.
    #[error("invalid quantity literal `{0}`")]
    InvalidLiteral(String),
    /// The digits are not valid in the detected base, or the value overflows `u64`.
    #[error("invalid quantity `{input}`: {source}")]
    InvalidDigits {
        /// Raw input.
        input: String,
        /// Underlying integer parsing error.
        #[source]
        source: ParseIntError,
    },
}

/// Format `n` as a minimal-width lowercase hex quantity.
#[must_use]
pub fn to_hex(n: u64) -> String {
    format!("0x{n:x}")
}

/// Parse an integer literal, detecting the base from its prefix.
///
/// `0x` is hexadecimal, `0o` octal, `0b` binary, a bare leading `0` octal and anything else
/// decimal. A single leading `+` is accepted, and `_` may separate digits.
///
/// # Errors
///
/// If the string is not a valid literal or the value does not fit in a `u64`.
pub fn from_hex(input: &str) -> Result<u64, ParseQuantityError> {
    let unsigned = input.strip_prefix('+').unwrap_or(input);
    if unsigned.is_empty() {
        return Err(ParseQuantityError::Empty);
    }

    let (radix, digits, prefixed) = split_radix(unsigned);
    if digits.is_empty() && !prefixed {
        return Err(ParseQuantityError::InvalidLiteral(input.to_owned()));
    }
    if !separators_ok(digits, prefixed) {
        return Err(ParseQuantityError::InvalidLiteral(input.to_owned()));
    }

    let cleaned = digits.replace('_', "");
    if cleaned.is_empty() {
        return Err(ParseQuantityError::InvalidLiteral(input.to_owned()));
    }

    u64::from_str_radix(&cleaned, radix).map_err(|source| ParseQuantityError::InvalidDigits {
        input: input.to_owned(),
        source,
    })
}

fn split_radix(literal: &str) -> (u32, &str, bool) {
    let lower = literal.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &literal[2..], true),
        Some("0o") => (8, &literal[2..], true),
        Some("0b") => (2, &literal[2..], true),
        _ if literal.len() > 1 && literal.starts_with('0') => (8, &literal[1..], true),
        _ => (10, literal, false),
    }
}

/// Separators may only sit between two digits, or between a base prefix and a digit.
fn separators_ok(digits: &str, prefixed: bool) -> bool {
    if digits
        .chars()
        .any(|ch| !(ch.is_ascii_alphanumeric() || ch == '_'))
    {
        return false;
    }
    // a base prefix counts as a digit
    let mut previous = if prefixed { '0' } else { '_' };
    for ch in digits.chars() {
        if ch == '_' && previous == '_' {
            return false;
        }
        previous = ch;
    }
    previous != '_'
}

/// Serde adapter encoding a `u64` as a hex quantity string.
pub mod serde_quantity {
    use serde::{de, Deserialize as _, Deserializer, Serializer};

    /// Serialize `value` with [`super::to_hex`].
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_hex(*value))
    }

    /// Deserialize a quantity string with [`super::from_hex`].
    ///
    /// # Errors
    ///
    /// If the value is not a string or not a valid quantity.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::from_hex(&raw).map_err(de::Error::custom)
    }
}
