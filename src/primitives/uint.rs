use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Uint - Arbitrary-precision unsigned integer
// ============================================================================
//
// Contract event parameters are `uint256` words. Only their magnitude
// matters to the indexer, so the value is kept as a minimal big-endian byte
// string: no leading zero bytes, and zero is the empty sequence.
//
// ============================================================================

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Uint {
    be: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseUintError {
    #[error("empty integer literal")]
    Empty,

    #[error("invalid digit {0:?} in integer literal")]
    InvalidDigit(char),
}

impl Uint {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from big-endian bytes of any length; leading zeros are dropped.
    pub fn from_be_slice(bytes: &[u8]) -> Self {
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self { be: bytes[first..].to_vec() }
    }

    /// Minimal big-endian magnitude (empty for zero).
    pub fn as_be_bytes(&self) -> &[u8] {
        &self.be
    }

    pub fn is_zero(&self) -> bool {
        self.be.is_empty()
    }

    fn from_hex_digits(digits: &str) -> Result<Self, ParseUintError> {
        if digits.is_empty() {
            return Err(ParseUintError::Empty);
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseUintError::InvalidDigit(bad));
        }
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        // Every character was checked above, so decoding cannot fail.
        let bytes = hex::decode(padded).map_err(|_| ParseUintError::Empty)?;
        Ok(Self::from_be_slice(&bytes))
    }

    fn from_decimal_digits(digits: &str) -> Result<Self, ParseUintError> {
        if digits.is_empty() {
            return Err(ParseUintError::Empty);
        }
        let mut be: Vec<u8> = Vec::new();
        for c in digits.chars() {
            let digit = c.to_digit(10).ok_or(ParseUintError::InvalidDigit(c))?;
            // be = be * 10 + digit
            let mut carry = digit;
            for byte in be.iter_mut().rev() {
                let v = u32::from(*byte) * 10 + carry;
                *byte = (v & 0xff) as u8;
                carry = v >> 8;
            }
            while carry > 0 {
                be.insert(0, (carry & 0xff) as u8);
                carry >>= 8;
            }
        }
        Ok(Self::from_be_slice(&be))
    }

    /// Divide in place by `divisor`, returning the remainder.
    fn div_rem_small(be: &mut Vec<u8>, divisor: u32) -> u32 {
        let mut rem: u64 = 0;
        for byte in be.iter_mut() {
            let acc = (rem << 8) | u64::from(*byte);
            *byte = (acc / u64::from(divisor)) as u8;
            rem = acc % u64::from(divisor);
        }
        let first = be.iter().position(|b| *b != 0).unwrap_or(be.len());
        be.drain(..first);
        rem as u32
    }
}

impl From<u64> for Uint {
    fn from(value: u64) -> Self {
        Self::from_be_slice(&value.to_be_bytes())
    }
}

impl From<u32> for Uint {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl From<u128> for Uint {
    fn from(value: u128) -> Self {
        Self::from_be_slice(&value.to_be_bytes())
    }
}

impl Ord for Uint {
    fn cmp(&self, other: &Self) -> Ordering {
        // Minimal representations: a longer magnitude is always larger.
        self.be
            .len()
            .cmp(&other.be.len())
            .then_with(|| self.be.cmp(&other.be))
    }
}

impl PartialOrd for Uint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Uint {
    type Err = ParseUintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex_digits) => Self::from_hex_digits(hex_digits),
            None => Self::from_decimal_digits(s),
        }
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        const CHUNK: u32 = 1_000_000_000;
        let mut rest = self.be.clone();
        let mut chunks = Vec::new();
        while !rest.is_empty() {
            chunks.push(Self::div_rem_small(&mut rest, CHUNK));
        }
        let mut out = String::new();
        if let Some((most_significant, lower)) = chunks.split_last() {
            out.push_str(&most_significant.to_string());
            for chunk in lower.iter().rev() {
                out.push_str(&format!("{chunk:09}"));
            }
        }
        f.write_str(&out)
    }
}

impl fmt::Debug for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint({self})")
    }
}

impl Serialize for Uint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct UintVisitor;

impl<'de> Visitor<'de> for UintVisitor {
    type Value = Uint;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unsigned integer as a decimal or 0x-prefixed hex string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Uint, E> {
        Ok(Uint::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Uint, E> {
        u64::try_from(v)
            .map(Uint::from)
            .map_err(|_| E::custom(format!("negative value {v} for unsigned integer")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Uint, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Uint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UintVisitor)
    }
}
