//! BN254 scalar field element (spec §4.A).
//!
//! `Field` wraps `ark_bn254::Fr`. Two ways to get a value in: `reduce`, which
//! is infallible and mirrors what the circuit does with hash outputs, and
//! `try_from_bytes_be`, which is strict and matches the "encoding an input
//! >= p is a programmer error" rule — used at boundaries where a caller hands
//! us a field element that is supposed to already be canonical (commitments,
//! wire-format values), not a hash digest that needs folding down.

use ark_ff::{BigInteger, PrimeField};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

pub const FIELD_BYTES: usize = 32;

/// BN254 scalar field modulus, for reference:
/// 21888242871839275222246405745257275088548364400416034343698204186575808495617
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Field(pub(crate) ark_bn254::Fr);

impl Field {
    pub fn zero() -> Self {
        Field(ark_bn254::Fr::from(0u64))
    }

    /// Reduce an arbitrary byte string (big-endian) modulo p. Infallible —
    /// this is what the hash function uses to fold a 256-bit digest back
    /// into the field.
    pub fn reduce(bytes: &[u8]) -> Self {
        Field(ark_bn254::Fr::from_be_bytes_mod_order(bytes))
    }

    /// Parse a canonical 32-byte big-endian encoding. Fails with
    /// `InvalidFieldElement` if the integer it encodes is >= p.
    pub fn try_from_bytes_be(bytes: &[u8; FIELD_BYTES]) -> Result<Self, CoreError> {
        let candidate = ark_bn254::Fr::from_be_bytes_mod_order(bytes);
        if candidate.to_bytes_be() == *bytes {
            Ok(Field(candidate))
        } else {
            Err(CoreError::InvalidFieldElement)
        }
    }

    pub fn from_u128(value: u128) -> Self {
        Field(ark_bn254::Fr::from(value))
    }

    /// Big-endian 32-byte encoding, the wire format named in spec §6.
    pub fn to_bytes_be(&self) -> [u8; FIELD_BYTES] {
        let mut out = [0u8; FIELD_BYTES];
        let repr = self.0.to_bytes_be();
        out.copy_from_slice(&repr);
        out
    }

    /// `0x`-prefixed big-endian hex, leading zero nibbles stripped (the
    /// "canonical short form" spec §4.E allows for witness serialization).
    pub fn to_hex_short(&self) -> String {
        let bytes = self.to_bytes_be();
        let hex = hex::encode(bytes);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }

    /// `0x`-prefixed, zero-padded to 64 hex digits.
    pub fn to_hex_fixed(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes_be()))
    }
}

trait ToBytesBeExt {
    fn to_bytes_be(&self) -> [u8; FIELD_BYTES];
}

impl ToBytesBeExt for ark_bn254::Fr {
    fn to_bytes_be(&self) -> [u8; FIELD_BYTES] {
        let mut out = [0u8; FIELD_BYTES];
        let repr = self.into_bigint().to_bytes_be();
        out.copy_from_slice(&repr);
        out
    }
}

impl std::ops::Add for Field {
    type Output = Field;
    fn add(self, rhs: Field) -> Field {
        Field(self.0 + rhs.0)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({})", self.to_hex_short())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_short())
    }
}

impl FromStr for Field {
    type Err = CoreError;

    /// Lenient parse used by the witness assembler's wire format: any
    /// `0x`-prefixed (or bare) hex string, re-reduced modulo p on the way in
    /// ("the verifier reduces again", spec §4.E).
    fn from_str(s: &str) -> Result<Self, CoreError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let padded = if stripped.len() % 2 == 1 {
            format!("0{stripped}")
        } else {
            stripped.to_string()
        };
        let bytes = hex::decode(&padded).map_err(|_| CoreError::InvalidFieldElement)?;
        Ok(Field::reduce(&bytes))
    }
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex_fixed())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Field::from_str(&s).map_err(serde::de::Error::custom)
    }
}
