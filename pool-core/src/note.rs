//! Note algebra (spec §4.B).
//!
//! A note is the triple `(secret, nullifier, amount)` a user holds locally.
//! `commitment` is the leaf written into the accumulator; `nullifier_hash` is
//! published at spend time to prevent reuse. Neither `secret` nor `nullifier`
//! ever leaves the wallet process in cleartext.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::CoreError;
use crate::field::Field;
use crate::hash::{hash1, hash2};

/// Maximum note amount: `2^128 - 1`, comfortably inside the BN254 scalar field.
pub const MAX_AMOUNT: u128 = u128::MAX;

/// A note's secret material. Kept out of `Note`'s `Debug`/`Serialize` so it
/// never accidentally ends up in a log line; callers reach it through the
/// accessor methods, which is where `pool-wallet` enforces zeroization.
#[derive(Clone, PartialEq, Eq)]
pub struct Note {
    secret: Field,
    nullifier: Field,
    pub amount: u128,
    /// Set once the commitment has been observed appended on-chain.
    pub leaf_index: Option<u32>,
    pub timestamp: Option<u64>,
}

impl Zeroize for Note {
    fn zeroize(&mut self) {
        self.secret = Field::zero();
        self.nullifier = Field::zero();
        self.amount = 0;
    }
}

impl Drop for Note {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl std::fmt::Debug for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Note")
            .field("commitment", &self.commitment())
            .field("amount", &self.amount)
            .field("leaf_index", &self.leaf_index)
            .finish_non_exhaustive()
    }
}

impl Note {
    /// Construct a note from known secret material (used when reconstructing
    /// a note from a deterministic wallet-seed candidate during `sync`).
    pub fn from_parts(
        secret: Field,
        nullifier: Field,
        amount: u128,
    ) -> Result<Self, CoreError> {
        if amount == 0 {
            return Err(CoreError::AmountOutOfRange);
        }
        Ok(Self {
            secret,
            nullifier,
            amount,
            leaf_index: None,
            timestamp: None,
        })
    }

    /// Draw a brand-new note with independently random `secret` and
    /// `nullifier`, using OS entropy. Reusing either across notes breaks
    /// unlinkability, so this is the only constructor that is allowed to
    /// generate fresh material.
    pub fn new(amount: u128) -> Result<Self, CoreError> {
        if amount == 0 {
            return Err(CoreError::AmountOutOfRange);
        }
        let mut rng = rand::rngs::OsRng;
        Ok(Self {
            secret: random_field(&mut rng),
            nullifier: random_field(&mut rng),
            amount,
            leaf_index: None,
            timestamp: None,
        })
    }

    pub fn secret(&self) -> Field {
        self.secret
    }

    pub fn nullifier(&self) -> Field {
        self.nullifier
    }

    /// `commitment = H(H(secret, nullifier), amount)` — the leaf written at
    /// `leaf_index` in the accumulator.
    pub fn commitment(&self) -> Field {
        commitment_of(&self.secret, &self.nullifier, self.amount)
    }

    /// `nullifier_hash = H(nullifier, nullifier)` — published at spend time.
    pub fn nullifier_hash(&self) -> Field {
        hash1(&self.nullifier)
    }
}

pub fn commitment_of(secret: &Field, nullifier: &Field, amount: u128) -> Field {
    hash2(&hash2(secret, nullifier), &Field::from_u128(amount))
}

pub fn nullifier_hash_of(nullifier: &Field) -> Field {
    hash1(nullifier)
}

fn random_field<R: RngCore>(rng: &mut R) -> Field {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    let field = Field::reduce(&bytes);
    bytes.zeroize();
    field
}

/// Wire-format note metadata persisted in the *leaves* table (spec §6). Does
/// not carry `secret`/`nullifier` — only what an observer of the chain (or a
/// wallet that has already recognized the note) needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeafRecord {
    pub leaf_index: u32,
    pub commitment: Field,
    pub amount: u128,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_rejected() {
        assert_eq!(Note::new(0), Err(CoreError::AmountOutOfRange));
    }

    #[test]
    fn fresh_notes_have_independent_secrets() {
        let a = Note::new(100).unwrap();
        let b = Note::new(100).unwrap();
        assert_ne!(a.secret(), b.secret());
        assert_ne!(a.nullifier(), b.nullifier());
        assert_ne!(a.commitment(), b.commitment());
    }

    #[test]
    fn commitment_binds_all_three_components() {
        let s = Field::from_u128(1);
        let n = Field::from_u128(2);
        let base = commitment_of(&s, &n, 1000);

        assert_ne!(base, commitment_of(&Field::from_u128(9), &n, 1000));
        assert_ne!(base, commitment_of(&s, &Field::from_u128(9), 1000));
        assert_ne!(base, commitment_of(&s, &n, 1001));
    }

    #[test]
    fn nullifier_hash_is_self_hash() {
        let note = Note::from_parts(Field::from_u128(1), Field::from_u128(2), 500).unwrap();
        assert_eq!(note.nullifier_hash(), hash1(&Field::from_u128(2)));
    }
}
