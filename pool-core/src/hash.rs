//! The domain-separated collision-resistant hash used for commitments,
//! nullifier hashes, and Merkle nodes (spec §4.A).
//!
//! `H(a, b) = reduce(keccak256(be32(a) || be32(b)))`. This must be the exact
//! function the circuit uses internally — any deviation invalidates every
//! proof built against this engine's witnesses.

use sha3::{Digest, Keccak256};

use crate::field::Field;

/// Two-argument hash: `H(a, b) -> field`.
pub fn hash2(a: &Field, b: &Field) -> Field {
    let mut hasher = Keccak256::new();
    hasher.update(a.to_bytes_be());
    hasher.update(b.to_bytes_be());
    Field::reduce(&hasher.finalize())
}

/// Self-hash convenience used as the nullifier-hash primitive: `H1(x) = H(x, x)`.
pub fn hash1(x: &Field) -> Field {
    hash2(x, x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = Field::from_u128(1);
        let b = Field::from_u128(2);
        assert_eq!(hash2(&a, &b), hash2(&a, &b));
    }

    #[test]
    fn hash_is_order_dependent() {
        let a = Field::from_u128(1);
        let b = Field::from_u128(2);
        assert_ne!(hash2(&a, &b), hash2(&b, &a));
    }

    #[test]
    fn changing_either_input_changes_output() {
        let a = Field::from_u128(1);
        let b = Field::from_u128(2);
        let c = Field::from_u128(3);
        let base = hash2(&a, &b);
        assert_ne!(base, hash2(&c, &b));
        assert_ne!(base, hash2(&a, &c));
    }

    #[test]
    fn hash1_matches_hash2_self_pair() {
        let x = Field::from_u128(7);
        assert_eq!(hash1(&x), hash2(&x, &x));
    }
}
