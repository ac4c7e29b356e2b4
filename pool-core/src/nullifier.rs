//! Nullifier registry: at-most-once membership (spec §4.D).
//!
//! This is the pure in-memory core. Durable persistence — "must flush before
//! any externally visible effect depending on it is emitted" — is a
//! concern of the `Store` trait each of `pool-wallet` and `pool-auction`
//! layer on top, not of this type.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::field::Field;

#[derive(Default)]
pub struct NullifierRegistry {
    spent: HashSet<Field>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, nullifier_hash: &Field) -> bool {
        self.spent.contains(nullifier_hash)
    }

    /// Insertion is append-only: once a nullifier hash is in the set it can
    /// never leave. Fails `AlreadySpent` if it's already a member.
    pub fn insert(&mut self, nullifier_hash: Field) -> Result<(), CoreError> {
        if self.spent.contains(&nullifier_hash) {
            return Err(CoreError::AlreadySpent);
        }
        self.spent.insert(nullifier_hash);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.spent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.spent.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_succeeds_exactly_once() {
        let mut reg = NullifierRegistry::new();
        let nh = Field::from_u128(1);
        assert!(reg.insert(nh).is_ok());
        assert_eq!(reg.insert(nh), Err(CoreError::AlreadySpent));
    }

    #[test]
    fn has_reflects_membership() {
        let mut reg = NullifierRegistry::new();
        let nh = Field::from_u128(1);
        assert!(!reg.has(&nh));
        reg.insert(nh).unwrap();
        assert!(reg.has(&nh));
    }
}
