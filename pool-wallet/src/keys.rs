//! Wallet seed and deterministic note derivation (spec §4.F).
//!
//! A note the wallet creates for itself — a deposit, a transfer's output and
//! change, or a consolidation's merged note — draws its `(secret, nullifier)`
//! pair from the wallet seed and a monotonically increasing counter rather
//! than from bare OS entropy. That is what makes `sync` able to recover a
//! wallet's notes from the chain alone: re-derive the same candidate stream
//! and test each one against the commitments observed on-chain.

use rand::RngCore;
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use pool_core::Field;

use crate::error::EngineError;

const SECRET_DOMAIN: &[u8] = b"pool-wallet/secret";
const NULLIFIER_DOMAIN: &[u8] = b"pool-wallet/nullifier";

/// Fixed message `unlock` signs over (spec §6): `seed = KDF(signature ||
/// this message)`, so re-signing the same message with the same wallet key
/// always re-derives the same seed without the seed itself ever touching
/// disk in cleartext.
pub const UNLOCK_MESSAGE: &[u8] = b"anon-privacy-wallet-v1";

/// A signature shorter than this can't plausibly be a real wallet
/// signature (the shortest common scheme, Ed25519, is 64 bytes); reject it
/// as malformed rather than silently hashing garbage into a seed.
const MIN_SIGNATURE_BYTES: usize = 64;

/// How many candidate counters `sync` probes past the last one it recognized.
/// Mirrors the "gap limit" used by HD-wallet address scanning: large enough
/// to tolerate abandoned/cancelled prepares, small enough to keep `sync`
/// O(lookahead) per unrecognized deposit.
pub const LOOKAHEAD: u64 = 64;

/// 32 bytes of entropy, zeroized on drop. Never serialized, never logged.
pub struct WalletSeed([u8; 32]);

impl Zeroize for WalletSeed {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for WalletSeed {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl WalletSeed {
    /// Wrap raw seed bytes (used when loading from encrypted storage).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Draw a fresh seed from OS entropy (used by `keygen`).
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Derive the note-generating seed from a wallet signature over the
    /// fixed domain message (spec §4.F `unlock`, spec §6). The signature
    /// itself never needs to be stored: re-signing the same message with
    /// the same wallet key reproduces this exact seed.
    ///
    /// Fails `UnlockFailed` if `signature` is too short to be a real
    /// signature from any scheme this engine expects.
    pub fn from_signature(signature: &[u8]) -> Result<Self, EngineError> {
        if signature.len() < MIN_SIGNATURE_BYTES {
            return Err(EngineError::UnlockFailed);
        }
        let mut hasher = Keccak256::new();
        hasher.update(signature);
        hasher.update(UNLOCK_MESSAGE);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive the `counter`-th candidate `(secret, nullifier)` pair. Distinct
    /// domain tags keep the secret and nullifier streams independent even
    /// though they share a seed and counter.
    pub fn candidate(&self, counter: u64) -> (Field, Field) {
        let secret = derive(&self.0, SECRET_DOMAIN, counter);
        let nullifier = derive(&self.0, NULLIFIER_DOMAIN, counter);
        (secret, nullifier)
    }
}

fn derive(seed: &[u8; 32], domain: &[u8], counter: u64) -> Field {
    let mut hasher = Keccak256::new();
    hasher.update(seed);
    hasher.update(domain);
    hasher.update(counter.to_be_bytes());
    let digest = hasher.finalize();
    Field::reduce(&digest)
}

/// Build a note deterministically from this seed at `counter`, for the
/// caller to then offer up via `prepare_transfer`/`prepare_consolidate`, or
/// to test against an observed commitment during `sync`.
pub fn candidate_note(
    seed: &WalletSeed,
    counter: u64,
    amount: u128,
) -> Result<pool_core::Note, EngineError> {
    let (secret, nullifier) = seed.candidate(counter);
    Ok(pool_core::Note::from_parts(secret, nullifier, amount)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_are_deterministic() {
        let seed = WalletSeed::from_bytes([7u8; 32]);
        let a = seed.candidate(3);
        let b = seed.candidate(3);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_counters_diverge() {
        let seed = WalletSeed::from_bytes([7u8; 32]);
        assert_ne!(seed.candidate(0), seed.candidate(1));
    }

    #[test]
    fn secret_and_nullifier_streams_are_independent() {
        let seed = WalletSeed::from_bytes([1u8; 32]);
        let (secret, nullifier) = seed.candidate(0);
        assert_ne!(secret, nullifier);
    }

    #[test]
    fn distinct_seeds_diverge() {
        let a = WalletSeed::from_bytes([1u8; 32]);
        let b = WalletSeed::from_bytes([2u8; 32]);
        assert_ne!(a.candidate(0), b.candidate(0));
    }

    #[test]
    fn signature_derivation_is_deterministic() {
        let sig = [0x42u8; 64];
        let a = WalletSeed::from_signature(&sig).unwrap();
        let b = WalletSeed::from_signature(&sig).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn distinct_signatures_diverge() {
        let a = WalletSeed::from_signature(&[0x11u8; 64]).unwrap();
        let b = WalletSeed::from_signature(&[0x22u8; 64]).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn malformed_signature_is_rejected() {
        let result = WalletSeed::from_signature(&[0u8; 10]);
        assert!(matches!(result, Err(EngineError::UnlockFailed)));
    }
}
