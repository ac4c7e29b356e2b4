//! `Prover` — the external Groth16/UltraHonk prover the wallet engine calls
//! out to (spec §4.F, §5). The engine only ever hands over a `Spend`'s
//! witness and reads back an opaque proof blob; it never generates a proof
//! itself and never inspects the blob's internal structure.

use pool_core::Spend;

use crate::error::EngineError;

pub trait Prover {
    /// Produce a proof for the given spend. Implementations are expected to
    /// serialize the private witness, hand it to an external prover process
    /// or service, and return its output unchanged.
    fn prove(&self, spend: &Spend) -> Result<Vec<u8>, EngineError>;
}

/// Deterministic stand-in prover for tests and local development: "proves"
/// a spend by hashing its public inputs, so the same spend always produces
/// the same fixed-length blob and a tampered one never matches.
pub struct FakeProver;

impl Prover for FakeProver {
    fn prove(&self, spend: &Spend) -> Result<Vec<u8>, EngineError> {
        use sha3::{Digest, Keccak256};
        let mut hasher = Keccak256::new();
        for field in spend.public_inputs() {
            hasher.update(field.to_bytes_be());
        }
        Ok(hasher.finalize().to_vec())
    }
}
