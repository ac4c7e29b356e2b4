//! Off-chain privacy-pool core: field arithmetic, note algebra, the
//! append-only Merkle accumulator, the nullifier registry, and witness
//! assembly for the three spend variants.
//!
//! No I/O, no async — every type here is a pure value or a small mutable
//! accumulator/registry pair, reproducible bit-for-bit by any client that
//! links against this crate. `pool-wallet` and `pool-auction` build the
//! stateful, I/O-facing engine on top of it.

pub mod error;
pub mod field;
pub mod hash;
pub mod merkle;
pub mod note;
pub mod nullifier;
pub mod witness;


pub use error::CoreError;
pub use field::Field;
pub use merkle::{MerkleAccumulator, MerklePath, RootStatus, TREE_DEPTH};
pub use note::{commitment_of, nullifier_hash_of, LeafRecord, Note};
pub use nullifier::NullifierRegistry;
pub use witness::{
    assemble_consolidate, assemble_transfer, assemble_withdraw, ConsolidateInput,
    ConsolidateInputPublicInputs, ConsolidateInputWitness, ConsolidatePublicInputs,
    ConsolidateWitness, Spend, TransferPublicInputs, TransferWitness, WithdrawPublicInputs,
    WithdrawWitness,
};

/// BN254 scalar field modulus, the exact literal named in spec §3.
pub const FIELD_MODULUS_DECIMAL: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";
