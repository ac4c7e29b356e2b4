//! Wallet engine for the privacy pool: note ownership, chain reconciliation,
//! and encrypted-at-rest key storage (spec §4.F, §4.H).
//!
//! `pool-core` is pure and I/O-free; everything in this crate is the
//! stateful layer that actually runs against a chain and a filesystem. The
//! `ChainMirror` and `Prover` traits are the seams a caller swaps in a real
//! backend through.

pub mod chain_mirror;
pub mod config;
pub mod error;
pub mod keys;
pub mod prover;
pub mod secure_storage;
pub mod storage;
pub mod wallet;

pub use chain_mirror::{ChainEvent, ChainMirror, FakeChainMirror};
pub use config::WalletConfig;
pub use error::EngineError;
pub use keys::{WalletSeed, LOOKAHEAD};
pub use prover::{FakeProver, Prover};
pub use secure_storage::{EncryptedSeedFile, SecureSeedStorage};
pub use storage::{InMemoryStore, JsonFileStore, NoteState, Store, StoredNote, WalletState};
pub use wallet::{SyncReport, Wallet};
