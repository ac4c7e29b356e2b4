//! Wallet state persistence (spec §6's *leaves*/*nullifiers* tables, from
//! the wallet's own point of view, plus the private note list those tables
//! don't carry). Generalizes the teacher's plain `serde_json`
//! read-modify-write file stores into a `Store` trait so tests can swap in
//! an in-memory fake.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use pool_core::Field;

use crate::error::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteState {
    /// Spendable.
    Owned,
    /// Selected as a spend input, witness assembly started but not yet
    /// confirmed on-chain.
    Pending,
    /// Its nullifier has been observed on-chain.
    Spent,
}

/// A note the wallet has recognized as its own, plus enough bookkeeping to
/// reconstruct it (the `candidate_counter` it was derived at) and to track
/// where it sits in the accumulator (`leaf_index`, once observed).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredNote {
    pub secret: Field,
    pub nullifier: Field,
    pub amount: u128,
    pub leaf_index: Option<u32>,
    pub timestamp: Option<u64>,
    pub candidate_counter: u64,
    pub state: NoteState,
}

impl StoredNote {
    pub fn commitment(&self) -> Field {
        pool_core::commitment_of(&self.secret, &self.nullifier, self.amount)
    }

    pub fn nullifier_hash(&self) -> Field {
        pool_core::nullifier_hash_of(&self.nullifier)
    }

    pub fn to_note(&self) -> Result<pool_core::Note, EngineError> {
        Ok(pool_core::Note::from_parts(
            self.secret,
            self.nullifier,
            self.amount,
        )?)
    }
}

/// Everything `Wallet` needs to resume exactly where it left off.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WalletState {
    pub last_scanned_leaf: u32,
    pub next_candidate_counter: u64,
    pub notes: Vec<StoredNote>,
    /// Notes whose leaf position was invalidated by a reorg (spec §4.H,
    /// scenario S6). Kept with full secret material so they can be
    /// reinstated if the same commitment reappears.
    pub quarantine: Vec<StoredNote>,
}

pub trait Store {
    fn load(&self) -> Result<WalletState, EngineError>;
    fn save(&self, state: &WalletState) -> Result<(), EngineError>;
}

/// Durable store: a single JSON file, read-modify-write, matching the
/// teacher's plain `serde_json::to_string_pretty` + `fs::write` style.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<WalletState, EngineError> {
        if !self.path.exists() {
            return Ok(WalletState::default());
        }
        let json = fs::read_to_string(&self.path).map_err(|e| EngineError::Storage(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| EngineError::Storage(e.to_string()))
    }

    fn save(&self, state: &WalletState) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| EngineError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|e| EngineError::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| EngineError::Storage(e.to_string()))
    }
}

/// In-memory fake for tests: no filesystem, state lives for the process's
/// lifetime.
#[derive(Default)]
pub struct InMemoryStore {
    state: RefCell<WalletState>,
}

impl Store for InMemoryStore {
    fn load(&self) -> Result<WalletState, EngineError> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &WalletState) -> Result<(), EngineError> {
        *self.state.borrow_mut() = state.clone();
        Ok(())
    }
}
