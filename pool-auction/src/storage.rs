//! Auction state persistence: the slot table plus the spent-nullifier set,
//! mirroring `pool-wallet`'s `Store` trait/`JsonFileStore`/`InMemoryStore`
//! split so tests can swap in an in-memory fake.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pool_core::Field;

use crate::error::AuctionError;
use crate::slot::{AuctionSlot, Bid};

/// Everything an [`crate::slot::AuctionCore`] needs to resume exactly where
/// it left off. `NullifierRegistry` itself isn't `Serialize` — it's a pure
/// in-memory accumulator — so persistence flattens it to the list of spent
/// hashes and replays `insert` on load. `bids` is spec §6's *bids* table;
/// `slots` references into it by id rather than embedding full bid records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuctionState {
    pub slots: HashMap<u64, AuctionSlot>,
    pub spent_nullifiers: Vec<Field>,
    pub bids: HashMap<Uuid, Bid>,
}

pub trait Store {
    fn load(&self) -> Result<AuctionState, AuctionError>;
    fn save(&self, state: &AuctionState) -> Result<(), AuctionError>;
}

/// Durable store: a single JSON file, read-modify-write.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<AuctionState, AuctionError> {
        if !self.path.exists() {
            return Ok(AuctionState::default());
        }
        let json =
            fs::read_to_string(&self.path).map_err(|e| AuctionError::Storage(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| AuctionError::Storage(e.to_string()))
    }

    fn save(&self, state: &AuctionState) -> Result<(), AuctionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AuctionError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| AuctionError::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| AuctionError::Storage(e.to_string()))
    }
}

/// In-memory fake for tests.
#[derive(Default)]
pub struct InMemoryStore {
    state: RefCell<AuctionState>,
}

impl Store for InMemoryStore {
    fn load(&self) -> Result<AuctionState, AuctionError> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &AuctionState) -> Result<(), AuctionError> {
        *self.state.borrow_mut() = state.clone();
        Ok(())
    }
}
