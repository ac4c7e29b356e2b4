//! A locally-persisted stand-in for the chain this engine normally mirrors.
//!
//! Real RPC transport is explicitly out of scope (spec Non-goals), so the
//! only `ChainMirror` this binary can offer is one backed by a JSON file the
//! operator's own commands append to — a deposit recorded here is exactly
//! the event a real indexer would have produced by watching the pool
//! contract. Swapping this out for an RPC-backed mirror is the integration
//! point left to whoever deploys this against a real chain.

use std::fs;
use std::path::{Path, PathBuf};

use pool_core::Field;
use pool_wallet::{ChainEvent, ChainMirror, EngineError};

pub struct LocalLedger {
    path: PathBuf,
    events: Vec<ChainEvent>,
}

impl LocalLedger {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let events = if path.exists() {
            let json = fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            Vec::new()
        };
        Ok(Self { path, events })
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.events)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// One past the highest leaf index any recorded event has claimed.
    pub fn next_leaf_index(&self) -> u32 {
        self.events
            .iter()
            .flat_map(|e| e.new_leaves())
            .map(|(_, _, idx)| idx + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn record_deposit(
        &mut self,
        commitment: Field,
        amount: u128,
        timestamp: u64,
    ) -> anyhow::Result<u32> {
        let leaf_index = self.next_leaf_index();
        self.events.push(ChainEvent::Deposit {
            commitment,
            amount,
            leaf_index,
            timestamp,
        });
        self.save()?;
        Ok(leaf_index)
    }

    pub fn record_withdrawal(
        &mut self,
        nullifier_hash: Field,
        recipient: Field,
        amount: u128,
    ) -> anyhow::Result<()> {
        self.events.push(ChainEvent::Withdrawal {
            nullifier_hash,
            recipient,
            amount,
        });
        self.save()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn record_transfer(
        &mut self,
        nullifier_hash: Field,
        out_commitment: Field,
        out_amount: u128,
        change_commitment: Field,
        change_amount: u128,
        timestamp: u64,
    ) -> anyhow::Result<(u32, u32)> {
        let out_leaf_index = self.next_leaf_index();
        let change_leaf_index = out_leaf_index + 1;
        self.events.push(ChainEvent::Transfer {
            nullifier_hash,
            out_commitment,
            out_amount,
            out_leaf_index,
            change_commitment,
            change_amount,
            change_leaf_index,
            timestamp,
        });
        self.save()?;
        Ok((out_leaf_index, change_leaf_index))
    }

    pub fn record_consolidation(
        &mut self,
        nullifier_hashes: Vec<Field>,
        new_commitment: Field,
        total_amount: u128,
        timestamp: u64,
    ) -> anyhow::Result<u32> {
        let leaf_index = self.next_leaf_index();
        self.events.push(ChainEvent::Consolidation {
            nullifier_hashes,
            new_commitment,
            total_amount,
            leaf_index,
            timestamp,
        });
        self.save()?;
        Ok(leaf_index)
    }

    pub fn default_path(config_root: &Path) -> PathBuf {
        config_root.join("ledger.json")
    }
}

impl ChainMirror for LocalLedger {
    fn events_since(&self, from_leaf: u32) -> Result<Vec<ChainEvent>, EngineError> {
        Ok(self
            .events
            .iter()
            .filter(|event| {
                let leaves = event.new_leaves();
                leaves.is_empty() || leaves.iter().any(|(_, _, idx)| *idx >= from_leaf)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposits_get_sequential_leaf_indices() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = LocalLedger::open(dir.path().join("ledger.json")).unwrap();
        let a = ledger
            .record_deposit(Field::from_u128(1), 100, 0)
            .unwrap();
        let b = ledger
            .record_deposit(Field::from_u128(2), 200, 0)
            .unwrap();
        assert_eq!(a, 0);
        assert_eq!(b, 1);
    }

    #[test]
    fn reopening_reloads_persisted_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        {
            let mut ledger = LocalLedger::open(path.clone()).unwrap();
            ledger
                .record_deposit(Field::from_u128(1), 100, 0)
                .unwrap();
        }
        let reopened = LocalLedger::open(path).unwrap();
        assert_eq!(reopened.next_leaf_index(), 1);
        assert_eq!(reopened.events_since(0).unwrap().len(), 1);
    }
}
