//! `ChainMirror` — the wallet engine's view of the chain (spec §5, §4.H).
//!
//! The engine never talks to a node directly; it asks a `ChainMirror` for
//! events since a given leaf index, in leaf order, and treats the result as
//! authoritative. Swapping the implementation (an RPC-backed mirror in
//! production, a scripted fake in tests) doesn't change anything above this
//! trait.

use std::cell::RefCell;

use pool_core::Field;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One on-chain event that moves the public ledger tables forward (spec §6).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainEvent {
    Deposit {
        commitment: Field,
        amount: u128,
        leaf_index: u32,
        timestamp: u64,
    },
    Withdrawal {
        nullifier_hash: Field,
        recipient: Field,
        amount: u128,
    },
    Transfer {
        nullifier_hash: Field,
        out_commitment: Field,
        out_amount: u128,
        out_leaf_index: u32,
        change_commitment: Field,
        change_amount: u128,
        change_leaf_index: u32,
        timestamp: u64,
    },
    Consolidation {
        nullifier_hashes: Vec<Field>,
        new_commitment: Field,
        total_amount: u128,
        leaf_index: u32,
        timestamp: u64,
    },
}

impl ChainEvent {
    /// `(commitment, amount, leaf_index)` triples this event newly commits
    /// to the accumulator, in ascending leaf order. A deposit contributes
    /// one; a transfer two (out, then change); a consolidation one.
    pub fn new_leaves(&self) -> Vec<(Field, u128, u32)> {
        match self {
            ChainEvent::Deposit {
                commitment,
                amount,
                leaf_index,
                ..
            } => vec![(*commitment, *amount, *leaf_index)],
            ChainEvent::Withdrawal { .. } => Vec::new(),
            ChainEvent::Transfer {
                out_commitment,
                out_amount,
                out_leaf_index,
                change_commitment,
                change_amount,
                change_leaf_index,
                ..
            } => {
                let mut legs = vec![(*out_commitment, *out_amount, *out_leaf_index)];
                legs.push((*change_commitment, *change_amount, *change_leaf_index));
                legs.sort_by_key(|(_, _, idx)| *idx);
                legs
            }
            ChainEvent::Consolidation {
                new_commitment,
                total_amount,
                leaf_index,
                ..
            } => vec![(*new_commitment, *total_amount, *leaf_index)],
        }
    }

    /// Nullifier hashes this event spends, if any.
    pub fn spent_nullifiers(&self) -> Vec<Field> {
        match self {
            ChainEvent::Deposit { .. } => Vec::new(),
            ChainEvent::Withdrawal { nullifier_hash, .. } => vec![*nullifier_hash],
            ChainEvent::Transfer { nullifier_hash, .. } => vec![*nullifier_hash],
            ChainEvent::Consolidation {
                nullifier_hashes, ..
            } => nullifier_hashes.clone(),
        }
    }
}

pub trait ChainMirror {
    /// All events whose leaf-producing effects landed at or after
    /// `from_leaf`, in ascending leaf order. Must be safe to call with the
    /// same `from_leaf` repeatedly (idempotent replay, spec §4.H).
    fn events_since(&self, from_leaf: u32) -> Result<Vec<ChainEvent>, EngineError>;
}

/// Scripted `ChainMirror` for tests: a fixed event log, optionally sliced.
/// Events live behind a `RefCell` so a test can simulate a reorg by
/// replacing the log out from under an already-open `Wallet` (which holds
/// this mirror by value, not by reference).
pub struct FakeChainMirror {
    events: RefCell<Vec<ChainEvent>>,
}

impl FakeChainMirror {
    pub fn new(events: Vec<ChainEvent>) -> Self {
        Self {
            events: RefCell::new(events),
        }
    }

    /// Discard the current event log and install a new one, as if the chain
    /// had rolled back and replayed a different history (spec §4.H, S6).
    pub fn replace_events(&self, events: Vec<ChainEvent>) {
        *self.events.borrow_mut() = events;
    }
}

impl ChainMirror for FakeChainMirror {
    fn events_since(&self, from_leaf: u32) -> Result<Vec<ChainEvent>, EngineError> {
        Ok(self
            .events
            .borrow()
            .iter()
            .filter(|event| {
                event
                    .new_leaves()
                    .iter()
                    .any(|(_, _, idx)| *idx >= from_leaf)
                    || event.new_leaves().is_empty()
            })
            .cloned()
            .collect())
    }
}

/// Lets a test hold a `FakeChainMirror` by reference (so it can call
/// `replace_events` on it between `sync` calls) while still handing `Wallet`
/// something that satisfies `ChainMirror` by value.
impl ChainMirror for &FakeChainMirror {
    fn events_since(&self, from_leaf: u32) -> Result<Vec<ChainEvent>, EngineError> {
        (**self).events_since(from_leaf)
    }
}
