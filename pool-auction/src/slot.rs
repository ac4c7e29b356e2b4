//! Slot-based auction core (spec §4.G). Slots are hourly wall-clock buckets;
//! each slot runs a strictly-increasing highest-bid auction that settles
//! once the slot has closed, publishing the winner's content through a
//! [`BroadcastClient`] and only then spending its nullifier.

use std::collections::HashMap;

use pool_core::{Field, NullifierRegistry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::broadcast::{BroadcastClient, PublishReceipt};
use crate::error::AuctionError;

pub const SLOT_SECONDS: u64 = 3600;
pub const MAX_CONTENT_BYTES: usize = 320;
pub const MAX_IMAGES: usize = 2;

/// `slotId = floor(now / 3600)`.
pub fn current_slot(now: u64) -> u64 {
    now / SLOT_SECONDS
}

/// One bid submitted against a slot. `proof`/`public_inputs` stand in for
/// the Groth16/UltraHonk proof the witness assembler produced; the auction
/// core only checks that `public_inputs` exactly binds `nullifier_hash` and
/// `amount`, never the proof's internal validity (that belongs to the
/// verifier, out of scope here).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bid {
    /// Primary key of the *bids* table (spec §6): the `slots` table only
    /// ever stores this id as `winningBidId`, never an embedded copy of the
    /// bid itself.
    pub id: Uuid,
    pub slot_id: u64,
    pub amount: u128,
    pub content: Vec<u8>,
    pub images: usize,
    pub proof: Vec<u8>,
    pub public_inputs: Vec<Field>,
    pub nullifier_hash: Field,
    /// Opaque per spec §9 Open Question: this engine never inspects it,
    /// only stores and forwards it in the settlement receipt.
    pub claim_commitment: Field,
}

impl Bid {
    fn validate_shape(&self) -> Result<(), AuctionError> {
        if self.content.len() > MAX_CONTENT_BYTES {
            return Err(AuctionError::ContentTooLong(self.content.len()));
        }
        if self.images > MAX_IMAGES {
            return Err(AuctionError::TooManyImages(self.images));
        }
        Ok(())
    }

    fn binds_public_inputs(&self) -> bool {
        self.public_inputs.contains(&self.nullifier_hash)
            && self.public_inputs.contains(&Field::from_u128(self.amount))
    }
}

/// State of one hourly slot (spec §6's *slots* table: `slotId`, high bid,
/// `settled`, publish receipt — `high_bid` plays the role of `winningBidId`
/// at runtime, with the full record also mirrored into `AuctionCore`'s
/// `bids` table by id for the persisted schema).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuctionSlot {
    pub high_bid: Option<Bid>,
    pub settled: bool,
    pub receipt: Option<PublishReceipt>,
}

impl AuctionSlot {
    /// `winningBidId` per spec §6's *slots* table.
    pub fn winning_bid_id(&self) -> Option<Uuid> {
        self.high_bid.as_ref().map(|b| b.id)
    }
}

/// Whether a given merkle root is acceptable for a bid's proof. Kept as a
/// trait instead of depending on `pool-wallet` directly — whatever holds
/// the accumulator mirror (the wallet engine, a chain-mirror adapter)
/// implements this.
pub trait RootOracle {
    fn is_known_root(&self, root: Field) -> bool;
}

impl RootOracle for pool_core::MerkleAccumulator {
    fn is_known_root(&self, root: Field) -> bool {
        self.is_known_root(&root)
    }
}

/// Outcome of a `settle` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Slot had no bid; marked settled with no broadcast or nullifier spend.
    NoOp,
    Settled(PublishReceipt),
    /// `settle` was called again on an already-settled slot.
    AlreadySettled,
}

/// The auction core: one table of per-slot state plus the nullifier
/// registry settlement spends into. Mirrors the same on-chain nullifier set
/// `pool-wallet`'s spends draw from, but tracked independently here since
/// this crate has no dependency on the wallet engine.
#[derive(Default)]
pub struct AuctionCore {
    slots: HashMap<u64, AuctionSlot>,
    nullifiers: NullifierRegistry,
    /// Every accepted bid, keyed by its id — the *bids* table of spec §6.
    /// Rejected bids never reach here (no state effect).
    bids: HashMap<Uuid, Bid>,
}

impl AuctionCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, slot_id: u64) -> Option<&AuctionSlot> {
        self.slots.get(&slot_id)
    }

    /// Look up a previously accepted bid by id (spec §6's *bids* table).
    pub fn bid(&self, id: Uuid) -> Option<&Bid> {
        self.bids.get(&id)
    }

    /// Snapshot for persistence (see [`crate::storage`]).
    pub fn to_state(&self) -> crate::storage::AuctionState {
        crate::storage::AuctionState {
            slots: self.slots.clone(),
            spent_nullifiers: self.nullifiers.iter().copied().collect(),
            bids: self.bids.clone(),
        }
    }

    /// Rebuild from a persisted snapshot.
    pub fn from_state(state: crate::storage::AuctionState) -> Result<Self, AuctionError> {
        let mut nullifiers = NullifierRegistry::new();
        for nh in state.spent_nullifiers {
            nullifiers.insert(nh)?;
        }
        Ok(Self {
            slots: state.slots,
            nullifiers,
            bids: state.bids,
        })
    }

    /// Submit a bid against `bid.slot_id`. Accepts iff every spec §4.G
    /// condition holds; rejected bids have no state effect.
    pub fn submit_bid(
        &mut self,
        now: u64,
        bid: Bid,
        merkle_root: Field,
        oracle: &impl RootOracle,
    ) -> Result<(), AuctionError> {
        bid.validate_shape()?;

        let current = current_slot(now);
        if bid.slot_id != current {
            return Err(AuctionError::WrongSlot {
                bid_slot: bid.slot_id,
                current_slot: current,
            });
        }

        let current_highest = self
            .slots
            .get(&bid.slot_id)
            .and_then(|slot| slot.high_bid.as_ref())
            .map(|b| b.amount)
            .unwrap_or(0);
        if bid.amount <= current_highest {
            return Err(AuctionError::BidTooLow {
                amount: bid.amount,
                current_highest,
            });
        }

        if self.nullifiers.has(&bid.nullifier_hash) {
            return Err(AuctionError::NullifierAlreadyUsed);
        }

        if !bid.binds_public_inputs() {
            return Err(AuctionError::ProofMismatch);
        }

        if !oracle.is_known_root(merkle_root) {
            return Err(AuctionError::UnknownRoot);
        }

        self.bids.insert(bid.id, bid.clone());
        let slot = self.slots.entry(bid.slot_id).or_default();
        slot.high_bid = Some(bid);
        Ok(())
    }

    /// Settle `slot_id` once it has closed (`slot_id < currentSlot()`).
    /// Idempotent: re-settling an already-settled slot returns
    /// `AlreadySettled` without touching the nullifier registry again.
    pub fn settle(
        &mut self,
        now: u64,
        slot_id: u64,
        broadcaster: &impl BroadcastClient,
    ) -> Result<SettleOutcome, AuctionError> {
        let current = current_slot(now);
        if slot_id >= current {
            return Err(AuctionError::SlotNotYetClosed(slot_id));
        }

        let slot = self.slots.entry(slot_id).or_default();
        if slot.settled {
            return Ok(SettleOutcome::AlreadySettled);
        }

        let Some(bid) = slot.high_bid.clone() else {
            slot.settled = true;
            return Ok(SettleOutcome::NoOp);
        };

        let receipt = broadcaster
            .cast(&bid)
            .map_err(|e| AuctionError::BroadcastFailed(e.to_string()))?;
        self.nullifiers.insert(bid.nullifier_hash)?;

        let slot = self.slots.entry(slot_id).or_default();
        slot.settled = true;
        slot.receipt = Some(receipt.clone());

        tracing::info!(slot_id, receipt_id = %receipt.receipt_id, "slot settled");
        Ok(SettleOutcome::Settled(receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::FakeBroadcastClient;

    fn sample_bid(slot_id: u64, amount: u128, nullifier: u128) -> Bid {
        let nullifier_hash = Field::from_u128(nullifier);
        Bid {
            id: Uuid::new_v4(),
            slot_id,
            amount,
            content: b"gm".to_vec(),
            images: 0,
            proof: vec![],
            public_inputs: vec![nullifier_hash, Field::from_u128(amount)],
            nullifier_hash,
            claim_commitment: Field::from_u128(999),
        }
    }

    struct AlwaysKnown;
    impl RootOracle for AlwaysKnown {
        fn is_known_root(&self, _root: Field) -> bool {
            true
        }
    }
    struct NeverKnown;
    impl RootOracle for NeverKnown {
        fn is_known_root(&self, _root: Field) -> bool {
            false
        }
    }

    #[test]
    fn slot_id_is_hourly_bucket() {
        assert_eq!(current_slot(0), 0);
        assert_eq!(current_slot(3599), 0);
        assert_eq!(current_slot(3600), 1);
    }

    #[test]
    fn higher_bid_replaces_lower() {
        let mut core = AuctionCore::new();
        core.submit_bid(0, sample_bid(0, 100, 1), Field::zero(), &AlwaysKnown)
            .unwrap();
        core.submit_bid(0, sample_bid(0, 200, 2), Field::zero(), &AlwaysKnown)
            .unwrap();
        assert_eq!(core.slot(0).unwrap().high_bid.as_ref().unwrap().amount, 200);
    }

    #[test]
    fn accepted_bids_land_in_the_bids_table_by_id() {
        let mut core = AuctionCore::new();
        let losing = sample_bid(0, 100, 1);
        let losing_id = losing.id;
        core.submit_bid(0, losing, Field::zero(), &AlwaysKnown).unwrap();
        let winning = sample_bid(0, 200, 2);
        let winning_id = winning.id;
        core.submit_bid(0, winning, Field::zero(), &AlwaysKnown).unwrap();

        // Both the losing and winning bids are retained in the bids table...
        assert_eq!(core.bid(losing_id).unwrap().amount, 100);
        assert_eq!(core.bid(winning_id).unwrap().amount, 200);
        // ...but only the current high bid is the slot's `winningBidId`.
        assert_eq!(core.slot(0).unwrap().winning_bid_id(), Some(winning_id));
    }

    #[test]
    fn rejected_bid_never_enters_the_bids_table() {
        let mut core = AuctionCore::new();
        core.submit_bid(0, sample_bid(0, 100, 1), Field::zero(), &AlwaysKnown)
            .unwrap();
        let rejected = sample_bid(0, 50, 2);
        let rejected_id = rejected.id;
        let result = core.submit_bid(0, rejected, Field::zero(), &AlwaysKnown);
        assert!(result.is_err());
        assert!(core.bid(rejected_id).is_none());
    }

    #[test]
    fn equal_or_lower_bid_is_rejected_without_side_effects() {
        let mut core = AuctionCore::new();
        core.submit_bid(0, sample_bid(0, 100, 1), Field::zero(), &AlwaysKnown)
            .unwrap();
        let result = core.submit_bid(0, sample_bid(0, 100, 2), Field::zero(), &AlwaysKnown);
        assert!(matches!(result, Err(AuctionError::BidTooLow { .. })));
        assert_eq!(core.slot(0).unwrap().high_bid.as_ref().unwrap().amount, 100);
    }

    #[test]
    fn wrong_slot_is_rejected() {
        let mut core = AuctionCore::new();
        let result = core.submit_bid(3600, sample_bid(0, 100, 1), Field::zero(), &AlwaysKnown);
        assert!(matches!(result, Err(AuctionError::WrongSlot { .. })));
    }

    #[test]
    fn unknown_root_is_rejected() {
        let mut core = AuctionCore::new();
        let result = core.submit_bid(0, sample_bid(0, 100, 1), Field::zero(), &NeverKnown);
        assert!(matches!(result, Err(AuctionError::UnknownRoot)));
    }

    #[test]
    fn mismatched_public_inputs_are_rejected() {
        let mut core = AuctionCore::new();
        let mut bid = sample_bid(0, 100, 1);
        bid.public_inputs = vec![Field::from_u128(999)];
        let result = core.submit_bid(0, bid, Field::zero(), &AlwaysKnown);
        assert!(matches!(result, Err(AuctionError::ProofMismatch)));
    }

    #[test]
    fn settle_requires_closed_slot() {
        let mut core = AuctionCore::new();
        core.submit_bid(0, sample_bid(0, 100, 1), Field::zero(), &AlwaysKnown)
            .unwrap();
        let result = core.settle(100, 0, &FakeBroadcastClient);
        assert!(matches!(result, Err(AuctionError::SlotNotYetClosed(0))));
    }

    #[test]
    fn settle_casts_winner_and_spends_nullifier() {
        let mut core = AuctionCore::new();
        core.submit_bid(0, sample_bid(0, 100, 1), Field::zero(), &AlwaysKnown)
            .unwrap();
        let outcome = core.settle(SLOT_SECONDS, 0, &FakeBroadcastClient).unwrap();
        assert!(matches!(outcome, SettleOutcome::Settled(_)));
        assert!(core.slot(0).unwrap().settled);

        // The nullifier is now spent; this same bid could not be resubmitted
        // in a future slot.
        let mut core2_bid = sample_bid(1, 50, 1);
        core2_bid.slot_id = 1;
        let rejected = core.submit_bid(SLOT_SECONDS, core2_bid, Field::zero(), &AlwaysKnown);
        assert!(matches!(rejected, Err(AuctionError::NullifierAlreadyUsed)));
    }

    #[test]
    fn settle_on_empty_slot_is_a_marked_noop() {
        let mut core = AuctionCore::new();
        let outcome = core.settle(SLOT_SECONDS, 0, &FakeBroadcastClient).unwrap();
        assert_eq!(outcome, SettleOutcome::NoOp);
        assert!(core.slot(0).unwrap().settled);
    }

    #[test]
    fn resettling_is_idempotent() {
        let mut core = AuctionCore::new();
        core.submit_bid(0, sample_bid(0, 100, 1), Field::zero(), &AlwaysKnown)
            .unwrap();
        core.settle(SLOT_SECONDS, 0, &FakeBroadcastClient).unwrap();
        let second = core.settle(SLOT_SECONDS, 0, &FakeBroadcastClient).unwrap();
        assert_eq!(second, SettleOutcome::AlreadySettled);
    }

    #[test]
    fn oversized_content_is_rejected() {
        let mut core = AuctionCore::new();
        let mut bid = sample_bid(0, 100, 1);
        bid.content = vec![0u8; MAX_CONTENT_BYTES + 1];
        let result = core.submit_bid(0, bid, Field::zero(), &AlwaysKnown);
        assert!(matches!(result, Err(AuctionError::ContentTooLong(_))));
    }
}
