//! `BroadcastClient` — the "external broadcast collaborator" §4.G's
//! `settle` hands a slot's winning bid to. The upstream project this spec
//! was distilled from is `anoncast`, a note-gated anonymous casting system,
//! which is why a settled bid's content is "cast" rather than "published"
//! or "posted" here — but no HTTP framing or transport belongs in this
//! crate (spec Non-goals exclude the network/social layer), so this stays a
//! trait boundary with a deterministic fake.

use sha3::{Digest, Keccak256};

use crate::error::AuctionError;
use crate::slot::Bid;

/// Receipt recorded once a bid's content has been cast.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PublishReceipt {
    /// Opaque identifier the broadcast collaborator assigned the cast
    /// (a post id, a content hash, whatever that system uses to name it).
    pub receipt_id: String,
    pub slot_id: u64,
}

pub trait BroadcastClient {
    /// Cast a settled slot's winning bid. Must be idempotent from the
    /// auction core's point of view: `settle` only calls this once per
    /// slot, but a retried `settle` after a crash mid-call may cast twice —
    /// that's a collaborator-side concern, not this trait's.
    fn cast(&self, bid: &Bid) -> Result<PublishReceipt, AuctionError>;
}

/// Deterministic fake for tests and local development: derives a
/// `receipt_id` from the bid's content and nullifier hash instead of
/// calling out anywhere.
pub struct FakeBroadcastClient;

impl BroadcastClient for FakeBroadcastClient {
    fn cast(&self, bid: &Bid) -> Result<PublishReceipt, AuctionError> {
        let mut hasher = Keccak256::new();
        hasher.update(&bid.content);
        hasher.update(bid.nullifier_hash.to_bytes_be());
        let digest = hasher.finalize();
        Ok(PublishReceipt {
            receipt_id: hex::encode(digest),
            slot_id: bid.slot_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_core::Field;

    fn sample_bid() -> Bid {
        Bid {
            slot_id: 1,
            amount: 100,
            content: b"hello".to_vec(),
            images: 0,
            proof: vec![],
            public_inputs: vec![Field::from_u128(1), Field::from_u128(100)],
            nullifier_hash: Field::from_u128(1),
            claim_commitment: Field::from_u128(2),
        }
    }

    #[test]
    fn cast_is_deterministic() {
        let client = FakeBroadcastClient;
        let bid = sample_bid();
        let a = client.cast(&bid).unwrap();
        let b = client.cast(&bid).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_content_diverges() {
        let client = FakeBroadcastClient;
        let mut bid = sample_bid();
        let a = client.cast(&bid).unwrap();
        bid.content = b"goodbye".to_vec();
        let b = client.cast(&bid).unwrap();
        assert_ne!(a.receipt_id, b.receipt_id);
    }
}
