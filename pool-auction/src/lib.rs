//! Slot-based auction core: bid submission, settlement, and the handoff to
//! an external broadcast collaborator (spec §4.G).

pub mod broadcast;
pub mod error;
pub mod slot;
pub mod storage;

pub use broadcast::{BroadcastClient, FakeBroadcastClient, PublishReceipt};
pub use error::AuctionError;
pub use slot::{
    current_slot, AuctionCore, AuctionSlot, Bid, RootOracle, SettleOutcome, MAX_CONTENT_BYTES,
    MAX_IMAGES, SLOT_SECONDS,
};
pub use storage::{AuctionState, InMemoryStore, JsonFileStore, Store};
