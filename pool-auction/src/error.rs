use thiserror::Error;

/// Errors the auction core can raise (spec §4.G, §7).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error(transparent)]
    Core(#[from] pool_core::CoreError),

    #[error("bid slot {bid_slot} does not match the current slot {current_slot}")]
    WrongSlot { bid_slot: u64, current_slot: u64 },

    #[error("bid amount {amount} does not exceed the current high bid {current_highest}")]
    BidTooLow { amount: u128, current_highest: u128 },

    #[error("bid nullifier has already been used")]
    NullifierAlreadyUsed,

    #[error("bid's proof public inputs do not exactly bind its nullifierHash and amount")]
    ProofMismatch,

    #[error("bid's merkle root is not known to the root oracle")]
    UnknownRoot,

    #[error("bid content exceeds 320 bytes ({0} given)")]
    ContentTooLong(usize),

    #[error("bid carries {0} images, at most 2 are allowed")]
    TooManyImages(usize),

    #[error("slot {0} has not closed yet")]
    SlotNotYetClosed(u64),

    #[error("broadcast collaborator rejected the cast: {0}")]
    BroadcastFailed(String),

    #[error("storage error: {0}")]
    Storage(String),
}
