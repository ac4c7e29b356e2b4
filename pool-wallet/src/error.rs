use thiserror::Error;

/// Caller-facing error type for the wallet engine (spec §4.F/§4.H). Wraps
/// `pool_core::CoreError` for anything that bubbles up from note algebra,
/// the accumulator mirror, or witness assembly, and adds the errors that
/// only make sense once I/O and chain state enter the picture.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] pool_core::CoreError),

    #[error("wallet is locked; call unlock() first")]
    Locked,

    #[error("seed unlock failed: wrong password, corrupted key file, or malformed signature")]
    UnlockFailed,

    #[error("no single note covers {requested}; largest available is {largest:?}")]
    NoSuitableNote {
        requested: u128,
        largest: Option<u128>,
    },

    #[error("note {0} is not owned by this wallet (already pending or spent)")]
    NoteNotOwned(String),

    #[error("prover timed out")]
    ProverTimeout,

    #[error("prover rejected the witness: {0}")]
    ProofFailed(String),

    #[error("chain mirror error: {0}")]
    ChainMirror(String),

    #[error("storage error: {0}")]
    Storage(String),
}
