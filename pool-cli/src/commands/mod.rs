//! Subcommand implementations. Each module owns one `clap::Subcommand`
//! variant's behavior, mirroring the one-file-per-command layout of the
//! teacher's `cli/src/commands/*.rs`.

pub mod auction;
pub mod balance;
pub mod consolidate;
pub mod deposit;
pub mod info;
pub mod keygen;
pub mod notes;
pub mod receive;
pub mod sync;
pub mod transfer;
pub mod withdraw;

/// Current wall-clock time in seconds. The only place this binary calls
/// `std::time::SystemTime` — every library crate takes `now` as a plain
/// `u64` parameter instead, so tests stay deterministic.
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is before the epoch")
        .as_secs()
}
