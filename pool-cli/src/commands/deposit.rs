//! Mint a note for this wallet and record its commitment on the local
//! ledger, standing in for "send a deposit transaction and wait for the
//! indexer to pick it up" (spec §1's data flow: "deposits append leaves to
//! [the accumulator], fire an event consumed by [the wallet]"). Real RPC
//! submission is out of scope; this binary's `LocalLedger` plays the role
//! of the chain mirror a deployed wallet would watch instead.

use anyhow::{bail, Result};
use colored::Colorize;

use pool_core::commitment_of;

use crate::commands::now_secs;
use crate::ledger::LocalLedger;
use crate::session;

pub fn run(amount: u128) -> Result<()> {
    if amount == 0 {
        bail!("amount must be greater than 0");
    }

    let cfg = session::config()?;
    let wallet = session::open_unlocked(&cfg)?;

    let (secret, nullifier) = wallet.peek_next_candidate()?;
    let commitment = commitment_of(&secret, &nullifier, amount);

    let mut ledger = LocalLedger::open(LocalLedger::default_path(cfg.root()))?;
    let leaf_index = ledger.record_deposit(commitment, amount, now_secs())?;

    println!("{}", "Deposit recorded on the local ledger.".green().bold());
    println!("  commitment: {}", commitment.to_hex_short().cyan());
    println!("  leaf index: {leaf_index}");
    println!();
    println!(
        "{}",
        "Run `pool sync` to have the wallet recognize it as an owned note.".dimmed()
    );

    Ok(())
}
