//! Slot-based auction commands (spec §4.G): submit a bid proving ownership
//! of an owned note, settle a closed slot, and inspect slot state.
//!
//! A bid's proof isn't one of the three spend variants `pool-core::witness`
//! assembles — spec §4.G only requires that its public inputs bind
//! `nullifierHash` and `amount` exactly, and leaves the rest of the witness
//! shape to the circuit (out of scope here, spec §1). This binary builds
//! the minimal public-input pair the core's `submit_bid` checks and proves
//! it with the same "hash the public inputs" stand-in `FakeProver` uses,
//! rather than stretching `assemble_withdraw` over a shape it doesn't fit
//! (a bid amount need not equal the note's amount, so the non-partial-
//! withdraw invariant doesn't apply). See DESIGN.md.

use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;
use sha3::{Digest, Keccak256};

use pool_auction::{current_slot, Bid, FakeBroadcastClient, RootOracle, SettleOutcome};
use pool_core::Field;
use pool_wallet::Wallet;

use crate::commands::now_secs;
use crate::ledger::LocalLedger;
use pool_wallet::JsonFileStore;
use crate::session;

/// Adapts a locked-or-unlocked wallet's accumulator mirror to
/// `pool_auction::RootOracle` without `pool-auction` depending on
/// `pool-wallet`.
struct WalletRootOracle<'a>(&'a Wallet<LocalLedger, JsonFileStore>);

impl RootOracle for WalletRootOracle<'_> {
    fn is_known_root(&self, root: Field) -> bool {
        self.0.is_known_root(&root)
    }
}

pub fn bid(commitment: String, amount: u128, content: String, claim_commitment: Option<String>) -> Result<()> {
    let commitment = Field::from_str(&commitment).context("commitment must be a hex field element")?;
    let claim_commitment = match claim_commitment {
        Some(s) => Field::from_str(&s).context("--claim-commitment must be a hex field element")?,
        None => Field::zero(),
    };

    let cfg = session::config()?;
    let mut wallet = session::open_unlocked(&cfg)?;
    wallet.sync()?;

    let note = wallet
        .owned_notes()
        .into_iter()
        .find(|n| n.commitment() == commitment)
        .context("no owned note with that commitment; run `pool notes`")?;
    let nullifier_hash = note.nullifier_hash();

    let root = wallet.current_root();
    let now = now_secs();
    let slot_id = current_slot(now);
    let public_inputs = vec![nullifier_hash, Field::from_u128(amount)];

    let mut hasher = Keccak256::new();
    for field in &public_inputs {
        hasher.update(field.to_bytes_be());
    }
    let proof = hasher.finalize().to_vec();

    let bid = Bid {
        id: uuid::Uuid::new_v4(),
        slot_id,
        amount,
        content: content.into_bytes(),
        images: 0,
        proof,
        public_inputs,
        nullifier_hash,
        claim_commitment,
    };

    let (mut core, store) = session::open_auction(&cfg)?;
    core.submit_bid(now, bid, root, &WalletRootOracle(&wallet))?;
    session::save_auction(&store, &core)?;

    println!("{}", "Bid accepted.".green().bold());
    println!("  slot:           {slot_id}");
    println!("  amount:         {amount}");
    println!("  nullifier hash: {}", nullifier_hash.to_hex_short());

    Ok(())
}

pub fn settle(slot_id: u64) -> Result<()> {
    let cfg = session::config()?;
    let now = now_secs();
    let (mut core, store) = session::open_auction(&cfg)?;

    let outcome = core.settle(now, slot_id, &FakeBroadcastClient)?;
    session::save_auction(&store, &core)?;

    match outcome {
        SettleOutcome::NoOp => println!("{}", format!("Slot {slot_id} had no bids; marked settled.").yellow()),
        SettleOutcome::AlreadySettled => println!("{}", format!("Slot {slot_id} was already settled.").dimmed()),
        SettleOutcome::Settled(receipt) => {
            println!("{}", format!("Slot {slot_id} settled.").green().bold());
            println!("  receipt id: {}", receipt.receipt_id);
        }
    }

    Ok(())
}

pub fn status(slot_id: Option<u64>) -> Result<()> {
    let cfg = session::config()?;
    let (core, _store) = session::open_auction(&cfg)?;
    let state = core.to_state();

    let ids: Vec<u64> = match slot_id {
        Some(id) => vec![id],
        None => {
            let mut ids: Vec<u64> = state.slots.keys().copied().collect();
            ids.sort_unstable();
            ids
        }
    };

    if ids.is_empty() {
        println!("{}", "No slots recorded yet.".yellow());
        return Ok(());
    }

    for id in ids {
        let Some(slot) = state.slots.get(&id) else {
            println!("slot {id}: {}", "no bids".dimmed());
            continue;
        };
        let current = current_slot(now_secs());
        let open = id == current;
        print!("slot {id}{}: ", if open { " (open)".cyan().to_string() } else { String::new() });
        match &slot.high_bid {
            Some(bid) => print!("high bid {} (id {}) ", bid.amount, bid.id),
            None => print!("no bids "),
        }
        println!(
            "settled={} receipt={:?}",
            slot.settled,
            slot.receipt.as_ref().map(|r| &r.receipt_id)
        );
    }

    Ok(())
}
