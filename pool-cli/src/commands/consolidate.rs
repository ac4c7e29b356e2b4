//! Merge two or more owned notes into a single new note (spec §4.E
//! consolidate). Takes the notes' commitments (as shown by `pool notes`).

use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;

use pool_core::{Field, Spend};
use pool_wallet::{FakeProver, Prover};

use crate::ledger::LocalLedger;
use crate::session;

pub fn run(commitments: Vec<String>) -> Result<()> {
    let commitments: Vec<Field> = commitments
        .iter()
        .map(|s| Field::from_str(s).context("each commitment must be a hex field element"))
        .collect::<Result<_>>()?;

    let cfg = session::config()?;
    let mut wallet = session::open_unlocked(&cfg)?;
    wallet.sync()?;

    let spend = wallet.prepare_consolidate(&commitments)?;
    let Spend::Consolidate(_, ref pub_in) = spend else {
        unreachable!("prepare_consolidate always returns Spend::Consolidate")
    };

    let prover = FakeProver;
    let proof = prover.prove(&spend)?;

    let nullifier_hashes: Vec<Field> = pub_in.per_input.iter().map(|i| i.nullifier_hash).collect();

    let mut ledger = LocalLedger::open(LocalLedger::default_path(cfg.root()))?;
    ledger.record_consolidation(
        nullifier_hashes,
        pub_in.new_commitment,
        pub_in.total_amount,
        crate::commands::now_secs(),
    )?;

    wallet.sync()?;

    println!("{}", "Consolidation proved and submitted.".green().bold());
    println!("  inputs merged:  {}", pub_in.per_input.len());
    println!("  new commitment: {}", pub_in.new_commitment.to_hex_short());
    println!("  total amount:   {}", pub_in.total_amount);
    println!("  proof:          {} bytes ({})", proof.len(), hex::encode(&proof).dimmed());

    Ok(())
}
