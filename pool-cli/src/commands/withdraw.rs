//! Build a withdraw spend (spec §4.E), hand its witness to the prover
//! oracle, then record the resulting `Withdrawal` event on the local ledger
//! as if it had landed on-chain, and resync so the spent note is marked
//! `Spent` (spec §4.F note lifecycle).

use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;

use pool_core::{Field, Spend};
use pool_wallet::{FakeProver, Prover};

use crate::ledger::LocalLedger;
use crate::session;

pub fn run(amount: u128, recipient: String) -> Result<()> {
    let recipient = Field::from_str(&recipient).context("recipient must be a hex field element")?;

    let cfg = session::config()?;
    let mut wallet = session::open_unlocked(&cfg)?;
    wallet.sync()?;

    let spend = wallet.prepare_withdraw(amount, recipient)?;
    let Spend::Withdraw(_, ref pub_in) = spend else {
        unreachable!("prepare_withdraw always returns Spend::Withdraw")
    };

    let prover = FakeProver;
    let proof = prover.prove(&spend)?;

    let mut ledger = LocalLedger::open(LocalLedger::default_path(cfg.root()))?;
    ledger.record_withdrawal(pub_in.nullifier_hash, pub_in.recipient, pub_in.withdraw_amount)?;

    wallet.sync()?;

    println!("{}", "Withdraw proved and submitted.".green().bold());
    println!("  nullifier hash: {}", pub_in.nullifier_hash.to_hex_short());
    println!("  merkle root:    {}", pub_in.merkle_root.to_hex_short());
    println!("  amount:         {}", pub_in.withdraw_amount);
    println!("  recipient:      {}", pub_in.recipient.to_hex_short());
    println!("  proof:          {} bytes ({})", proof.len(), hex::encode(&proof).dimmed());

    Ok(())
}
