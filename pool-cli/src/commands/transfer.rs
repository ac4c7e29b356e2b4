//! Build a transfer spend (spec §4.E): split an owned note into an output
//! amount and a change amount. With no `--to-secret`/`--to-nullifier` pair
//! the output note is derived from this wallet's own seed (a same-wallet
//! split); with both given, the output is bound to a counterparty's
//! reserved receive key (see `pool receive`).

use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;

use pool_core::{Field, Spend};
use pool_wallet::{FakeProver, Prover};

use crate::ledger::LocalLedger;
use crate::session;

pub fn run(amount: u128, to_secret: Option<String>, to_nullifier: Option<String>) -> Result<()> {
    let cfg = session::config()?;
    let mut wallet = session::open_unlocked(&cfg)?;
    wallet.sync()?;

    let spend = match (to_secret, to_nullifier) {
        (Some(s), Some(n)) => {
            let out_secret = Field::from_str(&s).context("--to-secret must be a hex field element")?;
            let out_nullifier =
                Field::from_str(&n).context("--to-nullifier must be a hex field element")?;
            wallet.prepare_transfer_to(amount, out_secret, out_nullifier)?
        }
        (None, None) => wallet.prepare_transfer(amount)?,
        _ => anyhow::bail!("--to-secret and --to-nullifier must be given together"),
    };

    let Spend::Transfer(_, ref pub_in) = spend else {
        unreachable!("prepare_transfer(_to) always returns Spend::Transfer")
    };

    let prover = FakeProver;
    let proof = prover.prove(&spend)?;

    let mut ledger = LocalLedger::open(LocalLedger::default_path(cfg.root()))?;
    ledger.record_transfer(
        pub_in.nullifier_hash,
        pub_in.out_commitment,
        pub_in.out_amount,
        pub_in.change_commitment,
        pub_in.change_amount,
        crate::commands::now_secs(),
    )?;

    wallet.sync()?;

    println!("{}", "Transfer proved and submitted.".green().bold());
    println!("  nullifier hash:   {}", pub_in.nullifier_hash.to_hex_short());
    println!("  out commitment:   {}", pub_in.out_commitment.to_hex_short());
    println!("  out amount:       {}", pub_in.out_amount);
    println!("  change commitment:{}", pub_in.change_commitment.to_hex_short());
    println!("  change amount:    {}", pub_in.change_amount);
    println!("  proof:            {} bytes ({})", proof.len(), hex::encode(&proof).dimmed());

    Ok(())
}
