//! Reserve a `(secret, nullifier)` candidate pair for a counterparty to
//! bind an incoming transfer to (spec §4.F). This pool has no on-chain
//! address; the pair is handed to the sender out of band, the way the
//! teacher's stealth-address scheme hands over a one-time public key.

use anyhow::Result;
use colored::Colorize;

use crate::session;

pub fn run() -> Result<()> {
    let cfg = session::config()?;
    let mut wallet = session::open_unlocked(&cfg)?;

    let (secret, nullifier) = wallet.reserve_receive_key()?;

    println!("{}", "Reserved a receive key. Share these with the sender:".cyan());
    println!();
    println!("  --to-secret     {}", secret.to_hex_fixed().green());
    println!("  --to-nullifier  {}", nullifier.to_hex_fixed().green());
    println!();
    println!(
        "{}",
        "They run `pool transfer --amount <n> --to-secret ... --to-nullifier ...`.".dimmed()
    );

    Ok(())
}
