//! List every note this wallet currently owns (spec §3's note lifecycle:
//! only `Owned` notes are spendable, but showing `Pending`/quarantined
//! context is what a real operator needs to debug a stuck spend).

use anyhow::Result;
use colored::Colorize;

use crate::session;

pub fn run() -> Result<()> {
    let cfg = session::config()?;
    let mut wallet = session::open_unlocked(&cfg)?;
    wallet.sync()?;

    let owned = wallet.owned_notes();
    if owned.is_empty() {
        println!("{}", "No owned notes yet. Run `pool deposit` or `pool sync`.".yellow());
        return Ok(());
    }

    println!("{}", "Owned notes".yellow().bold());
    println!();
    for note in owned {
        println!(
            "  {} amount={} leaf_index={:?}",
            note.commitment().to_hex_short().cyan(),
            note.amount,
            note.leaf_index
        );
    }

    Ok(())
}
