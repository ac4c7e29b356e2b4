//! Resync the wallet's note ownership against the local ledger (spec §4.F
//! `sync`, §4.H reconciliation — `Wallet::sync` folds both into one call).

use anyhow::Result;
use colored::Colorize;

use crate::session;

pub fn run() -> Result<()> {
    let cfg = session::config()?;
    let mut wallet = session::open_unlocked(&cfg)?;

    let report = wallet.sync()?;

    println!("{}", "Sync complete.".green().bold());
    println!("  leaves observed:   {}", report.leaves_observed);
    println!("  notes recognized:  {}", report.notes_recognized);
    println!("  notes spent:       {}", report.notes_spent);
    println!("  notes quarantined: {}", report.notes_quarantined);
    println!("  notes reinstated:  {}", report.notes_reinstated);
    println!();
    println!(
        "current root: {}",
        wallet.current_root().to_string().dimmed()
    );
    println!("balance:      {}", wallet.balance());

    Ok(())
}
