//! Sum of `Owned` notes (spec §4.F's "private balance" invariant).

use anyhow::Result;
use colored::Colorize;

use crate::session;

pub fn run() -> Result<()> {
    let cfg = session::config()?;
    let mut wallet = session::open_unlocked(&cfg)?;
    wallet.sync()?;

    let owned = wallet.owned_notes();
    println!("{}", "Private balance".yellow().bold());
    println!();
    println!(
        "{}",
        format!("{} across {} note(s)", wallet.balance(), owned.len()).green()
    );

    Ok(())
}
