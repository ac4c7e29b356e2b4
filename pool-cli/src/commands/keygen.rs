//! Generate a fresh wallet seed and store it encrypted at rest (spec §4.F
//! `unlock`'s counterpart — there is no signature to derive from here since
//! the signing wallet is out of scope, so this binary mints its own seed
//! the way the teacher's `keygen` mints a scan/spend key pair).

use anyhow::{bail, Result};
use colored::Colorize;

use pool_wallet::{SecureSeedStorage, WalletSeed};

use crate::password::prompt_new_password;
use crate::session;

pub fn run(force: bool) -> Result<()> {
    let cfg = session::config()?;
    let storage = SecureSeedStorage::new(cfg.seed_path());

    if storage.exists() && !force {
        bail!(
            "a wallet seed already exists at {:?}; pass --force to overwrite \
             (this makes any notes derived from the old seed unrecoverable unless you \
             still have its password)",
            cfg.seed_path()
        );
    }

    println!("{}", "Generating a new wallet seed...".cyan());
    let seed = WalletSeed::generate();

    println!();
    println!(
        "{}",
        "Choose a strong password to encrypt the seed at rest.".cyan()
    );
    let password = prompt_new_password("Enter password: ")?;

    storage.save(&seed, &password)?;
    cfg.save_settings(&cfg.load_settings()?)?;

    println!();
    println!(
        "{}",
        "Wallet seed generated and encrypted.".green().bold()
    );
    println!(
        "{}",
        format!("Saved to {:?}", cfg.seed_path()).dimmed()
    );
    println!();
    println!(
        "{}",
        "There is no recovery phrase: back up the encrypted seed file and remember \
         the password, or notes derived from it are permanently unspendable."
            .yellow()
    );

    Ok(())
}
