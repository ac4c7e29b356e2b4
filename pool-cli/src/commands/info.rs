//! Show config directory layout and engine settings (spec §6 persisted
//! state layout, from the operator's point of view).

use anyhow::Result;
use colored::Colorize;

use pool_wallet::SecureSeedStorage;

use crate::session;

pub fn run() -> Result<()> {
    let cfg = session::config()?;
    let settings = cfg.load_settings()?;
    let seed_storage = SecureSeedStorage::new(cfg.seed_path());

    println!("{}", "pool-wallet configuration".yellow().bold());
    println!();
    println!("  config dir:   {:?}", cfg.root());
    println!("  seed file:    {:?} (present: {})", cfg.seed_path(), seed_storage.exists());
    println!("  state file:   {:?}", cfg.state_path());
    println!("  ledger file:  {:?}", crate::ledger::LocalLedger::default_path(cfg.root()));
    println!();
    println!("{}", "engine settings".yellow().bold());
    println!("  rpc_url:              {}", settings.rpc_url);
    println!("  mirror_endpoint:      {}", settings.mirror_endpoint);
    println!("  root_history_window:  {}", settings.root_history_window);
    println!("  prover_timeout_secs:  {}", settings.prover_timeout_secs);

    Ok(())
}
