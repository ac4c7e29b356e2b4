//! Wires the engine crates' trait boundaries to this binary's concrete,
//! local-only backends: a file-persisted [`LocalLedger`] standing in for a
//! real chain mirror, `JsonFileStore` for wallet/auction state, and
//! [`pool_wallet::FakeProver`] / [`pool_auction::FakeBroadcastClient`]
//! standing in for the prover and broadcast collaborators — both explicitly
//! out of scope as concrete implementations (spec Non-goals).

use std::path::PathBuf;

use anyhow::{Context, Result};
use pool_auction::AuctionCore;
/// Renamed on import since `pool_auction::JsonFileStore` and
/// `pool_wallet::JsonFileStore` would otherwise collide.
use pool_auction::JsonFileStore as JsonFileStoreAuction;
use pool_auction::Store as AuctionStoreTrait;
use pool_wallet::{JsonFileStore, SecureSeedStorage, Wallet, WalletConfig, WalletSeed};

use crate::ledger::LocalLedger;
use crate::password::prompt_password;

pub type EngineWallet = Wallet<LocalLedger, JsonFileStore>;

pub fn config() -> Result<WalletConfig> {
    let cfg = WalletConfig::default_dir().context("could not resolve ~/.pool-wallet")?;
    cfg.ensure_exists()?;
    Ok(cfg)
}

/// Open the wallet engine against its local ledger/state files, locked.
pub fn open_locked(cfg: &WalletConfig) -> Result<EngineWallet> {
    let ledger = LocalLedger::open(LocalLedger::default_path(cfg.root()))?;
    let store = JsonFileStore::new(cfg.state_path());
    Ok(Wallet::open(ledger, store)?)
}

/// Open the wallet and unlock it with a password prompt.
pub fn open_unlocked(cfg: &WalletConfig) -> Result<EngineWallet> {
    let password = prompt_password("Wallet password: ")?;
    open_unlocked_with(cfg, &password)
}

pub fn open_unlocked_with(cfg: &WalletConfig, password: &str) -> Result<EngineWallet> {
    let storage = SecureSeedStorage::new(cfg.seed_path());
    if !storage.exists() {
        anyhow::bail!("no wallet seed found at {:?}; run `pool keygen` first", cfg.seed_path());
    }
    let seed: WalletSeed = storage.load(password)?;
    let mut wallet = open_locked(cfg)?;
    wallet.unlock_seed(seed);
    Ok(wallet)
}

pub fn auction_state_path(cfg: &WalletConfig) -> PathBuf {
    cfg.root().join("auction.json")
}

pub fn open_auction(cfg: &WalletConfig) -> Result<(AuctionCore, JsonFileStoreAuction)> {
    let store = JsonFileStoreAuction::new(auction_state_path(cfg));
    let state = store.load()?;
    let core = AuctionCore::from_state(state)?;
    Ok((core, store))
}

pub fn save_auction(store: &JsonFileStoreAuction, core: &AuctionCore) -> Result<()> {
    AuctionStoreTrait::save(store, &core.to_state())?;
    Ok(())
}
