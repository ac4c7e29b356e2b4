//! Wallet config directory layout. Generalizes `cli/src/config.rs`'s
//! `.stealth` directory into `.pool-wallet`, holding the encrypted seed file,
//! the persisted wallet/accumulator-mirror state, and a `config.json` of
//! engine settings instead of a scan/spend keypair.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

const CONFIG_DIR: &str = ".pool-wallet";
const SEED_FILE: &str = "seed.enc";
const STATE_FILE: &str = "state.json";
const SETTINGS_FILE: &str = "config.json";

/// The non-secret settings every engine run needs: where the chain mirror
/// and prover collaborators live, and how long to wait on them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSettings {
    pub rpc_url: String,
    pub mirror_endpoint: String,
    /// Mirrors `pool_core::merkle::ROOT_HISTORY_SIZE` but kept configurable
    /// here since a deployment may run a pool with a different window.
    pub root_history_window: u32,
    pub prover_timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            mirror_endpoint: "http://127.0.0.1:8545".to_string(),
            root_history_window: pool_core::merkle::ROOT_HISTORY_SIZE as u32,
            prover_timeout_secs: 120,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WalletConfig {
    root: PathBuf,
}

impl WalletConfig {
    /// `~/.pool-wallet`.
    pub fn default_dir() -> Result<Self, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Storage("could not locate home directory".into()))?;
        Ok(Self {
            root: home.join(CONFIG_DIR),
        })
    }

    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn seed_path(&self) -> PathBuf {
        self.root.join(SEED_FILE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn ensure_exists(&self) -> Result<(), EngineError> {
        fs::create_dir_all(&self.root).map_err(|e| EngineError::Storage(e.to_string()))
    }

    /// Loads `config.json`, falling back to defaults if it doesn't exist yet
    /// (mirrors the teacher's `load_keys`-is-optional-until-keygen pattern).
    pub fn load_settings(&self) -> Result<EngineSettings, EngineError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(EngineSettings::default());
        }
        let json = fs::read_to_string(&path).map_err(|e| EngineError::Storage(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| EngineError::Storage(e.to_string()))
    }

    pub fn save_settings(&self, settings: &EngineSettings) -> Result<(), EngineError> {
        self.ensure_exists()?;
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| EngineError::Storage(e.to_string()))?;
        fs::write(self.settings_path(), json).map_err(|e| EngineError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_nested_under_root() {
        let cfg = WalletConfig::at(PathBuf::from("/tmp/example"));
        assert_eq!(cfg.seed_path(), PathBuf::from("/tmp/example/seed.enc"));
        assert_eq!(cfg.state_path(), PathBuf::from("/tmp/example/state.json"));
        assert_eq!(
            cfg.settings_path(),
            PathBuf::from("/tmp/example/config.json")
        );
    }

    #[test]
    fn missing_settings_file_loads_as_default() {
        let cfg = WalletConfig::at(PathBuf::from("/tmp/pool-wallet-does-not-exist"));
        let settings = cfg.load_settings().unwrap();
        assert_eq!(settings.prover_timeout_secs, 120);
    }

    #[test]
    fn settings_roundtrip_through_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = WalletConfig::at(dir.path().to_path_buf());
        let mut settings = EngineSettings::default();
        settings.prover_timeout_secs = 30;
        cfg.save_settings(&settings).unwrap();
        let loaded = cfg.load_settings().unwrap();
        assert_eq!(loaded.prover_timeout_secs, 30);
    }
}
