//! Encrypted-at-rest wallet seed storage.
//!
//! Generalizes `secure_storage.rs` from the stealth-address CLI this engine
//! was built out of: AES-256-GCM for encryption, Argon2id for key
//! derivation, base64 for the on-disk encoding. The only thing that changed
//! is what's inside the envelope — a 32-byte wallet seed instead of a
//! scan/spend keypair.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

use crate::error::EngineError;
use crate::keys::WalletSeed;

const ARGON2_M_COST: u32 = 65536;
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

#[derive(Serialize, Deserialize)]
pub struct EncryptedSeedFile {
    pub version: u8,
    pub salt: String,
    pub nonce: String,
    pub ciphertext: String,
    pub password_hash: Option<String>,
    pub created_at: String,
}

fn argon2() -> Result<Argon2<'static>, EngineError> {
    let params = argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(32))
        .map_err(|e| EngineError::Storage(format!("argon2 params: {e}")))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

impl EncryptedSeedFile {
    pub fn encrypt(seed: &WalletSeed, password: &str) -> Result<Self, EngineError> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        let engine = argon2()?;

        let mut key_bytes = [0u8; 32];
        engine
            .hash_password_into(password.as_bytes(), salt.as_str().as_bytes(), &mut key_bytes)
            .map_err(|e| EngineError::Storage(format!("key derivation failed: {e}")))?;

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| EngineError::Storage(format!("cipher init failed: {e}")))?;

        let mut nonce_bytes = [0u8; 12];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from(nonce_bytes);

        let ciphertext = cipher
            .encrypt(&nonce, seed.as_bytes().as_slice())
            .map_err(|e| EngineError::Storage(format!("encryption failed: {e}")))?;

        let password_hash = engine
            .hash_password(password.as_bytes(), &salt)
            .ok()
            .map(|h| h.to_string());

        key_bytes.zeroize();

        Ok(Self {
            version: 1,
            salt: salt.as_str().to_string(),
            nonce: B64.encode(nonce_bytes),
            ciphertext: B64.encode(ciphertext),
            password_hash,
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn decrypt(&self, password: &str) -> Result<WalletSeed, EngineError> {
        if let Some(ref hash) = self.password_hash {
            let parsed = PasswordHash::new(hash)
                .map_err(|e| EngineError::Storage(format!("invalid password hash: {e}")))?;
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .map_err(|_| EngineError::UnlockFailed)?;
        }

        let engine = argon2()?;
        let mut key_bytes = [0u8; 32];
        engine
            .hash_password_into(password.as_bytes(), self.salt.as_bytes(), &mut key_bytes)
            .map_err(|e| EngineError::Storage(format!("key derivation failed: {e}")))?;

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| EngineError::Storage(format!("cipher init failed: {e}")))?;

        let nonce_bytes = B64
            .decode(&self.nonce)
            .map_err(|_| EngineError::Storage("invalid nonce encoding".into()))?;
        let ciphertext = B64
            .decode(&self.ciphertext)
            .map_err(|_| EngineError::Storage("invalid ciphertext encoding".into()))?;
        if nonce_bytes.len() != 12 {
            return Err(EngineError::Storage("invalid nonce length".into()));
        }
        let nonce_array: [u8; 12] = nonce_bytes
            .try_into()
            .map_err(|_| EngineError::Storage("invalid nonce length".into()))?;

        let plaintext = cipher
            .decrypt(&Nonce::from(nonce_array), ciphertext.as_ref())
            .map_err(|_| EngineError::UnlockFailed)?;
        key_bytes.zeroize();

        if plaintext.len() != 32 {
            return Err(EngineError::Storage("decrypted seed has wrong length".into()));
        }
        let mut seed_bytes = [0u8; 32];
        seed_bytes.copy_from_slice(&plaintext);
        Ok(WalletSeed::from_bytes(seed_bytes))
    }
}

/// Manages the `seed.enc` file inside a wallet's config directory.
pub struct SecureSeedStorage {
    path: PathBuf,
}

impl SecureSeedStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, seed: &WalletSeed, password: &str) -> Result<(), EngineError> {
        let encrypted = EncryptedSeedFile::encrypt(seed, password)?;
        let json = serde_json::to_string_pretty(&encrypted)
            .map_err(|e| EngineError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| EngineError::Storage(e.to_string()))?;
        }
        write_restricted(&self.path, &json)?;
        Ok(())
    }

    pub fn load(&self, password: &str) -> Result<WalletSeed, EngineError> {
        let json = fs::read_to_string(&self.path)
            .map_err(|e| EngineError::Storage(format!("read seed file: {e}")))?;
        let encrypted: EncryptedSeedFile =
            serde_json::from_str(&json).map_err(|e| EngineError::Storage(e.to_string()))?;
        encrypted.decrypt(password)
    }

    pub fn change_password(&self, old: &str, new: &str) -> Result<(), EngineError> {
        let seed = self.load(old)?;
        self.save(&seed, new)
    }
}

fn write_restricted(path: &Path, contents: &str) -> Result<(), EngineError> {
    fs::write(path, contents).map_err(|e| EngineError::Storage(e.to_string()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| EngineError::Storage(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_password() {
        let seed = WalletSeed::generate();
        let encrypted = EncryptedSeedFile::encrypt(&seed, "correct horse battery staple").unwrap();
        let decrypted = encrypted.decrypt("correct horse battery staple").unwrap();
        assert_eq!(seed.as_bytes(), decrypted.as_bytes());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let seed = WalletSeed::generate();
        let encrypted = EncryptedSeedFile::encrypt(&seed, "right-password").unwrap();
        assert!(matches!(
            encrypted.decrypt("wrong-password"),
            Err(EngineError::UnlockFailed)
        ));
    }

    #[test]
    fn file_roundtrip_via_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SecureSeedStorage::new(dir.path().join("seed.enc"));
        let seed = WalletSeed::generate();
        storage.save(&seed, "hunter2").unwrap();
        assert!(storage.exists());
        let loaded = storage.load("hunter2").unwrap();
        assert_eq!(seed.as_bytes(), loaded.as_bytes());
    }
}
