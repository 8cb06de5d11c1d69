//! Signing identity backed by the local encrypted keystore.
//!
//! # Security
//! - Keys are read from `<datadir>/keys` and decrypted with the operator's passphrase
//! - Keys are never logged or serialized in plaintext
//! - A raw private key is only accepted by `import`, which encrypts it straight away

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Wallet holding the operator's decrypted signer.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string (with or without 0x prefix).
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self { signer })
    }

    /// Locate the key file for `account` in `keys_dir` and decrypt it.
    pub fn from_keystore(keys_dir: &Path, account: Address, password: &str) -> BlockchainResult<Self> {
        let key_file = find_key_file(keys_dir, account)?.ok_or_else(|| {
            BlockchainError::Keystore(format!(
                "Account {} not found in {}",
                account,
                keys_dir.display()
            ))
        })?;

        let signer = PrivateKeySigner::decrypt_keystore(&key_file, password).map_err(|e| {
            BlockchainError::Keystore(format!("Failed to unlock {}: {}", account, e))
        })?;

        if signer.address() != account {
            return Err(BlockchainError::Keystore(format!(
                "Key file {} does not belong to {}",
                key_file.display(),
                account
            )));
        }

        tracing::info!(address = %account, "Signer unlocked");
        Ok(Self { signer })
    }

    /// Encrypt a raw private key into `keys_dir`.
    ///
    /// Returns the wallet and whether a new key file was written. An account that already has a
    /// key file is left untouched.
    pub fn import(keys_dir: &Path, private_key_hex: &str, password: &str) -> BlockchainResult<(Self, bool)> {
        let wallet = Self::from_private_key(private_key_hex)?;
        let account = wallet.address();

        if find_key_file(keys_dir, account)?.is_some() {
            return Ok((wallet, false));
        }

        std::fs::create_dir_all(keys_dir).map_err(|e| {
            BlockchainError::Keystore(format!("Cannot create {}: {}", keys_dir.display(), e))
        })?;

        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let name = format!("UTC--{}--{}", secs, address_hex(account));

        let mut rng = rand::thread_rng();
        PrivateKeySigner::encrypt_keystore(
            keys_dir,
            &mut rng,
            wallet.signer.to_bytes(),
            password,
            Some(&name),
        )
        .map_err(|e| BlockchainError::Keystore(format!("Failed to import {}: {}", account, e)))?;

        tracing::info!(address = %account, file = %name, "Key imported");
        Ok((wallet, true))
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Network wallet used by the signing provider.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

/// Find the key file for `account`, matching either the file name suffix or the JSON
/// `address` field.
pub fn find_key_file(keys_dir: &Path, account: Address) -> BlockchainResult<Option<PathBuf>> {
    let entries = match std::fs::read_dir(keys_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(BlockchainError::Keystore(format!(
                "Cannot read {}: {}",
                keys_dir.display(),
                e
            )))
        }
    };

    let wanted = address_hex(account);
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let by_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_ascii_lowercase().ends_with(&wanted))
            .unwrap_or(false);
        if by_name || key_file_address(&path).as_deref() == Some(wanted.as_str()) {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

fn key_file_address(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let json: serde_json::Value = serde_json::from_str(&raw).ok()?;
    let address = json.get("address")?.as_str()?;
    Some(address.trim_start_matches("0x").to_ascii_lowercase())
}

fn address_hex(account: Address) -> String {
    alloy::hex::encode(account.as_slice())
}
