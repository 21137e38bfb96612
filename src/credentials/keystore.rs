use crate::credentials::SecretKey;
use crate::error::{ConfigError, Result};
use crate::utils::random_bytes;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use zeroize::Zeroizing;

/// On-disk format version
pub const KEYSTORE_VERSION: u32 = 1;
/// Minimum password length accepted when encrypting or decrypting
pub const MIN_PASSWORD_LEN: usize = 8;

const KDF_NAME: &str = "argon2id";
const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12; // AES-GCM uses 96-bit nonces
const KEY_LEN: usize = 32;

// 64 MiB, 3 passes, 1 lane
const ARGON2_MEMORY_KIB: u32 = 65536;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_LANES: u32 = 1;

/// Password-encrypted account key file
///
/// The key is sealed with AES-256-GCM under a key derived from the password
/// with Argon2id. Binary fields are stored as lowercase hex in a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystore {
    pub version: u32,
    pub kdf: String,
    pub salt: String,
    pub nonce: String,
    pub ciphertext: String,
}

impl Keystore {
    /// Seal `key` under `password` with a fresh salt and nonce
    pub fn encrypt(key: &SecretKey, password: &str) -> Result<Self> {
        validate_password(password)?;

        let salt = random_bytes(SALT_LEN);
        let nonce = random_bytes(NONCE_LEN);
        let cipher = cipher_for(password, &salt)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), key.as_bytes())
            .map_err(|e| ConfigError::Credential(format!("keystore encryption failed: {e}")))?;

        Ok(Keystore {
            version: KEYSTORE_VERSION,
            kdf: KDF_NAME.to_string(),
            salt: hex::encode(salt),
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        })
    }

    /// Recover the key. A wrong password and a tampered file fail the same way.
    pub fn decrypt(&self, password: &str) -> Result<SecretKey> {
        if self.version != KEYSTORE_VERSION {
            return Err(ConfigError::Credential(format!(
                "unsupported keystore version {}",
                self.version
            )));
        }
        if self.kdf != KDF_NAME {
            return Err(ConfigError::Credential(format!(
                "unsupported keystore kdf '{}'",
                self.kdf
            )));
        }
        validate_password(password)?;

        let salt = decode_field("salt", &self.salt)?;
        let nonce = decode_field("nonce", &self.nonce)?;
        let ciphertext = decode_field("ciphertext", &self.ciphertext)?;
        if nonce.len() != NONCE_LEN {
            return Err(ConfigError::Credential(format!(
                "keystore nonce must be {NONCE_LEN} bytes"
            )));
        }

        let cipher = cipher_for(password, &salt)?;
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
                .map_err(|_| {
                    ConfigError::Credential(
                        "keystore decryption failed: wrong password or corrupted file".to_string(),
                    )
                })?,
        );
        SecretKey::from_bytes(&plaintext)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ConfigError::Credential(format!("cannot read keystore {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ConfigError::Credential(format!("malformed keystore {}: {e}", path.display()))
        })
    }

    /// Write the keystore as pretty JSON. On unix the file is created owner-only.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        log::info!("Wrote encrypted keystore to {}", path.display());
        Ok(())
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ConfigError::Credential(format!(
            "keystore password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value)
        .map_err(|e| ConfigError::Credential(format!("keystore {name} is not valid hex: {e}")))
}

fn cipher_for(password: &str, salt: &[u8]) -> Result<Aes256Gcm> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_ITERATIONS,
        ARGON2_LANES,
        Some(KEY_LEN),
    )
    .map_err(|e| ConfigError::Credential(format!("invalid Argon2 parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut derived = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut derived[..])
        .map_err(|e| ConfigError::Credential(format!("key derivation failed: {e}")))?;

    Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&derived[..])))
}
