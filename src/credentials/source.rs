use crate::config::EnvSource;
use crate::credentials::{Keystore, SecretKey};
use crate::error::{ConfigError, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Where an account key comes from
#[derive(Clone, PartialEq, Eq)]
pub enum AccountSource {
    Env { env: String },
    File { file: PathBuf },
    Keystore { keystore: PathBuf, password_env: String },
}

/// One element of a network's `accounts` list, as written in the config file
///
/// Config files name a source, never the key itself:
///
/// ```toml
/// accounts = [
///     { env = "SEPOLIA_PRIVATE_KEY" },
///     { file = "keys/deployer.hex" },
///     { keystore = "keys/admin.json", password_env = "ADMIN_KEYSTORE_PASSWORD" },
/// ]
/// ```
///
/// A bare string is read as a key literal. Its value is dropped during parsing
/// so it cannot reach an error message; [`AccountEntry::into_source`] rejects it.
#[derive(Clone, PartialEq, Eq)]
pub enum AccountEntry {
    Inline,
    Table(AccountFields),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountFields {
    pub env: Option<String>,
    pub file: Option<PathBuf>,
    pub keystore: Option<PathBuf>,
    pub password_env: Option<String>,
}

impl<'de> Deserialize<'de> for AccountEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = AccountEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an account source table such as { env = \"NAME\" }")
            }

            fn visit_str<E: de::Error>(self, _value: &str) -> std::result::Result<AccountEntry, E> {
                Ok(AccountEntry::Inline)
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<AccountEntry, A::Error> {
                AccountFields::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(AccountEntry::Table)
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

impl AccountEntry {
    /// Check that exactly one source is named and that its companions are present
    pub fn into_source(self) -> Result<AccountSource> {
        let fields = match self {
            AccountEntry::Inline => {
                return Err(ConfigError::Credential(
                    "inline private keys are not accepted; use { env = \"NAME\" }, \
                     { file = \"PATH\" } or { keystore = \"PATH\", password_env = \"NAME\" }"
                        .to_string(),
                ))
            }
            AccountEntry::Table(fields) => fields,
        };

        for name in fields.env.iter().chain(fields.password_env.iter()) {
            check_variable_name(name)?;
        }

        match fields {
            AccountFields {
                env: Some(env),
                file: None,
                keystore: None,
                password_env: None,
            } => Ok(AccountSource::Env { env }),
            AccountFields {
                env: None,
                file: Some(file),
                keystore: None,
                password_env: None,
            } => Ok(AccountSource::File { file }),
            AccountFields {
                env: None,
                file: None,
                keystore: Some(keystore),
                password_env: Some(password_env),
            } => Ok(AccountSource::Keystore {
                keystore,
                password_env,
            }),
            AccountFields {
                env: None,
                file: None,
                keystore: Some(_),
                password_env: None,
            } => Err(ConfigError::Credential(
                "keystore account requires password_env".to_string(),
            )),
            AccountFields {
                env: None,
                file: None,
                keystore: None,
                password_env: Some(_),
            } => Err(ConfigError::Credential(
                "password_env is only valid together with keystore".to_string(),
            )),
            _ => Err(ConfigError::Credential(
                "account entry must set exactly one of env, file or keystore".to_string(),
            )),
        }
    }
}

// Variable names end up in error messages, so a pasted key must not pass as one
fn check_variable_name(name: &str) -> Result<()> {
    let hex = name.trim_start_matches("0x");
    let looks_like_key = hex.len() >= 32 && hex.chars().all(|c| c.is_ascii_hexdigit());
    let valid = !looks_like_key
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Credential(
            "account env and password_env must name an environment variable \
             (letters, digits and '_'), not hold a key"
                .to_string(),
        ))
    }
}

impl fmt::Debug for AccountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountEntry::Inline => write!(f, "AccountEntry(inline)"),
            AccountEntry::Table(fields) => write!(f, "AccountEntry({fields:?})"),
        }
    }
}

impl AccountSource {
    /// Load and validate the key. Relative paths are taken from `base_dir`.
    pub fn resolve(&self, base_dir: &Path, env: &dyn EnvSource) -> Result<SecretKey> {
        match self {
            AccountSource::Env { env: name } => {
                let value = Zeroizing::new(env.var(name).ok_or_else(|| {
                    ConfigError::Credential(format!("environment variable {name} is not set"))
                })?);
                if value.trim().is_empty() {
                    return Err(ConfigError::Credential(format!(
                        "environment variable {name} is empty"
                    )));
                }
                SecretKey::from_hex(&value).map_err(|e| e.context(&self.describe()))
            }
            AccountSource::File { file } => {
                let path = base_dir.join(file);
                let contents = Zeroizing::new(fs::read_to_string(&path).map_err(|e| {
                    ConfigError::Credential(format!(
                        "cannot read key file {}: {e}",
                        path.display()
                    ))
                })?);
                SecretKey::from_hex(&contents).map_err(|e| e.context(&self.describe()))
            }
            AccountSource::Keystore {
                keystore,
                password_env,
            } => {
                let password = Zeroizing::new(env.var(password_env).ok_or_else(|| {
                    ConfigError::Credential(format!(
                        "environment variable {password_env} is not set"
                    ))
                })?);
                Keystore::load(&base_dir.join(keystore))?
                    .decrypt(&password)
                    .map_err(|e| e.context(&self.describe()))
            }
        }
    }

    /// Human-readable origin without any key material
    pub fn describe(&self) -> String {
        match self {
            AccountSource::Env { env } => format!("env:{env}"),
            AccountSource::File { file } => format!("file:{}", file.display()),
            AccountSource::Keystore { keystore, .. } => format!("keystore:{}", keystore.display()),
        }
    }
}

impl fmt::Debug for AccountSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountSource({})", self.describe())
    }
}
