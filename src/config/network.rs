use crate::credentials::SecretKey;
use crate::error::{ConfigError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

/// Default JSON-RPC request timeout for remote networks, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 40_000;

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]", "0.0.0.0"];

/// Gas price policy for transactions sent to a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GasPrice {
    /// Ask the node
    #[default]
    Auto,
    /// Fixed price in wei
    Wei(u64),
}

impl Serialize for GasPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            GasPrice::Auto => serializer.serialize_str("auto"),
            GasPrice::Wei(wei) => serializer.serialize_u64(*wei),
        }
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasPrice::Auto => write!(f, "auto"),
            GasPrice::Wei(wei) => write!(f, "{wei} wei"),
        }
    }
}

/// A named remote endpoint plus the accounts that sign for it
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    name: String,
    #[serde(serialize_with = "serialize_redacted_url")]
    url: Url,
    accounts: Vec<SecretKey>,
    #[serde(rename = "chainId", skip_serializing_if = "Option::is_none")]
    chain_id: Option<u64>,
    #[serde(rename = "timeoutMs")]
    timeout_ms: u64,
    #[serde(rename = "gasPrice")]
    gas_price: GasPrice,
}

impl NetworkProfile {
    /// Validate the name and endpoint and build a profile with defaults for
    /// everything else. An empty account list is allowed here; it is rejected
    /// only when the profile is selected for signing.
    pub fn new(name: &str, url: &str, accounts: Vec<SecretKey>) -> Result<Self> {
        validate_network_name(name)?;
        let url = parse_endpoint(name, url)?;
        Ok(NetworkProfile {
            name: name.to_string(),
            url,
            accounts,
            chain_id: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            gas_price: GasPrice::Auto,
        })
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Result<Self> {
        if chain_id == 0 {
            return Err(ConfigError::Config(format!(
                "network '{}': chain id must be positive",
                self.name
            )));
        }
        self.chain_id = Some(chain_id);
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self> {
        if timeout_ms == 0 {
            return Err(ConfigError::Config(format!(
                "network '{}': timeout must be positive",
                self.name
            )));
        }
        self.timeout_ms = timeout_ms;
        Ok(self)
    }

    pub fn with_gas_price(mut self, gas_price: GasPrice) -> Result<Self> {
        if gas_price == GasPrice::Wei(0) {
            return Err(ConfigError::Config(format!(
                "network '{}': gas price must be positive or \"auto\"",
                self.name
            )));
        }
        self.gas_price = gas_price;
        Ok(self)
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Full endpoint, which may embed a provider API key. Do not log it.
    pub fn get_url(&self) -> &Url {
        &self.url
    }

    /// Scheme, host and port only
    pub fn redacted_url(&self) -> String {
        redact(&self.url)
    }

    pub fn get_accounts(&self) -> &[SecretKey] {
        &self.accounts
    }

    pub fn has_accounts(&self) -> bool {
        !self.accounts.is_empty()
    }

    pub fn get_chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn get_timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn get_gas_price(&self) -> GasPrice {
        self.gas_price
    }

    pub fn is_local(&self) -> bool {
        self.url
            .host_str()
            .map(|host| LOCAL_HOSTS.contains(&host))
            .unwrap_or(false)
    }
}

// The endpoint path or query often carries a provider API key
impl fmt::Debug for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkProfile")
            .field("name", &self.name)
            .field("url", &self.redacted_url())
            .field("accounts", &self.accounts)
            .field("chain_id", &self.chain_id)
            .field("timeout_ms", &self.timeout_ms)
            .field("gas_price", &self.gas_price)
            .finish()
    }
}

impl fmt::Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} account(s)",
            self.name,
            self.redacted_url(),
            self.accounts.len()
        )?;
        if let Some(chain_id) = self.chain_id {
            write!(f, ", chain {chain_id}")?;
        }
        write!(f, ")")
    }
}

/// Network names are used as table keys and CLI arguments
pub fn validate_network_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigError::Config(
            "network name must not be empty".to_string(),
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::Config(format!(
            "network name '{name}' may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}

fn parse_endpoint(name: &str, raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Config(format!(
            "network '{name}': endpoint URL is empty"
        )));
    }
    // url::ParseError never echoes the input, so the endpoint stays out of the message
    let url = Url::parse(trimmed).map_err(|e| {
        ConfigError::Config(format!("network '{name}': invalid endpoint URL: {e}"))
    })?;
    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::Config(format!(
            "network '{name}': unsupported URL scheme '{}', expected one of {}",
            url.scheme(),
            ALLOWED_SCHEMES.join(", ")
        )));
    }
    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(ConfigError::Config(format!(
            "network '{name}': endpoint URL has no host"
        )));
    }
    Ok(url)
}

fn redact(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    }
}

fn serialize_redacted_url<S: Serializer>(
    url: &Url,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&redact(url))
}
