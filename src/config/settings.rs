use crate::config::compiler::{CompilerSettings, EvmVersion, DEFAULT_OPTIMIZER_RUNS};
use crate::config::env::{interpolate, EnvSource};
use crate::config::network::{validate_network_name, GasPrice, NetworkProfile};
use crate::credentials::{AccountEntry, SecretKey};
use crate::error::{ConfigError, Result};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Process-wide configuration, set once at startup
pub static GLOBAL_CONFIG: OnceCell<ProjectConfig> = OnceCell::new();

/// Environment variable naming the config file
pub const CONFIG_PATH_KEY: &str = "ARCHITECT_DEPLOY_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";
/// Config files larger than this are refused before parsing
pub const MAX_CONFIG_BYTES: u64 = 1024 * 1024;

/// Pick the config file: explicit flag, then environment, then `./deploy.toml`
pub fn resolve_config_path(flag: Option<PathBuf>, env: &dyn EnvSource) -> PathBuf {
    flag.or_else(|| env.var(CONFIG_PATH_KEY).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Install the process-wide configuration. Fails if one is already installed.
pub fn init_global(config: ProjectConfig) -> Result<&'static ProjectConfig> {
    GLOBAL_CONFIG
        .set(config)
        .map_err(|_| ConfigError::Config("configuration is already initialised".to_string()))?;
    GLOBAL_CONFIG
        .get()
        .ok_or_else(|| ConfigError::Config("configuration is not initialised".to_string()))
}

pub fn global() -> Option<&'static ProjectConfig> {
    GLOBAL_CONFIG.get()
}

/// Project directory layout, relative to the config file's directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectPaths {
    pub sources: PathBuf,
    pub tests: PathBuf,
    pub cache: PathBuf,
    pub artifacts: PathBuf,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            sources: PathBuf::from("contracts"),
            tests: PathBuf::from("test"),
            cache: PathBuf::from("cache"),
            artifacts: PathBuf::from("artifacts"),
        }
    }
}

impl ProjectPaths {
    fn validate(&self) -> Result<()> {
        for (field, path) in [
            ("sources", &self.sources),
            ("tests", &self.tests),
            ("cache", &self.cache),
            ("artifacts", &self.artifacts),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Config(format!("paths.{field} must not be empty")));
            }
        }
        Ok(())
    }
}

/// The canonical, validated configuration record
///
/// Built once by [`ProjectConfig::load`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    #[serde(skip)]
    root: PathBuf,
    solidity: CompilerSettings,
    networks: BTreeMap<String, NetworkProfile>,
    #[serde(rename = "defaultNetwork", skip_serializing_if = "Option::is_none")]
    default_network: Option<String>,
    paths: ProjectPaths,
}

/// A network that has at least one account to sign with
#[derive(Debug, Clone, Copy)]
pub struct SigningProfile<'a> {
    network: &'a NetworkProfile,
}

impl<'a> SigningProfile<'a> {
    pub fn get_network(&self) -> &'a NetworkProfile {
        self.network
    }

    /// First configured account; always present
    pub fn get_primary(&self) -> &'a SecretKey {
        &self.network.get_accounts()[0]
    }

    pub fn get_accounts(&self) -> &'a [SecretKey] {
        self.network.get_accounts()
    }
}

impl ProjectConfig {
    /// Assemble a record from already validated parts
    pub fn new(
        root: PathBuf,
        solidity: CompilerSettings,
        networks: Vec<NetworkProfile>,
        default_network: Option<String>,
        paths: ProjectPaths,
    ) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for network in networks {
            let name = network.get_name().to_string();
            if by_name.insert(name.clone(), network).is_some() {
                return Err(ConfigError::Config(format!(
                    "network '{name}' is defined more than once"
                )));
            }
        }

        let config = ProjectConfig {
            root,
            solidity,
            networks: by_name,
            default_network,
            paths,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file. Relative paths inside the file
    /// (key files, keystores, project paths) resolve against its directory.
    pub fn load(path: &Path, env: &dyn EnvSource) -> Result<Self> {
        let text = read_config_file(path)?;
        let root = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let config = Self::from_toml_str(&text, &root, env)?;
        info!(
            "Loaded configuration from {}: {}, {} network(s)",
            path.display(),
            config.solidity,
            config.networks.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(text: &str, root: &Path, env: &dyn EnvSource) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(text).map_err(|e| ConfigError::from_toml(&e, text))?;
        raw.build(root, env)
    }

    fn validate(&self) -> Result<()> {
        self.solidity.validate()?;
        self.paths.validate()?;
        if let Some(name) = &self.default_network {
            if !self.networks.contains_key(name) {
                return Err(ConfigError::Config(format!(
                    "defaultNetwork '{name}' is not defined under [networks]"
                )));
            }
        }
        Ok(())
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn get_solidity(&self) -> &CompilerSettings {
        &self.solidity
    }

    pub fn get_networks(&self) -> impl Iterator<Item = &NetworkProfile> {
        self.networks.values()
    }

    pub fn get_default_network(&self) -> Option<&str> {
        self.default_network.as_deref()
    }

    pub fn get_paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.root.join(&self.paths.sources)
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.root.join(&self.paths.tests)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(&self.paths.cache)
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join(&self.paths.artifacts)
    }

    pub fn network(&self, name: &str) -> Result<&NetworkProfile> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    /// The network named on the command line, else `defaultNetwork`
    pub fn selected_network(&self, requested: Option<&str>) -> Result<&NetworkProfile> {
        match requested.or(self.default_network.as_deref()) {
            Some(name) => self.network(name),
            None => Err(ConfigError::Config(
                "no network selected and no defaultNetwork configured".to_string(),
            )),
        }
    }

    /// Select a network for signing. Fails unless it has at least one account.
    pub fn signer(&self, name: &str) -> Result<SigningProfile<'_>> {
        let network = self.network(name)?;
        if !network.has_accounts() {
            return Err(ConfigError::Credential(format!(
                "network '{name}' has no accounts configured for signing"
            )));
        }
        Ok(SigningProfile { network })
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compiler: {}", self.solidity)?;
        writeln!(
            f,
            "Default network: {}",
            self.default_network.as_deref().unwrap_or("(none)")
        )?;
        writeln!(f, "Networks:")?;
        if self.networks.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for network in self.networks.values() {
            writeln!(f, "  {network}")?;
            for key in network.get_accounts() {
                writeln!(f, "    account {}", key.fingerprint())?;
            }
        }
        writeln!(
            f,
            "Paths: sources={} tests={} cache={} artifacts={}",
            self.paths.sources.display(),
            self.paths.tests.display(),
            self.paths.cache.display(),
            self.paths.artifacts.display()
        )
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| ConfigError::Io(format!("cannot read {}: {e}", path.display())))?;
    if !metadata.is_file() {
        return Err(ConfigError::Config(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(ConfigError::Config(format!(
            "config file exceeds size limit of {MAX_CONFIG_BYTES} bytes"
        )));
    }
    let bytes = fs::read(path)
        .map_err(|e| ConfigError::Io(format!("cannot read {}: {e}", path.display())))?;
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Config("config file must be utf-8".to_string()))
}

// On-disk shape. Field aliases accept the camelCase spellings used by
// Hardhat configs.

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    solidity: RawSolidity,
    #[serde(default)]
    networks: BTreeMap<String, RawNetwork>,
    #[serde(default, alias = "defaultNetwork")]
    default_network: Option<String>,
    #[serde(default)]
    paths: ProjectPaths,
}

// `solidity = "0.8.28"` or a `[solidity]` table. Hand-written so that errors
// inside the table keep naming the offending field.
enum RawSolidity {
    Version(String),
    Full(RawCompiler),
}

impl<'de> Deserialize<'de> for RawSolidity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SolidityVisitor;

        impl<'de> Visitor<'de> for SolidityVisitor {
            type Value = RawSolidity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a compiler version string or a [solidity] table")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<RawSolidity, E> {
                Ok(RawSolidity::Version(value.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                map: A,
            ) -> std::result::Result<RawSolidity, A::Error> {
                RawCompiler::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(RawSolidity::Full)
            }
        }

        deserializer.deserialize_any(SolidityVisitor)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCompiler {
    version: String,
    #[serde(default)]
    settings: RawCompilerSettings,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCompilerSettings {
    #[serde(default)]
    optimizer: RawOptimizer,
    #[serde(default, alias = "viaIR")]
    via_ir: bool,
    #[serde(default, alias = "evmVersion")]
    evm_version: Option<EvmVersion>,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawOptimizer {
    enabled: bool,
    runs: i64,
}

impl Default for RawOptimizer {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: i64::from(DEFAULT_OPTIMIZER_RUNS),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNetwork {
    url: String,
    #[serde(default)]
    accounts: Vec<AccountEntry>,
    #[serde(default, alias = "chainId")]
    chain_id: Option<u64>,
    #[serde(default)]
    timeout: Option<u64>,
    #[serde(default, alias = "gasPrice")]
    gas_price: Option<RawGasPrice>,
}

enum RawGasPrice {
    Wei(u64),
    Keyword(String),
}

impl<'de> Deserialize<'de> for RawGasPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GasPriceVisitor;

        impl<'de> Visitor<'de> for GasPriceVisitor {
            type Value = RawGasPrice;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"auto\" or a gas price in wei")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<RawGasPrice, E> {
                Ok(RawGasPrice::Wei(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<RawGasPrice, E> {
                u64::try_from(value)
                    .map(RawGasPrice::Wei)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<RawGasPrice, E> {
                Ok(RawGasPrice::Keyword(value.to_string()))
            }
        }

        deserializer.deserialize_any(GasPriceVisitor)
    }
}

impl RawConfig {
    fn build(self, root: &Path, env: &dyn EnvSource) -> Result<ProjectConfig> {
        let solidity = match self.solidity {
            RawSolidity::Version(version) => {
                CompilerSettings::new(&version, false, i64::from(DEFAULT_OPTIMIZER_RUNS), false)?
            }
            RawSolidity::Full(compiler) => {
                let settings = CompilerSettings::new(
                    &compiler.version,
                    compiler.settings.optimizer.enabled,
                    compiler.settings.optimizer.runs,
                    compiler.settings.via_ir,
                )?;
                match compiler.settings.evm_version {
                    Some(evm_version) => settings.with_evm_version(evm_version),
                    None => settings,
                }
            }
        };

        let mut networks = Vec::with_capacity(self.networks.len());
        for (name, raw) in self.networks {
            networks.push(raw.build(&name, root, env)?);
        }

        ProjectConfig::new(
            root.to_path_buf(),
            solidity,
            networks,
            self.default_network,
            self.paths,
        )
    }
}

impl RawNetwork {
    fn build(self, name: &str, root: &Path, env: &dyn EnvSource) -> Result<NetworkProfile> {
        validate_network_name(name)?;
        let url = interpolate(&self.url, &format!("networks.{name}.url"), env)?;

        let mut accounts = Vec::with_capacity(self.accounts.len());
        for (index, entry) in self.accounts.into_iter().enumerate() {
            let key = entry
                .into_source()
                .and_then(|source| source.resolve(root, env))
                .map_err(|e| e.context(&format!("networks.{name}.accounts[{index}]")))?;
            accounts.push(key);
        }
        let account_count = accounts.len();

        let mut profile = NetworkProfile::new(name, &url, accounts)?;
        if let Some(chain_id) = self.chain_id {
            profile = profile.with_chain_id(chain_id)?;
        }
        if let Some(timeout) = self.timeout {
            profile = profile.with_timeout_ms(timeout)?;
        }
        if let Some(gas_price) = self.gas_price {
            let gas_price = match gas_price {
                RawGasPrice::Wei(wei) => GasPrice::Wei(wei),
                RawGasPrice::Keyword(word) if word == "auto" => GasPrice::Auto,
                RawGasPrice::Keyword(word) => {
                    return Err(ConfigError::Config(format!(
                        "network '{name}': gasPrice must be \"auto\" or an integer, got '{word}'"
                    )))
                }
            };
            profile = profile.with_gas_price(gas_price)?;
        }

        if profile.get_url().scheme() == "http" && !profile.is_local() {
            warn!(
                "Network '{name}' uses unencrypted http to {}",
                profile.redacted_url()
            );
        }
        debug!(
            "Network '{name}': {} with {account_count} account(s)",
            profile.redacted_url()
        );
        Ok(profile)
    }
}
