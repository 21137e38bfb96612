use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Oldest release that can still be fetched as a standalone binary
pub const MIN_SUPPORTED_SOLC: SolcVersion = SolcVersion::new(0, 4, 11);
/// Newest release this crate knows about
pub const MAX_SUPPORTED_SOLC: SolcVersion = SolcVersion::new(0, 8, 30);
/// First release where the IR pipeline is no longer experimental
pub const VIA_IR_MIN_SOLC: SolcVersion = SolcVersion::new(0, 8, 13);

pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

// (minor, first patch, last patch) of every published 0.x line
const RELEASE_LINES: &[(u32, u32, u32)] = &[(4, 11, 26), (5, 0, 17), (6, 0, 12), (7, 0, 6), (8, 0, 30)];

/// A solc release number, `MAJOR.MINOR.PATCH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolcVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SolcVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        SolcVersion {
            major,
            minor,
            patch,
        }
    }

    /// True when this is a published release in the supported range
    pub fn is_supported(&self) -> bool {
        if self.major != 0 {
            return false;
        }
        RELEASE_LINES
            .iter()
            .any(|&(minor, first, last)| self.minor == minor && (first..=last).contains(&self.patch))
    }
}

impl FromStr for SolcVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            ConfigError::Config(format!(
                "invalid compiler version '{s}': expected MAJOR.MINOR.PATCH, e.g. 0.8.28"
            ))
        };

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }
        Ok(SolcVersion::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl fmt::Display for SolcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for SolcVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// EVM hardfork targeted by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvmVersion {
    Homestead,
    TangerineWhistle,
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
    Berlin,
    London,
    Paris,
    Shanghai,
    Cancun,
    Prague,
}

impl EvmVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvmVersion::Homestead => "homestead",
            EvmVersion::TangerineWhistle => "tangerineWhistle",
            EvmVersion::SpuriousDragon => "spuriousDragon",
            EvmVersion::Byzantium => "byzantium",
            EvmVersion::Constantinople => "constantinople",
            EvmVersion::Petersburg => "petersburg",
            EvmVersion::Istanbul => "istanbul",
            EvmVersion::Berlin => "berlin",
            EvmVersion::London => "london",
            EvmVersion::Paris => "paris",
            EvmVersion::Shanghai => "shanghai",
            EvmVersion::Cancun => "cancun",
            EvmVersion::Prague => "prague",
        }
    }
}

impl fmt::Display for EvmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimizerSettings {
    pub enabled: bool,
    pub runs: u32,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

/// Validated compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerSettings {
    version: SolcVersion,
    optimizer: OptimizerSettings,
    #[serde(rename = "viaIR")]
    via_ir: bool,
    #[serde(rename = "evmVersion", skip_serializing_if = "Option::is_none")]
    evm_version: Option<EvmVersion>,
}

impl CompilerSettings {
    /// Build and validate settings. `optimizer_runs` is signed so that a
    /// negative count is reported as a configuration error, not a type error.
    pub fn new(
        version: &str,
        optimizer_enabled: bool,
        optimizer_runs: i64,
        via_ir: bool,
    ) -> Result<Self> {
        let version = version.trim().parse::<SolcVersion>()?;
        if optimizer_runs <= 0 {
            return Err(ConfigError::Config(format!(
                "optimizer runs must be a positive integer, got {optimizer_runs}"
            )));
        }
        let runs = u32::try_from(optimizer_runs).map_err(|_| {
            ConfigError::Config(format!(
                "optimizer runs must be at most {}, got {optimizer_runs}",
                u32::MAX
            ))
        })?;

        let settings = CompilerSettings {
            version,
            optimizer: OptimizerSettings {
                enabled: optimizer_enabled,
                runs,
            },
            via_ir,
            evm_version: None,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_evm_version(mut self, evm_version: EvmVersion) -> Self {
        self.evm_version = Some(evm_version);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.version.is_supported() {
            return Err(ConfigError::Config(format!(
                "unsupported compiler version {}: supported releases are {} through {}",
                self.version, MIN_SUPPORTED_SOLC, MAX_SUPPORTED_SOLC
            )));
        }
        if self.optimizer.runs == 0 {
            return Err(ConfigError::Config(
                "optimizer runs must be a positive integer, got 0".to_string(),
            ));
        }
        if self.via_ir && self.version < VIA_IR_MIN_SOLC {
            return Err(ConfigError::Config(format!(
                "viaIR requires compiler version {VIA_IR_MIN_SOLC} or newer, got {}",
                self.version
            )));
        }
        Ok(())
    }

    pub fn get_version(&self) -> SolcVersion {
        self.version
    }

    pub fn get_optimizer(&self) -> OptimizerSettings {
        self.optimizer
    }

    pub fn is_optimizer_enabled(&self) -> bool {
        self.optimizer.enabled
    }

    pub fn get_optimizer_runs(&self) -> u32 {
        self.optimizer.runs
    }

    pub fn is_via_ir(&self) -> bool {
        self.via_ir
    }

    pub fn get_evm_version(&self) -> Option<EvmVersion> {
        self.evm_version
    }

    /// The `settings` object of a solc standard-JSON input
    pub fn solc_settings_json(&self) -> serde_json::Value {
        let mut settings = serde_json::json!({
            "optimizer": {
                "enabled": self.optimizer.enabled,
                "runs": self.optimizer.runs,
            },
            "viaIR": self.via_ir,
        });
        if let Some(evm_version) = self.evm_version {
            settings["evmVersion"] = serde_json::Value::from(evm_version.as_str());
        }
        settings
    }
}

impl fmt::Display for CompilerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "solc {} (optimizer: {}, runs: {}, viaIR: {}",
            self.version,
            if self.optimizer.enabled { "on" } else { "off" },
            self.optimizer.runs,
            self.via_ir
        )?;
        if let Some(evm_version) = self.evm_version {
            write!(f, ", evm: {evm_version}")?;
        }
        write!(f, ")")
    }
}
