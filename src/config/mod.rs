//! Configuration management
//!
//! This module loads the project's build/deploy record: compiler settings
//! plus named network profiles. The record is validated as a whole when it is
//! loaded and is read-only afterwards.

pub mod compiler;
pub mod env;
pub mod network;
pub mod settings;

pub use compiler::{
    CompilerSettings, EvmVersion, OptimizerSettings, SolcVersion, MAX_SUPPORTED_SOLC,
    MIN_SUPPORTED_SOLC, VIA_IR_MIN_SOLC,
};
pub use env::{interpolate, EnvSource, ProcessEnv};
pub use network::{GasPrice, NetworkProfile, DEFAULT_TIMEOUT_MS};
pub use settings::{
    global, init_global, resolve_config_path, ProjectConfig, ProjectPaths, SigningProfile,
    CONFIG_PATH_KEY, DEFAULT_CONFIG_FILE, GLOBAL_CONFIG, MAX_CONFIG_BYTES,
};
