//! # Architect Deploy - Build/Deploy Configuration for Solidity Projects
//!
//! This crate loads the one configuration record my contract projects need:
//! which solc release to compile with, how to optimise, and which networks
//! to deploy to with which accounts. When I come back to this code, here's
//! what I need to remember:
//!
//! ## What It Does
//! - **Compiler Settings**: solc version, optimizer toggle and runs, viaIR, EVM target
//! - **Network Profiles**: named endpoints plus the accounts that sign for them
//! - **Fail Fast**: the whole record is validated on load or nothing is returned
//! - **Secret Hygiene**: keys come from env vars, key files or encrypted
//!   keystores, never from the config file, and are never printed
//!
//! ## How I Organized My Code
//! - `config/`: the record itself, TOML loading, `${VAR}` expansion
//! - `credentials/`: private keys, where they come from, the keystore format
//! - `error/`: configuration vs credential errors
//! - `utils/`: hashing and randomness helpers
//! - `cli/`: command-line interface
//!
//! ## Where To Start
//! 1. `config/settings.rs` for `ProjectConfig::load`
//! 2. `config/compiler.rs` for supported solc releases
//! 3. `credentials/source.rs` for how account keys are resolved

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod utils;

#[cfg(test)]
pub mod testing;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{
    global, init_global, resolve_config_path, CompilerSettings, EnvSource, EvmVersion, GasPrice,
    NetworkProfile, ProcessEnv, ProjectConfig, ProjectPaths, SigningProfile, SolcVersion,
    GLOBAL_CONFIG,
};
pub use credentials::{AccountSource, Keystore, SecretKey};
pub use error::{ConfigError, Result};
