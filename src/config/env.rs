//! Environment lookups and `${NAME}` placeholder expansion
//!
//! Secrets such as provider API keys and private keys live in the process
//! environment, never in the config file. Lookups go through [`EnvSource`] so
//! loading can be driven from a fixed map in tests.

use crate::error::{ConfigError, Result};
use std::collections::HashMap;

/// Read-only view of environment variables
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Expand every `${NAME}` in `text`. A reference to an unset variable fails.
/// `field` names the setting being expanded and goes into error messages.
pub fn interpolate(text: &str, field: &str, env: &dyn EnvSource) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            ConfigError::Config(format!("{field}: unterminated '${{' placeholder"))
        })?;
        let name = &after[..end];
        if !is_valid_var_name(name) {
            return Err(ConfigError::Config(format!(
                "{field}: invalid environment variable name '{name}'"
            )));
        }
        let value = env.var(name).ok_or_else(|| {
            ConfigError::Config(format!(
                "{field}: environment variable {name} is not set"
            ))
        })?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn is_valid_var_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> HashMap<String, String> {
        HashMap::from([
            ("INFURA_API_KEY".to_string(), "abc123".to_string()),
            ("HOST".to_string(), "rpc.example.org".to_string()),
        ])
    }

    #[test]
    fn test_interpolate_replaces_placeholders() {
        let out = interpolate(
            "https://${HOST}/v3/${INFURA_API_KEY}",
            "networks.sepolia.url",
            &env(),
        )
        .unwrap();
        assert_eq!(out, "https://rpc.example.org/v3/abc123");
    }

    #[test]
    fn test_interpolate_without_placeholders_is_identity() {
        let out = interpolate("http://127.0.0.1:8545", "url", &env()).unwrap();
        assert_eq!(out, "http://127.0.0.1:8545");
    }

    #[test]
    fn test_interpolate_missing_variable() {
        let err = interpolate("https://x/${MISSING_KEY}", "networks.sepolia.url", &env())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Config(
                "networks.sepolia.url: environment variable MISSING_KEY is not set".to_string()
            )
        );
    }

    #[test]
    fn test_interpolate_rejects_malformed_placeholders() {
        assert!(interpolate("https://x/${HOST", "url", &env()).is_err());
        assert!(interpolate("https://x/${}", "url", &env()).is_err());
        assert!(interpolate("https://x/${1ABC}", "url", &env()).is_err());
        assert!(interpolate("https://x/${A-B}", "url", &env()).is_err());
    }
}
