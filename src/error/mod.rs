//! Error handling for configuration loading
//!
//! Every failure aborts startup. There are two classes: configuration errors
//! (malformed or missing fields) and credential errors (missing or invalid key
//! material). Nothing here is retried.

use std::fmt;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Error types for loading and validating the deploy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Malformed or inconsistent configuration field
    Config(String),
    /// Missing or invalid account key material
    Credential(String),
    /// File I/O errors
    Io(String),
    /// TOML / JSON parse errors
    Parse(String),
    /// Requested network is not defined
    UnknownNetwork(String),
}

impl ConfigError {
    /// True for the credential class, false for every configuration-class error
    pub fn is_credential(&self) -> bool {
        matches!(self, ConfigError::Credential(_))
    }

    /// Prefix the message with where the problem was found
    pub fn context(self, origin: &str) -> Self {
        match self {
            ConfigError::Config(msg) => ConfigError::Config(format!("{origin}: {msg}")),
            ConfigError::Credential(msg) => ConfigError::Credential(format!("{origin}: {msg}")),
            other => other,
        }
    }

    /// Convert a TOML error without echoing the offending source line or value.
    /// Only the position, the key on that line, and a scrubbed message remain.
    pub fn from_toml(err: &toml::de::Error, text: &str) -> Self {
        let message = redact_hex_runs(&redact_quoted(err.message().trim()));
        let position = err
            .span()
            .and_then(|span| text.get(..span.start))
            .map(|before| {
                let line = before.matches('\n').count() + 1;
                let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
                let column = before[line_start..].chars().count() + 1;
                let key = key_on_line(&text[line_start..]);
                match key {
                    Some(key) => format!("line {line}, column {column} (key `{key}`): "),
                    None => format!("line {line}, column {column}: "),
                }
            })
            .unwrap_or_default();
        ConfigError::Parse(format!("{position}{}", message.replace('\n', "; ")))
    }
}

/// Shortest hex run treated as key material
const MIN_SECRET_HEX_RUN: usize = 32;

// Values in serde messages appear inside double quotes; field names use backticks
fn redact_quoted(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(open) = rest.find('"') {
        out.push_str(&rest[..=open]);
        match rest[open + 1..].find('"') {
            Some(close) => {
                out.push_str("<redacted>\"");
                rest = &rest[open + 1 + close + 1..];
            }
            None => {
                out.push_str("<redacted>");
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn redact_hex_runs(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut run = String::new();
    for c in message.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_hexdigit() {
            run.push(c);
            continue;
        }
        if run.len() >= MIN_SECRET_HEX_RUN {
            out.push_str("<redacted>");
        } else {
            out.push_str(&run);
        }
        run.clear();
        out.push(c);
    }
    out.pop();
    out
}

// The bare key left of `=`, if the line is a key/value pair
fn key_on_line(line: &str) -> Option<&str> {
    let line = line.lines().next().unwrap_or_default();
    let (key, _) = line.split_once('=')?;
    let key = key.trim();
    let is_bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    is_bare.then_some(key)
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Config(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::Credential(msg) => write!(f, "Credential error: {msg}"),
            ConfigError::Io(msg) => write!(f, "I/O error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::UnknownNetwork(name) => write!(f, "Unknown network: {name}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for ConfigError {
    fn from(err: url::ParseError) -> Self {
        ConfigError::Config(format!("invalid endpoint URL: {err}"))
    }
}
