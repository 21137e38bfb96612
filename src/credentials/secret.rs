use crate::error::{ConfigError, Result};
use crate::utils::fingerprint;
use serde::{Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length in bytes of an account private key
pub const SECRET_KEY_LEN: usize = 32;

/// secp256k1 group order; valid private keys are in `1..ORDER`
const SECP256K1_ORDER: [u8; SECRET_KEY_LEN] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Account private key, zeroed on drop and never printed
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; SECRET_KEY_LEN],
}

impl SecretKey {
    /// Parse a hex key with an optional `0x` prefix. Surrounding whitespace is
    /// ignored so key files with a trailing newline work.
    pub fn from_hex(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != SECRET_KEY_LEN * 2 {
            return Err(ConfigError::Credential(format!(
                "private key must be {} hex characters, got {}",
                SECRET_KEY_LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LEN]);
        // The decode error names the offending character, so it is not forwarded.
        hex::decode_to_slice(digits, &mut bytes[..])
            .map_err(|_| ConfigError::Credential("private key is not valid hex".to_string()))?;
        Self::from_bytes(&bytes[..])
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let bytes: [u8; SECRET_KEY_LEN] = raw.try_into().map_err(|_| {
            ConfigError::Credential(format!(
                "private key must be {SECRET_KEY_LEN} bytes, got {}",
                raw.len()
            ))
        })?;
        let key = SecretKey { bytes };

        if key.bytes.iter().all(|b| *b == 0) {
            return Err(ConfigError::Credential(
                "private key must not be zero".to_string(),
            ));
        }
        if key.bytes >= SECP256K1_ORDER {
            return Err(ConfigError::Credential(
                "private key is outside the secp256k1 range".to_string(),
            ));
        }
        Ok(key)
    }

    /// Raw key bytes (use carefully)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Short non-reversible tag for logs and listings
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.bytes)
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        // constant time
        let mut diff = 0u8;
        for (x, y) in self.bytes.iter().zip(other.bytes.iter()) {
            diff |= x ^ y;
        }
        diff == 0
    }
}

impl Eq for SecretKey {}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl Serialize for SecretKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("redacted:{}", self.fingerprint()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TEST_PRIVATE_KEY, TEST_PRIVATE_KEY_2};

    #[test]
    fn test_parse_with_and_without_prefix() {
        let a = SecretKey::from_hex(TEST_PRIVATE_KEY).unwrap();
        let b = SecretKey::from_hex(TEST_PRIVATE_KEY.trim_start_matches("0x")).unwrap();
        let c = SecretKey::from_hex(&format!("  {TEST_PRIVATE_KEY}\n")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(hex::encode(a.as_bytes()), TEST_PRIVATE_KEY.trim_start_matches("0x"));
    }

    #[test]
    fn test_distinct_keys_compare_unequal() {
        let a = SecretKey::from_hex(TEST_PRIVATE_KEY).unwrap();
        let b = SecretKey::from_hex(TEST_PRIVATE_KEY_2).unwrap();
        assert_ne!(a, b);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = SecretKey::from_hex("0x1234").unwrap_err();
        assert!(err.is_credential());
        assert!(err.to_string().contains("64 hex characters"));
        assert!(SecretKey::from_bytes(&[1u8; 31]).is_err());
    }

    #[test]
    fn test_rejects_non_hex_without_echoing_it() {
        let bad = format!("0x{}", "zz".repeat(32));
        let err = SecretKey::from_hex(&bad).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Credential("private key is not valid hex".to_string())
        );
    }

    #[test]
    fn test_rejects_zero_and_out_of_range() {
        assert!(SecretKey::from_bytes(&[0u8; 32]).is_err());
        assert!(SecretKey::from_bytes(&SECP256K1_ORDER).is_err());
        assert!(SecretKey::from_bytes(&[0xFF; 32]).is_err());

        let mut below = SECP256K1_ORDER;
        below[31] -= 1;
        assert!(SecretKey::from_bytes(&below).is_ok());
    }

    #[test]
    fn test_debug_and_serialize_redact() {
        let key = SecretKey::from_hex(TEST_PRIVATE_KEY).unwrap();
        let raw = TEST_PRIVATE_KEY.trim_start_matches("0x");

        let debug = format!("{key:?}");
        assert!(!debug.contains(raw));
        assert!(debug.contains(&key.fingerprint()));

        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"redacted:{}\"", key.fingerprint()));
    }
}
