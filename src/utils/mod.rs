//! Utility functions and helpers
//!
//! Hashing and randomness shared by the credential code.

pub mod crypto;

pub use crypto::{fingerprint, random_bytes, sha256_digest, FINGERPRINT_LEN};
