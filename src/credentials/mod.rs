//! Account credentials
//!
//! Private keys are sourced from the environment, a key file, or an
//! encrypted keystore. They are validated as secp256k1 scalars, held in
//! zeroize-on-drop storage, and only ever shown as a short fingerprint.

pub mod keystore;
pub mod secret;
pub mod source;

pub use keystore::{Keystore, KEYSTORE_VERSION, MIN_PASSWORD_LEN};
pub use secret::{SecretKey, SECRET_KEY_LEN};
pub use source::{AccountEntry, AccountFields, AccountSource};
