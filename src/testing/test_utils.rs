//! Test utilities for configuration tests

use std::collections::HashMap;

/// Well-known development key (first account of the local test node mnemonic)
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
/// Second account of the same mnemonic
pub const TEST_PRIVATE_KEY_2: &str =
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Environment with the variables referenced by [`sample_toml`]
pub fn test_env() -> HashMap<String, String> {
    HashMap::from([
        ("INFURA_API_KEY".to_string(), "test-infura-key".to_string()),
        (
            "SEPOLIA_PRIVATE_KEY".to_string(),
            TEST_PRIVATE_KEY.to_string(),
        ),
    ])
}

/// The reference project configuration
pub fn sample_toml() -> &'static str {
    r#"
defaultNetwork = "sepolia"

[solidity]
version = "0.8.28"

[solidity.settings]
viaIR = true

[solidity.settings.optimizer]
enabled = true
runs = 10000

[networks.sepolia]
url = "https://sepolia.infura.io/v3/${INFURA_API_KEY}"
accounts = [{ env = "SEPOLIA_PRIVATE_KEY" }]
chainId = 11155111

[networks.local]
url = "http://127.0.0.1:8545"
"#
}
