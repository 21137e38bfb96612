//! Configuration integration tests
//!
//! Loads real files from disk the way the CLI does, covering the bundled
//! project config, every account source, and the startup failure modes.

use architect_deploy::{
    ConfigError, Keystore, ProjectConfig, SecretKey, SolcVersion,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DEPLOYER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ADMIN_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
const OPERATOR_KEY: &str = "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_bundled_deploy_toml() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("deploy.toml");
    let vars = env(&[
        ("INFURA_API_KEY", "integration-key"),
        ("SEPOLIA_PRIVATE_KEY", DEPLOYER_KEY),
    ]);

    let config = ProjectConfig::load(&path, &vars).unwrap();
    let solidity = config.get_solidity();
    assert_eq!(solidity.get_version(), SolcVersion::new(0, 8, 28));
    assert!(solidity.is_optimizer_enabled());
    assert_eq!(solidity.get_optimizer_runs(), 10000);
    assert!(solidity.is_via_ir());

    let signer = config.signer("sepolia").unwrap();
    assert_eq!(
        signer.get_primary(),
        &SecretKey::from_hex(DEPLOYER_KEY).unwrap()
    );
    assert_eq!(
        signer.get_network().get_url().as_str(),
        "https://sepolia.infura.io/v3/integration-key"
    );

    // Loading again yields the same record
    assert_eq!(config, ProjectConfig::load(&path, &vars).unwrap());
}

#[test]
fn test_bundled_deploy_toml_without_secrets_fails() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("deploy.toml");

    let err = ProjectConfig::load(&path, &HashMap::<String, String>::new()).unwrap_err();
    assert!(matches!(err, ConfigError::Config(_)));
    assert!(err.to_string().contains("INFURA_API_KEY"));

    let err = ProjectConfig::load(&path, &env(&[("INFURA_API_KEY", "k")])).unwrap_err();
    assert!(err.is_credential());
    assert!(err.to_string().contains("SEPOLIA_PRIVATE_KEY"));
}

#[test]
fn test_all_account_sources_in_one_project() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("keys")).unwrap();
    fs::write(dir.path().join("keys/operator.hex"), OPERATOR_KEY).unwrap();

    let admin = SecretKey::from_hex(ADMIN_KEY).unwrap();
    Keystore::encrypt(&admin, "admin-password")
        .unwrap()
        .save(&dir.path().join("keys/admin.json"))
        .unwrap();

    let config_path = dir.path().join("deploy.toml");
    fs::write(
        &config_path,
        r#"
[solidity]
version = "0.8.28"

[solidity.settings.optimizer]
enabled = true
runs = 10000

[networks.holesky]
url = "https://rpc.holesky.example.org"
chainId = 17000
accounts = [
    { env = "DEPLOYER_KEY" },
    { file = "keys/operator.hex" },
    { keystore = "keys/admin.json", password_env = "ADMIN_PASSWORD" },
]
"#,
    )
    .unwrap();

    let vars = env(&[
        ("DEPLOYER_KEY", DEPLOYER_KEY),
        ("ADMIN_PASSWORD", "admin-password"),
    ]);
    let config = ProjectConfig::load(&config_path, &vars).unwrap();

    let accounts = config.signer("holesky").unwrap().get_accounts().to_vec();
    assert_eq!(
        accounts,
        vec![
            SecretKey::from_hex(DEPLOYER_KEY).unwrap(),
            SecretKey::from_hex(OPERATOR_KEY).unwrap(),
            admin,
        ]
    );
    assert_eq!(config.get_root(), dir.path());
    assert_eq!(config.sources_dir(), dir.path().join("contracts"));
}

#[test]
fn test_network_without_accounts_cannot_sign() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("deploy.toml");
    fs::write(
        &config_path,
        "solidity = \"0.8.28\"\n[networks.local]\nurl = \"http://127.0.0.1:8545\"\n",
    )
    .unwrap();

    let config = ProjectConfig::load(&config_path, &HashMap::<String, String>::new()).unwrap();
    assert!(config.network("local").is_ok());
    let err = config.signer("local").unwrap_err();
    assert!(err.is_credential());
    assert_eq!(
        config.signer("mainnet").unwrap_err(),
        ConfigError::UnknownNetwork("mainnet".to_string())
    );
}

#[test]
fn test_malformed_fields_abort_load() {
    let cases = [
        (
            "[solidity]\nversion = \"0.8.28\"\n[solidity.settings.optimizer]\nruns = 0\n",
            "positive integer",
        ),
        ("solidity = \"0.8\"\n", "invalid compiler version"),
        ("solidity = \"0.8.99\"\n", "unsupported compiler version"),
        (
            "solidity = \"0.8.28\"\n[networks.sepolia]\nurl = \"not a url\"\n",
            "invalid endpoint URL",
        ),
        (
            "[solidity]\nversion = \"0.8.10\"\n[solidity.settings]\nviaIR = true\n",
            "viaIR requires",
        ),
    ];

    let dir = tempdir().unwrap();
    for (i, (text, needle)) in cases.iter().enumerate() {
        let path = dir.path().join(format!("case{i}.toml"));
        fs::write(&path, text).unwrap();
        let err = ProjectConfig::load(&path, &HashMap::<String, String>::new()).unwrap_err();
        assert!(!err.is_credential(), "case {i}: {err}");
        assert!(err.to_string().contains(needle), "case {i}: {err}");
    }
}

#[test]
fn test_garbage_toml_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deploy.toml");
    fs::write(&path, "solidity = [").unwrap();
    let err = ProjectConfig::load(&path, &HashMap::<String, String>::new()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_malformed_key_lines_never_reach_the_error() {
    let raw_key = DEPLOYER_KEY.trim_start_matches("0x");
    let header = "solidity = \"0.8.28\"\n[networks.sepolia]\nurl = \"https://rpc.example.org/v3/${API}\"\n";
    let vars = env(&[("API", "secret-api-key")]);

    let dir = tempdir().unwrap();
    for (i, accounts) in [
        format!("accounts = \"{DEPLOYER_KEY}\"\n"),
        format!("accounts = [\"{DEPLOYER_KEY}\"\n"),
        format!("accounts = [\"{DEPLOYER_KEY}\"]\n"),
    ]
    .iter()
    .enumerate()
    {
        let path = dir.path().join(format!("leak{i}.toml"));
        fs::write(&path, format!("{header}{accounts}")).unwrap();
        let err = ProjectConfig::load(&path, &vars).unwrap_err();
        for rendered in [err.to_string(), format!("{err:?}")] {
            assert!(!rendered.contains(raw_key), "case {i}: {rendered}");
            assert!(!rendered.contains("secret-api-key"), "case {i}: {rendered}");
        }
    }

    let path = dir.path().join("ok.toml");
    fs::write(&path, header).unwrap();
    let config = ProjectConfig::load(&path, &vars).unwrap();
    assert!(!format!("{config:?}").contains("secret-api-key"));
}
