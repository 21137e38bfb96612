use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "architect-deploy",
    about = "Validate and inspect a Solidity project's build/deploy configuration"
)]
pub struct Opt {
    #[arg(
        long,
        global = true,
        help = "Config file (default: $ARCHITECT_DEPLOY_CONFIG or ./deploy.toml)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "validate", about = "Load and validate the configuration")]
    Validate,
    #[command(name = "show", about = "Print the configuration with secrets redacted")]
    Show {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
    #[command(name = "networks", about = "List configured networks")]
    Networks,
    #[command(
        name = "solc-settings",
        about = "Print the compiler settings as a solc standard-JSON fragment"
    )]
    SolcSettings,
    #[command(
        name = "signer",
        about = "Check that a network has accounts available for signing"
    )]
    Signer {
        #[arg(long, help = "Network name (default: defaultNetwork)")]
        network: Option<String>,
    },
    #[command(
        name = "keystore-encrypt",
        about = "Encrypt a private key from the environment into a keystore file"
    )]
    KeystoreEncrypt {
        #[arg(help = "Output keystore path")]
        output: PathBuf,
        #[arg(long, help = "Environment variable holding the hex private key")]
        key_env: String,
        #[arg(long, help = "Environment variable holding the keystore password")]
        password_env: String,
    },
}
