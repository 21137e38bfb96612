// Entry point for the architect-deploy CLI
use architect_deploy::{
    init_global, resolve_config_path, Command, EnvSource, Keystore, Opt, ProcessEnv,
    ProjectConfig, SecretKey,
};
use clap::Parser;
use log::{error, LevelFilter};
use std::path::PathBuf;
use std::process;
use zeroize::Zeroizing;

fn main() {
    // Info level shows what was loaded without being noisy; RUST_LOG still overrides
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    // Any configuration or credential problem aborts startup with exit code 1
    if let Err(e) = run_command(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let env = ProcessEnv;

    match opt.command {
        // When I want to move a raw key out of the environment into an encrypted file.
        // This one does not need a project config at all
        Command::KeystoreEncrypt {
            output,
            key_env,
            password_env,
        } => {
            let key_hex = Zeroizing::new(
                env.var(&key_env)
                    .ok_or_else(|| format!("environment variable {key_env} is not set"))?,
            );
            let password = Zeroizing::new(
                env.var(&password_env)
                    .ok_or_else(|| format!("environment variable {password_env} is not set"))?,
            );
            // I validate the key before encrypting so a typo never ends up on disk
            let key = SecretKey::from_hex(&key_hex)?;
            Keystore::encrypt(&key, &password)?.save(&output)?;
            // I only ever print the fingerprint, never the key itself
            println!(
                "Encrypted key {} into {}",
                key.fingerprint(),
                output.display()
            );
        }
        // When I just want to know whether the config loads cleanly before deploying
        Command::Validate => {
            let (path, _) = load_config(opt.config, &env)?;
            println!("Configuration OK: {}", path.display());
        }
        // When I want to see the resolved config; URLs and keys come out redacted
        Command::Show { json } => {
            let (_, config) = load_config(opt.config, &env)?;
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                print!("{config}");
            }
        }
        // When I want a quick list of the networks I can deploy to
        Command::Networks => {
            let (_, config) = load_config(opt.config, &env)?;
            // I mark the default network so it's obvious where a bare deploy goes
            let default = config.get_default_network();
            for network in config.get_networks() {
                let marker = if Some(network.get_name()) == default {
                    " (default)"
                } else {
                    ""
                };
                println!("{network}{marker}");
            }
        }
        // When I want the exact settings fragment I hand to solc's standard JSON input
        Command::SolcSettings => {
            let (_, config) = load_config(opt.config, &env)?;
            let settings = config.get_solidity().solc_settings_json();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        // When I want to check which accounts will sign on a network
        Command::Signer { network } => {
            let (_, config) = load_config(opt.config, &env)?;
            // I pick the requested network (or the default); signing fails if it has no accounts
            let name = config.selected_network(network.as_deref())?.get_name();
            let signer = config.signer(name)?;
            println!(
                "Network {} is ready to sign with {} account(s):",
                name,
                signer.get_accounts().len()
            );
            for key in signer.get_accounts() {
                println!("  {}", key.fingerprint());
            }
        }
    }
    Ok(())
}

// Load the record once and install it as the process-wide configuration
fn load_config(
    flag: Option<PathBuf>,
    env: &ProcessEnv,
) -> Result<(PathBuf, &'static ProjectConfig), Box<dyn std::error::Error>> {
    let path = resolve_config_path(flag, env);
    let config = init_global(ProjectConfig::load(&path, env)?)?;
    Ok((path, config))
}
