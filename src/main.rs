//! Mnemonic account generator CLI
//!
//! Creates BIP39 mnemonics and derives Ethereum accounts from them.
//! Only use on a computer you fully trust, ideally one that is offline.

use clap::{Parser, Subcommand};
use mnemonic_accounts::config::env_vars;
use mnemonic_accounts::render::{render_json, render_text};
use mnemonic_accounts::{Config, Error, GeneratorState, MnemonicStrength, Result, WalletBackend};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "mnemonic-accounts")]
#[command(about = "Generate Ethereum addresses from a mnemonic (secret recovery phrase)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new random mnemonic
    New {
        /// Number of words (12, 15, 18, 21 or 24)
        #[arg(short, long)]
        words: Option<MnemonicStrength>,
    },

    /// Check a mnemonic against the BIP39 word list and checksum
    Validate {
        /// Mnemonic phrase (prompted for when omitted and MNEMONIC is unset)
        #[arg(short, long)]
        mnemonic: Option<String>,
    },

    /// Derive accounts at m/44'/60'/0'/0/<index> (can be slow for large counts!)
    Generate {
        /// Mnemonic phrase (prompted for when omitted and MNEMONIC is unset)
        #[arg(short, long)]
        mnemonic: Option<String>,

        /// Number of accounts to generate
        #[arg(short = 'n', long, value_parser = parse_count)]
        count: Option<u32>,

        /// Display private keys (do not use with untrusted people viewing your screen)
        #[arg(long)]
        show_private_keys: bool,

        /// BIP39 passphrase mixed into the seed
        #[arg(long)]
        passphrase: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also print the extended public key of m/44'/60'/0'/0
        #[arg(long)]
        xpub: bool,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> Result<ExitCode> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .apply_env();
    config.validate()?;

    match cli.command {
        Commands::New { words } => run_new(config, words),
        Commands::Validate { mnemonic } => run_validate(config, mnemonic),
        Commands::Generate {
            mnemonic,
            count,
            show_private_keys,
            passphrase,
            json,
            xpub,
        } => {
            let mut config = config;
            if let Some(count) = count {
                config.account_count = count;
            }
            if show_private_keys {
                config.show_private_keys = true;
            }
            if let Some(passphrase) = passphrase {
                config.passphrase = passphrase;
            }
            run_generate(config, mnemonic, json, xpub)
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_new(mut config: Config, words: Option<MnemonicStrength>) -> Result<ExitCode> {
    if let Some(words) = words {
        config.word_count = words;
    }

    let mut state = GeneratorState::from_config(&config);
    state.create_new_mnemonic();
    if let Some(error) = state.error() {
        eprintln!("{}", error);
        return Ok(ExitCode::FAILURE);
    }

    println!("{}", state.mnemonic());
    Ok(ExitCode::SUCCESS)
}

fn run_validate(config: Config, mnemonic: Option<String>) -> Result<ExitCode> {
    let phrase = read_mnemonic(mnemonic)?;
    let state = GeneratorState::from_config(&config);

    if state.backend().is_valid_mnemonic(&phrase) {
        println!("valid");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("invalid");
        Ok(ExitCode::FAILURE)
    }
}

fn run_generate(
    config: Config,
    mnemonic: Option<String>,
    json: bool,
    xpub: bool,
) -> Result<ExitCode> {
    let phrase = read_mnemonic(mnemonic)?;

    let mut state = GeneratorState::from_config(&config);
    state.set_mnemonic(&phrase);
    state.generate_accounts();

    // Taken from the same derivation as the accounts, so it never fails on its own
    let base_xpub = state.base_xpub().filter(|_| xpub);

    if json {
        println!("{}", render_json(&state, base_xpub)?);
    } else {
        print!("{}", render_text(&state));
        if let Some(base_xpub) = base_xpub {
            println!();
            println!("Base xpub (m/44'/60'/0'/0): {}", base_xpub);
        }
    }

    if state.error().is_some() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Flag, then the MNEMONIC environment variable, then a hidden prompt
fn read_mnemonic(flag: Option<String>) -> Result<Zeroizing<String>> {
    if let Some(phrase) = flag {
        tracing::warn!("Mnemonic passed on the command line may end up in shell history");
        return Ok(Zeroizing::new(phrase));
    }

    if let Ok(phrase) = std::env::var(env_vars::MNEMONIC) {
        tracing::debug!("Using mnemonic from {}", env_vars::MNEMONIC);
        return Ok(Zeroizing::new(phrase));
    }

    let phrase = rpassword::prompt_password("Secret Recovery Phrase: ").map_err(Error::Io)?;
    Ok(Zeroizing::new(phrase))
}

fn parse_count(value: &str) -> std::result::Result<u32, String> {
    Ok(mnemonic_accounts::session::parse_account_count(value))
}
