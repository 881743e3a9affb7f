// src/bin/rekey.rs
//! Re-encrypt all existing collection keys with a new secret key.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use keyring_rekey::{load_settings, RekeyCommand, RekeyInputs, RekeyReport, Settings};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rekey",
    version,
    about = "Re-encrypt all existing collection keys with a new secret key."
)]
struct Cli {
    /// The current secret key as a Base64 encoded string.
    #[arg(
        short = 'k',
        long = "key",
        value_name = "CURRENT_KEY",
        env = "REKEY_KEY",
        hide_env_values = true
    )]
    key: String,

    /// The current init vector as a Base64 encoded string.
    #[arg(
        short = 'i',
        long = "iv",
        value_name = "CURRENT_IV",
        env = "REKEY_IV",
        hide_env_values = true
    )]
    iv: String,

    /// The new secret key to use as a Base64 encoded string.
    #[arg(
        long = "new-key",
        visible_alias = "k2",
        value_name = "NEW_KEY",
        env = "REKEY_NEW_KEY",
        hide_env_values = true
    )]
    new_key: String,

    /// The new init vector to use as a Base64 encoded string.
    #[arg(
        long = "new-iv",
        visible_alias = "i2",
        value_name = "NEW_IV",
        env = "REKEY_NEW_IV",
        hide_env_values = true
    )]
    new_iv: String,

    /// The root directory containing the collection keyring dir.
    #[arg(short = 'z', long = "root", value_name = "DIR", env = "REKEY_ROOT")]
    root: PathBuf,

    /// Settings file (defaults to $REKEY_CONFIG, then ./rekey.toml).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(report) => {
            println!(
                "Rekeyed {} collection key(s) → {}",
                report.rekeyed,
                report.keyring_dir.display()
            );
            println!("Backup archive: {}", report.backup_archive.display());
            if !report.discarded.is_empty() {
                println!("Discarded non-key entries: {}", report.discarded.join(", "));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<RekeyReport> {
    let settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    init_logging(&settings);
    match &settings.source {
        Some(path) => debug!(path = %path.display(), "loaded settings"),
        None => debug!("no settings file found, using built-in defaults"),
    }

    let Cli {
        key,
        iv,
        new_key,
        new_iv,
        root,
        ..
    } = cli;
    let inputs = RekeyInputs::new(key, iv, new_key, new_iv, root);

    info!(root = %inputs.root_dir.display(), "starting keyring rekey");
    let report = RekeyCommand::from_settings(&settings)
        .run(&inputs)
        .context("rekey failed")?;
    Ok(report)
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
