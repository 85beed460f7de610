//! LogoGuard CLI - check logos against a reference set.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use logoguard_core::{HashAlgorithm, DEFAULT_EPOCHS};
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod render;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success (every upload legitimate)
  1   General error
  64  Unsupported upload type
  65  An upload is not legitimate or has no match
  66  Reference directory or upload cannot be read";

#[derive(Parser)]
#[command(name = "logoguard")]
#[command(author, version, about = "Perceptual logo verification against a reference set", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory of reference logos (overrides LOGOGUARD_REFERENCE_DIR)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub references: Option<PathBuf>,

    /// Maximum hash difference still considered legitimate (overrides LOGOGUARD_THRESHOLD)
    #[arg(short, long, global = true, value_name = "BITS")]
    pub threshold: Option<u32>,

    /// Hash algorithm: average or blockhash (overrides LOGOGUARD_HASH_ALGORITHM)
    #[arg(short, long, global = true, value_name = "ALG")]
    pub algorithm: Option<HashAlgorithm>,

    /// Suppress human-readable output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check uploaded logos against the reference set
    Verify {
        /// Logo images to check (jpg, jpeg or png)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Show synthetic model performance analytics
        #[arg(long)]
        performance: bool,

        /// Show the distribution of hash differences to every reference
        #[arg(long)]
        distribution: bool,

        /// Show the legitimate vs. not legitimate breakdown of this session
        #[arg(long)]
        legitimacy: bool,

        /// Number of epochs in the performance analytics
        #[arg(long, default_value_t = DEFAULT_EPOCHS)]
        epochs: u32,
    },

    /// Build the reference index and list its hashes
    Index {
        /// Print the index as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the perceptual hash of an image
    Hash {
        /// Image to hash
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the hash as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let global = cli.global;

    match cli.command {
        Commands::Verify {
            files,
            json,
            performance,
            distribution,
            legitimacy,
            epochs,
        } => commands::verify::execute(
            &global,
            files,
            commands::verify::VerifyOptions {
                json,
                performance,
                distribution,
                legitimacy,
                epochs,
            },
        ),
        Commands::Index { json } => commands::index::execute(&global, json),
        Commands::Hash { file, json } => commands::hash::execute(&global, file, json),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli) {
        let exit = ExitCode::from_anyhow(&err);
        if let Some(message) = &exit.message {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
        std::process::exit(exit.code);
    }
}
