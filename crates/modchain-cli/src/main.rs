#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use modchain_core::paths::CHAIN_ENV;
use modchain_core::Config;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modchain")]
#[command(author, version, about = "Resolve module metadata across an ordered repository chain", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Chain configuration file (defaults to the nearest modchain.json)
    #[arg(long, global = true, value_name = "FILE", env = CHAIN_ENV)]
    chain: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// List the configured repositories in chain order
    Repos,

    /// Resolve component metadata against the chain
    Resolve {
        /// Component identities (`group:name:version` or `project <path>`)
        #[arg(required = true)]
        ids: Vec<String>,

        /// Treat the components as changing and bypass cached metadata
        #[arg(long)]
        changing: bool,
    },

    /// Report whether fetching a component's metadata is cheap
    Cost {
        /// Component identity
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json)
        .with_chain_file(cli.chain);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(command) => {
            logging::init(config.verbosity, config.json_logs);
            match command {
                Commands::Repos => commands::repos::run(&config, cli.json),
                Commands::Resolve { ids, changing } => {
                    commands::resolve::run(&config, &ids, changing, cli.json)
                }
                Commands::Cost { id } => commands::cost::run(&config, &id, cli.json),
                Commands::Version => commands::version::run(),
            }
        }
    }
}
