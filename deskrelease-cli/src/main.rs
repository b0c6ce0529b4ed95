//! deskrelease CLI - list desktop product releases and their files.

mod commands;
mod error;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use deskrelease::config::ConfigFile;

use commands::config::ConfigCommands;
use error::CliError;

/// Discover VMware desktop product releases and the files each publishes.
#[derive(Debug, Parser)]
#[command(name = "deskrelease", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use this configuration file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List configured products
    Products,

    /// List releases of a product, newest first
    Versions {
        /// Product identifier (see `deskrelease products`)
        product: String,

        /// Show every release document instead of one row per release
        #[arg(long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the files of a release
    Files {
        /// Product identifier
        product: String,

        /// Release version (e.g. 17.6.3) or bulletin path from `versions --all`
        selector: String,

        /// Build number, when several builds share a version
        #[arg(long)]
        build: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Download the files of a release and verify their checksums
    Download {
        /// Product identifier
        product: String,

        /// Release version or bulletin path
        selector: String,

        /// Directory to write files into
        #[arg(long, value_name = "DIR")]
        dest: PathBuf,

        /// Build number, when several builds share a version
        #[arg(long)]
        build: Option<String>,

        /// Only download items whose name or file contains this text
        #[arg(long, value_name = "TEXT")]
        only: Option<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(deskrelease::config::config_file_path);
    let config = ConfigFile::load_from(&config_path)?;

    match cli.command {
        Commands::Products => commands::products::run(&config),
        Commands::Versions { product, all, json } => {
            commands::versions::run(&config, &product, all, json)
        }
        Commands::Files {
            product,
            selector,
            build,
            json,
        } => commands::files::run(&config, &product, &selector, build.as_deref(), json),
        Commands::Download {
            product,
            selector,
            dest,
            build,
            only,
        } => commands::download::run(
            &config,
            &product,
            &selector,
            build.as_deref(),
            &dest,
            only.as_deref(),
        ),
        Commands::Config { command } => commands::config::run(command, &config, &config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_files_command() {
        let cli = Cli::try_parse_from([
            "deskrelease",
            "-vv",
            "files",
            "ws-windows",
            "17.6.3",
            "--build",
            "24583834",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Files {
                product,
                selector,
                build,
                json,
            } => {
                assert_eq!(product, "ws-windows");
                assert_eq!(selector, "17.6.3");
                assert_eq!(build.as_deref(), Some("24583834"));
                assert!(!json);
            }
            other => panic!("Expected Files, got {:?}", other),
        }
    }
}
