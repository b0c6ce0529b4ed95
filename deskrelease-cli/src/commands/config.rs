//! `config`: inspect or create the configuration file.

use std::path::Path;

use clap::Subcommand;
use deskrelease::config::ConfigFile;

use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration file location
    Path,

    /// Print the effective configuration (file merged over defaults)
    Show,

    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(command: ConfigCommands, config: &ConfigFile, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            print!("{}", config.to_ini_string()?);
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            config.save_to(path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deskrelease").join("config.ini");
        let config = ConfigFile::default();

        run(ConfigCommands::Init { force: false }, &config, &path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[catalog]\n").unwrap();

        let result = run(ConfigCommands::Init { force: false }, &ConfigFile::default(), &path);

        assert!(matches!(result, Err(CliError::Config(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[catalog]\n");
    }
}
