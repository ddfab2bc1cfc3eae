//! # dircase CLI
//!
//! Query and toggle Windows per-directory case sensitivity.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dircase_config::{log_cli_debug, log_cli_warn};
use dircase_config::logging::{init_logging, LogLevel};
use dircase_core::{CaseError, CaseSensitivity, PlatformInfo};

mod demo;

/// dircase - per-directory case sensitivity for Windows
#[derive(Parser)]
#[command(name = "dircase")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory used to probe for OS support (created if missing)
    #[arg(long = "scratch-dir", env = "DIRCASE_SCRATCH_DIR", global = true)]
    scratch_dir: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether this OS supports directory case sensitivity
    Supported,

    /// Report whether a directory is case sensitive
    Get {
        #[arg(value_name = "DIR")]
        directory: PathBuf,
    },

    /// Enable or disable case sensitivity on a directory
    Set {
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        #[arg(value_enum)]
        state: Toggle,
    },

    /// Copy the parent's case sensitivity onto an existing directory
    Inherit {
        #[arg(value_name = "DIR")]
        directory: PathBuf,
    },

    /// Create a directory, optionally case sensitive
    Create {
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Make the new directory case sensitive
        #[arg(long)]
        enable: bool,
    },

    /// Create a directory with its parent's case sensitivity
    CreateInherit {
        #[arg(value_name = "DIR")]
        directory: PathBuf,
    },

    /// Walk through the feature in a scratch tree under BASE
    Demo {
        /// Defaults to the current directory
        #[arg(value_name = "BASE")]
        base: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file locations
    Path,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    #[value(alias = "enable", alias = "true")]
    On,
    #[value(alias = "disable", alias = "false")]
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = dircase_config::config().clone();

    let configured = config.log.level.parse::<LogLevel>();
    let level = match cli.verbose {
        0 => configured.clone().unwrap_or(LogLevel::Warn),
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    init_logging(level);
    if let Err(e) = configured {
        log_cli_warn!("Ignoring configured [log] level", error = tracing::field::display(e));
    }

    let scratch_dir = cli
        .scratch_dir
        .clone()
        .unwrap_or_else(|| config.probe.scratch_dir.clone());
    log_cli_debug!(
        "Using scratch directory",
        scratch = tracing::field::display(scratch_dir.display())
    );
    let cs = CaseSensitivity::new(PlatformInfo, scratch_dir);

    match cli.command {
        Commands::Supported => {
            let supported = cs
                .is_supported()
                .context("An error occurred while checking directory case sensitivity support")?;
            println!("{}", if supported { "Yes" } else { "No" });
            Ok(())
        }
        Commands::Get { directory } => {
            let enabled = cs.is_case_sensitive(&directory)?;
            println!("{}: {}", directory.display(), state_word(enabled));
            Ok(())
        }
        Commands::Set { directory, state } => cmd_set(&cs, &directory, state.enabled()),
        Commands::Inherit { directory } => {
            let enabled = cs.inherit(&directory)?;
            println!("{}: {} (inherited)", directory.display(), state_word(enabled));
            Ok(())
        }
        Commands::Create { directory, enable } => {
            cs.create(&directory, enable)?;
            println!("{}: created, {}", directory.display(), state_word(enable));
            Ok(())
        }
        Commands::CreateInherit { directory } => {
            let enabled = cs.create_inherit(&directory)?;
            println!(
                "{}: created, {} (inherited)",
                directory.display(),
                state_word(enabled)
            );
            Ok(())
        }
        Commands::Demo { base } => {
            let base = match base {
                Some(base) => base,
                None => std::env::current_dir().context("Failed to get current directory")?,
            };
            demo::run(&cs, &base)
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                print!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigCommands::Path => {
                match dircase_config::Config::global_config_path() {
                    Some(path) => println!("Global: {}", path.display()),
                    None => println!("Global: (no home directory)"),
                }
                println!("Project: {}", Path::new(".dircase/config.toml").display());
                Ok(())
            }
        },
    }
}

fn cmd_set(cs: &CaseSensitivity, directory: &Path, enable: bool) -> Result<()> {
    match cs.set_case_sensitive(directory, enable) {
        Ok(()) => {
            println!("{}: {}", directory.display(), state_word(enable));
            Ok(())
        }
        Err(e @ CaseError::DirectoryNotEmpty(_)) => {
            Err(anyhow::Error::new(e).context("Remove or rename the colliding entries and retry"))
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn state_word(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_word() {
        assert_eq!(state_word(true), "enabled");
        assert_eq!(state_word(false), "disabled");
    }

    #[test]
    fn test_set_accepts_aliases() {
        for (word, enabled) in [("on", true), ("enable", true), ("false", false), ("off", false)] {
            let cli = Cli::try_parse_from(["dircase", "set", "dir", word]).unwrap();
            match cli.command {
                Commands::Set { state, .. } => assert_eq!(state.enabled(), enabled, "{word}"),
                _ => panic!("expected set"),
            }
        }
    }
}
