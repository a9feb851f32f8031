//! Command-line interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Firmware-version popup checker.
#[derive(Debug, Parser)]
#[command(name = "fwcheck", version, about)]
pub struct Cli {
    /// Path to the YAML config file (default: ./fwcheck.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one manual check against the currently visible popup
    Check(CheckArgs),

    /// Poll for popups until interrupted
    Watch(WatchArgs),

    /// Show recent check history
    History {
        /// Number of rows to show, newest first
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Emit rows as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Check inputs shared by `check` and `watch`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Expected firmware version
    #[arg(short, long)]
    pub input: String,

    /// Override the configured title key (empty disables title mode)
    #[arg(long)]
    pub title_contains: Option<String>,

    /// Override the configured content key (empty disables confirmation)
    #[arg(long)]
    pub content_contains: Option<String>,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `watch`.
#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub check: CheckArgs,

    /// Also watch the vendor tool and trigger the popup on device plug-in
    #[arg(long)]
    pub watch_device: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from(["fwcheck", "check", "--input", "24071721"]);
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.input, "24071721");
                assert!(args.title_contains.is_none());
                assert!(!args.json);
            }
            _ => panic!("expected check subcommand"),
        }
    }

    #[test]
    fn test_parse_watch_with_overrides() {
        let cli = Cli::parse_from([
            "fwcheck",
            "watch",
            "--input",
            "1.0",
            "--title-contains",
            "",
            "--content-contains",
            "Firmware Version",
            "--watch-device",
        ]);
        match cli.command {
            Command::Watch(args) => {
                assert_eq!(args.check.title_contains.as_deref(), Some(""));
                assert_eq!(
                    args.check.content_contains.as_deref(),
                    Some("Firmware Version")
                );
                assert!(args.watch_device);
            }
            _ => panic!("expected watch subcommand"),
        }
    }

    #[test]
    fn test_parse_history_defaults() {
        let cli = Cli::parse_from(["fwcheck", "history"]);
        match cli.command {
            Command::History { limit, json } => {
                assert_eq!(limit, 20);
                assert!(!json);
            }
            _ => panic!("expected history subcommand"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["fwcheck", "check", "--input", "1", "--config", "x.yaml"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.yaml")));
    }
}
