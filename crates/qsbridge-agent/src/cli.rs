use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "qsbridge-agent",
    version,
    about = "Opens the Playnite QuickSearch overlay and types a query into it"
)]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log every input event instead of sending it to the OS
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Handle a trigger URI: open the overlay and type its query
    Open {
        /// e.g. playnite://quicksearch/q/zelda
        uri: String,
    },

    /// Scan the overlay settings and print the detected hotkeys
    Detect,

    /// Print the query a trigger URI carries
    ParseUri { uri: String },

    /// Write the default config file if none exists
    InitConfig,
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
    fn test_open_with_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "qsbridge-agent",
            "open",
            "playnite://quicksearch/q/zelda",
            "--dry-run",
            "--config",
            "/tmp/cfg.toml",
        ]);

        assert!(cli.dry_run);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cfg.toml")));
        assert!(matches!(cli.command, Command::Open { ref uri } if uri == "playnite://quicksearch/q/zelda"));
    }

    #[test]
    fn test_parse_uri_subcommand_name_is_kebab_case() {
        let cli = Cli::parse_from(["qsbridge-agent", "parse-uri", "x://y?q=a"]);

        assert!(matches!(cli.command, Command::ParseUri { .. }));
        assert!(!cli.dry_run);
    }
}
