//! CLI command definitions.

pub mod sessions;

use clap::{Parser, Subcommand, ValueEnum};
use timetable_core::schedule::EntityKind;

/// Cached, optimistic client for the timetable API.
#[derive(Debug, Parser)]
#[command(name = "timetable")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Server base URL. Overrides the configured one.
    #[arg(long, env = "TIMETABLE_URL")]
    pub base_url: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List a collection, from the cache when possible.
    List {
        /// Collection: days, modules, sections, sessions, spaces, professors, periods, sizes.
        kind: EntityKind,
    },
    /// Re-read a collection from the server and refresh its cache.
    Refresh {
        kind: EntityKind,
    },
    /// Drop cached collections.
    ClearCache {
        /// Only this collection. All of them when omitted.
        kind: Option<EntityKind>,
    },
    /// Session mutations.
    Sessions(sessions::SessionsCommand),
    /// Print the size category for a capacity.
    Classify {
        #[arg(allow_negative_numbers = true)]
        capacity: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["timetable", "--format", "json", "list", "Spaces"]).unwrap();

        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::List {
                kind: EntityKind::Spaces
            }
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["timetable", "list", "rooms"]).is_err());
    }

    #[test]
    fn test_clear_cache_kind_optional() {
        let cli = Cli::try_parse_from(["timetable", "clear-cache"]).unwrap();
        assert!(matches!(cli.command, Commands::ClearCache { kind: None }));
    }

    #[test]
    fn test_classify_negative() {
        let cli = Cli::try_parse_from(["timetable", "classify", "-5"]).unwrap();
        assert!(matches!(cli.command, Commands::Classify { capacity: -5 }));
    }
}
