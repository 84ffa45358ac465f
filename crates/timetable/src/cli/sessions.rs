//! Session CLI commands.

use clap::{Parser, Subcommand};
use timetable_core::schedule::SlotChange;

/// Session mutation commands.
#[derive(Debug, Parser)]
pub struct SessionsCommand {
    #[command(subcommand)]
    pub action: SessionsAction,
}

/// Available session actions.
#[derive(Debug, Subcommand)]
pub enum SessionsAction {
    /// Delete one or more sessions. Duplicate ids are ignored.
    Delete {
        /// Session IDs.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Move sessions of a section to new day/module slots.
    Move {
        /// Section that owns every moved session.
        section_id: String,
        /// `<session-id>=<day-module-id>` pairs.
        #[arg(required = true, value_parser = parse_slot_change)]
        moves: Vec<SlotChange>,
    },
}

/// Parses `<session-id>=<day-module-id>`.
pub fn parse_slot_change(s: &str) -> Result<SlotChange, String> {
    let (session_id, day_module_id) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <session-id>=<day-module-id>, got {:?}", s))?;
    let session_id = session_id.trim();
    if session_id.is_empty() {
        return Err(format!("missing session id in {:?}", s));
    }
    let day_module_id = day_module_id
        .trim()
        .parse()
        .map_err(|_| format!("invalid day module id in {:?}", s))?;
    Ok(SlotChange::new(session_id, day_module_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn test_parse_slot_change() {
        assert_eq!(parse_slot_change("s-1=12"), Ok(SlotChange::new("s-1", 12)));
        assert_eq!(parse_slot_change(" s-1 = 12 "), Ok(SlotChange::new("s-1", 12)));
    }

    #[test]
    fn test_parse_slot_change_errors() {
        assert!(parse_slot_change("s-1").is_err());
        assert!(parse_slot_change("=12").is_err());
        assert!(parse_slot_change("s-1=noon").is_err());
    }

    #[test]
    fn test_move_command() {
        let cli = Cli::try_parse_from(["timetable", "sessions", "move", "sec-1", "a=1", "b=2"])
            .unwrap();

        let Commands::Sessions(SessionsCommand {
            action: SessionsAction::Move { section_id, moves },
        }) = cli.command
        else {
            panic!("expected sessions move");
        };
        assert_eq!(section_id, "sec-1");
        assert_eq!(moves, vec![SlotChange::new("a", 1), SlotChange::new("b", 2)]);
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["timetable", "sessions", "delete"]).is_err());
    }
}
