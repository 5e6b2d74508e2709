//! CLI argument parsing for TodoStore.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use todostore::DateKey;

#[derive(Parser)]
#[command(
    name = "todostore",
    about = "Ordered to-do lists with per-date partitions",
    version = env!("GIT_DESCRIBE")
)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/todostore/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(short = 'd', long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Date partition to operate on; ignored by the flat layout
#[derive(Args, Clone, Copy)]
pub struct DateArg {
    /// Date of the list (yyyy-mm-dd, default: today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<DateKey>,
}

impl DateArg {
    pub fn or_today(self) -> DateKey {
        self.date.unwrap_or_else(DateKey::today)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Append an item to a list
    Add {
        /// Item text
        text: String,

        /// Due date (yyyy-mm-dd)
        #[arg(long, value_parser = parse_date)]
        due: Option<DateKey>,

        #[command(flatten)]
        date: DateArg,
    },

    /// Show the items of a list
    List {
        #[command(flatten)]
        date: DateArg,
    },

    /// Delete the item at INDEX
    Remove {
        /// 0-based position in the list
        index: usize,

        #[command(flatten)]
        date: DateArg,
    },

    /// Move the item at FROM so it ends up at TO
    Move {
        from: usize,
        to: usize,

        #[command(flatten)]
        date: DateArg,
    },

    /// Replace the text of the item at INDEX
    Edit {
        /// 0-based position in the list
        index: usize,

        /// New text
        text: String,

        /// Set a new due date (yyyy-mm-dd)
        #[arg(long, value_parser = parse_date, conflicts_with = "clear_due")]
        due: Option<DateKey>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        #[command(flatten)]
        date: DateArg,
    },

    /// Per-date item counts for a month (by_date layout only)
    Calendar {
        /// Month to show (yyyy-mm, default: current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// List every date that has items (by_date layout only)
    Dates,
}

fn parse_date(s: &str) -> Result<DateKey, String> {
    s.parse::<DateKey>().map_err(|e| e.to_string())
}

/// Parse `yyyy-mm` into a (year, month) pair
pub fn parse_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.split_once('-')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::parse_from(["todostore", "add", "buy milk", "--due", "2024-05-01", "--date", "2024-04-30"]);
        match cli.command {
            Command::Add { text, due, date } => {
                assert_eq!(text, "buy milk");
                assert_eq!(due, DateKey::from_ymd(2024, 5, 1));
                assert_eq!(date.date, DateKey::from_ymd(2024, 4, 30));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_edit_due_flags_conflict() {
        let result = Cli::try_parse_from(["todostore", "edit", "0", "x", "--due", "2024-01-01", "--clear-due"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Cli::try_parse_from(["todostore", "list", "--date", "2024-1-1"]).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03"), Some((2024, 3)));
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("march"), None);
    }
}
