use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "deepwork")]
#[command(about = "A deep-work timer that logs distractions and keeps a session history")]
#[command(long_about = "deepwork - a deep-work timer for the terminal

Start a session, press 'd' whenever something pulls you away and say what it
was, then end the session to keep it. Every session is stored with its
distractions so you can see where your focus went.

QUICK START:
  deepwork                     Open the interactive timer
  deepwork history             Sessions grouped by day
  deepwork stats               Totals across all sessions
  deepwork export csv          Write a spreadsheet-friendly export
  deepwork import backup.json  Restore a JSON backup

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  deepwork <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Directory holding config, database and log file
    #[arg(long, env = "DEEPWORK_HOME", global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

/// Export file format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// One row per session, for spreadsheets.
    Csv,
    /// Full backup that `deepwork import` can restore.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive timer
    ///
    /// Keys: s/space start or pause, d log a distraction, e end and save,
    /// h toggle history, q quit. While distracted, type the reason and press
    /// Enter to get back to work, or Esc to drop it.
    ///
    /// This is also what runs when no command is given.
    Run,

    /// Show session history grouped by day
    ///
    /// Newest day first, each with its total focused time and distraction
    /// count.
    #[command(alias = "h")]
    History {
        /// Show at most this many sessions
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show totals across all sessions
    Stats,

    /// Export the history to a file
    ///
    /// # Examples
    ///
    ///   deepwork export csv
    ///   deepwork export json --file ~/backups/focus.json
    Export {
        /// File format
        #[arg(value_enum)]
        format: ExportFormat,

        /// Destination file (default: dated name in `export.directory`)
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Replace the history with the sessions in a JSON backup
    ///
    /// The file is checked completely before anything is written; a file
    /// that fails the check leaves the history untouched.
    Import {
        /// Backup file to read
        file: PathBuf,
    },

    /// Delete all session history
    Clear {
        /// Confirm deletion
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   deepwork completions bash > /usr/local/etc/bash_completion.d/deepwork
    ///   deepwork completions zsh > ~/.zsh/completions/_deepwork
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
