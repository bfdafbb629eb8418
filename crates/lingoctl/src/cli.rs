//! Command-line definition for lingoctl.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lingoctl")]
#[command(about = "Lingo - vocabulary practice, tutor chat and translation lookup", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show totals and per-language progress
    Profile,

    /// Change the username
    Rename {
        name: String,
    },

    /// Switch the language being learned
    Language {
        name: String,
    },

    /// Show the path for the current language
    Path,

    /// Play an exercise set; defaults to the next unlocked node
    Practice {
        #[arg(long)]
        node: Option<usize>,
    },

    /// Send one message to the tutor
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Translate a word or phrase
    Translate {
        text: String,

        /// Target language name, e.g. "German" or "Portuguese (Brazilian)"
        #[arg(long)]
        to: String,
    },

    /// Show the country code and flag for a language
    Flag {
        language: String,
    },

    /// Delete all stored profiles
    Reset,
}
