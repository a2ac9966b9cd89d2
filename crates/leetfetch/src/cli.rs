use clap::{Parser, Subcommand};

use crate::color::Color;

/// Search, read, and open catalog problems from the terminal.
#[derive(Parser, Debug)]
#[command(name = "leetfetch")]
#[command(about = "Fetch and read problems from the problem catalog", long_about = None)]
#[command(after_help = "\
EXAMPLES:
  leetfetch search \"two sum\"      List problems whose title matches
  leetfetch get 1                 Read problem 1 in the terminal
  leetfetch get two-sum           A hyphenated query is used as a slug verbatim
  leetfetch open 42               Open problem 42 in your browser

ENVIRONMENT:
  LEETCODE_SESSION       Session credential for gated problem content
  LEETFETCH_CACHE_DIR    Cache location (default: ./.leetfetch-cache)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// When to use colors in output.
    ///
    /// By default, `--color=auto` is active.
    #[arg(long, value_name = "WHEN", default_value = "auto", global = true)]
    pub color: Color,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search problems by title text or slug
    Search {
        /// Title text or slug
        query: String,

        /// Maximum number of matches to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Fetch a problem by id, title, or slug and print it
    Get {
        /// Problem id, title text, or slug
        query: String,

        /// Maximum number of candidates to print when the query is ambiguous
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Open a problem in your browser
    Open {
        /// Problem id, title text, or slug
        query: String,

        /// Maximum number of candidates to print when the query is ambiguous
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}
