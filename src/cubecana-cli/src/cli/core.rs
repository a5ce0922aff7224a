//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::catalog::CatalogCommand;
use super::convert::ConvertCommand;
use super::cube::CubeCommand;
use super::list::ListCommand;
use super::report::ReportCommand;
use super::OutputFormat;

#[derive(Parser)]
#[command(name = "cubecana")]
#[command(about = "Lorcana card lists, deck formats and cubes", long_about = None)]
pub struct Cli {
    /// Card feed cache file (overrides the configured path)
    #[arg(long, global = true, env = "CUBECANA_CACHE")]
    pub cache: Option<PathBuf>,

    /// Early-access printings merged into a fresh fetch
    #[arg(long, global = true)]
    pub early_access: Option<PathBuf>,

    /// Newline-delimited canonical card names
    #[arg(long, global = true)]
    pub canonical_names: Option<PathBuf>,

    /// Card feed base URL
    #[arg(long, global = true)]
    pub feed: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure default paths and the feed URL
    #[command(visible_alias = "c")]
    Configure {
        /// Set the card feed cache path
        #[arg(long)]
        cache_path: Option<PathBuf>,

        /// Set the early-access printings file
        #[arg(long)]
        early_access_path: Option<PathBuf>,

        /// Set the canonical names file
        #[arg(long)]
        canonical_names_path: Option<PathBuf>,

        /// Set the cube database path
        #[arg(long)]
        database_path: Option<PathBuf>,

        /// Set the card feed base URL
        #[arg(long)]
        feed_url: Option<String>,

        /// Set the draft ratings CSV, or a directory of evaluation files
        #[arg(long)]
        ratings_path: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },

    /// Card catalog operations (fetch, stats, show, set)
    #[command(visible_alias = "cat")]
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },

    /// Resolve a card reference, e.g. "Elsa - Snow Queen (1) 42"
    #[command(visible_alias = "r")]
    Resolve {
        /// Card name, optionally followed by "(set) number"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Card list operations (validate, normalize)
    #[command(visible_alias = "l")]
    List {
        #[command(subcommand)]
        command: ListCommand,
    },

    /// Convert between card lists and deck/draft formats
    #[command(visible_alias = "x")]
    Convert {
        #[command(subcommand)]
        command: ConvertCommand,
    },

    /// Expected copies of each card opened from retail boosters of a set
    #[command(visible_alias = "b")]
    Booster {
        /// Set code (e.g. 1)
        set: String,

        /// Players at the table
        #[arg(long, default_value_t = 8)]
        players: u32,

        /// Boosters opened per player
        #[arg(long, default_value_t = 4)]
        boosters: u32,

        /// Only show the top N cards
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format: table (default), csv, json
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Manage stored cubes
    Cube {
        /// Path to database file (can also set CUBECANA_DB env var)
        #[arg(short, long, env = "CUBECANA_DB")]
        db: Option<PathBuf>,

        #[command(subcommand)]
        command: CubeCommand,
    },

    /// Reports over stored cubes
    Report {
        /// Path to database file (can also set CUBECANA_DB env var)
        #[arg(short, long, env = "CUBECANA_DB")]
        db: Option<PathBuf>,

        #[command(subcommand)]
        command: ReportCommand,
    },
}
