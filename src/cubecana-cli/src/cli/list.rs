//! Card list command CLI definitions

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ListCommand {
    /// Check a card list and report every line that does not resolve
    Validate {
        /// Card list file (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// Rewrite a card list with canonical names, merging duplicates
    Normalize {
        /// Card list file (stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave default printings unqualified
        #[arg(long)]
        compact: bool,
    },
}
