//! Card catalog command CLI definitions

use clap::Subcommand;

use super::OutputFormat;

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Fetch every set from the feed and rewrite the cache
    Fetch,

    /// Show card, printing and set counts
    Stats,

    /// Show a card and all of its printings
    Show {
        /// Card name (any spacing or punctuation)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// List the cards with a printing in a set
    Set {
        /// Set code (e.g. 1, P1)
        code: String,

        /// Output format: table (default), csv, json
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
}
