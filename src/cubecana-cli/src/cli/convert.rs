//! Format conversion CLI definitions

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ConvertCommand {
    /// Tabletop Simulator deck export to a card list
    TtsToList {
        /// Saved object JSON, or a directory whose .json exports are merged
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Card list to a Tabletop Simulator deck object
    ListToTts {
        /// Card list file (stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Card list to a deck-import code
    ListToDeckCode {
        /// Card list file (stdin if omitted)
        input: Option<PathBuf>,

        /// Also print import links using this deck name
        #[arg(long)]
        name: Option<String>,
    },

    /// Deck-import code to a card list
    DeckCodeToList {
        /// Base64 deck code
        code: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Card list to a draft-tool cube file
    ListToDraft {
        /// Card list file (stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Draft name
        #[arg(long, default_value = "Cube")]
        name: String,

        /// Boosters opened per player
        #[arg(long, default_value_t = 4)]
        boosters_per_player: u32,

        /// Cards in each booster
        #[arg(long, default_value_t = 12)]
        cards_per_booster: u32,

        /// Omit ink colors from custom cards
        #[arg(long)]
        no_colors: bool,

        /// Balance inks across boosters
        #[arg(long)]
        color_balance: bool,

        /// Draw with replacement
        #[arg(long)]
        with_replacement: bool,

        /// Ratings CSV, or a directory of evaluation files (defaults to the configured path)
        #[arg(long)]
        ratings: Option<PathBuf>,
    },

    /// Retail booster layout of a set as a draft-tool file
    RetailToDraft {
        /// Set code (e.g. 1)
        set: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Draft name (defaults to "Set <code>")
        #[arg(long)]
        name: Option<String>,

        /// Ratings CSV, or a directory of evaluation files (defaults to the configured path)
        #[arg(long)]
        ratings: Option<PathBuf>,
    },

    /// Draft-tool deck export to a card list
    DraftDeckToList {
        /// Deck export text (stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
