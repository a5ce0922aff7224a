//! Cube storage CLI definitions

use clap::{Args, Subcommand};
use cubecana::PowerBand;
use std::path::PathBuf;

use super::OutputFormat;

/// Cube contents shared by create and edit; unset fields keep their current value
#[derive(Args, Debug, Clone, Default)]
pub struct CubeFields {
    /// Cube name
    #[arg(long)]
    pub name: Option<String>,

    /// Card list file, `-` for stdin
    #[arg(long)]
    pub list: Option<PathBuf>,

    /// Tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// External link
    #[arg(long)]
    pub link: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// Featured printing, e.g. "Elsa - Snow Queen (1) 42"
    #[arg(long)]
    pub featured: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub boosters_per_player: Option<u32>,

    #[arg(long)]
    pub cards_per_booster: Option<u32>,

    /// retail, low, medium, high, overpowered or max
    #[arg(long)]
    pub power_band: Option<PowerBand>,

    #[arg(long)]
    pub set_card_colors: Option<bool>,

    #[arg(long)]
    pub color_balance: Option<bool>,

    #[arg(long)]
    pub with_replacement: Option<bool>,
}

#[derive(Subcommand)]
pub enum CubeCommand {
    /// Initialize the cube database
    Init,

    /// Store a new cube and print its id and edit secret
    Create {
        #[command(flatten)]
        fields: CubeFields,
    },

    /// Show a cube and its card list
    Show {
        id: String,

        /// Print the stored JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List stored cubes
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 25)]
        per_page: u32,

        /// rank or date
        #[arg(long, default_value = "rank")]
        sort: cubecana_db::SortType,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: cubecana_db::OrderType,

        /// Only cubes carrying all of these tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Only cubes in any of these power bands
        #[arg(long, value_delimiter = ',')]
        power_bands: Vec<String>,

        /// Output format: table (default), csv, json
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Change a cube's contents
    Edit {
        id: String,

        /// Edit secret printed when the cube was created
        #[arg(long)]
        secret: String,

        #[command(flatten)]
        fields: CubeFields,
    },

    /// Delete a cube
    Delete {
        id: String,

        /// Edit secret printed when the cube was created
        #[arg(long)]
        secret: String,
    },

    /// Record a view of a cube
    View {
        id: String,

        /// card-list-views, page-views or drafts
        #[arg(long, default_value = "page-views")]
        counter: cubecana_db::CounterKind,
    },

    /// Write a cube as a draft-tool file and count a draft
    Draft {
        id: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ratings CSV, or a directory of evaluation files picked by power band
        /// and the "Low Ink" tag (defaults to the configured path)
        #[arg(long)]
        ratings: Option<PathBuf>,
    },
}
