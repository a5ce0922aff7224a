//! Report command CLI definitions

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Card inclusion across stored cubes, as CSV
    Popularity {
        /// Only cubes carrying all of these tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Only cubes in any of these power bands
        #[arg(long, value_delimiter = ',')]
        power_bands: Vec<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
