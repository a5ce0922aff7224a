//! CLI argument definitions for cubecana
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod catalog;
mod convert;
mod core;
mod cube;
mod list;
mod report;

pub use catalog::CatalogCommand;
pub use convert::ConvertCommand;
pub use core::{Cli, Commands};
pub use cube::{CubeCommand, CubeFields};
pub use list::ListCommand;
pub use report::ReportCommand;

/// Output format for listing commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}
