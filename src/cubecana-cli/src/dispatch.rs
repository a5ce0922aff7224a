//! Command dispatch functions
//!
//! Breaks up the main match statement into focused dispatch functions.

use std::path::Path;

use anyhow::Result;
use cubecana::CubeSettings;
use cubecana_db::CubeFilter;

use crate::cli::*;
use crate::commands::{self, CatalogOptions};

/// Dispatch catalog subcommands
pub fn dispatch_catalog(command: CatalogCommand, options: &CatalogOptions) -> Result<()> {
    match command {
        CatalogCommand::Fetch => commands::catalog::fetch(options),
        CatalogCommand::Stats => commands::catalog::stats(options),
        CatalogCommand::Show { name } => commands::catalog::show(options, &name.join(" ")),
        CatalogCommand::Set { code, format } => commands::catalog::set(options, &code, format),
    }
}

/// Dispatch card list subcommands
pub fn dispatch_list(command: ListCommand, options: &CatalogOptions) -> Result<()> {
    match command {
        ListCommand::Validate { input } => commands::list::validate(options, input.as_deref()),

        ListCommand::Normalize {
            input,
            output,
            compact,
        } => commands::list::normalize(options, input.as_deref(), output.as_deref(), compact),
    }
}

/// Dispatch conversion subcommands
pub fn dispatch_convert(command: ConvertCommand, options: &CatalogOptions) -> Result<()> {
    match command {
        ConvertCommand::TtsToList { input, output } => {
            commands::convert::tts_to_list(options, &input, output.as_deref())
        }

        ConvertCommand::ListToTts { input, output } => {
            commands::convert::list_to_tts(options, input.as_deref(), output.as_deref())
        }

        ConvertCommand::ListToDeckCode { input, name } => {
            commands::convert::list_to_deck_code(options, input.as_deref(), name.as_deref())
        }

        ConvertCommand::DeckCodeToList { code, output } => {
            commands::convert::deck_code_to_list(options, &code, output.as_deref())
        }

        ConvertCommand::ListToDraft {
            input,
            output,
            name,
            boosters_per_player,
            cards_per_booster,
            no_colors,
            color_balance,
            with_replacement,
            ratings,
        } => {
            let settings = CubeSettings {
                boosters_per_player,
                cards_per_booster,
                set_card_colors: !no_colors,
                color_balance_packs: color_balance,
                with_replacement,
                ..Default::default()
            };
            commands::convert::list_to_draft(
                options,
                input.as_deref(),
                output.as_deref(),
                &name,
                &settings,
                ratings.as_deref(),
            )
        }

        ConvertCommand::RetailToDraft {
            set,
            output,
            name,
            ratings,
        } => commands::convert::retail_to_draft(
            options,
            &set,
            output.as_deref(),
            name.as_deref(),
            ratings.as_deref(),
        ),

        ConvertCommand::DraftDeckToList { input, output } => {
            commands::convert::draft_deck_to_list(options, input.as_deref(), output.as_deref())
        }
    }
}

/// Dispatch cube subcommands
pub fn dispatch_cube(command: CubeCommand, db: &Path, options: &CatalogOptions) -> Result<()> {
    match command {
        CubeCommand::Init => commands::cube::init(db),

        CubeCommand::Create { fields } => commands::cube::create(db, options, fields),

        CubeCommand::Show { id, json } => commands::cube::show(db, options, &id, json),

        CubeCommand::List {
            page,
            per_page,
            sort,
            order,
            tags,
            power_bands,
            format,
        } => {
            let filter = CubeFilter {
                page: page.max(1),
                per_page: per_page.max(1),
                sort,
                order,
                tags,
                power_bands,
            };
            commands::cube::list(db, options, &filter, format)
        }

        CubeCommand::Edit { id, secret, fields } => {
            commands::cube::edit(db, options, &id, &secret, fields)
        }

        CubeCommand::Delete { id, secret } => commands::cube::delete(db, options, &id, &secret),

        CubeCommand::View { id, counter } => commands::cube::view(db, &id, counter),

        CubeCommand::Draft {
            id,
            output,
            ratings,
        } => commands::cube::draft(db, options, &id, output.as_deref(), ratings.as_deref()),
    }
}
