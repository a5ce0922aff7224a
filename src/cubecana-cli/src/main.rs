mod cli;
mod commands;
mod config;
mod dispatch;
mod file_io;

use anyhow::Result;
use clap::Parser;

use cli::*;
use commands::CatalogOptions;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = CatalogOptions {
        cache: cli.cache,
        early_access: cli.early_access,
        canonical_names: cli.canonical_names,
        feed_url: cli.feed,
    };

    match cli.command {
        Commands::Configure {
            cache_path,
            early_access_path,
            canonical_names_path,
            database_path,
            feed_url,
            ratings_path,
            show,
        } => {
            let update = config::Config {
                cache_path,
                early_access_path,
                canonical_names_path,
                database_path,
                feed_url,
                ratings_path,
            };
            commands::configure::handle(update, show)?;
        }

        Commands::Catalog { command } => {
            dispatch::dispatch_catalog(command, &catalog)?;
        }

        Commands::Resolve { text } => {
            commands::resolve::handle(&catalog, &text.join(" "))?;
        }

        Commands::List { command } => {
            dispatch::dispatch_list(command, &catalog)?;
        }

        Commands::Convert { command } => {
            dispatch::dispatch_convert(command, &catalog)?;
        }

        Commands::Booster {
            set,
            players,
            boosters,
            limit,
            format,
        } => {
            let table = cubecana::TableSize {
                players,
                boosters_per_player: boosters,
            };
            commands::booster::handle(&catalog, &set, table, limit, format)?;
        }

        Commands::Cube { db, command } => {
            let db = commands::database_path(db)?;
            dispatch::dispatch_cube(command, &db, &catalog)?;
        }

        Commands::Report { db, command } => {
            let db = commands::database_path(db)?;
            match command {
                ReportCommand::Popularity {
                    tags,
                    power_bands,
                    output,
                } => {
                    commands::report::popularity(
                        &db,
                        &catalog,
                        &tags,
                        &power_bands,
                        output.as_deref(),
                    )?;
                }
            }
        }
    }

    Ok(())
}
