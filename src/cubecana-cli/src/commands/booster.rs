//! `booster` command handler

use anyhow::Result;
use cubecana::analytics::escape_csv;
use cubecana::{expected_copies, retail_slots, CardCatalog, ExpectedCopies, TableSize};
use serde::Serialize;

use super::CatalogOptions;
use crate::cli::OutputFormat;

#[derive(Serialize)]
struct CopiesRow<'a> {
    card: &'a str,
    copies: f64,
}

/// Expected copies per card for a table opening retail boosters of a set
pub fn table_copies(
    catalog: &CardCatalog,
    set: &str,
    table: TableSize,
    limit: Option<usize>,
) -> Result<Vec<ExpectedCopies>> {
    let slots = retail_slots(catalog, set)?;
    let mut copies = expected_copies(&slots, table, catalog);
    if let Some(limit) = limit {
        copies.truncate(limit);
    }
    Ok(copies)
}

/// Handle `booster`
pub fn handle(
    options: &CatalogOptions,
    set: &str,
    table: TableSize,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let catalog = options.load()?;
    let copies = table_copies(&catalog, set, table, limit)?;

    match format {
        OutputFormat::Json => {
            let rows: Vec<CopiesRow> = copies
                .iter()
                .map(|c| CopiesRow {
                    card: &c.full_name,
                    copies: c.copies,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Csv => {
            println!("Card Name,Expected Copies");
            for c in &copies {
                println!("{},{:.4}", escape_csv(&c.full_name), c.copies);
            }
        }
        OutputFormat::Table => {
            println!(
                "Set {}: {} players x {} boosters",
                set, table.players, table.boosters_per_player
            );
            let width = copies.iter().map(|c| c.full_name.len()).max().unwrap_or(4).max(4);
            println!("{:<width$}  Copies", "Card");
            println!("{}", "-".repeat(width + 8));
            for c in &copies {
                println!("{:<width$}  {:>6.2}", c.full_name, c.copies);
            }
        }
    }
    Ok(())
}
