//! Card catalog command handlers

use anyhow::{Context, Result};
use cubecana::analytics::escape_csv;
use cubecana::catalog::cache;
use cubecana::{Card, CardCatalog};
use serde::Serialize;

use super::CatalogOptions;
use crate::cli::OutputFormat;
use crate::config::Config;

/// Handle `catalog fetch`
pub fn fetch(options: &CatalogOptions) -> Result<()> {
    let config = Config::load()?;
    let source = options.source(&config);
    let count = cache::refresh(
        &source.cache_path,
        source.early_access_path.as_deref(),
        &options.feed(&config),
    )
    .context("Failed to refresh the card cache")?;
    println!(
        "Cached {} printings at {}",
        count,
        source.cache_path.display()
    );
    Ok(())
}

/// Handle `catalog stats`
pub fn stats(options: &CatalogOptions) -> Result<()> {
    let catalog = options.load()?;
    let stats = catalog.stats();
    println!("Card Catalog Statistics");
    println!("  Cards:     {}", stats.cards);
    println!("  Printings: {}", stats.printings);
    println!("  Sets:      {}", stats.sets);
    println!("  Set codes: {}", catalog.set_codes().join(", "));
    Ok(())
}

fn describe_card(card: &Card) -> Vec<String> {
    let attrs = &card.attributes;
    let mut lines = vec![
        card.full_name.clone(),
        format!("  Id:      {}", card.id),
        format!("  Cost:    {}", attrs.cost),
        format!("  Inks:    {}", card.inks().join(", ")),
        format!("  Types:   {}", attrs.types.join(", ")),
    ];
    if !attrs.classifications.is_empty() {
        lines.push(format!("  Classes: {}", attrs.classifications.join(", ")));
    }
    if let (Some(strength), Some(willpower)) = (attrs.strength, attrs.willpower) {
        lines.push(format!("  Stats:   {}/{}", strength, willpower));
    }
    lines.push("  Printings:".to_string());
    let default = card.default_printing().printing_id();
    for printing in card.printings() {
        let marker = if printing.printing_id() == default {
            " (default)"
        } else {
            ""
        };
        lines.push(format!(
            "    {} [{}]{}",
            printing.human_readable(),
            printing.rarity.name(),
            marker
        ));
    }
    lines
}

/// Handle `catalog show`
pub fn show(options: &CatalogOptions, name: &str) -> Result<()> {
    let catalog = options.load()?;
    let card = catalog
        .get_card_by_name(name)
        .with_context(|| format!("No card named '{}'", name))?;
    for line in describe_card(card) {
        println!("{}", line);
    }
    Ok(())
}

#[derive(Serialize)]
struct SetRow {
    collector_number: String,
    name: String,
    rarity: &'static str,
    inks: Vec<String>,
}

fn set_rows(catalog: &CardCatalog, code: &str) -> Vec<SetRow> {
    let mut rows: Vec<SetRow> = catalog
        .cards_in_set(code)
        .into_iter()
        .filter_map(|card| {
            let printing = card.printing_in_set(code)?;
            Some(SetRow {
                collector_number: printing.collector_number.clone(),
                name: card.full_name.clone(),
                rarity: printing.rarity.name(),
                inks: card.inks().into_iter().map(String::from).collect(),
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        let key = |r: &SetRow| r.collector_number.parse::<u32>().unwrap_or(u32::MAX);
        key(a)
            .cmp(&key(b))
            .then_with(|| a.collector_number.cmp(&b.collector_number))
    });
    rows
}

/// Handle `catalog set`
pub fn set(options: &CatalogOptions, code: &str, format: OutputFormat) -> Result<()> {
    let catalog = options.load()?;
    let rows = set_rows(&catalog, code);
    if rows.is_empty() {
        anyhow::bail!("No cards in set '{}'", code);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            println!("Number,Name,Rarity,Inks");
            for row in &rows {
                println!(
                    "{},{},{},{}",
                    escape_csv(&row.collector_number),
                    escape_csv(&row.name),
                    row.rarity,
                    escape_csv(&row.inks.join("/"))
                );
            }
        }
        OutputFormat::Table => {
            let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(4).max(4);
            println!("{:>4}  {:<width$}  {:<10}  Inks", "#", "Name", "Rarity");
            println!("{}", "-".repeat(width + 24));
            for row in &rows {
                println!(
                    "{:>4}  {:<width$}  {:<10}  {}",
                    row.collector_number,
                    row.name,
                    row.rarity,
                    row.inks.join("/")
                );
            }
            println!();
            println!("{} cards in set {}", rows.len(), code);
        }
    }
    Ok(())
}
