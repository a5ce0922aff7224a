//! Cube storage command handlers

use anyhow::{bail, Context, Result};
use cubecana::analytics::escape_csv;
use cubecana::card_list::CardListCodec;
use cubecana::formats::draftmancer::DraftFileBuilder;
use cubecana::{CardCatalog, Cube, Ratings};
use cubecana_db::{
    CounterKind, CubeFilter, CubeListEntry, CubeManager, CubeRequest, CubesRepository,
};
use std::path::Path;

use super::{load_ratings, open_db, CatalogOptions};
use crate::cli::{CubeFields, OutputFormat};
use crate::file_io::{read_input, write_output};

/// Current contents of a cube as an edit request
pub fn request_from_cube(cube: &Cube, catalog: &CardCatalog) -> Result<CubeRequest> {
    let codec = CardListCodec::new(catalog);
    let featured_card = cube
        .featured_card
        .as_ref()
        .and_then(|id| codec.resolver().human_readable(id));
    Ok(CubeRequest {
        name: cube.name.clone(),
        card_list_text: codec.render(&cube.cards)?.join("\n"),
        tags: cube.tags.clone(),
        link: cube.link.clone(),
        author: cube.author.clone(),
        featured_card,
        description: cube.description.clone(),
        settings: cube.settings.clone(),
    })
}

/// Apply the fields given on the command line over `base`
pub fn apply_fields(fields: CubeFields, mut base: CubeRequest) -> Result<CubeRequest> {
    if let Some(name) = fields.name {
        base.name = name;
    }
    if let Some(list) = fields.list {
        base.card_list_text = read_input(Some(&list))?;
    }
    if let Some(tags) = fields.tags {
        base.tags = tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }
    if let Some(link) = fields.link {
        base.link = Some(link).filter(|l| !l.is_empty());
    }
    if let Some(author) = fields.author {
        base.author = author;
    }
    if let Some(featured) = fields.featured {
        base.featured_card = Some(featured).filter(|f| !f.trim().is_empty());
    }
    if let Some(description) = fields.description {
        base.description = description;
    }

    let settings = &mut base.settings;
    if let Some(n) = fields.boosters_per_player {
        settings.boosters_per_player = n;
    }
    if let Some(n) = fields.cards_per_booster {
        settings.cards_per_booster = n;
    }
    if let Some(band) = fields.power_band {
        settings.power_band = band;
    }
    if let Some(on) = fields.set_card_colors {
        settings.set_card_colors = on;
    }
    if let Some(on) = fields.color_balance {
        settings.color_balance_packs = on;
    }
    if let Some(on) = fields.with_replacement {
        settings.with_replacement = on;
    }
    Ok(base)
}

fn load_cube<R: CubesRepository>(manager: &CubeManager<'_, R>, id: &str) -> Result<Cube> {
    manager
        .get(id)?
        .with_context(|| format!("Cube not found: {}", id))
}

/// Handle `cube init`
pub fn init(db: &Path) -> Result<()> {
    open_db(db)?;
    println!("Your cube database is ready at {}", db.display());
    Ok(())
}

/// Handle `cube create`
pub fn create(db: &Path, options: &CatalogOptions, fields: CubeFields) -> Result<()> {
    if fields.name.is_none() || fields.list.is_none() {
        bail!("A new cube needs --name and --list");
    }
    let request = apply_fields(fields, CubeRequest::default())?;

    let catalog = options.load()?;
    let wdb = open_db(db)?;
    let cube = CubeManager::new(&wdb, &catalog).create(&request)?;

    println!("Created cube {} ({} cards)", cube.id, cube.card_count());
    println!("Edit secret: {}", cube.edit_secret);
    println!("Keep the edit secret; it is required to edit or delete this cube.");
    Ok(())
}

/// Handle `cube show`
pub fn show(db: &Path, options: &CatalogOptions, id: &str, json: bool) -> Result<()> {
    let catalog = options.load()?;
    let wdb = open_db(db)?;
    let manager = CubeManager::new(&wdb, &catalog);
    let mut cube = load_cube(&manager, id)?;
    cube.edit_secret.clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&cube)?);
        return Ok(());
    }

    let entry = manager.list_entry(&cube);
    println!("{}", cube.name);
    println!("  Id:          {}", cube.id);
    println!("  Author:      {}", cube.author);
    println!("  Cards:       {}", entry.card_count);
    println!("  Tags:        {}", entry.tags.join(", "));
    if let Some(link) = &cube.link {
        println!("  Link:        {}", link);
    }
    println!("  Views:       {}", entry.times_viewed);
    println!("  Drafts:      {}", entry.times_drafted);
    if !entry.featured_card_image_link.is_empty() {
        println!("  Featured:    {}", entry.featured_card_image_link);
    }
    if !cube.description.is_empty() {
        println!();
        println!("{}", cube.description);
    }
    println!();
    for line in manager.display_list(&cube)? {
        println!("{}", line);
    }
    Ok(())
}

fn print_entries(entries: &[CubeListEntry], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entries)?),
        OutputFormat::Csv => {
            println!("Id,Name,Author,Cards,Views,Drafts,Tags");
            for e in entries {
                println!(
                    "{},{},{},{},{},{},{}",
                    e.id,
                    escape_csv(&e.name),
                    escape_csv(&e.author),
                    e.card_count,
                    e.times_viewed,
                    e.times_drafted,
                    escape_csv(&e.tags.join(";"))
                );
            }
        }
        OutputFormat::Table => {
            let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(4).max(4);
            println!(
                "{:<36}  {:<width$}  {:>5}  {:>6}  {:>6}",
                "Id", "Name", "Cards", "Views", "Drafts"
            );
            println!("{}", "-".repeat(width + 63));
            for e in entries {
                println!(
                    "{:<36}  {:<width$}  {:>5}  {:>6}  {:>6}",
                    e.id, e.name, e.card_count, e.times_viewed, e.times_drafted
                );
            }
        }
    }
    Ok(())
}

/// Handle `cube list`
pub fn list(
    db: &Path,
    options: &CatalogOptions,
    filter: &CubeFilter,
    format: OutputFormat,
) -> Result<()> {
    let catalog = options.load()?;
    let wdb = open_db(db)?;
    let manager = CubeManager::new(&wdb, &catalog);
    let entries = manager.list(filter)?;

    if entries.is_empty() {
        println!("No cubes found");
        return Ok(());
    }
    print_entries(&entries, format)?;
    if matches!(format, OutputFormat::Table) {
        println!();
        println!(
            "Page {} ({} of {} cubes)",
            filter.page,
            entries.len(),
            manager.count()?
        );
    }
    Ok(())
}

/// Handle `cube edit`
pub fn edit(
    db: &Path,
    options: &CatalogOptions,
    id: &str,
    secret: &str,
    fields: CubeFields,
) -> Result<()> {
    let catalog = options.load()?;
    let wdb = open_db(db)?;
    let manager = CubeManager::new(&wdb, &catalog);
    let current = load_cube(&manager, id)?;

    let request = apply_fields(fields, request_from_cube(&current, &catalog)?)?;
    let cube = manager.edit(id, secret, &request)?;
    println!("Updated cube {} ({} cards)", cube.id, cube.card_count());
    Ok(())
}

/// Handle `cube delete`
pub fn delete(db: &Path, options: &CatalogOptions, id: &str, secret: &str) -> Result<()> {
    let catalog = options.load()?;
    let wdb = open_db(db)?;
    CubeManager::new(&wdb, &catalog).delete(id, secret)?;
    println!("Deleted cube {}", id);
    Ok(())
}

/// Handle `cube view`
pub fn view(db: &Path, id: &str, counter: CounterKind) -> Result<()> {
    let wdb = open_db(db)?;
    if !wdb.increment_counter(id, counter)? {
        bail!("Cube not found: {}", id);
    }
    if let Some(popularity) = wdb.popularity(id)? {
        println!("Recorded {} for {} (popularity {})", counter, id, popularity);
    }
    Ok(())
}

/// Draft-tool file for a stored cube
pub fn draft_file(cube: &Cube, catalog: &CardCatalog, ratings: Ratings) -> Result<String> {
    Ok(DraftFileBuilder::new(catalog, &cube.name, &cube.settings)
        .with_ratings(ratings)
        .cube_file(&cube.cards)?)
}

/// Handle `cube draft`
pub fn draft(
    db: &Path,
    options: &CatalogOptions,
    id: &str,
    output: Option<&Path>,
    ratings: Option<&Path>,
) -> Result<()> {
    let catalog = options.load()?;
    let wdb = open_db(db)?;
    let manager = CubeManager::new(&wdb, &catalog);
    let cube = load_cube(&manager, id)?;
    let ratings = load_ratings(ratings, &cube.tags, cube.settings.power_band, None)?;

    write_output(output, &draft_file(&cube, &catalog, ratings)?)?;
    manager.increment(id, CounterKind::Drafts)?;
    Ok(())
}
