//! Report command handlers

use anyhow::Result;
use cubecana::analytics::write_csv;
use cubecana::{popularity_report, CardCatalog, PrintingCountMap};
use cubecana_db::CubeManager;
use std::path::Path;

use super::{open_db, CatalogOptions};
use crate::file_io::write_output;

pub fn popularity_csv(lists: &[PrintingCountMap], catalog: &CardCatalog) -> Result<String> {
    let report = popularity_report(lists, catalog);
    let mut out = Vec::new();
    write_csv(&report, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Handle `report popularity`
pub fn popularity(
    db: &Path,
    options: &CatalogOptions,
    tags: &[String],
    power_bands: &[String],
    output: Option<&Path>,
) -> Result<()> {
    let catalog = options.load()?;
    let wdb = open_db(db)?;
    let lists = CubeManager::new(&wdb, &catalog).all_card_lists(tags, power_bands)?;
    tracing::info!("Building popularity report over {} cubes", lists.len());
    write_output(output, &popularity_csv(&lists, &catalog)?)
}
