//! Local feed cache
//!
//! The cache is a JSON array of feed records in fetch order. A missing cache
//! is filled from the feed (plus the early-access file) and then read back, so
//! a fresh fetch and a warm start index exactly the same data.

use super::feed::{CardFeed, FeedPrinting};
use super::CatalogError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub fn read_records(path: &Path) -> Result<Vec<FeedPrinting>, CatalogError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn write_records(path: &Path, records: &[FeedPrinting]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string(records)?)?;
    Ok(())
}

/// Fetch every set, then every printing of each set
pub fn fetch_all(feed: &dyn CardFeed) -> Result<Vec<FeedPrinting>, CatalogError> {
    let sets = feed.fetch_sets()?;
    let mut records = Vec::new();
    for set in &sets {
        let cards = feed.fetch_set_cards(&set.code)?;
        tracing::debug!("Set {}: {} printings", set.code, cards.len());
        records.extend(cards);
    }
    tracing::info!("Fetched {} printings from {} sets", records.len(), sets.len());
    Ok(records)
}

/// Merge early-access records into fetched ones.
///
/// A record whose printing already exists replaces it in place; new printings
/// are appended in file order.
pub fn merge_early_access(records: &mut Vec<FeedPrinting>, early_access: Vec<FeedPrinting>) {
    let mut positions: HashMap<String, usize> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.printing_id().to_string(), i))
        .collect();

    for record in early_access {
        let key = record.printing_id().to_string();
        match positions.get(&key) {
            Some(&index) => records[index] = record,
            None => {
                positions.insert(key, records.len());
                records.push(record);
            }
        }
    }
}

/// Return the cached records, fetching and writing the cache first if absent
pub fn read_or_fetch(
    cache_path: &Path,
    early_access_path: Option<&Path>,
    feed: &dyn CardFeed,
) -> Result<Vec<FeedPrinting>, CatalogError> {
    if !cache_path.is_file() {
        refresh(cache_path, early_access_path, feed)?;
    }
    read_records(cache_path)
}

/// Fetch from the feed and overwrite the cache
pub fn refresh(
    cache_path: &Path,
    early_access_path: Option<&Path>,
    feed: &dyn CardFeed,
) -> Result<usize, CatalogError> {
    let mut records = fetch_all(feed)?;
    if let Some(path) = early_access_path {
        tracing::info!("Merging early-access printings from {}", path.display());
        merge_early_access(&mut records, read_records(path)?);
    }
    write_records(cache_path, &records)?;
    tracing::info!("Wrote {} printings to {}", records.len(), cache_path.display());
    Ok(records.len())
}

/// Newline-delimited canonical display names; blank lines are ignored
pub fn read_names(path: &Path) -> Result<Vec<String>, CatalogError> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
