//! Command handlers for the cubecana CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod booster;
pub mod catalog;
pub mod configure;
pub mod convert;
pub mod cube;
pub mod list;
pub mod report;
pub mod resolve;

use anyhow::{Context, Result};
use cubecana::ratings::{evaluations_file_for, read_ratings_file, Ratings};
use cubecana::{CardCatalog, CatalogSource, LorcastFeed, PowerBand};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Catalog paths given on the command line; unset ones come from the config
#[derive(Debug, Clone, Default)]
pub struct CatalogOptions {
    pub cache: Option<PathBuf>,
    pub early_access: Option<PathBuf>,
    pub canonical_names: Option<PathBuf>,
    pub feed_url: Option<String>,
}

impl CatalogOptions {
    pub fn source(&self, config: &Config) -> CatalogSource {
        CatalogSource {
            cache_path: self.cache.clone().unwrap_or_else(|| config.get_cache_path()),
            early_access_path: self
                .early_access
                .clone()
                .or_else(|| config.early_access_path.clone()),
            canonical_names_path: self
                .canonical_names
                .clone()
                .or_else(|| config.canonical_names_path.clone()),
        }
    }

    pub fn feed(&self, config: &Config) -> LorcastFeed {
        LorcastFeed::new(self.feed_url.as_deref().unwrap_or(config.get_feed_url()))
    }

    /// Load the catalog, fetching the cache first if it is missing
    pub fn load(&self) -> Result<CardCatalog> {
        let config = Config::load()?;
        let source = self.source(&config);
        CardCatalog::load(&source, &self.feed(&config)).with_context(|| {
            format!(
                "Failed to load card catalog from {}",
                source.cache_path.display()
            )
        })
    }
}

/// Database path from the flag or env var, else the configured path
pub fn database_path(db: Option<PathBuf>) -> Result<PathBuf> {
    match db {
        Some(path) => Ok(path),
        None => Ok(Config::load()?.get_database_path()),
    }
}

/// Ratings file for a draft: `path` itself, or the evaluation file picked
/// by power band and tags when `path` is a directory
pub fn ratings_file(path: &Path, tags: &[String], power_band: PowerBand) -> PathBuf {
    if path.is_dir() {
        evaluations_file_for(path, tags, power_band)
    } else {
        path.to_path_buf()
    }
}

/// Draft ratings from `--ratings`, else the configured path; empty if neither is set
pub fn load_ratings(
    ratings: Option<&Path>,
    tags: &[String],
    power_band: PowerBand,
    preferred_set: Option<&str>,
) -> Result<Ratings> {
    let path = match ratings {
        Some(path) => path.to_path_buf(),
        None => match Config::load()?.ratings_path {
            Some(path) => path,
            None => return Ok(Ratings::new()),
        },
    };
    let file = ratings_file(&path, tags, power_band);
    tracing::info!("Loading card ratings from {}", file.display());
    read_ratings_file(&file, preferred_set)
        .with_context(|| format!("Failed to load ratings from {}", file.display()))
}

/// Open the cube database, creating the schema if needed
pub fn open_db(db: &Path) -> Result<cubecana_db::SqliteDb> {
    use cubecana_db::CubesRepository;

    let wdb = cubecana_db::SqliteDb::open(db)
        .with_context(|| format!("Failed to open {}", db.display()))?;
    wdb.init()?;
    Ok(wdb)
}

#[cfg(test)]
pub mod test_fixtures {
    use cubecana::{CardCatalog, FeedPrinting};

    pub const FEED: &str = r#"[
        {"name": "Elsa", "version": "Snow Queen", "cost": 6, "ink": "Amethyst", "type": ["Character"],
         "rarity": "Super_rare", "collector_number": "42", "set": {"code": "1"},
         "image_uris": {"digital": {"normal": "https://img/1-42.avif"}}},
        {"name": "Elsa", "version": "Snow Queen", "cost": 6, "ink": "Amethyst", "type": ["Character"],
         "rarity": "Promo", "collector_number": "3", "set": {"code": "P1"},
         "image_uris": {"digital": {"normal": "https://img/P1-3.avif"}}},
        {"name": "Be Prepared", "cost": 7, "ink": "Amethyst", "type": ["Action", "Song"],
         "rarity": "Rare", "collector_number": "128", "set": {"code": "1"},
         "image_uris": {"digital": {"normal": "https://img/1-128.avif"}}},
        {"name": "Stitch", "version": "Rock Star", "cost": 6, "ink": "Amber", "type": ["Character"],
         "rarity": "Common", "collector_number": "23", "set": {"code": "1"},
         "image_uris": {"digital": {"normal": "https://img/1-23.avif"}}}
    ]"#;

    pub fn catalog() -> CardCatalog {
        let records: Vec<FeedPrinting> = serde_json::from_str(FEED).unwrap();
        CardCatalog::from_records(&records, &[]).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            cache_path: Some(PathBuf::from("configured.json")),
            early_access_path: Some(PathBuf::from("early.json")),
            ..Default::default()
        };
        let options = CatalogOptions {
            cache: Some(PathBuf::from("flag.json")),
            ..Default::default()
        };

        let source = options.source(&config);
        assert_eq!(source.cache_path, PathBuf::from("flag.json"));
        assert_eq!(source.early_access_path, Some(PathBuf::from("early.json")));
        assert_eq!(source.canonical_names_path, None);
    }

    #[test]
    fn test_ratings_file_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tags = vec![cubecana::ratings::LOW_INK_TAG.to_string()];
        assert_eq!(
            ratings_file(dir.path(), &tags, PowerBand::High),
            dir.path().join("FrankKarsten-lowInk-highPower-Evaluations.csv")
        );

        let file = dir.path().join("mine.csv");
        assert_eq!(ratings_file(&file, &tags, PowerBand::High), file);
    }

    #[test]
    fn test_load_ratings_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("FrankKarsten-normalInk-maxPower-Evaluations.csv"),
            "Card Name,Rating - Draftmancer\nBe Prepared,4\n",
        )
        .unwrap();

        let ratings = load_ratings(Some(dir.path()), &[], PowerBand::Max, None).unwrap();
        assert_eq!(ratings[&cubecana::CardIdentifier::from_name("Be Prepared")], 4);
        assert!(load_ratings(Some(dir.path()), &[], PowerBand::Low, None).is_err());
    }

    #[test]
    fn test_default_cache_path() {
        let source = CatalogOptions::default().source(&Config::default());
        assert_eq!(
            source.cache_path,
            PathBuf::from(crate::config::DEFAULT_CACHE_PATH)
        );
    }

    #[test]
    fn test_explicit_database_path() {
        let path = database_path(Some(PathBuf::from("cubes.db"))).unwrap();
        assert_eq!(path, PathBuf::from("cubes.db"));
    }
}
