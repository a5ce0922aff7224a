//! Card catalog
//!
//! The authoritative, read-only index from [`CardIdentifier`] to [`Card`].
//! It is built once from feed records (live or cached) and then shared by
//! reference; nothing mutates it after construction.

pub mod cache;
pub mod feed;

use crate::card::{Card, CardAttributes, CardPrinting, PrintingId};
use crate::id::CardIdentifier;
use feed::{CardFeed, FeedPrinting};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Invalid feed record: {0}")]
    InvalidRecord(String),

    #[error("Card catalog is empty")]
    Empty,
}

impl CatalogError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Feed(_) => "feed",
            Self::InvalidRecord(_) => "invalid_record",
            Self::Empty => "empty_catalog",
        }
    }

    pub fn status_hint(&self) -> u16 {
        500
    }
}

/// Where catalog data comes from on disk
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    pub cache_path: PathBuf,
    pub early_access_path: Option<PathBuf>,
    pub canonical_names_path: Option<PathBuf>,
}

/// Catalog size summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub cards: usize,
    pub printings: usize,
    pub sets: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: HashMap<CardIdentifier, Card>,
}

impl CardCatalog {
    /// Load from the cache, filling it from the feed first if it is missing
    pub fn load(source: &CatalogSource, feed: &dyn CardFeed) -> Result<Self, CatalogError> {
        let records = cache::read_or_fetch(
            &source.cache_path,
            source.early_access_path.as_deref(),
            feed,
        )?;
        let canonical_names = match &source.canonical_names_path {
            Some(path) if path.is_file() => cache::read_names(path)?,
            Some(path) => {
                tracing::warn!("Canonical names file not found: {}", path.display());
                Vec::new()
            }
            None => Vec::new(),
        };
        let catalog = Self::from_records(&records, &canonical_names)?;
        let stats = catalog.stats();
        tracing::info!(
            "Card catalog ready: {} cards, {} printings, {} sets",
            stats.cards,
            stats.printings,
            stats.sets
        );
        Ok(catalog)
    }

    /// Index feed records in order.
    ///
    /// `canonical_names` override the feed's display name for any card whose
    /// identifier they normalize to.
    pub fn from_records(
        records: &[FeedPrinting],
        canonical_names: &[String],
    ) -> Result<Self, CatalogError> {
        let printings = records
            .iter()
            .map(|record| Ok((record.to_printing()?, record.attributes())))
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let mut catalog = Self::from_printings(printings);
        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }

        for name in canonical_names {
            if let Some(card) = catalog.cards.get_mut(&CardIdentifier::from_name(name)) {
                card.rename(name);
            }
        }
        Ok(catalog)
    }

    /// Index already-validated printings in order.
    ///
    /// The first printing of a card supplies its attributes; repeated printing
    /// ids are ignored.
    pub fn from_printings(
        printings: impl IntoIterator<Item = (CardPrinting, CardAttributes)>,
    ) -> Self {
        let mut cards: HashMap<CardIdentifier, Card> = HashMap::new();
        for (printing, attributes) in printings {
            match cards.get_mut(&printing.card_id) {
                Some(card) => {
                    if card.find_printing(&printing.set_code, &printing.collector_number).is_some() {
                        tracing::debug!("Duplicate printing {}", printing.printing_id());
                        continue;
                    }
                    card.push_printing(printing);
                }
                None => {
                    cards.insert(printing.card_id.clone(), Card::new(printing, attributes));
                }
            }
        }
        Self { cards }
    }

    pub fn get_card(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn get_card_by_name(&self, name: &str) -> Option<&Card> {
        self.cards.get(&CardIdentifier::from_name(name))
    }

    /// Loose printing lookup: exact match, else the card's default printing.
    ///
    /// `None` only when the card itself is unknown.
    pub fn get_printing(&self, id: &PrintingId) -> Option<&CardPrinting> {
        let card = self.get_card(id.card_id.as_str())?;
        Some(
            card.find_printing(&id.set_code, &id.collector_number)
                .unwrap_or_else(|| card.default_printing()),
        )
    }

    /// Exact printing lookup
    pub fn find_printing(&self, id: &PrintingId) -> Option<&CardPrinting> {
        self.get_card(id.card_id.as_str())?
            .find_printing(&id.set_code, &id.collector_number)
    }

    /// Cards with at least one printing in a set, sorted by name
    pub fn cards_in_set(&self, set_code: &str) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self
            .cards
            .values()
            .filter(|card| card.has_printing_in_set(set_code))
            .collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        cards
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// All set codes, sorted
    pub fn set_codes(&self) -> Vec<String> {
        self.cards
            .values()
            .flat_map(|card| card.printings().iter().map(|p| p.set_code.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            cards: self.cards.len(),
            printings: self.cards.values().map(|c| c.printings().len()).sum(),
            sets: self.set_codes().len(),
        }
    }
}

/// Small in-process catalog shared by unit tests across the crate
#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::feed::{FeedImageSizes, FeedImageUris, FeedPrinting, FeedSetRef};
    use super::CardCatalog;

    pub fn record(
        name: &str,
        version: Option<&str>,
        set_code: &str,
        collector_number: &str,
        rarity: &str,
    ) -> FeedPrinting {
        FeedPrinting {
            name: name.to_string(),
            version: version.map(String::from),
            cost: 2,
            ink: Some("Amber".to_string()),
            inks: None,
            types: vec!["Character".to_string()],
            classifications: None,
            strength: Some(2),
            willpower: Some(3),
            rarity: rarity.to_string(),
            collector_number: collector_number.to_string(),
            set: FeedSetRef {
                code: set_code.to_string(),
            },
            image_uris: FeedImageUris {
                digital: Some(FeedImageSizes {
                    normal: Some(format!("https://img/{}-{}.avif", set_code, collector_number)),
                    ..Default::default()
                }),
            },
        }
    }

    fn with(mut r: FeedPrinting, cost: u8, ink: &str, types: &[&str]) -> FeedPrinting {
        r.cost = cost;
        r.ink = Some(ink.to_string());
        r.types = types.iter().map(|t| t.to_string()).collect();
        if !r.types.iter().any(|t| t == "Character") {
            r.strength = None;
            r.willpower = None;
        }
        r
    }

    pub fn records() -> Vec<FeedPrinting> {
        let mut dual = record("Donald Duck", Some("Fred Honeywell"), "5", "1", "Rare");
        dual.ink = None;
        dual.inks = Some(vec!["Amber".to_string(), "Ruby".to_string()]);

        vec![
            with(record("Elsa", Some("Snow Queen"), "P1", "3", "Promo"), 6, "Amethyst", &["Character"]),
            with(record("Elsa", Some("Snow Queen"), "1", "42", "Super_rare"), 6, "Amethyst", &["Character"]),
            with(record("Elsa", Some("Snow Queen"), "1", "207", "Enchanted"), 6, "Amethyst", &["Character"]),
            record("Dalmatian Puppy", Some("Tail Wagger"), "3", "4a", "Common"),
            record("Dalmatian Puppy", Some("Tail Wagger"), "3", "4b", "Common"),
            record("Mickey Mouse", Some("True Friend"), "1", "12", "Uncommon"),
            record("Mickey Mouse", Some("True Friend"), "P1", "25ja", "Promo"),
            with(record("Be Prepared", None, "1", "128", "Rare"), 7, "Amethyst", &["Action", "Song"]),
            with(record("Māui", Some("Demigod"), "1", "115", "Legendary"), 8, "Ruby", &["Character"]),
            with(record("Some Card 5", None, "2", "17", "Common"), 1, "Steel", &["Character"]),
            with(record("Pride Lands", Some("Pride Rock"), "3", "34", "Uncommon"), 2, "Emerald", &["Location"]),
            with(record("Dinglehopper", None, "1", "100", "Common"), 1, "Sapphire", &["Item"]),
            with(record("Friends On The Other Side", None, "1", "64", "Common"), 3, "Amethyst", &["Action"]),
            dual,
        ]
    }

    pub fn catalog() -> CardCatalog {
        CardCatalog::from_records(&records(), &[]).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::{catalog, record, records};
    use super::*;

    #[test]
    fn test_default_printing_selection() {
        let catalog = catalog();
        let elsa = catalog.get_card("elsasnowqueen").unwrap();
        assert_eq!(elsa.printings().len(), 3);
        assert_eq!(elsa.default_printing().set_code, "1");
        assert_eq!(elsa.default_printing().collector_number, "42");
        assert_eq!(elsa.attributes.cost, 6);
    }

    #[test]
    fn test_get_printing_is_loose() {
        let catalog = catalog();
        let exact = PrintingId::new(CardIdentifier::from_name("Elsa - Snow Queen"), "P1", "3");
        assert_eq!(catalog.get_printing(&exact).unwrap().set_code, "P1");

        let drifted = PrintingId::new(CardIdentifier::from_name("Elsa - Snow Queen"), "1", "99");
        assert_eq!(catalog.get_printing(&drifted).unwrap().collector_number, "42");
        assert!(catalog.find_printing(&drifted).is_none());

        let unknown = PrintingId::new(CardIdentifier::from_name("Nobody"), "1", "1");
        assert!(catalog.get_printing(&unknown).is_none());
    }

    #[test]
    fn test_cards_in_set() {
        let catalog = catalog();
        let names: Vec<&str> = catalog
            .cards_in_set("P1")
            .iter()
            .map(|c| c.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["Elsa - Snow Queen", "Mickey Mouse - True Friend"]);
        assert!(catalog.cards_in_set("99").is_empty());
    }

    #[test]
    fn test_stats() {
        let stats = catalog().stats();
        assert_eq!(stats.cards, 10);
        assert_eq!(stats.printings, 14);
        assert_eq!(stats.sets, 5);
    }

    #[test]
    fn test_canonical_names_override_display_name() {
        let catalog = CardCatalog::from_records(
            &records(),
            &["Maui - Demigod".to_string(), "Unknown - Card".to_string()],
        )
        .unwrap();
        let maui = catalog.get_card_by_name("Māui - Demigod").unwrap();
        assert_eq!(maui.full_name, "Maui - Demigod");
        assert_eq!(maui.default_printing().full_name, "Maui - Demigod");
    }

    #[test]
    fn test_duplicate_printings_are_ignored() {
        let mut recs = records();
        recs.push(record("Elsa", Some("Snow Queen"), "1", "42", "Rare"));
        let catalog = CardCatalog::from_records(&recs, &[]).unwrap();
        assert_eq!(catalog.get_card("elsasnowqueen").unwrap().printings().len(), 3);
    }

    #[test]
    fn test_empty_records_are_an_error() {
        assert!(matches!(
            CardCatalog::from_records(&[], &[]),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn test_load_from_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("feed.json");
        cache::write_records(&cache_path, &records()).unwrap();

        struct Offline;
        impl CardFeed for Offline {
            fn fetch_sets(&self) -> Result<Vec<feed::FeedSet>, CatalogError> {
                Err(CatalogError::Feed("offline".into()))
            }
            fn fetch_set_cards(&self, _: &str) -> Result<Vec<FeedPrinting>, CatalogError> {
                Err(CatalogError::Feed("offline".into()))
            }
        }

        let source = CatalogSource {
            cache_path,
            ..Default::default()
        };
        let catalog = CardCatalog::load(&source, &Offline).unwrap();
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn test_load_without_cache_propagates_feed_failure() {
        let dir = tempfile::tempdir().unwrap();
        struct Down;
        impl CardFeed for Down {
            fn fetch_sets(&self) -> Result<Vec<feed::FeedSet>, CatalogError> {
                Err(CatalogError::Feed("unreachable".into()))
            }
            fn fetch_set_cards(&self, _: &str) -> Result<Vec<FeedPrinting>, CatalogError> {
                unreachable!()
            }
        }
        let source = CatalogSource {
            cache_path: dir.path().join("missing.json"),
            ..Default::default()
        };
        let err = CardCatalog::load(&source, &Down).unwrap_err();
        assert_eq!(err.kind(), "feed");
        assert!(!source.cache_path.exists());
    }
}
