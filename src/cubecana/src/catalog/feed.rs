//! External card feed records and client
//!
//! The feed serves a list of sets and, per set, a list of printing records.
//! Records are parsed into [`FeedPrinting`] and validated when the catalog is
//! built; nothing downstream sees raw feed JSON.

use super::CatalogError;
use crate::card::{localized_image_uris, CardAttributes, CardPrinting, PrintingId, Rarity};
use crate::id::CardIdentifier;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FEED_URL: &str = "https://api.lorcast.com/v0";

/// A set as listed by the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSet {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedSetRef {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedImageSizes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedImageUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital: Option<FeedImageSizes>,
}

/// One printing record as served by the feed (and stored in the cache)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPrinting {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub cost: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ink: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inks: Option<Vec<String>>,
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub willpower: Option<u8>,
    pub rarity: String,
    pub collector_number: String,
    pub set: FeedSetRef,
    #[serde(default)]
    pub image_uris: FeedImageUris,
}

impl FeedPrinting {
    /// `"<name> - <version>"`, or just the name for cards without a version
    pub fn full_name(&self) -> String {
        match &self.version {
            Some(version) if !version.is_empty() => format!("{} - {}", self.name, version),
            _ => self.name.clone(),
        }
    }

    pub fn card_id(&self) -> CardIdentifier {
        CardIdentifier::from_name(&self.full_name())
    }

    pub fn printing_id(&self) -> PrintingId {
        PrintingId::new(
            self.card_id(),
            self.set.code.clone(),
            self.collector_number.clone(),
        )
    }

    pub fn attributes(&self) -> CardAttributes {
        CardAttributes {
            cost: self.cost,
            ink: self.ink.clone(),
            inks: self.inks.clone().unwrap_or_default(),
            types: self.types.clone(),
            classifications: self.classifications.clone().unwrap_or_default(),
            strength: self.strength,
            willpower: self.willpower,
        }
    }

    /// Validate and convert into a catalog printing
    pub fn to_printing(&self) -> Result<CardPrinting, CatalogError> {
        let rarity = Rarity::from_feed_label(&self.rarity).ok_or_else(|| {
            CatalogError::InvalidRecord(format!(
                "{}: unknown rarity {:?}",
                self.printing_id(),
                self.rarity
            ))
        })?;
        if self.set.code.is_empty() || self.collector_number.is_empty() {
            return Err(CatalogError::InvalidRecord(format!(
                "{}: missing set code or collector number",
                self.full_name()
            )));
        }

        let image_uris = self
            .image_uris
            .digital
            .as_ref()
            .and_then(|sizes| sizes.normal.as_deref())
            .map(localized_image_uris)
            .unwrap_or_default();

        Ok(CardPrinting {
            card_id: self.card_id(),
            full_name: self.full_name(),
            set_code: self.set.code.clone(),
            collector_number: self.collector_number.clone(),
            rarity,
            image_uris,
        })
    }
}

/// Source of set and printing records
pub trait CardFeed {
    fn fetch_sets(&self) -> Result<Vec<FeedSet>, CatalogError>;

    fn fetch_set_cards(&self, set_code: &str) -> Result<Vec<FeedPrinting>, CatalogError>;
}

#[cfg(feature = "fetch")]
#[derive(Deserialize)]
struct SetsResponse {
    results: Option<Vec<FeedSet>>,
}

/// Blocking HTTP client for the Lorcast API
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct LorcastFeed {
    base_url: String,
}

#[cfg(feature = "fetch")]
impl LorcastFeed {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::info!("Fetching {}...", url);
        match ureq::get(&url).call() {
            Ok(resp) => resp
                .into_json()
                .map_err(|e| CatalogError::Feed(format!("{}: {}", url, e))),
            Err(ureq::Error::Status(code, _)) => {
                Err(CatalogError::Feed(format!("{} returned {}", url, code)))
            }
            Err(e) => Err(CatalogError::Feed(format!("{}: {}", url, e))),
        }
    }
}

#[cfg(feature = "fetch")]
impl Default for LorcastFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_URL)
    }
}

#[cfg(feature = "fetch")]
impl CardFeed for LorcastFeed {
    fn fetch_sets(&self) -> Result<Vec<FeedSet>, CatalogError> {
        let response: SetsResponse = self.get_json("sets")?;
        response
            .results
            .ok_or_else(|| CatalogError::Feed("Failed to fetch sets: no results in response".into()))
    }

    fn fetch_set_cards(&self, set_code: &str) -> Result<Vec<FeedPrinting>, CatalogError> {
        self.get_json(&format!("sets/{}/cards", set_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "name": "Elsa",
        "version": "Snow Queen",
        "cost": 6,
        "ink": "Amethyst",
        "inks": null,
        "type": ["Character"],
        "classifications": ["Storyborn", "Hero", "Queen", "Sorcerer"],
        "strength": 4,
        "willpower": 6,
        "rarity": "Super_rare",
        "collector_number": "42",
        "set": {"code": "1", "name": "The First Chapter"},
        "image_uris": {"digital": {"normal": "https://img/elsa.avif"}},
        "lore": 3
    }"#;

    #[test]
    fn test_parse_feed_record() {
        let record: FeedPrinting = serde_json::from_str(RECORD).unwrap();
        assert_eq!(record.full_name(), "Elsa - Snow Queen");
        assert_eq!(record.card_id().as_str(), "elsasnowqueen");
        assert_eq!(record.printing_id().to_string(), "elsasnowqueen-1-42");

        let attrs = record.attributes();
        assert_eq!(attrs.cost, 6);
        assert_eq!(attrs.ink.as_deref(), Some("Amethyst"));
        assert!(attrs.inks.is_empty());
        assert_eq!(attrs.classifications.len(), 4);
    }

    #[test]
    fn test_to_printing_maps_rarity_and_image() {
        let record: FeedPrinting = serde_json::from_str(RECORD).unwrap();
        let printing = record.to_printing().unwrap();
        assert_eq!(printing.rarity, Rarity::SuperRare);
        assert_eq!(printing.image_uri("en"), Some("https://img/elsa.avif"));
        assert_eq!(printing.image_uri("de"), Some("https://img/elsa.avif"));
        assert_eq!(
            printing.image_uris.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["de", "en", "fr", "it", "ja", "zh"]
        );
    }

    #[test]
    fn test_unknown_rarity_is_rejected() {
        let mut record: FeedPrinting = serde_json::from_str(RECORD).unwrap();
        record.rarity = "Mythic".to_string();
        let err = record.to_printing().unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(_)));
    }

    #[test]
    fn test_full_name_without_version() {
        let mut record: FeedPrinting = serde_json::from_str(RECORD).unwrap();
        record.name = "Be Prepared".to_string();
        record.version = None;
        assert_eq!(record.full_name(), "Be Prepared");
    }
}
