//! Card and printing model
//!
//! A [`Card`] owns the attributes that are invariant across printings (cost,
//! ink, types, classifications, strength, willpower) and an ordered, non-empty
//! list of [`CardPrinting`]s. One printing is the default and represents the
//! card whenever no specific printing was requested.

use crate::id::CardIdentifier;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Collector numbers above this in a core set are alternate-art variants
pub const ALT_ART_COLLECTOR_THRESHOLD: u32 = 204;

// ============================================================================
// Rarity
// ============================================================================

/// Printing rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    SuperRare,
    Legendary,
    Epic,
    Enchanted,
    Iconic,
}

impl Rarity {
    pub const ALL: &'static [Rarity] = &[
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::SuperRare,
        Rarity::Legendary,
        Rarity::Epic,
        Rarity::Enchanted,
        Rarity::Iconic,
    ];

    /// Human-readable rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::SuperRare => "Super Rare",
            Self::Legendary => "Legendary",
            Self::Epic => "Epic",
            Self::Enchanted => "Enchanted",
            Self::Iconic => "Iconic",
        }
    }

    /// Parse the rarity label used by the card feed.
    ///
    /// Promos have no rarity of their own and are treated as Legendary.
    pub fn from_feed_label(label: &str) -> Option<Self> {
        match label {
            "Common" => Some(Self::Common),
            "Uncommon" => Some(Self::Uncommon),
            "Rare" => Some(Self::Rare),
            "Super_rare" | "Super Rare" => Some(Self::SuperRare),
            "Legendary" | "Promo" => Some(Self::Legendary),
            "Epic" => Some(Self::Epic),
            "Enchanted" => Some(Self::Enchanted),
            "Iconic" => Some(Self::Iconic),
            _ => None,
        }
    }

    /// Relative pull frequency in a retail booster.
    /// Higher = more common. Epic and Iconic are rough estimates.
    pub fn pull_frequency(&self) -> u32 {
        match self {
            Self::Common => 60000,
            Self::Uncommon => 30000,
            Self::Rare => 13000,
            Self::SuperRare => 5000,
            Self::Legendary => 2000,
            Self::Epic => 200,
            Self::Enchanted => 100,
            Self::Iconic => 5,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// PrintingId
// ============================================================================

/// Error parsing the machine form of a [`PrintingId`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid PrintingId format: {0}")]
pub struct ParsePrintingIdError(pub String);

/// Printing-unique identity: card identifier, set code and collector number.
///
/// Ordered lexicographically on the triple. The machine form is
/// `<cardIdentifier>-<setCode>-<collectorNumber>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrintingId {
    pub card_id: CardIdentifier,
    pub set_code: String,
    pub collector_number: String,
}

impl PrintingId {
    pub fn new(
        card_id: CardIdentifier,
        set_code: impl Into<String>,
        collector_number: impl Into<String>,
    ) -> Self {
        Self {
            card_id,
            set_code: set_code.into(),
            collector_number: collector_number.into(),
        }
    }
}

impl fmt::Display for PrintingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.card_id, self.set_code, self.collector_number)
    }
}

impl FromStr for PrintingId {
    type Err = ParsePrintingIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [card_id, set_code, collector_number]
                if !card_id.is_empty() && !set_code.is_empty() && !collector_number.is_empty() =>
            {
                Ok(Self::new(
                    CardIdentifier::from_normalized(card_id),
                    *set_code,
                    *collector_number,
                ))
            }
            _ => Err(ParsePrintingIdError(s.to_string())),
        }
    }
}

impl Serialize for PrintingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PrintingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// CardPrinting
// ============================================================================

/// Locales draft files carry card images for
pub const IMAGE_LOCALES: &[&str] = &["en", "fr", "de", "it", "ja", "zh"];

/// Image URI per locale in [`IMAGE_LOCALES`], derived from the English one.
///
/// An `/en/` path segment is swapped for the locale's; URIs without one are
/// shared by every locale.
pub fn localized_image_uris(en_uri: &str) -> BTreeMap<String, String> {
    IMAGE_LOCALES
        .iter()
        .map(|locale| {
            let uri = if *locale == "en" {
                en_uri.to_string()
            } else {
                en_uri.replacen("/en/", &format!("/{}/", locale), 1)
            };
            (locale.to_string(), uri)
        })
        .collect()
}

/// One physical/visual version of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPrinting {
    pub card_id: CardIdentifier,
    pub full_name: String,
    pub set_code: String,
    pub collector_number: String,
    pub rarity: Rarity,
    /// Locale code -> image URI
    pub image_uris: BTreeMap<String, String>,
}

impl CardPrinting {
    pub fn printing_id(&self) -> PrintingId {
        PrintingId::new(
            self.card_id.clone(),
            self.set_code.clone(),
            self.collector_number.clone(),
        )
    }

    pub fn matches(&self, set_code: &str, collector_number: &str) -> bool {
        self.set_code == set_code && self.collector_number == collector_number
    }

    /// `"<FullName> (<setCode>) <collectorNumber>"`
    pub fn human_readable(&self) -> String {
        format!("{} ({}) {}", self.full_name, self.set_code, self.collector_number)
    }

    /// Image for a locale, falling back to English
    pub fn image_uri(&self, locale: &str) -> Option<&str> {
        self.image_uris
            .get(locale)
            .or_else(|| self.image_uris.get("en"))
            .map(String::as_str)
    }

    /// Core sets have plain integer codes; promos and special sets do not
    pub fn is_core_set(&self) -> bool {
        is_number(&self.set_code)
    }

    pub fn is_alternate_art(&self) -> bool {
        self.collector_number
            .parse::<u32>()
            .map(|n| n > ALT_ART_COLLECTOR_THRESHOLD)
            .unwrap_or(false)
    }

    /// A printing eligible to be a card's default
    pub fn is_core_printing(&self) -> bool {
        self.is_core_set() && !self.is_alternate_art()
    }
}

pub(crate) fn is_number(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Card
// ============================================================================

/// Attributes shared by every printing of a card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardAttributes {
    pub cost: u8,
    /// Single ink, absent for dual-ink cards
    pub ink: Option<String>,
    pub inks: Vec<String>,
    pub types: Vec<String>,
    pub classifications: Vec<String>,
    pub strength: Option<u8>,
    pub willpower: Option<u8>,
}

/// A card and all of its printings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardIdentifier,
    pub full_name: String,
    pub attributes: CardAttributes,
    printings: Vec<CardPrinting>,
    default_index: usize,
}

impl Card {
    /// Create a card from its first printing, which starts out as the default
    pub fn new(first: CardPrinting, attributes: CardAttributes) -> Self {
        Self {
            id: first.card_id.clone(),
            full_name: first.full_name.clone(),
            attributes,
            printings: vec![first],
            default_index: 0,
        }
    }

    /// Append a printing, promoting it to default when it is the first core
    /// printing seen.
    pub fn push_printing(&mut self, printing: CardPrinting) {
        let promote = printing.is_core_printing() && !self.default_printing().is_core_printing();
        self.printings.push(printing);
        if promote {
            self.default_index = self.printings.len() - 1;
        }
    }

    pub fn printings(&self) -> &[CardPrinting] {
        &self.printings
    }

    pub fn default_printing(&self) -> &CardPrinting {
        &self.printings[self.default_index]
    }

    /// Exact `(setCode, collectorNumber)` match
    pub fn find_printing(&self, set_code: &str, collector_number: &str) -> Option<&CardPrinting> {
        self.printings
            .iter()
            .find(|p| p.matches(set_code, collector_number))
    }

    /// First printing in a set
    pub fn printing_in_set(&self, set_code: &str) -> Option<&CardPrinting> {
        self.printings.iter().find(|p| p.set_code == set_code)
    }

    pub fn has_printing_in_set(&self, set_code: &str) -> bool {
        self.printing_in_set(set_code).is_some()
    }

    /// All printings in human-readable form, for error messages
    pub fn available_printings(&self) -> Vec<String> {
        self.printings.iter().map(CardPrinting::human_readable).collect()
    }

    pub fn has_type(&self, card_type: &str) -> bool {
        self.attributes.types.iter().any(|t| t == card_type)
    }

    /// Inks of the card; single-ink cards report their one ink
    pub fn inks(&self) -> Vec<&str> {
        if !self.attributes.inks.is_empty() {
            return self.attributes.inks.iter().map(String::as_str).collect();
        }
        self.attributes.ink.as_deref().into_iter().collect()
    }

    /// Replace the display name on the card and all printings
    pub(crate) fn rename(&mut self, full_name: &str) {
        self.full_name = full_name.to_string();
        for printing in &mut self.printings {
            printing.full_name = full_name.to_string();
        }
    }
}
