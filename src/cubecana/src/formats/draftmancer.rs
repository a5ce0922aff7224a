//! Draft-tool custom card list files
//!
//! Layout:
//!
//! ```text
//! [CustomCards]
//! [ ...custom card JSON... ]
//! [Settings]
//! { ...settings JSON... }
//! [MainSlot(12)]
//! 2 Elsa - Snow Queen
//! ```
//!
//! Retail files replace the single main slot with one section per booster
//! slot, listing pull weights instead of copy counts.

use super::FormatError;
use crate::booster::{retail_slots, BoosterSlot};
use crate::card::{Card, CardPrinting, PrintingId, Rarity};
use crate::card_list::{mainboard_lines, CardListCodec, PrintingCountMap, RenderError};
use crate::catalog::CardCatalog;
use crate::cube::CubeSettings;
use crate::ratings::Ratings;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const CARD_BACK_URL: &str =
    "https://wiki.mushureport.com/images/thumb/d/d7/Card_Back_official.png/450px-Card_Back_official.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCard {
    pub name: String,
    pub mana_cost: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub image_uris: BTreeMap<String, String>,
    pub rarity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSettings {
    pub boosters_per_player: u32,
    pub name: String,
    pub card_back: String,
    pub with_replacement: bool,
    pub color_balance: bool,
}

impl DraftSettings {
    pub fn new(name: &str, settings: &CubeSettings) -> Self {
        Self {
            boosters_per_player: settings.boosters_per_player,
            name: name.to_string(),
            card_back: CARD_BACK_URL.to_string(),
            with_replacement: settings.with_replacement,
            color_balance: settings.color_balance_packs,
        }
    }
}

/// Draft-tool color letter; Steel has none
pub fn ink_color(ink: &str) -> Option<&'static str> {
    match ink {
        "Amber" => Some("W"),
        "Amethyst" => Some("B"),
        "Emerald" => Some("G"),
        "Ruby" => Some("R"),
        "Sapphire" => Some("U"),
        _ => None,
    }
}

pub fn draft_rarity(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "common",
        Rarity::Uncommon => "uncommon",
        Rarity::Rare => "rare",
        _ => "mythic",
    }
}

/// Songs are checked before actions since every song is also an action
pub fn draft_card_type(card: &Card) -> &'static str {
    if card.has_type("Character") {
        "Creature"
    } else if card.has_type("Song") {
        "Instant"
    } else if card.has_type("Action") {
        "Sorcery"
    } else if card.has_type("Item") {
        "Artifact"
    } else if card.has_type("Location") {
        "Battle"
    } else {
        "Instant"
    }
}

pub fn custom_card(
    card: &Card,
    printing: &CardPrinting,
    settings: &CubeSettings,
    rating: Option<u32>,
) -> CustomCard {
    let colors = settings.set_card_colors.then(|| {
        card.inks()
            .into_iter()
            .filter_map(ink_color)
            .map(String::from)
            .collect()
    });
    CustomCard {
        name: card.full_name.clone(),
        mana_cost: format!("{{{}}}", card.attributes.cost),
        card_type: draft_card_type(card).to_string(),
        image_uris: printing.image_uris.clone(),
        rarity: draft_rarity(printing.rarity).to_string(),
        rating,
        layout: card.has_type("Location").then(|| "split".to_string()),
        colors,
    }
}

/// Builds draft files; ratings are optional per card
#[derive(Debug, Clone)]
pub struct DraftFileBuilder<'c> {
    catalog: &'c CardCatalog,
    name: String,
    settings: CubeSettings,
    ratings: Ratings,
}

impl<'c> DraftFileBuilder<'c> {
    pub fn new(catalog: &'c CardCatalog, name: &str, settings: &CubeSettings) -> Self {
        Self {
            catalog,
            name: name.to_string(),
            settings: settings.clone(),
            ratings: Ratings::new(),
        }
    }

    pub fn with_ratings(mut self, ratings: Ratings) -> Self {
        self.ratings = ratings;
        self
    }

    fn header(&self, custom_cards: &[CustomCard]) -> Result<Vec<String>, FormatError> {
        Ok(vec![
            "[CustomCards]".to_string(),
            serde_json::to_string_pretty(custom_cards)?,
            "[Settings]".to_string(),
            serde_json::to_string_pretty(&DraftSettings::new(&self.name, &self.settings))?,
        ])
    }

    /// One custom card per card, using the first printing seen for it
    fn custom_cards<'a>(
        &self,
        printings: impl IntoIterator<Item = &'a PrintingId>,
    ) -> Result<Vec<CustomCard>, FormatError> {
        let mut seen = HashSet::new();
        let mut custom_cards = Vec::new();
        for id in printings {
            if !seen.insert(id.card_id.clone()) {
                continue;
            }
            let (Some(card), Some(printing)) = (
                self.catalog.get_card(id.card_id.as_str()),
                self.catalog.get_printing(id),
            ) else {
                return Err(RenderError(id.clone()).into());
            };
            let rating = self.ratings.get(&id.card_id).copied();
            if rating.is_none() && !self.ratings.is_empty() {
                tracing::debug!("Missing rating for {}", card.full_name);
            }
            custom_cards.push(custom_card(card, printing, &self.settings, rating));
        }
        Ok(custom_cards)
    }

    /// File with a single main slot holding the whole list
    pub fn cube_file(&self, cards: &PrintingCountMap) -> Result<String, FormatError> {
        let custom_cards = self.custom_cards(cards.iter().map(|(id, _)| id))?;
        let mut lines = self.header(&custom_cards)?;
        lines.push(format!("[MainSlot({})]", self.settings.cards_per_booster));
        for (card_id, count) in cards.card_counts() {
            if let Some(card) = self.catalog.get_card(card_id.as_str()) {
                lines.push(format!("{} {}", count, card.full_name));
            }
        }
        Ok(lines.join("\n"))
    }

    /// File with one section per booster slot
    pub fn slotted_file(&self, slots: &[BoosterSlot]) -> Result<String, FormatError> {
        let custom_cards = self.custom_cards(
            slots
                .iter()
                .flat_map(|slot| slot.entries.iter().map(|entry| &entry.printing)),
        )?;
        let mut lines = self.header(&custom_cards)?;
        for slot in slots {
            lines.push(format!("[{}({})]", slot.name, slot.draws));
            for entry in &slot.entries {
                if let Some(card) = self.catalog.get_card(entry.printing.card_id.as_str()) {
                    lines.push(format!("{} {}", entry.weight, card.full_name));
                }
            }
        }
        Ok(lines.join("\n"))
    }

    /// Retail booster simulation for one set
    pub fn retail_file(&self, set_code: &str) -> Result<String, FormatError> {
        let slots = retail_slots(self.catalog, set_code)?;
        self.slotted_file(&slots)
    }
}

/// Read a deck exported by the draft tool: the main deck, before the first
/// blank line
pub fn read_deck_export(text: &str, codec: &CardListCodec<'_>) -> Result<PrintingCountMap, FormatError> {
    let lines: Vec<&str> = text.lines().collect();
    Ok(codec.parse(mainboard_lines(&lines))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_fixtures::catalog;
    use crate::id::CardIdentifier;

    fn id(s: &str) -> PrintingId {
        s.parse().unwrap()
    }

    fn sections(file: &str) -> Vec<&str> {
        file.lines()
            .filter(|line| {
                line.len() > 2 && line.starts_with('[') && line[1..].starts_with(char::is_alphabetic)
            })
            .collect()
    }

    #[test]
    fn test_card_type_mapping() {
        let catalog = catalog();
        let get = |name: &str| draft_card_type(catalog.get_card_by_name(name).unwrap());
        assert_eq!(get("Elsa - Snow Queen"), "Creature");
        assert_eq!(get("Be Prepared"), "Instant");
        assert_eq!(get("Friends On The Other Side"), "Sorcery");
        assert_eq!(get("Dinglehopper"), "Artifact");
        assert_eq!(get("Pride Lands - Pride Rock"), "Battle");
    }

    #[test]
    fn test_custom_card_fields() {
        let catalog = catalog();
        let settings = CubeSettings::default();
        let card = catalog.get_card_by_name("Pride Lands - Pride Rock").unwrap();
        let custom = custom_card(card, card.default_printing(), &settings, Some(3));

        assert_eq!(custom.mana_cost, "{2}");
        assert_eq!(custom.rarity, "uncommon");
        assert_eq!(custom.layout.as_deref(), Some("split"));
        assert_eq!(custom.colors, Some(vec!["G".to_string()]));

        let json = serde_json::to_value(&custom).unwrap();
        assert_eq!(json["type"], "Battle");
        assert_eq!(json["rating"], 3);
        for locale in crate::card::IMAGE_LOCALES {
            assert!(json["image_uris"][locale].is_string(), "missing {} image", locale);
        }
    }

    #[test]
    fn test_colors() {
        let catalog = catalog();
        let dual = catalog.get_card_by_name("Donald Duck - Fred Honeywell").unwrap();
        let steel = catalog.get_card_by_name("Some Card 5").unwrap();
        let with_colors = CubeSettings::default();
        let without = CubeSettings {
            set_card_colors: false,
            ..Default::default()
        };

        assert_eq!(
            custom_card(dual, dual.default_printing(), &with_colors, None).colors,
            Some(vec!["W".to_string(), "R".to_string()])
        );
        assert_eq!(
            custom_card(steel, steel.default_printing(), &with_colors, None).colors,
            Some(vec![])
        );
        let plain = custom_card(dual, dual.default_printing(), &without, None);
        assert_eq!(plain.colors, None);
        assert!(!serde_json::to_string(&plain).unwrap().contains("colors"));
    }

    #[test]
    fn test_rarity_mapping() {
        assert_eq!(draft_rarity(Rarity::SuperRare), "mythic");
        assert_eq!(draft_rarity(Rarity::Legendary), "mythic");
        assert_eq!(draft_rarity(Rarity::Rare), "rare");
    }

    #[test]
    fn test_cube_file_layout() {
        let catalog = catalog();
        let map = PrintingCountMap::from_counts([
            (id("elsasnowqueen-P1-3"), 1),
            (id("elsasnowqueen-1-42"), 1),
            (id("beprepared-1-128"), 2),
        ])
        .unwrap();
        let settings = CubeSettings {
            cards_per_booster: 15,
            ..Default::default()
        };
        let file = DraftFileBuilder::new(&catalog, "My Cube", &settings)
            .cube_file(&map)
            .unwrap();

        assert_eq!(sections(&file), vec!["[CustomCards]", "[Settings]", "[MainSlot(15)]"]);
        assert!(file.ends_with("[MainSlot(15)]\n2 Be Prepared\n2 Elsa - Snow Queen"));

        let cards_json = file
            .split("[CustomCards]\n")
            .nth(1)
            .and_then(|rest| rest.split("\n[Settings]").next())
            .unwrap();
        let cards: Vec<CustomCard> = serde_json::from_str(cards_json).unwrap();
        assert_eq!(cards.len(), 2);

        assert!(file.contains("\"boostersPerPlayer\": 4"));
        assert!(file.contains("\"name\": \"My Cube\""));
        assert!(file.contains(CARD_BACK_URL));
    }

    #[test]
    fn test_retail_file_has_slot_sections() {
        let catalog = catalog();
        let file = DraftFileBuilder::new(&catalog, "Set 1", &CubeSettings::default())
            .retail_file("1")
            .unwrap();
        let found = sections(&file);
        assert_eq!(found[2], "[CommonSlotSteel(1)]");
        assert!(found.contains(&"[UncommonSlot(3)]"));
        assert!(found.contains(&"[RareOrHigherSlot(2)]"));
        assert!(file.contains("[UncommonSlot(3)]\n30000 Mickey Mouse - True Friend"));
        assert!(file.ends_with("[FoilSlot(1)]\n13000 Be Prepared\n60000 Dinglehopper\n5000 Elsa - Snow Queen\n\
                                60000 Friends On The Other Side\n2000 Māui - Demigod\n30000 Mickey Mouse - True Friend"));
    }

    #[test]
    fn test_retail_file_unknown_set() {
        let catalog = catalog();
        let err = DraftFileBuilder::new(&catalog, "x", &CubeSettings::default())
            .retail_file("42")
            .unwrap_err();
        assert_eq!(err.kind(), "set_not_found");
    }

    #[test]
    fn test_ratings_are_attached() {
        let catalog = catalog();
        let map = PrintingCountMap::from_counts([(id("beprepared-1-128"), 1)]).unwrap();
        let mut ratings = BTreeMap::new();
        ratings.insert(CardIdentifier::from_name("Be Prepared"), 4);
        let file = DraftFileBuilder::new(&catalog, "x", &CubeSettings::default())
            .with_ratings(ratings)
            .cube_file(&map)
            .unwrap();
        assert!(file.contains("\"rating\": 4"));
    }

    #[test]
    fn test_read_deck_export_stops_at_sideboard() {
        let catalog = catalog();
        let codec = CardListCodec::new(&catalog);
        let export = "2 Be Prepared\n1 Dinglehopper\n\n1 Not Even A Card\n";
        let map = read_deck_export(export, &codec).unwrap();
        assert_eq!(map.total(), 3);
    }
}
