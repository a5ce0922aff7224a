//! Tabletop Simulator saved-object JSON
//!
//! A deck is a single `DeckCustom` object. Each copy of a card is one
//! contained object whose face image lives in `CustomDeck` under its
//! 1-based position.

use super::{CountedName, FormatError};
use crate::card_list::PrintingCountMap;
use crate::catalog::CardCatalog;
use crate::id::CardIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CARD_BACK_URL: &str = "https://steamusercontent-a.akamaihd.net/ugc/2073388328677586509/478B51BE25275FD0AC2CFC48828F9FD7B9864526/";

const SCALE_X: f32 = 1.2;
const SCALE_Y: f32 = 1.0;
const SCALE_Z: f32 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub pos_x: f32,
    pub pos_y: f32,
    pub pos_z: f32,
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub scale_z: f32,
}

impl Transform {
    /// Face down, at the given height
    fn face_down(pos_y: f32) -> Self {
        Self {
            pos_x: 0.0,
            pos_y,
            pos_z: 0.0,
            rot_x: 0.0,
            rot_y: 180.0,
            rot_z: 180.0,
            scale_x: SCALE_X,
            scale_y: SCALE_Y,
            scale_z: SCALE_Z,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainedCard {
    /// String when written by us, integer in most third-party exports
    #[serde(rename = "CardID", default)]
    pub card_id: serde_json::Value,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Nickname", default)]
    pub nickname: String,
    #[serde(rename = "Transform", default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomDeckEntry {
    #[serde(rename = "FaceURL")]
    pub face_url: String,
    #[serde(rename = "BackURL", default)]
    pub back_url: String,
    #[serde(default = "one")]
    pub num_height: u32,
    #[serde(default = "one")]
    pub num_width: u32,
    #[serde(default)]
    pub back_is_hidden: bool,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeckObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contained_objects: Vec<ContainedCard>,
    #[serde(rename = "DeckIDs", default)]
    pub deck_ids: Vec<serde_json::Value>,
    #[serde(default)]
    pub custom_deck: BTreeMap<String, CustomDeckEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TtsSave {
    pub object_states: Vec<DeckObject>,
}

/// A card read from an export: name, copies and face image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsEntry {
    pub name: String,
    pub count: u32,
    pub face_url: Option<String>,
}

/// Per-card entries in first-seen order, merged by card identifier
#[derive(Debug, Default)]
struct EntryTally {
    entries: Vec<TtsEntry>,
    index_by_id: BTreeMap<CardIdentifier, usize>,
}

impl EntryTally {
    /// Add copies of a card; the first name and face image seen are kept
    fn add(&mut self, name: &str, count: u32, face_url: Option<String>) -> Result<(), FormatError> {
        let id = CardIdentifier::from_name(name);
        match self.index_by_id.get(&id) {
            Some(&index) => {
                let entry = &mut self.entries[index];
                entry.count = entry.count.checked_add(count).ok_or_else(|| {
                    FormatError::InvalidExport(format!("too many copies of {}", entry.name))
                })?;
            }
            None => {
                self.index_by_id.insert(id, self.entries.len());
                self.entries.push(TtsEntry {
                    name: name.to_string(),
                    count,
                    face_url,
                });
            }
        }
        Ok(())
    }
}

/// Read a deck export into per-card entries, in first-seen order.
///
/// Copies are merged by card identifier.
pub fn read_deck(json: &str) -> Result<Vec<TtsEntry>, FormatError> {
    let save: TtsSave = serde_json::from_str(json)?;
    let deck = save
        .object_states
        .first()
        .ok_or_else(|| FormatError::InvalidExport("no ObjectStates".to_string()))?;

    let mut tally = EntryTally::default();
    for (i, card) in deck.contained_objects.iter().enumerate() {
        if card.nickname.trim().is_empty() {
            return Err(FormatError::InvalidExport(format!(
                "contained object {} has no Nickname",
                i + 1
            )));
        }
        let face_url = deck
            .custom_deck
            .get(&(i + 1).to_string())
            .map(|entry| entry.face_url.clone());
        tally.add(&card.nickname, 1, face_url)?;
    }
    Ok(tally.entries)
}

/// Combine entries read from several exports, summing copies per card
pub fn merge_entries<I>(decks: I) -> Result<Vec<TtsEntry>, FormatError>
where
    I: IntoIterator<Item = Vec<TtsEntry>>,
{
    let mut tally = EntryTally::default();
    for entry in decks.into_iter().flatten() {
        tally.add(&entry.name, entry.count, entry.face_url)?;
    }
    Ok(tally.entries)
}

pub fn counted_names(entries: &[TtsEntry]) -> Vec<CountedName> {
    entries
        .iter()
        .map(|e| CountedName {
            name: e.name.clone(),
            count: e.count,
        })
        .collect()
}

/// Build a deck object with one contained card per copy.
///
/// Card `n` (1-based) gets `CardID` `"<n><n-1:02>"`.
pub fn build_deck(cards: &PrintingCountMap, catalog: &CardCatalog) -> Result<TtsSave, FormatError> {
    let mut contained_objects = Vec::new();
    let mut deck_ids = Vec::new();
    let mut custom_deck = BTreeMap::new();
    let mut missing = Vec::new();

    let mut current = 1u32;
    for (id, count) in cards.iter() {
        let (Some(card), Some(printing)) = (
            catalog.get_card(id.card_id.as_str()),
            catalog.get_printing(id),
        ) else {
            missing.push(id.clone());
            continue;
        };
        let face_url = printing
            .image_uri("en")
            .ok_or_else(|| FormatError::MissingImage(id.clone()))?;

        for _ in 0..count {
            let card_id = format!("{}{:02}", current, current - 1);
            contained_objects.push(ContainedCard {
                card_id: serde_json::Value::String(card_id.clone()),
                name: "Card".to_string(),
                nickname: card.full_name.clone(),
                transform: Some(Transform::face_down(0.0)),
            });
            deck_ids.push(serde_json::Value::String(card_id));
            custom_deck.insert(
                current.to_string(),
                CustomDeckEntry {
                    face_url: face_url.to_string(),
                    back_url: CARD_BACK_URL.to_string(),
                    num_height: 1,
                    num_width: 1,
                    back_is_hidden: true,
                },
            );
            current += 1;
        }
    }

    if let Some(id) = missing.into_iter().next() {
        return Err(crate::card_list::RenderError(id).into());
    }

    Ok(TtsSave {
        object_states: vec![DeckObject {
            name: "DeckCustom".to_string(),
            contained_objects,
            deck_ids,
            custom_deck,
            transform: Some(Transform::face_down(1.0)),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::PrintingId;
    use crate::card_list::CardListCodec;
    use crate::catalog::test_fixtures::catalog;
    use crate::formats::resolve_counted_names;

    fn id(s: &str) -> PrintingId {
        s.parse().unwrap()
    }

    const EXPORT: &str = r#"{
        "ObjectStates": [{
            "Name": "DeckCustom",
            "ContainedObjects": [
                {"CardID": 100, "Name": "Card", "Nickname": "Be Prepared"},
                {"CardID": 201, "Name": "Card", "Nickname": "Elsa - Snow Queen"},
                {"CardID": 302, "Name": "Card", "Nickname": "Be Prepared"}
            ],
            "DeckIDs": [100, 201, 302],
            "CustomDeck": {
                "1": {"FaceURL": "https://img/bp.png", "BackURL": "https://img/back.png", "NumHeight": 1, "NumWidth": 1, "BackIsHidden": true},
                "2": {"FaceURL": "https://img/elsa.png", "BackURL": "https://img/back.png"},
                "3": {"FaceURL": "https://img/bp.png", "BackURL": "https://img/back.png"}
            }
        }]
    }"#;

    #[test]
    fn test_read_deck_merges_copies() {
        let entries = read_deck(EXPORT).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Be Prepared");
        assert_eq!(entries[0].count, 2);
        assert_eq!(entries[0].face_url.as_deref(), Some("https://img/bp.png"));
        assert_eq!(entries[1].face_url.as_deref(), Some("https://img/elsa.png"));
    }

    #[test]
    fn test_read_deck_to_card_list() {
        let catalog = catalog();
        let codec = CardListCodec::new(&catalog);
        let entries = read_deck(EXPORT).unwrap();
        let map = resolve_counted_names(&counted_names(&entries), &codec).unwrap();
        assert_eq!(map.get(&id("beprepared-1-128")), Some(2));
        assert_eq!(map.get(&id("elsasnowqueen-1-42")), Some(1));
    }

    #[test]
    fn test_merge_entries_across_exports() {
        let other = vec![
            TtsEntry {
                name: "Stitch - Rock Star".into(),
                count: 1,
                face_url: None,
            },
            TtsEntry {
                name: "be prepared".into(),
                count: 3,
                face_url: Some("https://img/other.png".into()),
            },
        ];
        let merged = merge_entries([read_deck(EXPORT).unwrap(), other]).unwrap();

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].name, "Be Prepared");
        assert_eq!(merged[0].count, 5);
        assert_eq!(merged[0].face_url.as_deref(), Some("https://img/bp.png"));
        assert_eq!(merged[2].name, "Stitch - Rock Star");
    }

    #[test]
    fn test_merge_entries_count_overflow() {
        let entry = |count| TtsEntry {
            name: "Be Prepared".into(),
            count,
            face_url: None,
        };
        let err = merge_entries([vec![entry(u32::MAX)], vec![entry(1)]]).unwrap_err();
        assert_eq!(err.kind(), "invalid_export");
    }

    #[test]
    fn test_read_deck_rejects_empty_save() {
        let err = read_deck(r#"{"ObjectStates": []}"#).unwrap_err();
        assert_eq!(err.kind(), "invalid_export");
        assert!(read_deck("not json").is_err());
    }

    #[test]
    fn test_build_deck_layout() {
        let catalog = catalog();
        let map = PrintingCountMap::from_counts([
            (id("beprepared-1-128"), 2),
            (id("elsasnowqueen-P1-3"), 1),
        ])
        .unwrap();
        let save = build_deck(&map, &catalog).unwrap();
        let deck = &save.object_states[0];

        assert_eq!(deck.name, "DeckCustom");
        assert_eq!(deck.contained_objects.len(), 3);
        let ids: Vec<&str> = deck.deck_ids.iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(ids, vec!["100", "201", "302"]);
        assert_eq!(deck.contained_objects[2].nickname, "Elsa - Snow Queen");
        assert_eq!(deck.custom_deck["3"].face_url, "https://img/P1-3.avif");
        assert_eq!(deck.custom_deck["1"].back_url, CARD_BACK_URL);
        assert_eq!(deck.transform.as_ref().unwrap().pos_y, 1.0);

        let json = serde_json::to_value(&save).unwrap();
        let card = &json["ObjectStates"][0]["ContainedObjects"][0];
        assert_eq!(card["CardID"], "100");
        assert_eq!(card["Transform"]["rotY"], 180.0);
        assert_eq!(json["ObjectStates"][0]["CustomDeck"]["1"]["BackIsHidden"], true);
    }

    #[test]
    fn test_build_then_read_round_trip() {
        let catalog = catalog();
        let map = PrintingCountMap::from_counts([(id("dinglehopper-1-100"), 3)]).unwrap();
        let json = serde_json::to_string(&build_deck(&map, &catalog).unwrap()).unwrap();
        let entries = read_deck(&json).unwrap();
        assert_eq!(
            entries,
            vec![TtsEntry {
                name: "Dinglehopper".into(),
                count: 3,
                face_url: Some("https://img/1-100.avif".into()),
            }]
        );
    }

    #[test]
    fn test_build_deck_fails_on_unknown_card() {
        let catalog = catalog();
        let map = PrintingCountMap::from_counts([(id("ghost-1-1"), 1)]).unwrap();
        assert_eq!(build_deck(&map, &catalog).unwrap_err().kind(), "catalog_drift");
    }
}
