//! Booster slot model and expected-copies analysis
//!
//! A booster is a list of named slots. Each slot draws a fixed number of
//! cards from a weighted pool of printings.

use crate::card::{PrintingId, Rarity};
use crate::catalog::CardCatalog;
use crate::id::CardIdentifier;
use std::collections::BTreeMap;
use thiserror::Error;

/// Inks with their own common slot, in pack order
pub const COMMON_SLOT_INKS: &[&str] = &["Steel", "Sapphire", "Ruby", "Emerald", "Amethyst", "Amber"];

pub const UNCOMMON_SLOT: &str = "UncommonSlot";
pub const RARE_OR_HIGHER_SLOT: &str = "RareOrHigherSlot";
pub const FOIL_SLOT: &str = "FoilSlot";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoosterError {
    #[error("Retail set with code {0} not found")]
    SetNotFound(String),
}

impl BoosterError {
    pub fn kind(&self) -> &'static str {
        "set_not_found"
    }

    pub fn status_hint(&self) -> u16 {
        404
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    pub printing: PrintingId,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoosterSlot {
    pub name: String,
    /// Cards drawn from this slot per booster
    pub draws: u32,
    pub entries: Vec<SlotEntry>,
}

impl BoosterSlot {
    pub fn new(name: impl Into<String>, draws: u32) -> Self {
        Self {
            name: name.into(),
            draws,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, printing: PrintingId, weight: u32) {
        self.entries.push(SlotEntry { printing, weight });
    }

    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.weight)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSize {
    pub players: u32,
    pub boosters_per_player: u32,
}

impl TableSize {
    /// Boosters opened at the table
    pub fn boosters(&self) -> f64 {
        f64::from(self.players) * f64::from(self.boosters_per_player)
    }
}

impl Default for TableSize {
    fn default() -> Self {
        Self {
            players: 8,
            boosters_per_player: 4,
        }
    }
}

pub fn common_slot_name(ink: &str) -> String {
    format!("CommonSlot{}", ink)
}

/// Empty retail slot layout
pub fn retail_layout() -> Vec<BoosterSlot> {
    let mut slots: Vec<BoosterSlot> = COMMON_SLOT_INKS
        .iter()
        .map(|ink| BoosterSlot::new(common_slot_name(ink), 1))
        .collect();
    slots.push(BoosterSlot::new(UNCOMMON_SLOT, 3));
    slots.push(BoosterSlot::new(RARE_OR_HIGHER_SLOT, 2));
    slots.push(BoosterSlot::new(FOIL_SLOT, 1));
    slots
}

/// Slots a printing of this rarity and ink is drawn from.
///
/// Every printing can appear in the foil slot.
fn retail_slot_names(rarity: Rarity, ink: Option<&str>) -> Vec<String> {
    let mut names = Vec::new();
    match rarity {
        Rarity::Common => {
            if let Some(ink) = ink {
                names.push(common_slot_name(ink));
            }
        }
        Rarity::Uncommon => names.push(UNCOMMON_SLOT.to_string()),
        Rarity::Rare | Rarity::SuperRare | Rarity::Legendary => {
            names.push(RARE_OR_HIGHER_SLOT.to_string())
        }
        Rarity::Epic | Rarity::Enchanted | Rarity::Iconic => {}
    }
    names.push(FOIL_SLOT.to_string());
    names
}

/// Build the retail slots for a set from the catalog.
///
/// Each card contributes its first printing in the set, weighted by that
/// printing's rarity.
pub fn retail_slots(catalog: &CardCatalog, set_code: &str) -> Result<Vec<BoosterSlot>, BoosterError> {
    let cards = catalog.cards_in_set(set_code);
    if cards.is_empty() {
        return Err(BoosterError::SetNotFound(set_code.to_string()));
    }

    let mut slots = retail_layout();
    for card in cards {
        let Some(printing) = card.printing_in_set(set_code) else {
            continue;
        };
        let ink = card.inks().first().copied();
        let weight = printing.rarity.pull_frequency();
        for name in retail_slot_names(printing.rarity, ink) {
            match slots.iter_mut().find(|slot| slot.name == name) {
                Some(slot) => slot.push(printing.printing_id(), weight),
                None => tracing::warn!("No slot {} for {}", name, card.full_name),
            }
        }
    }
    Ok(slots)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedCopies {
    pub card_id: CardIdentifier,
    pub full_name: String,
    pub copies: f64,
}

/// Expected copies of each card opened at a table.
///
/// Per slot: `weight / total_weight * draws * boosters`, summed over every
/// slot a card's printings appear in. Entries for cards missing from the
/// catalog are skipped. Sorted by copies, highest first.
pub fn expected_copies(
    slots: &[BoosterSlot],
    table: TableSize,
    catalog: &CardCatalog,
) -> Vec<ExpectedCopies> {
    let boosters = table.boosters();
    let mut totals: BTreeMap<CardIdentifier, f64> = BTreeMap::new();

    for slot in slots {
        let total_weight = slot.total_weight();
        if total_weight == 0 {
            continue;
        }
        for entry in &slot.entries {
            if catalog.get_card(entry.printing.card_id.as_str()).is_none() {
                tracing::warn!("Skipping {} in {}: not in catalog", entry.printing, slot.name);
                continue;
            }
            let share = f64::from(entry.weight) / total_weight as f64;
            *totals.entry(entry.printing.card_id.clone()).or_insert(0.0) +=
                share * f64::from(slot.draws) * boosters;
        }
    }

    let mut result: Vec<ExpectedCopies> = totals
        .into_iter()
        .filter_map(|(card_id, copies)| {
            let card = catalog.get_card(card_id.as_str())?;
            Some(ExpectedCopies {
                full_name: card.full_name.clone(),
                card_id,
                copies,
            })
        })
        .collect();
    result.sort_by(|a, b| {
        b.copies
            .partial_cmp(&a.copies)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.card_id.cmp(&b.card_id))
    });
    result
}
