//! Cube domain model
//!
//! A cube is a named, user-curated card pool with draft settings, a shared
//! edit secret and a few popularity counters.

use crate::card::PrintingId;
use crate::card_list::PrintingCountMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DRAFT_WEIGHT: u64 = 5;
pub const CARD_LIST_VIEW_WEIGHT: u64 = 1;
pub const PAGE_VIEW_WEIGHT: u64 = 1;

/// Ranking score used for "sort by rank"
pub fn popularity(drafts: u64, card_list_views: u64, page_views: u64) -> u64 {
    drafts * DRAFT_WEIGHT + card_list_views * CARD_LIST_VIEW_WEIGHT + page_views * PAGE_VIEW_WEIGHT
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid power band: {0}")]
pub struct ParsePowerBandError(pub String);

/// Intended power level of a cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerBand {
    Retail,
    Low,
    Medium,
    High,
    Overpowered,
    Max,
}

impl PowerBand {
    pub const ALL: &'static [PowerBand] = &[
        Self::Retail,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Overpowered,
        Self::Max,
    ];

    /// Stored form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "RETAIL",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Overpowered => "OVERPOWERED",
            Self::Max => "MAX",
        }
    }

    /// Tag shown in cube listings, e.g. `"Power: max"`
    pub fn tag(&self) -> String {
        format!("Power: {}", self.as_str().to_lowercase())
    }
}

impl Default for PowerBand {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for PowerBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerBand {
    type Err = ParsePowerBandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|band| band.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePowerBandError(s.to_string()))
    }
}

/// Draft settings carried by a cube
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeSettings {
    pub boosters_per_player: u32,
    pub cards_per_booster: u32,
    pub set_card_colors: bool,
    pub color_balance_packs: bool,
    pub with_replacement: bool,
    pub power_band: PowerBand,
}

impl Default for CubeSettings {
    fn default() -> Self {
        Self {
            boosters_per_player: 4,
            cards_per_booster: 12,
            set_card_colors: true,
            color_balance_packs: false,
            with_replacement: false,
            power_band: PowerBand::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub id: String,
    pub name: String,
    pub cards: PrintingCountMap,
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub author: String,
    pub last_updated_epoch_seconds: i64,
    pub edit_secret: String,
    pub settings: CubeSettings,
    pub featured_card: Option<PrintingId>,
    pub card_list_views: u64,
    pub page_views: u64,
    pub drafts: u64,
    pub description: String,
}

impl Cube {
    pub fn card_count(&self) -> u64 {
        self.cards.total()
    }

    pub fn times_viewed(&self) -> u64 {
        self.page_views + self.card_list_views
    }

    pub fn popularity(&self) -> u64 {
        popularity(self.drafts, self.card_list_views, self.page_views)
    }

    /// User tags plus the power band tag
    pub fn display_tags(&self) -> Vec<String> {
        let mut tags = self.tags.clone();
        tags.push(self.settings.power_band.tag());
        tags
    }

    /// The featured card, or the first card of the list
    pub fn featured_or_first(&self) -> Option<&PrintingId> {
        self.featured_card
            .as_ref()
            .or_else(|| self.cards.iter().next().map(|(id, _)| id))
    }
}
