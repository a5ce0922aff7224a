//! Shared types for the cube store.
//!
//! These types are database-agnostic and used by all implementations.

use serde::{Deserialize, Serialize};

/// A cube as stored: card list and tags are kept as JSON text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeRecord {
    pub id: String,
    pub name: String,
    /// `{"<id>-<set>-<num>": count}`
    pub card_list: String,
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub author: String,
    pub last_updated_epoch_seconds: i64,
    pub edit_secret: String,
    pub boosters_per_player: u32,
    pub cards_per_booster: u32,
    pub set_card_colors: bool,
    pub color_balance_packs: bool,
    pub with_replacement: bool,
    /// Uppercase band name, e.g. `MEDIUM`
    pub power_band: String,
    pub card_list_views: u64,
    pub page_views: u64,
    pub drafts: u64,
    pub featured_card: Option<String>,
    pub description: String,
}

/// Ordering key for cube listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    /// Popularity score
    Rank,
    /// Last update time
    Date,
}

impl SortType {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Rank => "popularity",
            Self::Date => "last_updated_epoch_seconds",
        }
    }
}

impl Default for SortType {
    fn default() -> Self {
        Self::Rank
    }
}

impl std::fmt::Display for SortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rank => write!(f, "rank"),
            Self::Date => write!(f, "date"),
        }
    }
}

impl std::str::FromStr for SortType {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rank" | "popularity" => Ok(Self::Rank),
            "date" | "updated" => Ok(Self::Date),
            _ => Err(ParseError::InvalidSortType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Asc,
    Desc,
}

impl OrderType {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Default for OrderType {
    fn default() -> Self {
        Self::Desc
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseError::InvalidOrderType(s.to_string())),
        }
    }
}

/// Popularity counters kept per cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    CardListViews,
    PageViews,
    Drafts,
}

impl CounterKind {
    pub fn column(&self) -> &'static str {
        match self {
            Self::CardListViews => "card_list_views",
            Self::PageViews => "page_views",
            Self::Drafts => "drafts",
        }
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl std::str::FromStr for CounterKind {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "card_list_views" | "list_views" => Ok(Self::CardListViews),
            "page_views" | "views" => Ok(Self::PageViews),
            "drafts" => Ok(Self::Drafts),
            _ => Err(ParseError::InvalidCounter(s.to_string())),
        }
    }
}

/// Filter and paging for cube listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeFilter {
    /// 1-based
    pub page: u32,
    pub per_page: u32,
    pub sort: SortType,
    pub order: OrderType,
    /// Cubes must carry every tag
    pub tags: Vec<String>,
    /// Cubes must be in one of these bands
    pub power_bands: Vec<String>,
}

impl CubeFilter {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Non-blank tags
    pub fn active_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty())
    }

    /// Non-blank bands, uppercased to match stored values
    pub fn active_power_bands(&self) -> impl Iterator<Item = String> + '_ {
        self.power_bands
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .map(|b| b.to_uppercase())
    }
}

impl Default for CubeFilter {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 25,
            sort: SortType::default(),
            order: OrderType::default(),
            tags: Vec::new(),
            power_bands: Vec::new(),
        }
    }
}

/// Error parsing enum values from strings
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid sort type: {0}")]
    InvalidSortType(String),
    #[error("Invalid order type: {0}")]
    InvalidOrderType(String),
    #[error("Invalid counter: {0}")]
    InvalidCounter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_type_round_trip() {
        for sort in [SortType::Rank, SortType::Date] {
            assert_eq!(sort.to_string().parse::<SortType>().unwrap(), sort);
        }
        assert!("size".parse::<SortType>().is_err());
    }

    #[test]
    fn test_order_type_parse() {
        assert_eq!("ASC".parse::<OrderType>().unwrap(), OrderType::Asc);
        assert_eq!(OrderType::default(), OrderType::Desc);
        assert!("up".parse::<OrderType>().is_err());
    }

    #[test]
    fn test_counter_kind_parse() {
        assert_eq!("list-views".parse::<CounterKind>().unwrap(), CounterKind::CardListViews);
        assert_eq!("drafts".parse::<CounterKind>().unwrap(), CounterKind::Drafts);
        assert_eq!(CounterKind::PageViews.column(), "page_views");
    }

    #[test]
    fn test_filter_paging_and_blank_entries() {
        let filter = CubeFilter {
            page: 3,
            per_page: 10,
            tags: vec!["".into(), " Singleton ".into()],
            power_bands: vec!["max".into(), " ".into()],
            ..Default::default()
        };
        assert_eq!(filter.offset(), 20);
        assert_eq!(filter.active_tags().collect::<Vec<_>>(), vec!["Singleton"]);
        assert_eq!(filter.active_power_bands().collect::<Vec<_>>(), vec!["MAX"]);

        let first = CubeFilter {
            page: 0,
            ..Default::default()
        };
        assert_eq!(first.offset(), 0);
    }
}
