//! Deck and pool export formats
//!
//! Every converter goes through [`PrintingCountMap`]: imports resolve names via
//! the card-list codec, exports read names and images from the catalog.

pub mod draftmancer;
pub mod pixelborn;
pub mod tts;

use crate::card::PrintingId;
use crate::card_list::{CardListCodec, CardListError, PrintingCountMap, RenderError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid deck export: {0}")]
    InvalidExport(String),

    #[error("Invalid deck code: {0}")]
    InvalidDeckCode(String),

    #[error("No image for printing {0}")]
    MissingImage(PrintingId),

    #[error(transparent)]
    CardList(#[from] CardListError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Booster(#[from] crate::booster::BoosterError),
}

impl FormatError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) | Self::InvalidExport(_) => "invalid_export",
            Self::InvalidDeckCode(_) => "invalid_deck_code",
            Self::MissingImage(_) => "missing_image",
            Self::CardList(e) => e.kind(),
            Self::Render(e) => e.kind(),
            Self::Booster(e) => e.kind(),
        }
    }

    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Json(_) | Self::InvalidExport(_) | Self::InvalidDeckCode(_) => 400,
            Self::MissingImage(_) => 500,
            Self::CardList(e) => e.status_hint(),
            Self::Render(e) => e.status_hint(),
            Self::Booster(e) => e.status_hint(),
        }
    }
}

/// A card name with a copy count, as found in third-party exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedName {
    pub name: String,
    pub count: u32,
}

/// Resolve exported names as bare card names, aggregating failures
pub fn resolve_counted_names(
    entries: &[CountedName],
    codec: &CardListCodec<'_>,
) -> Result<PrintingCountMap, CardListError> {
    codec.parse(
        entries
            .iter()
            .map(|entry| format!("{} {}", entry.count, entry.name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_fixtures::catalog;

    #[test]
    fn test_resolve_counted_names() {
        let catalog = catalog();
        let codec = CardListCodec::new(&catalog);
        let entries = vec![
            CountedName { name: "Be Prepared".into(), count: 2 },
            CountedName { name: "Māui - Demigod".into(), count: 1 },
        ];
        let map = resolve_counted_names(&entries, &codec).unwrap();
        assert_eq!(map.total(), 3);

        let unknown = vec![CountedName { name: "Nobody".into(), count: 1 }];
        let err = resolve_counted_names(&unknown, &codec).unwrap_err();
        assert_eq!(err.kind(), "unresolved_cards");
    }

    #[test]
    fn test_error_kinds_pass_through() {
        let err = FormatError::from(RenderError("ghost-1-1".parse().unwrap()));
        assert_eq!(err.kind(), "catalog_drift");
        assert_eq!(FormatError::InvalidDeckCode("x".into()).status_hint(), 400);
    }
}
