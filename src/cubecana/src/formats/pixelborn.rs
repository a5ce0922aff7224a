//! Deck-import codes
//!
//! A deck code is `"<Name>$<count>|"` per card, concatenated and base64
//! encoded. Deck builders accept it through an import URL.

use super::{resolve_counted_names, CountedName, FormatError};
use crate::card_list::{CardListCodec, PrintingCountMap, RenderError};
use crate::catalog::CardCatalog;
use base64::{engine::general_purpose::STANDARD, Engine};

const INKTABLE_IMPORT_URL: &str = "https://www.inktable.net/lor/import?svc=dreamborn";
const LORCANITO_IMPORT_URL: &str = "https://db.lorcanito.com/decks/import?source=cubecana";

/// Encode a list; printings of the same card are combined
pub fn encode(cards: &PrintingCountMap, catalog: &CardCatalog) -> Result<String, FormatError> {
    if let Some((missing, _)) = cards
        .iter()
        .find(|(id, _)| catalog.get_card(id.card_id.as_str()).is_none())
    {
        return Err(RenderError(missing.clone()).into());
    }

    let mut decoded = String::new();
    for (card_id, count) in cards.card_counts() {
        if let Some(card) = catalog.get_card(card_id.as_str()) {
            decoded.push_str(&format!("{}${}|", card.full_name, count));
        }
    }
    Ok(STANDARD.encode(decoded.as_bytes()))
}

/// Split a deck code into names and counts without resolving them
pub fn decode_names(code: &str) -> Result<Vec<CountedName>, FormatError> {
    let bytes = STANDARD
        .decode(code.trim())
        .map_err(|e| FormatError::InvalidDeckCode(e.to_string()))?;
    let decoded =
        String::from_utf8(bytes).map_err(|e| FormatError::InvalidDeckCode(e.to_string()))?;

    decoded
        .split('|')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            let (name, count) = entry
                .rsplit_once('$')
                .ok_or_else(|| FormatError::InvalidDeckCode(format!("missing count in {:?}", entry)))?;
            let count: u32 = count
                .trim()
                .parse()
                .map_err(|_| FormatError::InvalidDeckCode(format!("bad count in {:?}", entry)))?;
            Ok(CountedName {
                name: name.trim().to_string(),
                count,
            })
        })
        .collect()
}

/// Decode and resolve every name, aggregating unknown cards
pub fn decode(code: &str, codec: &CardListCodec<'_>) -> Result<PrintingCountMap, FormatError> {
    let names = decode_names(code)?;
    Ok(resolve_counted_names(&names, codec)?)
}

pub fn inktable_import_link(code: &str, deck_name: &str) -> String {
    format!(
        "{}&name={}&id={}",
        INKTABLE_IMPORT_URL,
        urlencoding::encode(deck_name),
        code
    )
}

pub fn lorcanito_import_link(code: &str, deck_name: &str) -> String {
    format!(
        "{}&name={}&list={}",
        LORCANITO_IMPORT_URL,
        urlencoding::encode(deck_name),
        code
    )
}
