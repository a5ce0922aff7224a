//! Card identifiers
//!
//! A card identifier is the lookup key derived from a display name. It folds the
//! handful of non-ASCII letters that appear in card names, strips everything that
//! is not an ASCII letter or digit, and lower-cases the rest.
//!
//! Identifiers are shared by every printing of a card; only [`crate::PrintingId`]
//! tells printings apart.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Letters folded to their base Latin form before stripping.
const FOLDED_LETTERS: &[(char, char)] = &[
    ('ā', 'a'),
    ('Ā', 'a'),
    ('é', 'e'),
    ('É', 'e'),
    ('ñ', 'n'),
    ('Ñ', 'n'),
];

fn fold(c: char) -> char {
    FOLDED_LETTERS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Normalize a display name into its identifier string.
///
/// `"Maui - Demigod"` → `"mauidemigod"`, `"Pokétñe"` → `"poketne"`
pub fn normalize(name: &str) -> String {
    name.chars()
        .map(fold)
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Normalized card lookup key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardIdentifier(String);

impl CardIdentifier {
    /// Derive the identifier for a display name
    pub fn from_name(name: &str) -> Self {
        Self(normalize(name))
    }

    /// Wrap a string that is already normalized.
    ///
    /// Used when reading machine forms (`<id>-<set>-<num>`); the value is
    /// normalized again so a hand-edited key still lands on the right card.
    pub fn from_normalized(id: &str) -> Self {
        Self(normalize(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CardIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CardIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CardIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
