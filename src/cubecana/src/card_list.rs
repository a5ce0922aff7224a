//! Card-list codec
//!
//! Parses `"<count> <name>[ (<set>) <num>]"` lines into a [`PrintingCountMap`]
//! and renders maps back to canonical lines.
//!
//! Resolution failures are collected across the whole input and reported
//! together, grouped by kind, so a long pasted list can be fixed in one pass.
//! A malformed line (no leading count) stops parsing immediately.

use crate::card::PrintingId;
use crate::catalog::CardCatalog;
use crate::id::CardIdentifier;
use crate::resolver::{PrintingResolver, ResolveError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Shown to users alongside a malformed line
pub const LINE_FORMAT_EXAMPLE: &str = "1 Elsa - Snow Queen";

// ============================================================================
// Errors
// ============================================================================

/// Every resolution failure from one parse pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnresolvedLines {
    pub failures: Vec<ResolveError>,
}

impl UnresolvedLines {
    pub fn cards(&self) -> impl Iterator<Item = &ResolveError> {
        self.failures
            .iter()
            .filter(|f| matches!(f, ResolveError::UnresolvedCard { .. }))
    }

    pub fn printings(&self) -> impl Iterator<Item = &ResolveError> {
        self.failures
            .iter()
            .filter(|f| matches!(f, ResolveError::UnresolvedPrinting { .. }))
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for UnresolvedLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cards = self.cards().peekable();
        let has_cards = cards.peek().is_some();
        if has_cards {
            f.write_str("Unable to identify cards from the following:")?;
            for failure in cards {
                write!(f, "\n {}", failure.input())?;
            }
        }

        let mut printings = self.printings().peekable();
        if printings.peek().is_some() {
            if has_cards {
                f.write_str("\n")?;
            }
            f.write_str("Unable to identify printings for cards:")?;
            for failure in printings {
                if let ResolveError::UnresolvedPrinting { input, available } = failure {
                    write!(
                        f,
                        "\n {}.\n  Available Printings: {}",
                        input,
                        available.join(", ")
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardListError {
    #[error("Missing count or name in line:\n {line}\nShould look like:\n1 Elsa - Snow Queen")]
    LineFormat { line: String },

    #[error("{0}")]
    Unresolved(UnresolvedLines),

    #[error("Too many copies of {printing}: at most 4294967295 per printing")]
    CountOverflow { printing: PrintingId },
}

impl CardListError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LineFormat { .. } => "line_format",
            Self::CountOverflow { .. } => "count_overflow",
            Self::Unresolved(lines) if lines.cards().next().is_some() => "unresolved_cards",
            Self::Unresolved(_) => "unresolved_printings",
        }
    }

    pub fn status_hint(&self) -> u16 {
        match self {
            Self::LineFormat { .. } | Self::CountOverflow { .. } => 400,
            Self::Unresolved(_) => 404,
        }
    }
}

/// A stored id whose card is no longer in the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Printing {0} has no card in the catalog")]
pub struct RenderError(pub PrintingId);

impl RenderError {
    pub fn kind(&self) -> &'static str {
        "catalog_drift"
    }

    pub fn status_hint(&self) -> u16 {
        500
    }
}

// ============================================================================
// PrintingCountMap
// ============================================================================

/// `PrintingId -> count`, iterated in `PrintingId` order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrintingCountMap(BTreeMap<PrintingId, u32>);

impl PrintingCountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(id, count)` pairs, summing repeated ids
    pub fn from_counts<I>(counts: I) -> Result<Self, CardListError>
    where
        I: IntoIterator<Item = (PrintingId, u32)>,
    {
        let mut map = Self::new();
        for (id, count) in counts {
            map.insert_or_sum(id, count)?;
        }
        Ok(map)
    }

    /// Add `count` copies, summing with any existing entry
    pub fn insert_or_sum(&mut self, id: PrintingId, count: u32) -> Result<(), CardListError> {
        if count == 0 {
            return Ok(());
        }
        match self.0.get_mut(&id) {
            Some(existing) => {
                *existing = existing
                    .checked_add(count)
                    .ok_or(CardListError::CountOverflow { printing: id })?;
            }
            None => {
                self.0.insert(id, count);
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &PrintingId) -> Option<u32> {
        self.0.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PrintingId, u32)> {
        self.0.iter().map(|(id, count)| (id, *count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total copies across all printings
    pub fn total(&self) -> u64 {
        self.0.values().map(|count| u64::from(*count)).sum()
    }

    /// Copies per card, all printings combined
    pub fn card_counts(&self) -> BTreeMap<CardIdentifier, u64> {
        let mut counts = BTreeMap::new();
        for (id, count) in &self.0 {
            *counts.entry(id.card_id.clone()).or_insert(0) += u64::from(*count);
        }
        counts
    }

    /// Stored JSON form: `{"<id>-<set>-<num>": count}`
    pub fn to_stored_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Read the stored JSON form.
    ///
    /// Bare `<cardid>` keys from older data map to the card's default printing.
    /// Keys naming cards the catalog does not know are skipped with a warning.
    pub fn from_stored_json(json: &str, catalog: &CardCatalog) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, u32> = serde_json::from_str(json)?;
        let mut map = Self::new();
        for (key, count) in raw {
            let id = match key.parse::<PrintingId>() {
                Ok(id) if catalog.get_card(id.card_id.as_str()).is_some() => Some(id),
                Ok(_) => None,
                Err(_) => catalog
                    .get_card(&key)
                    .map(|card| card.default_printing().printing_id()),
            };
            match id {
                Some(id) => {
                    if let Err(e) = map.insert_or_sum(id, count) {
                        tracing::warn!("Skipping stored entry {}: {}", key, e);
                    }
                }
                None => tracing::warn!("Skipping unknown card in stored list: {}", key),
            }
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a PrintingCountMap {
    type Item = (&'a PrintingId, &'a u32);
    type IntoIter = std::collections::btree_map::Iter<'a, PrintingId, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Lines before the first blank line
pub fn mainboard_lines<S: AsRef<str>>(lines: &[S]) -> &[S] {
    let end = lines
        .iter()
        .position(|line| line.as_ref().trim().is_empty())
        .unwrap_or(lines.len());
    &lines[..end]
}

/// Split `"<count> <rest>"`, rejecting lines without a positive count or a name
pub fn split_count(line: &str) -> Result<(u32, &str), CardListError> {
    let line_format = || CardListError::LineFormat {
        line: line.to_string(),
    };
    let (count, rest) = line
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(line_format)?;
    let count: u32 = count.parse().map_err(|_| line_format())?;
    let rest = rest.trim();
    if count == 0 || rest.is_empty() {
        return Err(line_format());
    }
    Ok((count, rest))
}

/// Result of a parse that keeps what it could resolve
#[derive(Debug, Clone, Default)]
pub struct PartialCardList {
    pub cards: PrintingCountMap,
    pub unresolved: UnresolvedLines,
}

#[derive(Debug, Clone, Copy)]
pub struct CardListCodec<'c> {
    resolver: PrintingResolver<'c>,
}

impl<'c> CardListCodec<'c> {
    pub fn new(catalog: &'c CardCatalog) -> Self {
        Self {
            resolver: PrintingResolver::new(catalog),
        }
    }

    pub fn resolver(&self) -> PrintingResolver<'c> {
        self.resolver
    }

    /// Parse every non-blank line, collecting resolution failures
    pub fn parse_partial<I, S>(&self, lines: I) -> Result<PartialCardList, CardListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = PartialCardList::default();
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let (count, rest) = split_count(line)?;
            let tokens: Vec<&str> = rest.split_whitespace().collect();
            match self.resolver.resolve_strict(&tokens) {
                Ok(id) => result.cards.insert_or_sum(id, count)?,
                Err(e) => result.unresolved.failures.push(e),
            }
        }
        Ok(result)
    }

    /// Parse a whole list; any unresolved line fails the batch
    pub fn parse<I, S>(&self, lines: I) -> Result<PrintingCountMap, CardListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let partial = self.parse_partial(lines)?;
        if !partial.unresolved.is_empty() {
            return Err(CardListError::Unresolved(partial.unresolved));
        }
        Ok(partial.cards)
    }

    pub fn parse_text(&self, text: &str) -> Result<PrintingCountMap, CardListError> {
        self.parse(text.lines())
    }

    /// `"<count> <FullName> (<set>) <num>"` per entry
    pub fn render(&self, cards: &PrintingCountMap) -> Result<Vec<String>, RenderError> {
        cards
            .iter()
            .map(|(id, count)| {
                self.resolver
                    .human_readable(id)
                    .map(|name| format!("{} {}", count, name))
                    .ok_or_else(|| RenderError(id.clone()))
            })
            .collect()
    }

    /// Like [`Self::render`], but default printings show only the card name
    pub fn render_compact(&self, cards: &PrintingCountMap) -> Result<Vec<String>, RenderError> {
        let catalog = self.resolver.catalog();
        cards
            .iter()
            .map(|(id, count)| {
                let card = catalog
                    .get_card(id.card_id.as_str())
                    .ok_or_else(|| RenderError(id.clone()))?;
                if card.default_printing().matches(&id.set_code, &id.collector_number) {
                    Ok(format!("{} {}", count, card.full_name))
                } else {
                    Ok(format!(
                        "{} {} ({}) {}",
                        count, card.full_name, id.set_code, id.collector_number
                    ))
                }
            })
            .collect()
    }
}
