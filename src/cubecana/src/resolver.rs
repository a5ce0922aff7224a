//! Printing resolution
//!
//! Turns the name part of a card-list line into a [`PrintingId`]. A line may
//! name a bare card (`Elsa - Snow Queen`) or pin a printing with a trailing
//! qualifier (`Elsa - Snow Queen (P1) 3`).
//!
//! The qualifier is recognised only when both of its tokens are present: the
//! last token must look like a collector number and the one before it must be
//! a parenthesised set code. Otherwise every token is part of the name, so a
//! card whose name ends in a number is never mistaken for a qualified line.
//!
//! Two lookup modes exist side by side:
//!
//! - [`PrintingResolver::resolve_strict`] rejects a qualifier that matches no
//!   printing and lists what is available.
//! - [`PrintingResolver::resolve_or_default`] falls back to the card's default
//!   printing, for pipelines that should not stall on a stale reference.

use crate::card::{is_number, CardPrinting, PrintingId};
use crate::catalog::CardCatalog;
use crate::id::CardIdentifier;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unable to identify card from: {input}")]
    UnresolvedCard { input: String },

    #[error(
        "Unable to identify printing for card: {}.\n  Available Printings: {}",
        .input,
        .available.join(", ")
    )]
    UnresolvedPrinting {
        input: String,
        available: Vec<String>,
    },
}

impl ResolveError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnresolvedCard { .. } => "unresolved_card",
            Self::UnresolvedPrinting { .. } => "unresolved_printing",
        }
    }

    pub fn status_hint(&self) -> u16 {
        404
    }

    /// The text the user typed
    pub fn input(&self) -> &str {
        match self {
            Self::UnresolvedCard { input } | Self::UnresolvedPrinting { input, .. } => input,
        }
    }
}

/// An explicit `(setCode) collectorNumber` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qualifier<'t> {
    pub set_code: &'t str,
    pub collector_number: &'t str,
}

/// Tokens split into name and optional printing qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTokens<'t> {
    pub name: Vec<&'t str>,
    pub qualifier: Option<Qualifier<'t>>,
}

impl NameTokens<'_> {
    pub fn display_name(&self) -> String {
        self.name.join(" ")
    }
}

fn is_language_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_lowercase())
}

/// Collector number shapes: `42`, `4a`, `25ja`.
///
/// The two-letter language suffix is checked before the single-letter one.
pub fn is_collector_number(token: &str) -> bool {
    if !token.is_ascii() {
        return false;
    }
    if is_number(token) {
        return true;
    }
    if token.len() > 2 {
        let (number, suffix) = token.split_at(token.len() - 2);
        if is_number(number) && is_language_code(suffix) {
            return true;
        }
    }
    if token.len() > 1 {
        let (number, suffix) = token.split_at(token.len() - 1);
        if is_number(number) && suffix.bytes().all(|b| b.is_ascii_alphabetic()) {
            return true;
        }
    }
    false
}

/// `(<code>)` with a non-empty code
pub fn set_code_of(token: &str) -> Option<&str> {
    token
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .filter(|code| !code.is_empty())
}

/// Classify trailing tokens into an optional qualifier.
///
/// A qualifier needs at least one name token in front of it; a lone
/// `(1) 5` is treated as a name.
pub fn split_qualifier<'t>(tokens: &[&'t str]) -> NameTokens<'t> {
    if let [name @ .., set_token, number] = tokens {
        let (set_token, number) = (*set_token, *number);
        if !name.is_empty() && is_collector_number(number) {
            if let Some(set_code) = set_code_of(set_token) {
                return NameTokens {
                    name: name.to_vec(),
                    qualifier: Some(Qualifier {
                        set_code,
                        collector_number: number,
                    }),
                };
            }
        }
    }
    NameTokens {
        name: tokens.to_vec(),
        qualifier: None,
    }
}

/// Resolves card-list text against a catalog
#[derive(Debug, Clone, Copy)]
pub struct PrintingResolver<'c> {
    catalog: &'c CardCatalog,
}

impl<'c> PrintingResolver<'c> {
    pub fn new(catalog: &'c CardCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c CardCatalog {
        self.catalog
    }

    /// Resolve name tokens; an explicit qualifier must match exactly
    pub fn resolve_strict(&self, tokens: &[&str]) -> Result<PrintingId, ResolveError> {
        let input = tokens.join(" ");
        let parsed = split_qualifier(tokens);
        let card_id = CardIdentifier::from_name(&parsed.display_name());

        let card = self
            .catalog
            .get_card(card_id.as_str())
            .ok_or_else(|| ResolveError::UnresolvedCard {
                input: input.clone(),
            })?;

        let Some(qualifier) = parsed.qualifier else {
            return Ok(card.default_printing().printing_id());
        };

        card.find_printing(qualifier.set_code, qualifier.collector_number)
            .map(CardPrinting::printing_id)
            .ok_or_else(|| ResolveError::UnresolvedPrinting {
                input,
                available: card.available_printings(),
            })
    }

    /// Whitespace-tokenize and resolve strictly
    pub fn resolve_text(&self, text: &str) -> Result<PrintingId, ResolveError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        self.resolve_strict(&tokens)
    }

    /// Loose lookup of a stored id: exact printing, else the default printing
    pub fn resolve_or_default(&self, id: &PrintingId) -> Option<&'c CardPrinting> {
        self.catalog.get_printing(id)
    }

    /// Resolve a single printing reference.
    ///
    /// Accepts the human form `Full Name (set) num` (or a bare name) and the
    /// machine form `cardid-set-num` of an existing printing.
    pub fn resolve_human_readable(&self, text: &str) -> Result<PrintingId, ResolveError> {
        let trimmed = text.trim();
        if let Ok(id) = trimmed.parse::<PrintingId>() {
            if self.catalog.find_printing(&id).is_some() {
                return Ok(id);
            }
        }
        self.resolve_text(trimmed)
    }

    /// `"<FullName> (<set>) <num>"` using the catalog's current display name
    pub fn human_readable(&self, id: &PrintingId) -> Option<String> {
        let card = self.catalog.get_card(id.card_id.as_str())?;
        Some(format!(
            "{} ({}) {}",
            card.full_name, id.set_code, id.collector_number
        ))
    }
}
