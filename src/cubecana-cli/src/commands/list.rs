//! Card list command handlers

use anyhow::{bail, Result};
use cubecana::card_list::{CardListCodec, PartialCardList};
use cubecana::CardCatalog;
use std::path::Path;

use super::CatalogOptions;
use crate::file_io::{read_input, write_output};

/// Parse a list, keeping every line that resolved
pub fn check(catalog: &CardCatalog, text: &str) -> Result<PartialCardList> {
    Ok(CardListCodec::new(catalog).parse_partial(text.lines())?)
}

/// Canonical rendering of a list, one line per printing
pub fn normalize_text(catalog: &CardCatalog, text: &str, compact: bool) -> Result<String> {
    let codec = CardListCodec::new(catalog);
    let cards = codec.parse_text(text)?;
    let rendered = if compact {
        codec.render_compact(&cards)?
    } else {
        codec.render(&cards)?
    };
    Ok(rendered.join("\n"))
}

/// Handle `list validate`
pub fn validate(options: &CatalogOptions, input: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;
    let catalog = options.load()?;
    let result = check(&catalog, &text)?;

    println!(
        "Resolved {} cards ({} printings)",
        result.cards.total(),
        result.cards.len()
    );
    if !result.unresolved.is_empty() {
        eprintln!("{}", result.unresolved);
        bail!("{} lines did not resolve", result.unresolved.len());
    }
    Ok(())
}

/// Handle `list normalize`
pub fn normalize(
    options: &CatalogOptions,
    input: Option<&Path>,
    output: Option<&Path>,
    compact: bool,
) -> Result<()> {
    let text = read_input(input)?;
    let catalog = options.load()?;
    write_output(output, &normalize_text(&catalog, &text, compact)?)
}
