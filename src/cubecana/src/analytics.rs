//! Card popularity across cubes

use crate::card_list::PrintingCountMap;
use crate::catalog::CardCatalog;
use crate::id::CardIdentifier;
use std::collections::BTreeMap;
use std::io::{self, Write};

pub const CSV_HEADER: &str =
    "Card Name,Set Number,Num Copies,Num Cubes Containing,Ratio Cubes Included";

#[derive(Debug, Clone, PartialEq)]
pub struct CardPopularity {
    pub card_id: CardIdentifier,
    pub full_name: String,
    /// Set of the card's default printing
    pub set_code: String,
    pub copies: u64,
    pub cubes_containing: u64,
    pub ratio: f64,
}

/// Tally copies and inclusion per card over every list.
///
/// Sorted by inclusion, then copies, both descending.
pub fn popularity_report(lists: &[PrintingCountMap], catalog: &CardCatalog) -> Vec<CardPopularity> {
    let mut tallies: BTreeMap<CardIdentifier, (u64, u64)> = BTreeMap::new();
    for list in lists {
        for (card_id, count) in list.card_counts() {
            let tally = tallies.entry(card_id).or_insert((0, 0));
            tally.0 = tally.0.saturating_add(count);
            tally.1 += 1;
        }
    }

    let cube_count = lists.len().max(1) as f64;
    let mut report: Vec<CardPopularity> = tallies
        .into_iter()
        .filter_map(|(card_id, (copies, cubes_containing))| {
            let Some(card) = catalog.get_card(card_id.as_str()) else {
                tracing::warn!("Skipping {} in popularity report: not in catalog", card_id);
                return None;
            };
            Some(CardPopularity {
                full_name: card.full_name.clone(),
                set_code: card.default_printing().set_code.clone(),
                card_id,
                copies,
                cubes_containing,
                ratio: cubes_containing as f64 / cube_count,
            })
        })
        .collect();

    report.sort_by(|a, b| {
        b.cubes_containing
            .cmp(&a.cubes_containing)
            .then_with(|| b.copies.cmp(&a.copies))
            .then_with(|| a.card_id.cmp(&b.card_id))
    });
    report
}

/// Escape a CSV field
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn write_csv<W: Write>(report: &[CardPopularity], out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for row in report {
        writeln!(
            out,
            "{},{},{},{},{:.4}",
            escape_csv(&row.full_name),
            escape_csv(&row.set_code),
            row.copies,
            row.cubes_containing,
            row.ratio
        )?;
    }
    Ok(())
}
