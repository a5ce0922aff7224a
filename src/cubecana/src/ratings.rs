//! Per-card draft ratings
//!
//! Ratings come from evaluation CSVs with at least a `Card Name` and a
//! `Rating - Draftmancer` column. An optional `Set` column lets a retail
//! draft prefer the rating given for that set when a card is listed twice.
//!
//! Evaluation files are named by ink level and power band, e.g.
//! `FrankKarsten-lowInk-maxPower-Evaluations.csv`.

use crate::cube::PowerBand;
use crate::id::CardIdentifier;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Cubes with this tag are rated from the low-ink evaluations
pub const LOW_INK_TAG: &str = "Low Ink";

pub const EVALUATOR: &str = "FrankKarsten";

pub type Ratings = BTreeMap<CardIdentifier, u32>;

#[derive(Error, Debug)]
pub enum RatingsError {
    #[error("Failed to read ratings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ratings CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl RatingsError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "ratings_io",
            Self::Csv(_) => "ratings_format",
        }
    }

    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Io { .. } => 500,
            Self::Csv(_) => 400,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "Card Name")]
    card_name: String,
    #[serde(rename = "Rating - Draftmancer")]
    rating: u32,
    #[serde(rename = "Set", default)]
    set: Option<String>,
}

/// Read ratings keyed by card identifier.
///
/// Later rows win, except that once a card has a rating, rows from sets
/// other than `preferred_set` no longer replace it.
pub fn read_ratings<R: Read>(reader: R, preferred_set: Option<&str>) -> Result<Ratings, RatingsError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut ratings = Ratings::new();
    for row in reader.deserialize() {
        let row: RatingRow = row?;
        let id = CardIdentifier::from_name(&row.card_name);
        if let Some(preferred) = preferred_set {
            if ratings.contains_key(&id) && row.set.as_deref() != Some(preferred) {
                continue;
            }
        }
        ratings.insert(id, row.rating);
    }
    tracing::debug!("Read {} card ratings", ratings.len());
    Ok(ratings)
}

pub fn read_ratings_file(path: &Path, preferred_set: Option<&str>) -> Result<Ratings, RatingsError> {
    let file = std::fs::File::open(path).map_err(|source| RatingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_ratings(file, preferred_set)
}

/// Evaluation file name for a power band and ink level
pub fn evaluations_file_name(power_band: PowerBand, low_ink: bool) -> String {
    let ink_level = if low_ink { "low" } else { "normal" };
    format!(
        "{}-{}Ink-{}Power-Evaluations.csv",
        EVALUATOR,
        ink_level,
        power_band.as_str().to_lowercase()
    )
}

/// Evaluation file in `dir` for a cube's tags and power band
pub fn evaluations_file_for(dir: &Path, tags: &[String], power_band: PowerBand) -> PathBuf {
    let low_ink = tags.iter().any(|tag| tag == LOW_INK_TAG);
    dir.join(evaluations_file_name(power_band, low_ink))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Card Name,Set,Rating - Draftmancer,Rating - AF
Elsa - Snow Queen,1,4,A
\"Stitch - Rock Star\",1,2,C
Be Prepared,1,3,B
Be Prepared,3,5,A+
";

    #[test]
    fn test_read_ratings() {
        let ratings = read_ratings(CSV.as_bytes(), None).unwrap();
        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[&CardIdentifier::from_name("Elsa - Snow Queen")], 4);
        assert_eq!(ratings[&CardIdentifier::from_name("Stitch - Rock Star")], 2);
        assert_eq!(ratings[&CardIdentifier::from_name("Be Prepared")], 5);
    }

    #[test]
    fn test_preferred_set_keeps_its_rating() {
        let ratings = read_ratings(CSV.as_bytes(), Some("1")).unwrap();
        assert_eq!(ratings[&CardIdentifier::from_name("Be Prepared")], 3);

        let ratings = read_ratings(CSV.as_bytes(), Some("3")).unwrap();
        assert_eq!(ratings[&CardIdentifier::from_name("Be Prepared")], 5);
    }

    #[test]
    fn test_missing_column() {
        let err = read_ratings("Card Name,Score\nBe Prepared,3\n".as_bytes(), None).unwrap_err();
        assert_eq!(err.kind(), "ratings_format");
    }

    #[test]
    fn test_bad_rating() {
        let csv = "Card Name,Rating - Draftmancer\nBe Prepared,great\n";
        assert!(read_ratings(csv.as_bytes(), None).is_err());
    }

    #[test]
    fn test_read_ratings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.csv");
        std::fs::write(&path, CSV).unwrap();
        assert_eq!(read_ratings_file(&path, None).unwrap().len(), 3);

        let err = read_ratings_file(&dir.path().join("missing.csv"), None).unwrap_err();
        assert_eq!(err.kind(), "ratings_io");
    }

    #[test]
    fn test_evaluations_file_for() {
        let dir = Path::new("DraftBots");
        assert_eq!(
            evaluations_file_for(dir, &[], PowerBand::Max),
            dir.join("FrankKarsten-normalInk-maxPower-Evaluations.csv")
        );
        let tags = vec!["Singleton".to_string(), LOW_INK_TAG.to_string()];
        assert_eq!(
            evaluations_file_for(dir, &tags, PowerBand::Retail),
            dir.join("FrankKarsten-lowInk-retailPower-Evaluations.csv")
        );
    }
}
