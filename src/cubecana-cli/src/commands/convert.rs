//! Format conversion command handlers
//!
//! Every conversion goes through a printing count map: imports are resolved
//! against the catalog and rendered as a canonical card list, exports parse a
//! card list first.

use anyhow::{bail, Context, Result};
use cubecana::card_list::CardListCodec;
use cubecana::formats::draftmancer::{self, DraftFileBuilder};
use cubecana::formats::{pixelborn, resolve_counted_names, tts};
use cubecana::{CardCatalog, CubeSettings, PowerBand, PrintingCountMap, Ratings};
use std::fs;
use std::path::{Path, PathBuf};

use super::{load_ratings, CatalogOptions};
use crate::file_io::{read_input, write_output};

fn render_list(codec: &CardListCodec<'_>, cards: &PrintingCountMap) -> Result<String> {
    Ok(codec.render(cards)?.join("\n"))
}

/// Card list from one or more deck exports, copies summed across them
pub fn tts_to_list_text<S: AsRef<str>>(catalog: &CardCatalog, exports: &[S]) -> Result<String> {
    let codec = CardListCodec::new(catalog);
    let decks = exports
        .iter()
        .map(|json| tts::read_deck(json.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let entries = tts::merge_entries(decks)?;
    let cards = resolve_counted_names(&tts::counted_names(&entries), &codec)?;
    render_list(&codec, &cards)
}

pub fn list_to_tts_text(catalog: &CardCatalog, text: &str) -> Result<String> {
    let cards = CardListCodec::new(catalog).parse_text(text)?;
    let deck = tts::build_deck(&cards, catalog)?;
    Ok(serde_json::to_string_pretty(&deck)?)
}

pub fn list_to_deck_code_text(catalog: &CardCatalog, text: &str) -> Result<String> {
    let cards = CardListCodec::new(catalog).parse_text(text)?;
    Ok(pixelborn::encode(&cards, catalog)?)
}

pub fn deck_code_to_list_text(catalog: &CardCatalog, code: &str) -> Result<String> {
    let codec = CardListCodec::new(catalog);
    let cards = pixelborn::decode(code, &codec)?;
    render_list(&codec, &cards)
}

pub fn list_to_draft_text(
    catalog: &CardCatalog,
    text: &str,
    name: &str,
    settings: &CubeSettings,
    ratings: Ratings,
) -> Result<String> {
    let cards = CardListCodec::new(catalog).parse_text(text)?;
    Ok(DraftFileBuilder::new(catalog, name, settings)
        .with_ratings(ratings)
        .cube_file(&cards)?)
}

pub fn retail_to_draft_text(
    catalog: &CardCatalog,
    set: &str,
    name: &str,
    ratings: Ratings,
) -> Result<String> {
    DraftFileBuilder::new(catalog, name, &CubeSettings::default())
        .with_ratings(ratings)
        .retail_file(set)
        .with_context(|| format!("Failed to build retail boosters for set {}", set))
}

pub fn draft_deck_to_list_text(catalog: &CardCatalog, text: &str) -> Result<String> {
    let codec = CardListCodec::new(catalog);
    let cards = draftmancer::read_deck_export(text, &codec)?;
    render_list(&codec, &cards)
}

/// Export files to read: `input` itself, or every `.json` file in it by name
pub fn tts_export_paths(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut paths = Vec::new();
    for entry in
        fs::read_dir(input).with_context(|| format!("Failed to read {}", input.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        bail!("No .json exports in {}", input.display());
    }
    paths.sort();
    Ok(paths)
}

/// Handle `convert tts-to-list`
pub fn tts_to_list(options: &CatalogOptions, input: &Path, output: Option<&Path>) -> Result<()> {
    let exports = tts_export_paths(input)?
        .iter()
        .map(|path| {
            tracing::debug!("Reading {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let catalog = options.load()?;
    write_output(output, &tts_to_list_text(&catalog, &exports)?)
}

/// Handle `convert list-to-tts`
pub fn list_to_tts(
    options: &CatalogOptions,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let text = read_input(input)?;
    let catalog = options.load()?;
    write_output(output, &list_to_tts_text(&catalog, &text)?)
}

/// Handle `convert list-to-deck-code`
pub fn list_to_deck_code(
    options: &CatalogOptions,
    input: Option<&Path>,
    name: Option<&str>,
) -> Result<()> {
    let text = read_input(input)?;
    let catalog = options.load()?;
    let code = list_to_deck_code_text(&catalog, &text)?;
    println!("{}", code);
    if let Some(name) = name {
        println!();
        println!("Inktable:  {}", pixelborn::inktable_import_link(&code, name));
        println!("Lorcanito: {}", pixelborn::lorcanito_import_link(&code, name));
    }
    Ok(())
}

/// Handle `convert deck-code-to-list`
pub fn deck_code_to_list(options: &CatalogOptions, code: &str, output: Option<&Path>) -> Result<()> {
    let catalog = options.load()?;
    write_output(output, &deck_code_to_list_text(&catalog, code)?)
}

/// Handle `convert list-to-draft`
pub fn list_to_draft(
    options: &CatalogOptions,
    input: Option<&Path>,
    output: Option<&Path>,
    name: &str,
    settings: &CubeSettings,
    ratings: Option<&Path>,
) -> Result<()> {
    let text = read_input(input)?;
    let catalog = options.load()?;
    let ratings = load_ratings(ratings, &[], settings.power_band, None)?;
    write_output(output, &list_to_draft_text(&catalog, &text, name, settings, ratings)?)
}

/// Handle `convert retail-to-draft`
pub fn retail_to_draft(
    options: &CatalogOptions,
    set: &str,
    output: Option<&Path>,
    name: Option<&str>,
    ratings: Option<&Path>,
) -> Result<()> {
    let catalog = options.load()?;
    let name = name
        .map(String::from)
        .unwrap_or_else(|| format!("Set {}", set));
    let ratings = load_ratings(ratings, &[], PowerBand::Retail, Some(set))?;
    write_output(output, &retail_to_draft_text(&catalog, set, &name, ratings)?)
}

/// Handle `convert draft-deck-to-list`
pub fn draft_deck_to_list(
    options: &CatalogOptions,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let text = read_input(input)?;
    let catalog = options.load()?;
    write_output(output, &draft_deck_to_list_text(&catalog, &text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_fixtures;

    const LIST: &str = "2 Elsa - Snow Queen\n1 Be Prepared";

    #[test]
    fn test_tts_export_and_import() {
        let catalog = test_fixtures::catalog();
        let json = list_to_tts_text(&catalog, LIST).unwrap();
        assert!(json.contains("\"Nickname\": \"Elsa - Snow Queen\""));

        assert_eq!(
            tts_to_list_text(&catalog, &[&json]).unwrap(),
            "1 Be Prepared (1) 128\n2 Elsa - Snow Queen (1) 42"
        );
    }

    #[test]
    fn test_tts_export_directory() {
        let catalog = test_fixtures::catalog();
        let dir = tempfile::tempdir().unwrap();
        let first = list_to_tts_text(&catalog, LIST).unwrap();
        let second = list_to_tts_text(&catalog, "1 Be Prepared\n1 Stitch - Rock Star").unwrap();
        fs::write(dir.path().join("b.json"), &second).unwrap();
        fs::write(dir.path().join("a.json"), &first).unwrap();
        fs::write(dir.path().join("a.png"), "thumbnail").unwrap();

        let paths = tts_export_paths(dir.path()).unwrap();
        assert_eq!(paths, vec![dir.path().join("a.json"), dir.path().join("b.json")]);

        let exports: Vec<String> = paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect();
        assert_eq!(
            tts_to_list_text(&catalog, &exports).unwrap(),
            "2 Be Prepared (1) 128\n2 Elsa - Snow Queen (1) 42\n1 Stitch - Rock Star (1) 23"
        );
    }

    #[test]
    fn test_tts_export_paths() {
        let dir = tempfile::tempdir().unwrap();
        assert!(tts_export_paths(dir.path()).is_err());

        let file = dir.path().join("deck.json");
        assert_eq!(tts_export_paths(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_deck_code_export_and_import() {
        let catalog = test_fixtures::catalog();
        let code = list_to_deck_code_text(&catalog, LIST).unwrap();

        assert_eq!(
            deck_code_to_list_text(&catalog, &code).unwrap(),
            "1 Be Prepared (1) 128\n2 Elsa - Snow Queen (1) 42"
        );
    }

    #[test]
    fn test_bad_deck_code() {
        let catalog = test_fixtures::catalog();
        assert!(deck_code_to_list_text(&catalog, "not base64!").is_err());
    }

    #[test]
    fn test_list_to_draft_sections() {
        let catalog = test_fixtures::catalog();
        let file = list_to_draft_text(
            &catalog,
            LIST,
            "My Cube",
            &CubeSettings::default(),
            Ratings::new(),
        )
        .unwrap();

        assert!(file.starts_with("[CustomCards]"));
        assert!(file.contains("[Settings]"));
        assert!(file.contains("[MainSlot(12)]\n1 Be Prepared\n2 Elsa - Snow Queen"));
        assert!(!file.contains("\"rating\""));
    }

    #[test]
    fn test_list_to_draft_with_ratings_file() {
        let catalog = test_fixtures::catalog();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.csv");
        fs::write(&path, "Card Name,Rating - Draftmancer\nBe Prepared,3\n").unwrap();

        let ratings = load_ratings(Some(path.as_path()), &[], PowerBand::Medium, None).unwrap();
        let file =
            list_to_draft_text(&catalog, LIST, "My Cube", &CubeSettings::default(), ratings)
                .unwrap();
        assert!(file.contains("\"rating\": 3"));
        assert_eq!(file.matches("\"rating\"").count(), 1);
    }

    #[test]
    fn test_retail_to_draft_text() {
        let catalog = test_fixtures::catalog();
        let mut ratings = Ratings::new();
        ratings.insert(cubecana::CardIdentifier::from_name("Stitch - Rock Star"), 2);
        let file = retail_to_draft_text(&catalog, "1", "Set 1", ratings).unwrap();
        assert!(file.contains("\"rating\": 2"));
        assert!(retail_to_draft_text(&catalog, "99", "Set 99", Ratings::new()).is_err());
    }

    #[test]
    fn test_draft_deck_export_ignores_sideboard() {
        let catalog = test_fixtures::catalog();
        let text = "1 Be Prepared\n1 Elsa - Snow Queen\n\n3 Stitch - Rock Star";
        assert_eq!(
            draft_deck_to_list_text(&catalog, text).unwrap(),
            "1 Be Prepared (1) 128\n1 Elsa - Snow Queen (1) 42"
        );
    }
}
