//! # cubecana
//!
//! Lorcana card identity resolution and card-list conversion.
//!
//! This library provides functionality to:
//! - Build an immutable card catalog from the public card feed (or its cache)
//! - Resolve free-form card text like `Elsa - Snow Queen (1) 42` to a printing
//! - Parse and render `<count> <name>` card lists with aggregated errors
//! - Convert lists to and from Tabletop Simulator, deck codes and draft files
//! - Load per-card draft ratings from evaluation CSVs
//! - Compute expected copies for retail boosters
//!
//! ## Example
//!
//! ```no_run
//! use cubecana::{CardCatalog, CardListCodec, CatalogSource, LorcastFeed};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = CatalogSource {
//!     cache_path: "allCards.json".into(),
//!     ..Default::default()
//! };
//! let catalog = CardCatalog::load(&source, &LorcastFeed::default())?;
//! let codec = CardListCodec::new(&catalog);
//!
//! let cards = codec.parse_text("2 Elsa - Snow Queen\n1 Be Prepared (1) 128")?;
//! for line in codec.render(&cards)? {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod booster;
pub mod card;
pub mod card_list;
pub mod catalog;
pub mod cube;
pub mod formats;
pub mod id;
pub mod ratings;
pub mod resolver;

#[doc(inline)]
pub use card::{Card, CardAttributes, CardPrinting, ParsePrintingIdError, PrintingId, Rarity};
#[doc(inline)]
pub use card_list::{
    CardListCodec, CardListError, PartialCardList, PrintingCountMap, RenderError, UnresolvedLines,
};
#[doc(inline)]
pub use catalog::{CardCatalog, CatalogError, CatalogSource, CatalogStats};
#[doc(inline)]
pub use catalog::feed::{CardFeed, FeedPrinting, DEFAULT_FEED_URL};
#[cfg(feature = "fetch")]
#[doc(inline)]
pub use catalog::feed::LorcastFeed;
#[doc(inline)]
pub use id::{normalize, CardIdentifier};
#[doc(inline)]
pub use resolver::{PrintingResolver, ResolveError};

// Boosters, cubes and reports
#[doc(inline)]
pub use analytics::{popularity_report, CardPopularity};
#[doc(inline)]
pub use booster::{expected_copies, retail_slots, BoosterError, BoosterSlot, ExpectedCopies, TableSize};
#[doc(inline)]
pub use cube::{Cube, CubeSettings, PowerBand};
#[doc(inline)]
pub use formats::FormatError;
#[doc(inline)]
pub use ratings::{read_ratings, read_ratings_file, Ratings, RatingsError};
