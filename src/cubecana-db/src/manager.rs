//! Cube service: validation, secrets and listing on top of a repository.

use crate::repository::{CubesRepository, RepoError};
use crate::types::{CounterKind, CubeFilter, CubeRecord};
use cubecana::card_list::{CardListCodec, CardListError, PrintingCountMap, RenderError};
use cubecana::cube::{Cube, CubeSettings, PowerBand};
use cubecana::{CardCatalog, PrintingId, ResolveError};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CubeError {
    #[error("Cube not found: {0}")]
    NotFound(String),

    #[error("Edit secret does not match for cube {0}")]
    Unauthorized(String),

    #[error(transparent)]
    CardList(#[from] CardListError),

    #[error(transparent)]
    FeaturedCard(#[from] ResolveError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CubeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::CardList(e) => e.kind(),
            Self::FeaturedCard(e) => e.kind(),
            Self::Render(e) => e.kind(),
            Self::Repo(_) => "database",
            Self::Json(_) => "json",
        }
    }

    pub fn status_hint(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Unauthorized(_) => 401,
            Self::CardList(e) => e.status_hint(),
            Self::FeaturedCard(e) => e.status_hint(),
            Self::Render(e) => e.status_hint(),
            Self::Repo(_) | Self::Json(_) => 500,
        }
    }
}

/// User-supplied cube contents for create and edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeRequest {
    pub name: String,
    /// `<count> <name>` lines
    pub card_list_text: String,
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub author: String,
    /// Human-readable printing, e.g. `Elsa - Snow Queen (1) 42`
    pub featured_card: Option<String>,
    pub description: String,
    pub settings: CubeSettings,
}

/// Summary row for cube listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeListEntry {
    pub id: String,
    pub name: String,
    pub card_count: u64,
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub author: String,
    pub last_updated_epoch_seconds: i64,
    pub times_drafted: u64,
    pub times_viewed: u64,
    /// Empty when the cube has no cards
    pub featured_card_image_link: String,
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

pub fn to_record(cube: &Cube) -> Result<CubeRecord, serde_json::Error> {
    Ok(CubeRecord {
        id: cube.id.clone(),
        name: cube.name.clone(),
        card_list: cube.cards.to_stored_json()?,
        tags: cube.tags.clone(),
        link: cube.link.clone(),
        author: cube.author.clone(),
        last_updated_epoch_seconds: cube.last_updated_epoch_seconds,
        edit_secret: cube.edit_secret.clone(),
        boosters_per_player: cube.settings.boosters_per_player,
        cards_per_booster: cube.settings.cards_per_booster,
        set_card_colors: cube.settings.set_card_colors,
        color_balance_packs: cube.settings.color_balance_packs,
        with_replacement: cube.settings.with_replacement,
        power_band: cube.settings.power_band.as_str().to_string(),
        card_list_views: cube.card_list_views,
        page_views: cube.page_views,
        drafts: cube.drafts,
        featured_card: cube.featured_card.as_ref().map(PrintingId::to_string),
        description: cube.description.clone(),
    })
}

/// Rebuild a cube against the current catalog.
///
/// Unknown cards, an unreadable featured card and an unknown power band are
/// dropped or defaulted with a warning rather than failing the load.
pub fn from_record(record: CubeRecord, catalog: &CardCatalog) -> Result<Cube, serde_json::Error> {
    let cards = PrintingCountMap::from_stored_json(&record.card_list, catalog)?;
    let power_band = record.power_band.parse::<PowerBand>().unwrap_or_else(|e| {
        tracing::warn!("Cube {}: {}, using default", record.id, e);
        PowerBand::default()
    });
    let featured_card = record
        .featured_card
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| match s.parse::<PrintingId>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Cube {}: {}", record.id, e);
                None
            }
        });

    Ok(Cube {
        id: record.id,
        name: record.name,
        cards,
        tags: record.tags,
        link: record.link,
        author: record.author,
        last_updated_epoch_seconds: record.last_updated_epoch_seconds,
        edit_secret: record.edit_secret,
        settings: CubeSettings {
            boosters_per_player: record.boosters_per_player,
            cards_per_booster: record.cards_per_booster,
            set_card_colors: record.set_card_colors,
            color_balance_packs: record.color_balance_packs,
            with_replacement: record.with_replacement,
            power_band,
        },
        featured_card,
        card_list_views: record.card_list_views,
        page_views: record.page_views,
        drafts: record.drafts,
        description: record.description,
    })
}

pub struct CubeManager<'a, R: CubesRepository> {
    repo: &'a R,
    catalog: &'a CardCatalog,
}

impl<'a, R: CubesRepository> CubeManager<'a, R> {
    pub fn new(repo: &'a R, catalog: &'a CardCatalog) -> Self {
        Self { repo, catalog }
    }

    fn codec(&self) -> CardListCodec<'a> {
        CardListCodec::new(self.catalog)
    }

    /// Parse and resolve the request's list and featured card
    fn resolve_request(
        &self,
        request: &CubeRequest,
    ) -> Result<(PrintingCountMap, Option<PrintingId>), CubeError> {
        let codec = self.codec();
        let cards = codec.parse_text(&request.card_list_text)?;
        let featured_card = match request.featured_card.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(codec.resolver().resolve_human_readable(text)?),
            _ => None,
        };
        Ok((cards, featured_card))
    }

    /// Validate and store a new cube with a fresh id and edit secret
    pub fn create(&self, request: &CubeRequest) -> Result<Cube, CubeError> {
        let (cards, featured_card) = self.resolve_request(request)?;
        let cube = Cube {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.clone(),
            cards,
            tags: request.tags.clone(),
            link: request.link.clone(),
            author: request.author.clone(),
            last_updated_epoch_seconds: now_epoch_seconds(),
            edit_secret: uuid::Uuid::new_v4().to_string(),
            settings: request.settings.clone(),
            featured_card,
            card_list_views: 0,
            page_views: 0,
            drafts: 0,
            description: request.description.clone(),
        };
        self.repo.create_cube(&to_record(&cube)?)?;
        tracing::info!("Created cube {} ({} cards)", cube.id, cube.card_count());
        Ok(cube)
    }

    fn authorized_record(&self, id: &str, edit_secret: &str) -> Result<CubeRecord, CubeError> {
        let record = self
            .repo
            .get_cube(id)?
            .ok_or_else(|| CubeError::NotFound(id.to_string()))?;
        if record.edit_secret != edit_secret {
            return Err(CubeError::Unauthorized(id.to_string()));
        }
        Ok(record)
    }

    /// Replace a cube's contents; counters and secret are kept
    pub fn edit(&self, id: &str, edit_secret: &str, request: &CubeRequest) -> Result<Cube, CubeError> {
        let old = self.authorized_record(id, edit_secret)?;
        let (cards, featured_card) = self.resolve_request(request)?;
        let cube = Cube {
            id: old.id,
            name: request.name.clone(),
            cards,
            tags: request.tags.clone(),
            link: request.link.clone(),
            author: request.author.clone(),
            last_updated_epoch_seconds: now_epoch_seconds(),
            edit_secret: old.edit_secret,
            settings: request.settings.clone(),
            featured_card,
            card_list_views: old.card_list_views,
            page_views: old.page_views,
            drafts: old.drafts,
            description: request.description.clone(),
        };
        if !self.repo.update_cube(&to_record(&cube)?)? {
            return Err(CubeError::NotFound(cube.id));
        }
        Ok(cube)
    }

    pub fn delete(&self, id: &str, edit_secret: &str) -> Result<(), CubeError> {
        self.authorized_record(id, edit_secret)?;
        if !self.repo.delete_cube(id)? {
            return Err(CubeError::NotFound(id.to_string()));
        }
        tracing::info!("Deleted cube {}", id);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Cube>, CubeError> {
        match self.repo.get_cube(id)? {
            Some(record) => Ok(Some(from_record(record, self.catalog)?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<u64, CubeError> {
        Ok(self.repo.count_cubes()?)
    }

    /// Listing entry; the featured image uses the loose printing lookup
    pub fn list_entry(&self, cube: &Cube) -> CubeListEntry {
        let featured_card_image_link = cube
            .featured_or_first()
            .and_then(|id| self.codec().resolver().resolve_or_default(id))
            .and_then(|printing| printing.image_uri("en"))
            .unwrap_or_default()
            .to_string();
        CubeListEntry {
            id: cube.id.clone(),
            name: cube.name.clone(),
            card_count: cube.card_count(),
            tags: cube.display_tags(),
            link: cube.link.clone(),
            author: cube.author.clone(),
            last_updated_epoch_seconds: cube.last_updated_epoch_seconds,
            times_drafted: cube.drafts,
            times_viewed: cube.times_viewed(),
            featured_card_image_link,
        }
    }

    pub fn list(&self, filter: &CubeFilter) -> Result<Vec<CubeListEntry>, CubeError> {
        self.repo
            .list_cubes(filter)?
            .into_iter()
            .map(|record| -> Result<CubeListEntry, CubeError> {
                Ok(self.list_entry(&from_record(record, self.catalog)?))
            })
            .collect()
    }

    /// Bump a counter; false if the cube does not exist
    pub fn increment(&self, id: &str, counter: CounterKind) -> Result<bool, CubeError> {
        Ok(self.repo.increment_counter(id, counter)?)
    }

    /// Every matching cube's card list, most popular first
    pub fn all_card_lists(
        &self,
        tags: &[String],
        power_bands: &[String],
    ) -> Result<Vec<PrintingCountMap>, CubeError> {
        let count = self.count()?;
        let filter = CubeFilter {
            page: 1,
            per_page: u32::try_from(count.max(1)).unwrap_or(u32::MAX),
            tags: tags.to_vec(),
            power_bands: power_bands.to_vec(),
            ..Default::default()
        };
        self.repo
            .list_cubes(&filter)?
            .into_iter()
            .map(|record| -> Result<PrintingCountMap, CubeError> {
                Ok(PrintingCountMap::from_stored_json(&record.card_list, self.catalog)?)
            })
            .collect()
    }

    /// Card list as shown to users: default printings by name only
    pub fn display_list(&self, cube: &Cube) -> Result<Vec<String>, CubeError> {
        Ok(self.codec().render_compact(&cube.cards)?)
    }
}

#[cfg(all(test, feature = "sqlite-sync"))]
mod tests {
    use super::*;
    use crate::sqlite::SqliteDb;
    use crate::types::SortType;
    use cubecana::catalog::feed::FeedPrinting;

    const FEED: &str = r#"[
        {"name": "Elsa", "version": "Snow Queen", "cost": 6, "ink": "Amethyst", "type": ["Character"],
         "rarity": "Super_rare", "collector_number": "42", "set": {"code": "1"},
         "image_uris": {"digital": {"normal": "https://img/1-42.avif"}}},
        {"name": "Elsa", "version": "Snow Queen", "cost": 6, "ink": "Amethyst", "type": ["Character"],
         "rarity": "Promo", "collector_number": "3", "set": {"code": "P1"},
         "image_uris": {"digital": {"normal": "https://img/P1-3.avif"}}},
        {"name": "Be Prepared", "cost": 7, "ink": "Amethyst", "type": ["Action", "Song"],
         "rarity": "Rare", "collector_number": "128", "set": {"code": "1"},
         "image_uris": {"digital": {"normal": "https://img/1-128.avif"}}}
    ]"#;

    fn catalog() -> CardCatalog {
        let records: Vec<FeedPrinting> = serde_json::from_str(FEED).unwrap();
        CardCatalog::from_records(&records, &[]).unwrap()
    }

    fn setup_db() -> SqliteDb {
        let db = SqliteDb::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    fn request(list: &str) -> CubeRequest {
        CubeRequest {
            name: "Test Cube".into(),
            card_list_text: list.into(),
            tags: vec!["Singleton".into()],
            link: Some("https://example.com/cube".into()),
            author: "tester".into(),
            featured_card: None,
            description: "A cube".into(),
            settings: CubeSettings::default(),
        }
    }

    fn id(s: &str) -> PrintingId {
        s.parse().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup_db();
        let catalog = catalog();
        let manager = CubeManager::new(&db, &catalog);

        let mut req = request("2 Elsa - Snow Queen\n1 Elsa - Snow Queen (P1) 3\n3 Be Prepared");
        req.featured_card = Some("Be Prepared (1) 128".into());
        let cube = manager.create(&req).unwrap();

        assert_eq!(cube.card_count(), 6);
        assert_eq!(cube.featured_card, Some(id("beprepared-1-128")));
        assert!(!cube.edit_secret.is_empty());
        assert_ne!(cube.id, cube.edit_secret);
        assert_eq!(manager.get(&cube.id).unwrap(), Some(cube));
        assert_eq!(manager.get("missing").unwrap(), None);
    }

    #[test]
    fn test_create_rejects_bad_list() {
        let db = setup_db();
        let catalog = catalog();
        let manager = CubeManager::new(&db, &catalog);

        let err = manager.create(&request("1 Nobody\n1 Be Prepared")).unwrap_err();
        assert_eq!(err.kind(), "unresolved_cards");
        assert_eq!(err.status_hint(), 404);
        assert_eq!(manager.count().unwrap(), 0);

        let mut req = request("1 Be Prepared");
        req.featured_card = Some("Be Prepared (9) 9".into());
        assert_eq!(manager.create(&req).unwrap_err().kind(), "unresolved_printing");
    }

    #[test]
    fn test_edit_requires_secret_and_keeps_counters() {
        let db = setup_db();
        let catalog = catalog();
        let manager = CubeManager::new(&db, &catalog);
        let cube = manager.create(&request("1 Be Prepared")).unwrap();
        manager.increment(&cube.id, CounterKind::Drafts).unwrap();

        let mut changed = request("4 Elsa - Snow Queen");
        changed.name = "Renamed".into();

        let err = manager.edit(&cube.id, "wrong", &changed).unwrap_err();
        assert!(matches!(err, CubeError::Unauthorized(_)));
        assert_eq!(err.status_hint(), 401);

        let edited = manager.edit(&cube.id, &cube.edit_secret, &changed).unwrap();
        assert_eq!(edited.name, "Renamed");
        assert_eq!(edited.drafts, 1);
        assert_eq!(edited.edit_secret, cube.edit_secret);
        assert_eq!(manager.get(&cube.id).unwrap().unwrap().card_count(), 4);

        let missing = manager.edit("missing", "x", &changed).unwrap_err();
        assert_eq!(missing.kind(), "not_found");
    }

    #[test]
    fn test_delete_requires_secret() {
        let db = setup_db();
        let catalog = catalog();
        let manager = CubeManager::new(&db, &catalog);
        let cube = manager.create(&request("1 Be Prepared")).unwrap();

        assert!(matches!(
            manager.delete(&cube.id, "wrong"),
            Err(CubeError::Unauthorized(_))
        ));
        manager.delete(&cube.id, &cube.edit_secret).unwrap();
        assert_eq!(manager.get(&cube.id).unwrap(), None);
    }

    #[test]
    fn test_list_entries() {
        let db = setup_db();
        let catalog = catalog();
        let manager = CubeManager::new(&db, &catalog);

        let quiet = manager.create(&request("1 Elsa - Snow Queen (P1) 3")).unwrap();
        let mut featured = request("2 Be Prepared");
        featured.featured_card = Some("Elsa - Snow Queen".into());
        featured.settings.power_band = PowerBand::Max;
        let popular = manager.create(&featured).unwrap();
        manager.increment(&popular.id, CounterKind::PageViews).unwrap();
        manager.increment(&popular.id, CounterKind::CardListViews).unwrap();

        let entries = manager.list(&CubeFilter::default()).unwrap();
        assert_eq!(entries.len(), 2);

        let top = &entries[0];
        assert_eq!(top.id, popular.id);
        assert_eq!(top.tags, vec!["Singleton", "Power: max"]);
        assert_eq!(top.times_viewed, 2);
        assert_eq!(top.featured_card_image_link, "https://img/1-42.avif");

        let other = &entries[1];
        assert_eq!(other.id, quiet.id);
        assert_eq!(other.card_count, 1);
        assert_eq!(other.featured_card_image_link, "https://img/P1-3.avif");

        let by_band = CubeFilter {
            power_bands: vec!["max".into()],
            sort: SortType::Date,
            ..Default::default()
        };
        assert_eq!(manager.list(&by_band).unwrap().len(), 1);
    }

    #[test]
    fn test_all_card_lists() {
        let db = setup_db();
        let catalog = catalog();
        let manager = CubeManager::new(&db, &catalog);
        manager.create(&request("1 Be Prepared")).unwrap();
        manager.create(&request("2 Elsa - Snow Queen")).unwrap();

        let lists = manager.all_card_lists(&[], &[]).unwrap();
        assert_eq!(lists.len(), 2);
        let total: u64 = lists.iter().map(|l| l.total()).sum();
        assert_eq!(total, 3);

        assert!(manager
            .all_card_lists(&["Nope".to_string()], &[])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_display_list() {
        let db = setup_db();
        let catalog = catalog();
        let manager = CubeManager::new(&db, &catalog);
        let cube = manager
            .create(&request("2 Elsa - Snow Queen\n1 Elsa - Snow Queen (P1) 3"))
            .unwrap();
        assert_eq!(
            manager.display_list(&cube).unwrap(),
            vec!["2 Elsa - Snow Queen", "1 Elsa - Snow Queen (P1) 3"]
        );
    }

    #[test]
    fn test_from_record_tolerates_stale_data() {
        let catalog = catalog();
        let record = CubeRecord {
            id: "legacy".into(),
            name: "Legacy".into(),
            card_list: r#"{"beprepared": 2, "ghost-1-1": 1}"#.into(),
            tags: vec![],
            link: None,
            author: String::new(),
            last_updated_epoch_seconds: 0,
            edit_secret: "s".into(),
            boosters_per_player: 4,
            cards_per_booster: 12,
            set_card_colors: true,
            color_balance_packs: false,
            with_replacement: false,
            power_band: "Galactic".into(),
            card_list_views: 0,
            page_views: 0,
            drafts: 0,
            featured_card: Some("not a printing".into()),
            description: String::new(),
        };
        let cube = from_record(record, &catalog).unwrap();
        assert_eq!(cube.cards.get(&id("beprepared-1-128")), Some(2));
        assert_eq!(cube.cards.len(), 1);
        assert_eq!(cube.settings.power_band, PowerBand::Medium);
        assert_eq!(cube.featured_card, None);
    }
}
