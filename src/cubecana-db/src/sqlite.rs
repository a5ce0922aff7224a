//! SQLite implementation using rusqlite (synchronous).
//!
//! Connections come from a small bounded pool. An operation that fails with
//! a busy or locked error is retried once on a fresh connection.

use crate::repository::*;
use crate::shared::{self, schema, CUBE_SELECT_COLUMNS};
use crate::types::*;
use cubecana::cube::{CARD_LIST_VIEW_WEIGHT, DRAFT_WEIGHT, PAGE_VIEW_WEIGHT};
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "share/cubes.db";

pub const DEFAULT_MAX_CONNECTIONS: usize = 5;

const OPERATIONAL_ERROR_RETRIES: u32 = 1;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn db_err(e: rusqlite::Error) -> RepoError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if matches!(err.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            RepoError::Busy(e.to_string())
        }
        _ => RepoError::Database(e.to_string()),
    }
}

fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn row_to_cube(row: &rusqlite::Row<'_>) -> rusqlite::Result<CubeRecord> {
    let tags_json: String = row.get(3)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(CubeRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        card_list: row.get(2)?,
        tags,
        link: row.get(4)?,
        author: row.get(5)?,
        last_updated_epoch_seconds: row.get(6)?,
        edit_secret: row.get(7)?,
        boosters_per_player: row.get(8)?,
        cards_per_booster: row.get(9)?,
        set_card_colors: row.get(10)?,
        color_balance_packs: row.get(11)?,
        with_replacement: row.get(12)?,
        power_band: row.get(13)?,
        card_list_views: from_sql_count(row.get(14)?),
        page_views: from_sql_count(row.get(15)?),
        drafts: from_sql_count(row.get(16)?),
        featured_card: row.get(17)?,
        description: row.get(18)?,
    })
}

fn cube_popularity(cube: &CubeRecord) -> i64 {
    to_sql_count(cubecana::cube::popularity(
        cube.drafts,
        cube.card_list_views,
        cube.page_views,
    ))
}

/// Build parameter vector from filter for rusqlite queries
fn build_filter_params(filter: &CubeFilter) -> Vec<Box<dyn rusqlite::ToSql>> {
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    for tag in filter.active_tags() {
        params.push(Box::new(tag.to_string()));
    }
    for band in filter.active_power_bands() {
        params.push(Box::new(band));
    }
    params
}

#[derive(Debug, Clone)]
enum DbTarget {
    File(PathBuf),
    /// Shared-cache URI so every pooled connection sees the same database
    Memory(String),
}

impl DbTarget {
    fn connect(&self) -> Result<Connection, rusqlite::Error> {
        let conn = match self {
            Self::File(path) => Connection::open(path)?,
            Self::Memory(uri) => Connection::open_with_flags(
                uri,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?,
        };
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }
}

struct PoolState {
    idle: Vec<Connection>,
    /// Connections handed out or idle
    open: usize,
    /// Keeps an in-memory database alive between operations
    _anchor: Option<Connection>,
}

/// SQLite-backed cube store
pub struct SqliteDb {
    target: DbTarget,
    max_connections: usize,
    state: Mutex<PoolState>,
}

impl SqliteDb {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> RepoResult<Self> {
        Self::open_with_pool_size(path, DEFAULT_MAX_CONNECTIONS)
    }

    pub fn open_with_pool_size<P: AsRef<Path>>(path: P, max_connections: usize) -> RepoResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let target = DbTarget::File(path.as_ref().to_path_buf());
        let first = target.connect().map_err(db_err)?;
        Ok(Self {
            target,
            max_connections: max_connections.max(1),
            state: Mutex::new(PoolState {
                idle: vec![first],
                open: 1,
                _anchor: None,
            }),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> RepoResult<Self> {
        let uri = format!(
            "file:cubecana-{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4()
        );
        let target = DbTarget::Memory(uri);
        let anchor = target.connect().map_err(db_err)?;
        Ok(Self {
            target,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            state: Mutex::new(PoolState {
                idle: Vec::new(),
                open: 0,
                _anchor: Some(anchor),
            }),
        })
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Pool bookkeeping; a poisoned lock still holds a consistent count
    fn lock_state(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Connection pool lock was poisoned, recovering");
            let state = PoisonError::into_inner(poisoned);
            self.state.clear_poison();
            state
        })
    }

    /// Take an idle connection or open a new one, up to the pool size
    fn acquire(&self) -> RepoResult<Connection> {
        {
            let mut state = self.lock_state();
            if let Some(conn) = state.idle.pop() {
                return Ok(conn);
            }
            if state.open >= self.max_connections {
                return Err(RepoError::PoolExhausted(state.open));
            }
            state.open += 1;
        }

        self.target.connect().map_err(|e| {
            self.forget_one();
            db_err(e)
        })
    }

    fn release(&self, conn: Connection) {
        self.lock_state().idle.push(conn);
    }

    /// Close a connection instead of returning it to the pool
    fn discard(&self, conn: Connection) {
        drop(conn);
        self.forget_one();
    }

    fn forget_one(&self) {
        let mut state = self.lock_state();
        state.open = state.open.saturating_sub(1);
    }

    /// Run `op` on a pooled connection, retrying once on a transient error
    fn execute<T>(&self, op: impl Fn(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let mut retries = 0;
        loop {
            let conn = self.acquire()?;
            match op(&conn) {
                Err(e) if e.is_transient() && retries < OPERATIONAL_ERROR_RETRIES => {
                    tracing::debug!("Transient database error: {}, retrying", e);
                    self.discard(conn);
                    retries += 1;
                }
                result => {
                    if let Err(e) = &result {
                        if e.is_transient() {
                            tracing::warn!("Max retries reached: {}", e);
                        }
                    }
                    self.release(conn);
                    return result;
                }
            }
        }
    }

    /// Check if a migration has been applied
    fn is_migration_applied(conn: &Connection, version: &str) -> RepoResult<bool> {
        let result: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        Ok(result.is_some())
    }

    /// Mark a migration as applied
    fn mark_migration_applied(conn: &Connection, version: &str) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            params![version],
        )
        .map_err(db_err)?;
        Ok(())
    }

    /// Run pending migrations
    fn run_migrations(conn: &Connection) -> RepoResult<()> {
        if !Self::is_migration_applied(conn, "0001_cubes")? {
            conn.execute_batch(schema::CUBES_TABLE).map_err(db_err)?;
            Self::mark_migration_applied(conn, "0001_cubes")?;
            tracing::info!("SQLite: Applied migration 0001_cubes");
        }

        for index in schema::INDEXES {
            conn.execute(index, []).map_err(db_err)?;
        }
        Ok(())
    }
}

impl CubesRepository for SqliteDb {
    fn init(&self) -> RepoResult<()> {
        self.execute(|conn| {
            conn.execute(schema::MIGRATIONS_TABLE, []).map_err(db_err)?;
            Self::run_migrations(conn)
        })
    }

    fn create_cube(&self, cube: &CubeRecord) -> RepoResult<()> {
        let tags = serde_json::to_string(&cube.tags)?;
        self.execute(|conn| {
            conn.execute(
                "INSERT INTO cubes (id, name, card_list, tags, link, author,
                    last_updated_epoch_seconds, edit_secret, boosters_per_player,
                    cards_per_booster, set_card_colors, color_balance_packs, with_replacement,
                    power_band, popularity, card_list_views, page_views, drafts,
                    featured_card, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                    ?16, ?17, ?18, ?19, ?20)",
                params![
                    cube.id,
                    cube.name,
                    cube.card_list,
                    tags,
                    cube.link,
                    cube.author,
                    cube.last_updated_epoch_seconds,
                    cube.edit_secret,
                    cube.boosters_per_player,
                    cube.cards_per_booster,
                    cube.set_card_colors,
                    cube.color_balance_packs,
                    cube.with_replacement,
                    cube.power_band,
                    cube_popularity(cube),
                    to_sql_count(cube.card_list_views),
                    to_sql_count(cube.page_views),
                    to_sql_count(cube.drafts),
                    cube.featured_card,
                    cube.description,
                ],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }

    fn update_cube(&self, cube: &CubeRecord) -> RepoResult<bool> {
        let tags = serde_json::to_string(&cube.tags)?;
        self.execute(|conn| {
            let rows = conn
                .execute(
                    "UPDATE cubes SET name = ?2, card_list = ?3, tags = ?4, link = ?5,
                        author = ?6, last_updated_epoch_seconds = ?7, edit_secret = ?8,
                        boosters_per_player = ?9, cards_per_booster = ?10,
                        set_card_colors = ?11, color_balance_packs = ?12,
                        with_replacement = ?13, power_band = ?14, popularity = ?15,
                        card_list_views = ?16, page_views = ?17, drafts = ?18,
                        featured_card = ?19, description = ?20
                     WHERE id = ?1",
                    params![
                        cube.id,
                        cube.name,
                        cube.card_list,
                        tags,
                        cube.link,
                        cube.author,
                        cube.last_updated_epoch_seconds,
                        cube.edit_secret,
                        cube.boosters_per_player,
                        cube.cards_per_booster,
                        cube.set_card_colors,
                        cube.color_balance_packs,
                        cube.with_replacement,
                        cube.power_band,
                        cube_popularity(cube),
                        to_sql_count(cube.card_list_views),
                        to_sql_count(cube.page_views),
                        to_sql_count(cube.drafts),
                        cube.featured_card,
                        cube.description,
                    ],
                )
                .map_err(db_err)?;
            Ok(rows > 0)
        })
    }

    fn delete_cube(&self, id: &str) -> RepoResult<bool> {
        self.execute(|conn| {
            let rows = conn
                .execute("DELETE FROM cubes WHERE id = ?1", params![id])
                .map_err(db_err)?;
            Ok(rows > 0)
        })
    }

    fn get_cube(&self, id: &str) -> RepoResult<Option<CubeRecord>> {
        self.execute(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM cubes WHERE id = ?1", CUBE_SELECT_COLUMNS),
                params![id],
                row_to_cube,
            )
            .optional()
            .map_err(db_err)
        })
    }

    fn list_cubes(&self, filter: &CubeFilter) -> RepoResult<Vec<CubeRecord>> {
        let (sql, _) = shared::build_list_query(filter);
        self.execute(|conn| {
            let params = build_filter_params(filter);
            let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
            let mut stmt = conn.prepare(&sql).map_err(db_err)?;
            let cubes = stmt
                .query_map(params_refs.as_slice(), row_to_cube)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(cubes)
        })
    }

    fn count_cubes(&self) -> RepoResult<u64> {
        self.execute(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM cubes", [], |row| row.get(0))
                .map_err(db_err)?;
            Ok(from_sql_count(count))
        })
    }

    fn increment_counter(&self, id: &str, counter: CounterKind) -> RepoResult<bool> {
        let increment = shared::increment_counter_sql(counter);
        self.execute(|conn| {
            let tx = conn.unchecked_transaction().map_err(db_err)?;
            let rows = tx.execute(&increment, params![id]).map_err(db_err)?;
            if rows == 0 {
                return Ok(false);
            }
            tx.execute(
                shared::UPDATE_POPULARITY,
                params![
                    to_sql_count(DRAFT_WEIGHT),
                    to_sql_count(CARD_LIST_VIEW_WEIGHT),
                    to_sql_count(PAGE_VIEW_WEIGHT),
                    id
                ],
            )
            .map_err(db_err)?;
            tx.commit().map_err(db_err)?;
            Ok(true)
        })
    }
}

impl SqliteDb {
    /// Stored popularity score, for tests and diagnostics
    pub fn popularity(&self, id: &str) -> RepoResult<Option<u64>> {
        self.execute(|conn| {
            let value: Option<i64> = conn
                .query_row(
                    "SELECT popularity FROM cubes WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(db_err)?;
            Ok(value.map(from_sql_count))
        })
    }
}
