//! Shared constants and query building utilities for database implementations.

use crate::types::{CounterKind, CubeFilter};

/// Column names for the cubes table, used in SELECT queries.
/// Order must match the positional indices used in row mapping functions.
pub const CUBE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "card_list",
    "tags",
    "link",
    "author",
    "last_updated_epoch_seconds",
    "edit_secret",
    "boosters_per_player",
    "cards_per_booster",
    "set_card_colors",
    "color_balance_packs",
    "with_replacement",
    "power_band",
    "card_list_views",
    "page_views",
    "drafts",
    "featured_card",
    "description",
];

/// Comma-separated column list for SELECT queries
pub const CUBE_SELECT_COLUMNS: &str = "id, name, card_list, tags, link, author, last_updated_epoch_seconds,
                    edit_secret, boosters_per_player, cards_per_booster, set_card_colors,
                    color_balance_packs, with_replacement, power_band, card_list_views, page_views,
                    drafts, featured_card, description";

/// SQLite schema definitions
pub mod schema {
    /// Cubes table schema (SQLite)
    pub const CUBES_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS cubes (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            card_list TEXT NOT NULL DEFAULT '{}',
            tags TEXT NOT NULL DEFAULT '[]',
            link TEXT,
            author TEXT NOT NULL DEFAULT '',
            last_updated_epoch_seconds INTEGER NOT NULL,
            edit_secret TEXT NOT NULL,
            boosters_per_player INTEGER NOT NULL,
            cards_per_booster INTEGER NOT NULL,
            set_card_colors BOOLEAN NOT NULL DEFAULT TRUE,
            color_balance_packs BOOLEAN NOT NULL DEFAULT FALSE,
            with_replacement BOOLEAN NOT NULL DEFAULT FALSE,
            power_band TEXT NOT NULL DEFAULT 'MEDIUM',
            popularity INTEGER NOT NULL DEFAULT 0,
            card_list_views INTEGER NOT NULL DEFAULT 0,
            page_views INTEGER NOT NULL DEFAULT 0,
            drafts INTEGER NOT NULL DEFAULT 0,
            featured_card TEXT,
            description TEXT NOT NULL DEFAULT ''
        )
    "#;

    /// Schema migrations tracking table
    pub const MIGRATIONS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
    "#;

    /// Index definitions for SQLite (use after table creation)
    pub const INDEXES: &[&str] = &[
        "CREATE INDEX IF NOT EXISTS idx_cubes_popularity ON cubes(popularity)",
        "CREATE INDEX IF NOT EXISTS idx_cubes_updated ON cubes(last_updated_epoch_seconds)",
        "CREATE INDEX IF NOT EXISTS idx_cubes_power_band ON cubes(power_band)",
    ];
}

/// Build a list query with optional filters.
///
/// Returns the SQL string with `?` placeholders and the number of parameters:
/// one per active tag, then one per active power band, in that order.
pub fn build_list_query(filter: &CubeFilter) -> (String, usize) {
    let mut sql = format!("SELECT {} FROM cubes WHERE 1=1", CUBE_SELECT_COLUMNS);
    let mut param_count = 0;

    for _ in filter.active_tags() {
        sql.push_str(" AND EXISTS (SELECT 1 FROM json_each(cubes.tags) WHERE json_each.value = ?)");
        param_count += 1;
    }

    let bands = filter.active_power_bands().count();
    if bands > 0 {
        sql.push_str(&format!(" AND power_band IN ({})", vec!["?"; bands].join(", ")));
        param_count += bands;
    }

    sql.push_str(&format!(
        " ORDER BY {} {}, id ASC LIMIT {} OFFSET {}",
        filter.sort.column(),
        filter.order.sql(),
        filter.per_page,
        filter.offset()
    ));

    (sql, param_count)
}

/// Increment one counter column
pub fn increment_counter_sql(counter: CounterKind) -> String {
    format!(
        "UPDATE cubes SET {col} = {col} + 1 WHERE id = ?1",
        col = counter.column()
    )
}

/// Recompute popularity from the counters; binds draft, list-view and
/// page-view weights, then the id
pub const UPDATE_POPULARITY: &str = "UPDATE cubes SET popularity =
        drafts * ?1 + card_list_views * ?2 + page_views * ?3 WHERE id = ?4";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderType, SortType};

    #[test]
    fn test_build_list_query_no_filters() {
        let (sql, count) = build_list_query(&CubeFilter::default());

        assert!(sql.contains("FROM cubes"));
        assert!(sql.contains("ORDER BY popularity DESC, id ASC LIMIT 25 OFFSET 0"));
        assert!(!sql.contains("json_each"));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_build_list_query_with_filters() {
        let filter = CubeFilter {
            page: 2,
            per_page: 10,
            sort: SortType::Date,
            order: OrderType::Asc,
            tags: vec!["Singleton".into(), "Vintage".into(), "".into()],
            power_bands: vec!["high".into(), "max".into()],
        };
        let (sql, count) = build_list_query(&filter);

        assert_eq!(sql.matches("json_each.value = ?").count(), 2);
        assert!(sql.contains("AND power_band IN (?, ?)"));
        assert!(sql.contains("ORDER BY last_updated_epoch_seconds ASC"));
        assert!(sql.contains("LIMIT 10 OFFSET 10"));
        assert_eq!(count, 4);
    }

    #[test]
    fn test_increment_counter_sql() {
        assert_eq!(
            increment_counter_sql(CounterKind::Drafts),
            "UPDATE cubes SET drafts = drafts + 1 WHERE id = ?1"
        );
    }

    #[test]
    fn test_cube_columns_match_select() {
        let select: Vec<&str> = CUBE_SELECT_COLUMNS.split(',').map(str::trim).collect();
        assert_eq!(select, CUBE_COLUMNS);
    }
}
