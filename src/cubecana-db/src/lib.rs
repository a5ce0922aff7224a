//! Cube storage for cubecana
//!
//! This library provides a trait-based abstraction for cube storage, a
//! synchronous SQLite implementation, and the [`CubeManager`] service that
//! validates card lists and guards edits with the cube's secret.
//!
//! # Features
//!
//! - `sqlite-sync` (default) - Synchronous SQLite using rusqlite
//!
//! # Example
//!
//! ```no_run
//! use cubecana_db::{CubeFilter, CubeManager, CubesRepository, SqliteDb};
//! # fn example(catalog: &cubecana::CardCatalog) -> Result<(), Box<dyn std::error::Error>> {
//! let db = SqliteDb::open("cubes.db")?;
//! db.init()?;
//!
//! let manager = CubeManager::new(&db, catalog);
//! for entry in manager.list(&CubeFilter::default())? {
//!     println!("{} ({} cards)", entry.name, entry.card_count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod manager;
pub mod repository;
pub mod shared;
pub mod types;

#[cfg(feature = "sqlite-sync")]
pub mod sqlite;

// Re-export types
pub use types::*;

pub use manager::{CubeError, CubeListEntry, CubeManager, CubeRequest};
pub use repository::{CubesRepository, RepoError, RepoResult};

#[cfg(feature = "sqlite-sync")]
pub use sqlite::{SqliteDb, DEFAULT_DB_PATH, DEFAULT_MAX_CONNECTIONS};
