//! Repository trait for cube storage.
//!
//! This trait defines the interface for all database backends.

use crate::types::*;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Cube not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Busy or locked; worth one retry on a fresh connection
    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Connection pool exhausted ({0} connections in use)")]
    PoolExhausted(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepoError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Trait for cube storage operations
pub trait CubesRepository {
    /// Initialize the database schema
    fn init(&self) -> RepoResult<()>;

    /// Insert a new cube
    fn create_cube(&self, cube: &CubeRecord) -> RepoResult<()>;

    /// Replace every stored field of an existing cube; false if it is missing
    fn update_cube(&self, cube: &CubeRecord) -> RepoResult<bool>;

    /// Delete a cube; false if it is missing
    fn delete_cube(&self, id: &str) -> RepoResult<bool>;

    fn get_cube(&self, id: &str) -> RepoResult<Option<CubeRecord>>;

    /// List cubes with filters and paging
    fn list_cubes(&self, filter: &CubeFilter) -> RepoResult<Vec<CubeRecord>>;

    fn count_cubes(&self) -> RepoResult<u64>;

    /// Bump one counter and recompute popularity; false if the cube is missing
    fn increment_counter(&self, id: &str, counter: CounterKind) -> RepoResult<bool>;
}
