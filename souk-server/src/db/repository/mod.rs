//! Repository Module
//!
//! Per-table data access over the embedded SurrealDB. All cross-client
//! coordination happens through single-statement conditional updates; the
//! repositories never lock.

pub mod cart;
pub mod history;
pub mod order;
pub mod product;
pub mod profile;
pub mod rejection;
pub mod store;

// Re-exports
pub use cart::CartRepository;
pub use history::HistoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use profile::ProfileRepository;
pub use rejection::RejectionRepository;
pub use store::StoreRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as "... index ... already contains ..."
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings at the API, RecordId below it
// =============================================================================

/// Build a RecordId from a raw key or a "table:id" string
///
/// `RecordId::to_string()` escapes keys that are not plain identifiers
/// (uuid keys with dashes come back as `` table:`key` `` or table:⟨key⟩
/// depending on the SDK version); both escapes are stripped so every
/// rendered id resolves back to the record it came from.
pub fn make_record_id(table: &str, id: &str) -> RecordId {
    let key = id
        .strip_prefix(&format!("{table}:"))
        .unwrap_or(id)
        .trim_matches(['⟨', '⟩', '`']);
    RecordId::from_table_key(table, key)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_both_forms() {
        let bare = make_record_id("order", "abc-123");
        let prefixed = make_record_id("order", "order:abc-123");
        assert_eq!(bare, prefixed);
        assert_eq!(bare.table(), "order");
    }

    #[test]
    fn rendered_uuid_keys_resolve_back_to_their_record() {
        // Dashed keys render escaped; the rendered form must round-trip
        let id = RecordId::from_table_key("order", "47e5b882-1c3a-4f09-9e21-8d2f5a6b7c8d");
        assert_eq!(make_record_id("order", &id.to_string()), id);

        let backticked = make_record_id("order", "order:`47e5b882-1c3a-4f09-9e21-8d2f5a6b7c8d`");
        let angled = make_record_id("order", "order:⟨47e5b882-1c3a-4f09-9e21-8d2f5a6b7c8d⟩");
        assert_eq!(backticked, id);
        assert_eq!(angled, id);
    }
}
