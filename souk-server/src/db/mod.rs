//! Database Module
//!
//! Embedded SurrealDB connection and schema definition. Single-row
//! conditional updates (`UPDATE … WHERE … RETURN AFTER`) are the only
//! cross-client coordination primitive the service relies on; the unique
//! indexes below enforce the (order, courier) rejection and
//! (owner, product) cart invariants at the storage layer.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "souk";
const DATABASE: &str = "main";

/// Tables and indexes, idempotent on startup
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS profile SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS profile_username ON TABLE profile FIELDS username UNIQUE;

    DEFINE TABLE IF NOT EXISTS store SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS product SCHEMALESS;

    DEFINE TABLE IF NOT EXISTS cart_item SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS cart_owner_product ON TABLE cart_item FIELDS owner, product UNIQUE;

    DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;

    DEFINE TABLE IF NOT EXISTS order_rejection SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS rejection_order_courier ON TABLE order_rejection FIELDS `order`, courier UNIQUE;

    DEFINE TABLE IF NOT EXISTS delivery_history SCHEMALESS;
"#;

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::bootstrap(db).await?;
        tracing::info!(path = %db_path, "Database connection established (RocksDB)");
        Ok(service)
    }

    /// In-memory database for tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::bootstrap(db).await
    }

    async fn bootstrap(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;

        Ok(Self { db })
    }
}
