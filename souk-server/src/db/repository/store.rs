//! Store Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Store, StoreCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const STORE_TABLE: &str = "store";

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: StoreCreate, now: i64) -> RepoResult<Store> {
        let owner = make_record_id("profile", &data.owner);
        let mut result = self
            .base
            .db()
            .query(
                "CREATE store SET owner = $owner, name = $name, address = $address, \
                 is_active = true, created_at = $now RETURN AFTER",
            )
            .bind(("owner", owner))
            .bind(("name", data.name))
            .bind(("address", data.address))
            .bind(("now", now))
            .await?;
        let created: Vec<Store> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Store>> {
        let stores: Vec<Store> = self
            .base
            .db()
            .query("SELECT * FROM store WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(stores)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Store>> {
        let rid = make_record_id(STORE_TABLE, id);
        let store: Option<Store> = self.base.db().select(rid).await?;
        Ok(store)
    }

    /// A retailer's own store (one store per retailer)
    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Option<Store>> {
        let owner = make_record_id("profile", owner_id);
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM store WHERE owner = $owner LIMIT 1")
            .bind(("owner", owner))
            .await?;
        let store: Option<Store> = result.take(0)?;
        Ok(store)
    }
}
