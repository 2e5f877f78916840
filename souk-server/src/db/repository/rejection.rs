//! Rejection Repository
//!
//! Append-only decline ledger. The (order, courier) unique index is the
//! only write-side guard; reads go through the cooldown filter in the
//! order repository's availability query.

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::OrderRejection;
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Debug, Serialize)]
struct RejectionSeed {
    #[serde(rename = "order")]
    order: RecordId,
    courier: RecordId,
    reason: Option<String>,
    reofferable_after: i64,
    created_at: i64,
}

#[derive(Clone)]
pub struct RejectionRepository {
    base: BaseRepository,
}

impl RejectionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record a decline; `RepoError::Duplicate` when this courier has
    /// already declined this order.
    pub async fn create(
        &self,
        order_id: &str,
        courier_id: &str,
        reason: Option<String>,
        reofferable_after: i64,
        now: i64,
    ) -> RepoResult<OrderRejection> {
        let seed = RejectionSeed {
            order: make_record_id("order", order_id),
            courier: make_record_id("profile", courier_id),
            reason,
            reofferable_after,
            created_at: now,
        };
        let mut result = self
            .base
            .db()
            .query("CREATE order_rejection CONTENT $seed RETURN AFTER")
            .bind(("seed", seed))
            .await?;
        let rows: Vec<OrderRejection> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create rejection".into()))
    }

    pub async fn find_by_courier(&self, courier_id: &str) -> RepoResult<Vec<OrderRejection>> {
        let rows: Vec<OrderRejection> = self
            .base
            .db()
            .query(
                "SELECT * FROM order_rejection WHERE courier = $courier \
                 ORDER BY created_at DESC",
            )
            .bind(("courier", make_record_id("profile", courier_id)))
            .await?
            .take(0)?;
        Ok(rows)
    }
}
