//! Delivery History Repository
//!
//! Append-only audit trail of status transitions, written by the
//! services after the transition itself commits. A missed history row
//! never blocks or reverts the order it describes.

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::DeliveryHistory;
use serde::Serialize;
use shared::order::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Debug, Serialize)]
struct HistorySeed {
    #[serde(rename = "order")]
    order: RecordId,
    old_status: OrderStatus,
    new_status: OrderStatus,
    courier: Option<RecordId>,
    changed_at: i64,
}

#[derive(Clone)]
pub struct HistoryRepository {
    base: BaseRepository,
}

impl HistoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn append(
        &self,
        order_id: &str,
        old_status: OrderStatus,
        new_status: OrderStatus,
        courier_id: Option<&str>,
        now: i64,
    ) -> RepoResult<DeliveryHistory> {
        let seed = HistorySeed {
            order: make_record_id("order", order_id),
            old_status,
            new_status,
            courier: courier_id.map(|id| make_record_id("profile", id)),
            changed_at: now,
        };
        let mut result = self
            .base
            .db()
            .query("CREATE delivery_history CONTENT $seed RETURN AFTER")
            .bind(("seed", seed))
            .await?;
        let rows: Vec<DeliveryHistory> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to append history".into()))
    }

    pub async fn list_for_order(&self, order_id: &str) -> RepoResult<Vec<DeliveryHistory>> {
        let rows: Vec<DeliveryHistory> = self
            .base
            .db()
            .query(
                "SELECT * FROM delivery_history WHERE `order` = $order_id \
                 ORDER BY changed_at",
            )
            .bind(("order_id", make_record_id("order", order_id)))
            .await?
            .take(0)?;
        Ok(rows)
    }
}
