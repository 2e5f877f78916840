//! Order Repository
//!
//! Holds the two queries the whole assignment protocol rests on: the
//! claim conditional update (exactly one courier wins, the database
//! arbitrates) and the availability read with the rejection-cooldown
//! filter pushed into the WHERE clause. The `order` table name is a
//! SurrealQL keyword only in field position, so the table is written
//! plain and the link field backtick-escaped.

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Order, OrderEnriched, OrderItem};
use serde::Serialize;
use shared::order::OrderStatus;
use shared::types::PaymentStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Projections resolving linked rows into display fields
const ENRICH_FIELDS: &str = "*, store.name AS store_name, store.address AS store_address, \
     customer.display_name AS customer_name, customer.phone AS customer_phone, \
     courier.display_name AS courier_name";

/// One cart line fed into a checkout transaction
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutLine {
    pub product: RecordId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

// Write-side seed; uses native RecordId serde so real record links land
// in the database (the read models force "table:id" strings instead).
#[derive(Debug, Serialize)]
struct OrderSeed {
    customer: RecordId,
    store: RecordId,
    status: OrderStatus,
    total_amount: f64,
    delivery_address: String,
    payment_status: PaymentStatus,
    paid_amount: f64,
    delivery_earning: f64,
    created_at: i64,
    updated_at: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Attempt to assign an order to a courier.
    ///
    /// Single conditional update: the WHERE clause re-checks eligibility
    /// inside the statement, so under N concurrent claims exactly one
    /// returns the updated row and the rest get `Ok(None)`. No read is
    /// trusted before the write.
    pub async fn claim(
        &self,
        order_id: &str,
        courier_id: &str,
        now: i64,
    ) -> RepoResult<Option<Order>> {
        let order = make_record_id("order", order_id);
        let courier = make_record_id("profile", courier_id);

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order_id SET courier = $courier, status = 'PICKED_UP', \
                 assigned_at = $now, updated_at = $now \
                 WHERE status = 'READY_FOR_PICKUP' AND courier = NONE \
                 RETURN AFTER",
            )
            .bind(("order_id", order))
            .bind(("courier", courier))
            .bind(("now", now))
            .await?;
        let rows: Vec<Order> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Orders a courier may claim right now.
    ///
    /// Excludes orders this courier declined within their cooldown
    /// window; expired rejection rows simply stop matching. This read is
    /// advisory only; claim re-verifies everything.
    pub async fn available_for_courier(
        &self,
        courier_id: &str,
        now: i64,
    ) -> RepoResult<Vec<OrderEnriched>> {
        let courier = make_record_id("profile", courier_id);
        let sql = format!(
            "SELECT {ENRICH_FIELDS} FROM order \
             WHERE status = 'READY_FOR_PICKUP' AND courier = NONE \
             AND id NOT IN (SELECT VALUE `order` FROM order_rejection \
                 WHERE courier = $courier AND reofferable_after > $now) \
             ORDER BY created_at"
        );
        let orders: Vec<OrderEnriched> = self
            .base
            .db()
            .query(sql)
            .bind(("courier", courier))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_enriched(&self, order_id: &str) -> RepoResult<Option<OrderEnriched>> {
        let order = make_record_id("order", order_id);
        let sql = format!("SELECT {ENRICH_FIELDS} FROM $order_id");
        let rows: Vec<OrderEnriched> = self
            .base
            .db()
            .query(sql)
            .bind(("order_id", order))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_by_id(&self, order_id: &str) -> RepoResult<Option<Order>> {
        let order = make_record_id("order", order_id);
        let row: Option<Order> = self.base.db().select(order).await?;
        Ok(row)
    }

    /// Move an order `from` → `to` only if it is still in `from`.
    ///
    /// `courier_id` additionally pins the row to its assigned courier so
    /// a courier can only advance their own deliveries. `Ok(None)` means
    /// the order moved under us (or belongs to someone else).
    pub async fn advance_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        courier_id: Option<&str>,
        now: i64,
    ) -> RepoResult<Option<Order>> {
        let order = make_record_id("order", order_id);
        let mut sql = String::from(
            "UPDATE $order_id SET status = $to, updated_at = $now WHERE status = $from",
        );
        if courier_id.is_some() {
            sql.push_str(" AND courier = $courier");
        }
        sql.push_str(" RETURN AFTER");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("order_id", order))
            .bind(("to", to.as_str()))
            .bind(("from", from.as_str()))
            .bind(("now", now));
        if let Some(courier_id) = courier_id {
            query = query.bind(("courier", make_record_id("profile", courier_id)));
        }

        let rows: Vec<Order> = query.await?.take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_by_customer(&self, customer_id: &str) -> RepoResult<Vec<OrderEnriched>> {
        self.find_enriched_where("customer = $who", make_record_id("profile", customer_id))
            .await
    }

    pub async fn find_by_courier(&self, courier_id: &str) -> RepoResult<Vec<OrderEnriched>> {
        self.find_enriched_where("courier = $who", make_record_id("profile", courier_id))
            .await
    }

    pub async fn find_by_store(&self, store_id: &str) -> RepoResult<Vec<OrderEnriched>> {
        self.find_enriched_where("store = $who", make_record_id("store", store_id))
            .await
    }

    async fn find_enriched_where(
        &self,
        condition: &str,
        who: RecordId,
    ) -> RepoResult<Vec<OrderEnriched>> {
        let sql = format!(
            "SELECT {ENRICH_FIELDS} FROM order WHERE {condition} ORDER BY created_at DESC"
        );
        let orders: Vec<OrderEnriched> = self
            .base
            .db()
            .query(sql)
            .bind(("who", who))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn items_for_order(&self, order_id: &str) -> RepoResult<Vec<OrderItem>> {
        let order = make_record_id("order", order_id);
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE `order` = $order_id")
            .bind(("order_id", order))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create one vendor-scoped order with its line items, decrementing
    /// stock, inside a single transaction.
    ///
    /// Each stock decrement is guarded by `stock_quantity >= quantity`;
    /// a short line THROWs, which rolls back every statement in the
    /// group. The caller runs one transaction per vendor, so a failed
    /// group never touches a sibling's order. The owner's cart lines for
    /// this store are cleared in the same transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_group(
        &self,
        customer_id: &str,
        store_id: &str,
        lines: Vec<CheckoutLine>,
        delivery_address: &str,
        delivery_earning: f64,
        now: i64,
    ) -> RepoResult<Order> {
        if lines.is_empty() {
            return Err(RepoError::Validation("No lines to check out".into()));
        }
        let customer = make_record_id("profile", customer_id);
        let store = make_record_id("store", store_id);
        let total_amount: f64 = lines.iter().map(|l| l.price * l.quantity as f64).sum();
        let key = uuid::Uuid::new_v4().to_string();

        let seed = OrderSeed {
            customer: customer.clone(),
            store: store.clone(),
            status: OrderStatus::Pending,
            total_amount,
            delivery_address: delivery_address.to_string(),
            // Payment is simulated: orders are born settled
            payment_status: PaymentStatus::Paid,
            paid_amount: total_amount,
            delivery_earning,
            created_at: now,
            updated_at: now,
        };

        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $ord = type::thing('order', $key); \
                 CREATE $ord CONTENT $seed; \
                 FOR $line IN $lines { \
                     CREATE order_item CONTENT { \
                         `order`: $ord, \
                         product: $line.product, \
                         name: $line.name, \
                         price: $line.price, \
                         quantity: $line.quantity \
                     }; \
                     LET $pid = $line.product; \
                     LET $updated = UPDATE $pid \
                         SET stock_quantity -= $line.quantity, updated_at = $now \
                         WHERE stock_quantity >= $line.quantity RETURN AFTER; \
                     IF array::len($updated) == 0 { \
                         THROW 'insufficient stock: ' + $line.name; \
                     }; \
                 }; \
                 DELETE cart_item WHERE owner = $customer AND store = $store; \
                 SELECT * FROM $ord; \
                 COMMIT TRANSACTION;",
            )
            .bind(("key", key))
            .bind(("seed", seed))
            .bind(("lines", lines))
            .bind(("customer", customer))
            .bind(("store", store))
            .bind(("now", now))
            .await?;

        // A cancelled transaction reports a generic "not executed" error
        // for every statement except the one that threw; surface the
        // THROW reason, not the generic one
        let mut errors: Vec<(usize, surrealdb::Error)> =
            result.take_errors().into_iter().collect();
        if !errors.is_empty() {
            errors.sort_by_key(|(index, _)| *index);
            let messages: Vec<String> = errors.into_iter().map(|(_, e)| e.to_string()).collect();
            let msg = messages
                .iter()
                .find(|m| !m.contains("not executed"))
                .unwrap_or(&messages[0])
                .clone();
            return Err(if msg.contains("insufficient stock") {
                RepoError::Validation(msg)
            } else {
                RepoError::Database(msg)
            });
        }

        // Statement order: LET, CREATE, FOR, DELETE, SELECT
        let rows: Vec<Order> = result.take(4)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Checkout produced no order row".into()))
    }
}
