//! Cart Repository
//!
//! One row per (owner, product), enforced by a unique index. Adding an
//! already-present product increments its quantity; the price snapshot
//! taken on first add is kept.

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{CartItem, Product};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Add `quantity` of a product to the owner's cart.
    ///
    /// Increment-first: the common case is topping up an existing line.
    /// When no line exists we CREATE one; if a concurrent add won the
    /// CREATE race (unique index), we fall back to the increment once.
    pub async fn add(
        &self,
        owner_id: &str,
        product: &Product,
        quantity: i64,
        now: i64,
    ) -> RepoResult<CartItem> {
        let owner = make_record_id("profile", owner_id);
        let product_id = product
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("product has no id".into()))?;

        if let Some(item) = self
            .increment(owner.clone(), product_id.clone(), quantity, now)
            .await?
        {
            return Ok(item);
        }

        let create = self
            .base
            .db()
            .query(
                "CREATE cart_item SET owner = $owner, product = $product, store = $store, \
                 name = $name, price = $price, quantity = $quantity, \
                 created_at = $now, updated_at = $now RETURN AFTER",
            )
            .bind(("owner", owner.clone()))
            .bind(("product", product_id.clone()))
            .bind(("store", product.store.clone()))
            .bind(("name", product.name.clone()))
            .bind(("price", product.price))
            .bind(("quantity", quantity))
            .bind(("now", now))
            .await?
            .take::<Vec<CartItem>>(0);

        match create {
            Ok(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| RepoError::Database("Failed to create cart line".into())),
            Err(e) => match RepoError::from(e) {
                // Lost the CREATE race to a concurrent add: increment instead
                RepoError::Duplicate(_) => self
                    .increment(owner, product_id, quantity, now)
                    .await?
                    .ok_or_else(|| RepoError::Database("cart line vanished mid-add".into())),
                other => Err(other),
            },
        }
    }

    async fn increment(
        &self,
        owner: surrealdb::RecordId,
        product: surrealdb::RecordId,
        quantity: i64,
        now: i64,
    ) -> RepoResult<Option<CartItem>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE cart_item SET quantity += $quantity, updated_at = $now \
                 WHERE owner = $owner AND product = $product RETURN AFTER",
            )
            .bind(("owner", owner))
            .bind(("product", product))
            .bind(("quantity", quantity))
            .bind(("now", now))
            .await?;
        let items: Vec<CartItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Set an exact quantity; zero (or less) removes the line
    pub async fn set_quantity(
        &self,
        owner_id: &str,
        product_id: &str,
        quantity: i64,
        now: i64,
    ) -> RepoResult<Option<CartItem>> {
        let owner = make_record_id("profile", owner_id);
        let product = make_record_id("product", product_id);

        if quantity <= 0 {
            self.base
                .db()
                .query("DELETE cart_item WHERE owner = $owner AND product = $product")
                .bind(("owner", owner))
                .bind(("product", product))
                .await?
                .check()?;
            return Ok(None);
        }

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE cart_item SET quantity = $quantity, updated_at = $now \
                 WHERE owner = $owner AND product = $product RETURN AFTER",
            )
            .bind(("owner", owner))
            .bind(("product", product))
            .bind(("quantity", quantity))
            .bind(("now", now))
            .await?;
        let items: Vec<CartItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .map(Some)
            .ok_or_else(|| RepoError::NotFound(format!("Cart line for {product_id} not found")))
    }

    pub async fn remove(&self, owner_id: &str, product_id: &str) -> RepoResult<()> {
        let owner = make_record_id("profile", owner_id);
        let product = make_record_id("product", product_id);
        self.base
            .db()
            .query("DELETE cart_item WHERE owner = $owner AND product = $product")
            .bind(("owner", owner))
            .bind(("product", product))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<CartItem>> {
        let owner = make_record_id("profile", owner_id);
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE owner = $owner ORDER BY created_at")
            .bind(("owner", owner))
            .await?
            .take(0)?;
        Ok(items)
    }
}
