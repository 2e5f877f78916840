//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: ProductCreate, now: i64) -> RepoResult<Product> {
        if data.price < 0.0 || !data.price.is_finite() {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }
        if data.stock_quantity < 0 {
            return Err(RepoError::Validation(
                "stock_quantity must be non-negative".into(),
            ));
        }

        let store = make_record_id("store", &data.store);
        let mut result = self
            .base
            .db()
            .query(
                "CREATE product SET store = $store, name = $name, description = $description, \
                 price = $price, stock_quantity = $stock, category = $category, \
                 is_available = true, created_at = $now, updated_at = $now RETURN AFTER",
            )
            .bind(("store", store))
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("price", data.price))
            .bind(("stock", data.stock_quantity))
            .bind(("category", data.category))
            .bind(("now", now))
            .await?;
        let created: Vec<Product> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Partial update. Stock is deliberately not updatable here; the only
    /// stock mutation is the checkout reduction.
    pub async fn update(&self, id: &str, data: ProductUpdate, now: i64) -> RepoResult<Product> {
        let rid = make_record_id(PRODUCT_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.is_available.is_some() {
            set_parts.push("is_available = $is_available");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $product SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("product", rid))
            .bind(("now", now));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.price {
            if v < 0.0 || !v.is_finite() {
                return Err(RepoError::Validation("price must be non-negative".into()));
            }
            query = query.bind(("price", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.is_available {
            query = query.bind(("is_available", v));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = make_record_id(PRODUCT_TABLE, id);
        let deleted: Option<Product> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = make_record_id(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    /// Available products for one store
    pub async fn find_by_store(&self, store_id: &str) -> RepoResult<Vec<Product>> {
        let store = make_record_id("store", store_id);
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE store = $store AND is_available = true ORDER BY name")
            .bind(("store", store))
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_available = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }
}
