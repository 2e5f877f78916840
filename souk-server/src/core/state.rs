use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    CartRepository, HistoryRepository, OrderRepository, ProductRepository, ProfileRepository,
    RejectionRepository, StoreRepository,
};
use crate::services::{AssignmentService, CheckoutService, LifecycleService};
use crate::utils::AppError;

/// Resource version counters
///
/// Lock-free per-resource monotonic counters over a DashMap. Mutating
/// handlers bump the counter for the tables they touched; clients poll
/// `/api/sync/versions` and re-fetch whatever moved.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a resource's version and return the new value
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version, 0 when the resource was never bumped
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// Snapshot of every counter, for the poll endpoint
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.versions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

/// Shared server state
///
/// One instance per process, cloned into every handler. Arc makes the
/// clones shallow.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub resource_versions: Arc<ResourceVersions>,

    // Repositories
    pub profiles: ProfileRepository,
    pub stores: StoreRepository,
    pub products: ProductRepository,
    pub carts: CartRepository,
    pub orders: OrderRepository,
    pub history: HistoryRepository,

    // Services
    pub assignment: AssignmentService,
    pub checkout: CheckoutService,
    pub lifecycle: LifecycleService,
}

impl ServerState {
    /// Open the database at the configured path and wire everything up
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::new(&config.database_path()).await?;
        Ok(Self::from_db(config.clone(), db_service))
    }

    /// Build state over an already-open database; tests use this with
    /// the in-memory engine
    pub fn from_db(config: Config, db_service: DbService) -> Self {
        let db = db_service.db;

        let profiles = ProfileRepository::new(db.clone());
        let stores = StoreRepository::new(db.clone());
        let products = ProductRepository::new(db.clone());
        let carts = CartRepository::new(db.clone());
        let orders = OrderRepository::new(db.clone());
        let rejections = RejectionRepository::new(db.clone());
        let history = HistoryRepository::new(db.clone());

        let assignment = AssignmentService::new(
            orders.clone(),
            rejections,
            history.clone(),
            config.rejection_cooldown_minutes,
        );
        let checkout =
            CheckoutService::new(carts.clone(), orders.clone(), config.delivery_earning);
        let lifecycle = LifecycleService::new(orders.clone(), stores.clone(), history.clone());

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            db,
            jwt_service,
            resource_versions: Arc::new(ResourceVersions::new()),
            profiles,
            stores,
            products,
            carts,
            orders,
            history,
            assignment,
            checkout,
            lifecycle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_increment_independently() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("order"), 0);
        assert_eq!(versions.increment("order"), 1);
        assert_eq!(versions.increment("order"), 2);
        assert_eq!(versions.increment("product"), 1);

        let snap = versions.snapshot();
        assert_eq!(snap.get("order"), Some(&2));
        assert_eq!(snap.get("product"), Some(&1));
    }
}
