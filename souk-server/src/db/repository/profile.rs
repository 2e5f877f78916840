//! Profile Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Profile, ProfileCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PROFILE_TABLE: &str = "profile";

#[derive(Clone)]
pub struct ProfileRepository {
    base: BaseRepository,
}

impl ProfileRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a profile; the username unique index rejects duplicates
    pub async fn create(&self, data: ProfileCreate, now: i64) -> RepoResult<Profile> {
        let hash = Profile::hash_password(&data.password)
            .map_err(|e| RepoError::Validation(format!("Failed to hash password: {e}")))?;

        let mut result = self
            .base
            .db()
            .query(
                "CREATE profile SET username = $username, display_name = $display_name, \
                 phone = $phone, role = $role, hash_pass = $hash, is_active = true, \
                 created_at = $now RETURN AFTER",
            )
            .bind(("username", data.username.clone()))
            .bind(("display_name", data.display_name))
            .bind(("phone", data.phone))
            .bind(("role", data.role))
            .bind(("hash", hash))
            .bind(("now", now))
            .await
            .map_err(RepoError::from)?;

        let created: Vec<Profile> = result.take(0).map_err(RepoError::from)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Duplicate(format!("Username {} is taken", data.username)))
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Profile>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM profile WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let profile: Option<Profile> = result.take(0)?;
        Ok(profile)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Profile>> {
        let rid = make_record_id(PROFILE_TABLE, id);
        let profile: Option<Profile> = self.base.db().select(rid).await?;
        Ok(profile)
    }
}
