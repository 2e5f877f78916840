//! Profile Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::types::AppRole;
use surrealdb::RecordId;

/// Profile ID type
pub type ProfileId = RecordId;

/// User profile with a closed role enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProfileId>,
    pub username: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub role: AppRole,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create profile payload (password still in the clear, hashed by the repo)
#[derive(Debug, Clone)]
pub struct ProfileCreate {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub role: AppRole,
}

impl Profile {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = Profile::hash_password("hunter2!").expect("hashing must succeed");
        let profile = Profile {
            id: None,
            username: "amina".into(),
            display_name: "Amina".into(),
            phone: None,
            role: AppRole::Courier,
            hash_pass: hash,
            is_active: true,
            created_at: 0,
        };
        assert!(profile.verify_password("hunter2!").unwrap());
        assert!(!profile.verify_password("wrong").unwrap());
    }
}
