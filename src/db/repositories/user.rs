use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;

/// Minimum accepted password length for provisioned accounts.
const MIN_PASSWORD_LEN: usize = 8;

/// Roles a credential record may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub department: String,
    pub shift: String,
    pub location: String,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            // Roles are validated on the way in; anything else is treated as
            // the lowest privilege.
            role: Role::parse(&model.role).unwrap_or(Role::Employee),
            department: model.department,
            shift: model.shift,
            location: model.location,
            created_at: model.created_at,
        }
    }
}

/// Input for provisioning a new credential record.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub role: Role,
    pub department: &'a str,
    pub shift: &'a str,
    pub location: &'a str,
}

/// Why a provisioning attempt was rejected.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,

    #[error("Employee \"{0}\" already exists.")]
    DuplicateUsername(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a credential record. Rejects short passwords and duplicate
    /// usernames (case-sensitive exact match); the roster is left unchanged
    /// on rejection.
    pub async fn create(
        &self,
        user: NewUser<'_>,
        security: &SecurityConfig,
    ) -> Result<User, ProvisionError> {
        if user.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ProvisionError::PasswordTooShort);
        }

        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(user.username))
            .one(&self.conn)
            .await
            .context("Failed to check username availability")?;

        if existing.is_some() {
            return Err(ProvisionError::DuplicateUsername(user.username.to_string()));
        }

        let password = user.password.to_string();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .context("Password hashing task panicked")??;

        let now = super::timestamp();

        let active = users::ActiveModel {
            username: Set(user.username.to_string()),
            password_hash: Set(password_hash),
            role: Set(user.role.as_str().to_string()),
            department: Set(user.department.to_string()),
            shift: Set(user.shift.to_string()),
            location: Set(user.location.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let inserted = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(User::from(inserted))
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// All credential records, ordered by username.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Verify a password for a user. An unknown username verifies false, so
    /// callers cannot distinguish it from a wrong password.
    /// Note: this uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }
}

/// Hash a password using Argon2id with parameters from the security config.
pub fn hash_password(password: &str, security: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        security.argon2_memory_cost_kib,
        security.argon2_time_cost,
        security.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
