//! AuthService: administrator accounts, password hashing and the signed
//! session token carried in the `auth-token` cookie.
//!
//! There is no server-side session store: a token is valid until it expires.

use crate::{
    config::SeedAdmin,
    errors::{ServiceError, ServiceResult},
    models::admin::{Admin, AdminProfile, Claims, NewAdmin},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

/// Lifetime of an issued token (and of the cookie holding it).
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

const ADMIN_COLUMNS: &str =
    "id, username, email, password_hash, role, last_login, created_at, updated_at";

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub admin: AdminProfile,
}

struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

#[derive(Clone)]
pub struct AuthService {
    pub db: Arc<SqlitePool>,
    keys: Arc<JwtKeys>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(db: Arc<SqlitePool>, secret: &str) -> Self {
        Self {
            db,
            keys: Arc::new(JwtKeys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                validation: Validation::default(),
            }),
            token_ttl: Duration::seconds(TOKEN_TTL_SECS),
        }
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Check credentials, stamp `last_login` and issue a session token.
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<LoginOutcome> {
        let admin = self
            .find_by_username(username.trim())
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_in_background(password, &admin.password_hash).await? {
            warn!(username = %admin.username, "rejected login with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins SET last_login = ?, updated_at = ? WHERE id = ? RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(Utc::now())
        .bind(Utc::now())
        .bind(admin.id)
        .fetch_one(&*self.db)
        .await?;

        let token = self.issue_token(&admin)?;
        info!(username = %admin.username, "admin logged in");
        Ok(LoginOutcome {
            token,
            admin: AdminProfile::from(&admin),
        })
    }

    /// Verify a token taken from a request. Missing, tampered and expired
    /// tokens all yield `Unauthorized`.
    pub fn authenticate(&self, token: Option<&str>) -> ServiceResult<Claims> {
        let token = token.ok_or(ServiceError::Unauthorized)?;
        jsonwebtoken::decode::<Claims>(token, &self.keys.decoding, &self.keys.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "token verification failed");
                ServiceError::Unauthorized
            })
    }

    pub fn issue_token(&self, admin: &Admin) -> ServiceResult<String> {
        let now = Utc::now();
        let claims = Claims {
            id: admin.id,
            username: admin.username.clone(),
            role: admin.role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.keys.encoding,
        )?)
    }

    /// Create the initial administrator unless one with the seed email exists.
    /// Returns true when an account was created.
    pub async fn seed_admin(&self, seed: &SeedAdmin) -> ServiceResult<bool> {
        let email = seed.email.trim().to_lowercase();
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM admins WHERE email = ?")
            .bind(&email)
            .fetch_optional(&*self.db)
            .await?;
        if existing.is_some() {
            debug!(%email, "admin user already exists");
            return Ok(false);
        }

        self.create_admin(NewAdmin {
            username: seed.username.clone(),
            email,
            password: seed.password.clone(),
            role: Default::default(),
        })
        .await?;
        info!(username = %seed.username, "seeded admin user");
        Ok(true)
    }

    pub async fn create_admin(&self, new_admin: NewAdmin) -> ServiceResult<Admin> {
        let new_admin = NewAdmin {
            username: new_admin.username.trim().to_string(),
            email: new_admin.email.trim().to_lowercase(),
            ..new_admin
        };
        new_admin.validate()?;

        let hash = hash_in_background(&new_admin.password).await?;
        let now = Utc::now();
        sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (id, username, email, password_hash, role, last_login, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, NULL, ?, ?)
             RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&new_admin.username)
        .bind(&new_admin.email)
        .bind(&hash)
        .bind(new_admin.role)
        .bind(now)
        .bind(now)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| {
            if crate::db::is_unique_violation(&err) {
                ServiceError::Validation(vec!["Username or email is already taken".into()])
            } else {
                ServiceError::Storage(err)
            }
        })
    }

    /// Replace an administrator's password; the new value is hashed before storage.
    pub async fn set_password(&self, id: Uuid, password: &str) -> ServiceResult<()> {
        if password.chars().count() < 6 {
            return Err(ServiceError::Validation(vec![
                "Password must be at least 6 characters".into(),
            ]));
        }
        let hash = hash_in_background(password).await?;
        let result =
            sqlx::query("UPDATE admins SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(hash)
                .bind(Utc::now())
                .bind(id)
                .execute(&*self.db)
                .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Admin".into()));
        }
        Ok(())
    }

    pub async fn find_by_username(&self, username: &str) -> ServiceResult<Option<Admin>> {
        Ok(sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins WHERE username = ?",
            ADMIN_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&*self.db)
        .await?)
    }
}

/// Hash a password into an argon2id PHC string with a fresh salt.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::PasswordHash(err.to_string()))
}

/// [`hash_password`] on the blocking pool, off the async workers.
pub async fn hash_in_background(password: &str) -> ServiceResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| ServiceError::PasswordHash(err.to_string()))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_in_background(password: &str, hash: &str) -> ServiceResult<bool> {
    let (password, hash) = (password.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|err| ServiceError::PasswordHash(err.to_string()))
}

/// Verify a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
