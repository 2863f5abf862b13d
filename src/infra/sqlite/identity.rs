use std::path::PathBuf;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

use crate::domain::entities::document::OwnerId;
use crate::domain::entities::user::UserAccount;
use crate::infra::sqlite::queries::{find_account_by_email, insert_account, list_accounts};
use crate::usecase::ports::identity::{AuthError, IdentityProvider};

/// Local account backend with Argon2 password hashes and UUIDv4 owner ids.
pub struct SqliteIdentity {
    db_path: PathBuf,
}

impl SqliteIdentity {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Message(format!("failed to hash password: {err}")))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| AuthError::Message(format!("stored password hash is invalid: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl IdentityProvider for SqliteIdentity {
    fn sign_up(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let existing = find_account_by_email(&self.db_path, email)
            .map_err(|err| AuthError::Message(err.to_string()))?;
        if existing.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let id = Uuid::new_v4().to_string();
        let password_hash = hash_password(password)?;
        insert_account(&self.db_path, &id, email, &password_hash)
            .map_err(|err| AuthError::Message(err.to_string()))?;
        tracing::info!(email, "created account");

        Ok(UserAccount {
            id: OwnerId(id),
            email: email.to_string(),
        })
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        let (id, stored_hash) = find_account_by_email(&self.db_path, email)
            .map_err(|err| AuthError::Message(err.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &stored_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(UserAccount {
            id: OwnerId(id),
            email: email.to_string(),
        })
    }

    fn list_accounts(&self) -> Result<Vec<UserAccount>, AuthError> {
        list_accounts(&self.db_path).map_err(|err| AuthError::Message(err.to_string()))
    }
}
