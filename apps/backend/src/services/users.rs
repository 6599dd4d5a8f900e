//! Username and password accounts.
//!
//! Usernames are unique case-insensitively. Passwords are kept only as
//! Argon2id hashes and never leave this module.

use std::sync::atomic::{AtomicI64, Ordering};

use argon2::Params;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::domain::UserId;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    /// Stable subject carried in access tokens.
    pub sub: String,
    pub username: String,
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct UserStore {
    /// Lowercased username -> account.
    by_name: DashMap<String, Account>,
    /// sub -> lowercased username.
    by_sub: DashMap<String, String>,
    last_id: AtomicI64,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account. Fails with `UsernameTaken` if the name is in use
    /// in any letter case.
    pub fn sign_up(
        &self,
        raw_username: &str,
        password: &str,
        params: &Params,
    ) -> Result<User, AppError> {
        let username = normalize_username(raw_username)?;
        check_password(password)?;
        let key = username.to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(username_taken(&username).into());
        }

        // Hash outside the map lock.
        let password_hash = hash_password(password, params)?;
        match self.by_name.entry(key.clone()) {
            Entry::Occupied(_) => Err(username_taken(&username).into()),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.last_id.fetch_add(1, Ordering::Relaxed) + 1,
                    sub: Uuid::new_v4().to_string(),
                    username,
                };
                slot.insert(Account {
                    user: user.clone(),
                    password_hash,
                });
                self.by_sub.insert(user.sub.clone(), key);
                info!(user_id = user.id, username = %user.username, "user signed up");
                Ok(user)
            }
        }
    }

    /// Check a username and password. Unknown names and wrong passwords both
    /// fail with `invalid_credentials`.
    pub fn authenticate(&self, raw_username: &str, password: &str) -> Result<User, AppError> {
        let key: String = raw_username.trim().nfc().collect::<String>().to_lowercase();
        let account = self
            .by_name
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                debug!("login for unknown username");
                AppError::invalid_credentials()
            })?;
        if !verify_password(password, &account.password_hash) {
            debug!(user_id = account.user.id, "login with wrong password");
            return Err(AppError::invalid_credentials());
        }
        Ok(account.user)
    }

    pub fn find_by_sub(&self, sub: &str) -> Option<User> {
        let key = self.by_sub.get(sub)?.value().clone();
        self.by_name.get(&key).map(|entry| entry.value().user.clone())
    }
}

fn username_taken(username: &str) -> DomainError {
    DomainError::conflict(
        ConflictKind::UsernameTaken,
        format!("username {username} is already taken"),
    )
}

/// Trim and NFC-normalize a username and check its length and charset
/// (letters, digits, `_` and `-`).
pub fn normalize_username(raw: &str) -> Result<String, DomainError> {
    let name: String = raw.trim().nfc().collect();
    let len = name.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len) {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            format!(
                "username must be {USERNAME_MIN_CHARS} to {USERNAME_MAX_CHARS} characters long"
            ),
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            "username may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(name)
}

fn check_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPassword,
            format!(
                "password must be {PASSWORD_MIN_CHARS} to {PASSWORD_MAX_CHARS} characters long"
            ),
        ));
    }
    Ok(())
}
