//! # Identity
//!
//! The engine only needs one thing from authentication: a stable user id to
//! stamp on exports and to check imports against. [`IdentityProvider`] is that
//! seam; [`LocalIdentity`] is the storage-backed provider used by default.
//!
//! ## Local Provider
//!
//! - Registered users live in the durable `users` key.
//! - A login writes the session `user` object and remembers the id under the
//!   durable `userId` key.
//! - Logout clears the session scope.
//! - The current user id is the session user's id, falling back to the
//!   remembered durable `userId`.
//!
//! **Security gap:** passwords are stored and compared in plain text. This
//! keeps stored data compatible with existing installations and must not be
//! used where the storage can be read by anyone but the user.

use crate::error::{Result, TickError};
use crate::store::{keys, Scope, StorageBackend};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

/// The logged-in user as kept in the session scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub login_time: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

pub trait IdentityProvider {
    fn current_user(&self) -> Option<SessionUser>;

    fn current_user_id(&self) -> Option<String>;

    fn login(&self, credentials: &Credentials) -> Result<SessionUser>;

    fn logout(&self) -> Result<()>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some_and(|u| u.authenticated)
    }
}

pub struct LocalIdentity<B: StorageBackend> {
    backend: Rc<B>,
}

impl<B: StorageBackend> LocalIdentity<B> {
    pub fn new(backend: Rc<B>) -> Self {
        Self { backend }
    }

    /// Register a new user. Email addresses are unique.
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<RegisteredUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(TickError::Auth("email and password are required".to_string()));
        }

        let mut users = self.users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(TickError::Auth("Email is already registered.".to_string()));
        }

        let user = RegisteredUser {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: timestamp(),
        };
        users.push(user.clone());
        self.backend
            .set(Scope::Durable, keys::USERS, &serde_json::to_string(&users)?)?;
        info!(user = %user.id, "registered user");
        Ok(user)
    }

    /// Registered users. A corrupt registry reads as empty.
    pub fn users(&self) -> Result<Vec<RegisteredUser>> {
        let Some(raw) = self.backend.get(Scope::Durable, keys::USERS)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(users) => Ok(users),
            Err(e) => {
                warn!(error = %e, "user registry is corrupt, treating as empty");
                Ok(Vec::new())
            }
        }
    }
}

impl<B: StorageBackend> IdentityProvider for LocalIdentity<B> {
    fn current_user(&self) -> Option<SessionUser> {
        let raw = self
            .backend
            .get(Scope::Session, keys::SESSION_USER)
            .ok()
            .flatten()?;
        serde_json::from_str(&raw).ok()
    }

    fn current_user_id(&self) -> Option<String> {
        self.current_user()
            .map(|u| u.id)
            .filter(|id| !id.is_empty())
            .or_else(|| {
                self.backend
                    .get(Scope::Durable, keys::USER_ID)
                    .ok()
                    .flatten()
                    .filter(|id| !id.is_empty())
            })
    }

    fn login(&self, credentials: &Credentials) -> Result<SessionUser> {
        let user = self
            .users()?
            .into_iter()
            .find(|u| u.email == credentials.email && u.password == credentials.password)
            .ok_or_else(|| {
                TickError::Auth(
                    "Invalid credentials. Please check your email and password.".to_string(),
                )
            })?;

        let session = SessionUser {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            username: user.name,
            authenticated: true,
            login_time: timestamp(),
        };
        self.backend.set(
            Scope::Session,
            keys::SESSION_USER,
            &serde_json::to_string(&session)?,
        )?;
        self.backend.set(Scope::Durable, keys::USER_ID, &session.id)?;
        info!(user = %session.id, "logged in");
        Ok(session)
    }

    fn logout(&self) -> Result<()> {
        self.backend.clear(Scope::Session)?;
        info!("logged out");
        Ok(())
    }
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
