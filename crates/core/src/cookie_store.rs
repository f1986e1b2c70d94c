//! Session cookies: the auth token and the user identity blob.
//! Both expire together after `cookie_days` (7 by default).

use std::sync::Arc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{AuthSession, UserIdentity};

pub const TOKEN_COOKIE: &str = "token";
pub const USER_COOKIE: &str = "user";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl StoredCookie {
    fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        matches!(self.expires_at, Some(expires) if expires < now)
    }
}

#[derive(Clone)]
pub struct CookieJar {
    // name -> cookie
    store: Arc<DashMap<String, StoredCookie>>,
    lifetime: chrono::Duration,
}

impl CookieJar {
    pub fn new(cookie_days: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            lifetime: chrono::Duration::days(cookie_days),
        }
    }

    /// Store a cookie with the jar's default lifetime
    pub fn set(&self, name: &str, value: String) {
        let now = chrono::Utc::now();
        let stored = StoredCookie {
            name: name.to_string(),
            value,
            created_at: now,
            expires_at: Some(now + self.lifetime),
        };

        self.store.insert(name.to_string(), stored);
    }

    /// Get a cookie value, dropping it if it expired
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(entry) = self.store.get(name) {
            let stored = entry.value().clone();

            if stored.is_expired(chrono::Utc::now()) {
                drop(entry);
                debug!(cookie = name, "cookie expired");
                self.store.remove(name);
                return None;
            }

            return Some(stored.value);
        }

        None
    }

    pub fn remove(&self, name: &str) {
        self.store.remove(name);
    }

    pub fn set_session(&self, session: &AuthSession) {
        self.set(TOKEN_COOKIE, session.token.clone());
        // serializing a plain struct of strings cannot fail
        if let Ok(user) = serde_json::to_string(&session.user) {
            self.set(USER_COOKIE, user);
        }
    }

    pub fn token(&self) -> Option<String> {
        self.get(TOKEN_COOKIE)
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.get(USER_COOKIE)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    /// The current session, if both cookies are present and fresh
    pub fn session(&self) -> Option<AuthSession> {
        Some(AuthSession {
            token: self.token()?,
            user: self.user()?,
        })
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Unexpired cookies, for persisting
    pub fn snapshot(&self) -> Vec<StoredCookie> {
        let now = chrono::Utc::now();
        self.store
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|c| !c.is_expired(now))
            .collect()
    }

    /// Load previously persisted cookies, skipping the expired ones
    pub fn restore(&self, cookies: Vec<StoredCookie>) {
        let now = chrono::Utc::now();
        for cookie in cookies {
            if cookie.is_expired(now) {
                continue;
            }
            self.store.insert(cookie.name.clone(), cookie);
        }
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new(7)
    }
}
