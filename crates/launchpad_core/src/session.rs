//! crates/launchpad_core/src/session.rs
//!
//! The client-side Session Store. It owns the Session Record kept in persistent
//! storage and the one-shot post-login redirect kept in per-tab storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::domain::{AuthResult, SessionRecord};
use crate::ports::{KeyValueStorage, SharedClock};

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";
pub const REDIRECT_KEY: &str = "redirectUrl";

/// The user-info blob stored next to the token.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredUser {
    user_id: String,
    roles: Vec<String>,
    expiration: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct SessionStore {
    local: Arc<dyn KeyValueStorage>,
    session: Arc<dyn KeyValueStorage>,
    clock: SharedClock,
}

impl SessionStore {
    /// `local` survives restarts and holds the Session Record; `session` holds
    /// the remembered deep link.
    pub fn new(
        local: Arc<dyn KeyValueStorage>,
        session: Arc<dyn KeyValueStorage>,
        clock: SharedClock,
    ) -> Self {
        Self {
            local,
            session,
            clock,
        }
    }

    /// Persists the record carried by a successful result. Anything else is ignored.
    pub fn save(&self, result: &AuthResult) {
        let Some(record) = result.session_record() else {
            return;
        };
        let user = StoredUser {
            user_id: record.user_id,
            roles: record.roles.into_iter().collect(),
            expiration: record.expires_at,
        };
        // A Vec<String> and an Option<DateTime> always serialize.
        let blob = serde_json::to_string(&user).unwrap_or_default();
        self.local.set(TOKEN_KEY, &record.access_token);
        self.local.set(USER_KEY, &blob);
    }

    pub fn record(&self) -> Option<SessionRecord> {
        let access_token = self.token()?;
        let user = self.stored_user()?;
        Some(SessionRecord {
            access_token,
            user_id: user.user_id,
            roles: user.roles.into_iter().collect(),
            expires_at: user.expiration,
        })
    }

    pub fn clear(&self) {
        self.local.remove(TOKEN_KEY);
        self.local.remove(USER_KEY);
    }

    /// Returns whether a usable token is stored.
    ///
    /// An expired record is cleared as a side effect. A token whose user blob
    /// cannot be read still counts as authenticated.
    pub fn is_authenticated(&self) -> bool {
        if self.token().is_none() {
            return false;
        }
        let Some(user) = self.stored_user() else {
            return true;
        };
        match user.expiration {
            Some(expiration) if expiration < self.clock.utc() => {
                debug!("Stored session expired at {}, clearing it", expiration);
                self.clear();
                false
            }
            _ => true,
        }
    }

    pub fn roles(&self) -> BTreeSet<String> {
        self.stored_user()
            .map(|user| user.roles.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().contains(role)
    }

    pub fn remember_redirect(&self, url: &str) {
        self.session.set(REDIRECT_KEY, url);
    }

    /// Reads the remembered deep link and forgets it.
    pub fn take_redirect(&self) -> Option<String> {
        let url = self.session.get(REDIRECT_KEY).filter(|u| !u.is_empty());
        self.session.remove(REDIRECT_KEY);
        url
    }

    fn token(&self) -> Option<String> {
        self.local.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn stored_user(&self) -> Option<StoredUser> {
        let raw = self.local.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }
}

/// An in-process `KeyValueStorage`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .map(|entries| entries.get(key).cloned())
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{successful_login, ManualClock};
    use chrono::TimeDelta;
    use mockable::Clock;
    use rstest::{fixture, rstest};

    struct Harness {
        store: SessionStore,
        local: Arc<MemoryStorage>,
        clock: Arc<ManualClock>,
    }

    #[fixture]
    fn harness() -> Harness {
        let local = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::default());
        let store = SessionStore::new(local.clone(), Arc::new(MemoryStorage::new()), clock.clone());
        Harness {
            store,
            local,
            clock,
        }
    }

    #[rstest]
    fn save_then_authenticated(harness: Harness) {
        let expires = harness.clock.utc() + TimeDelta::hours(1);
        harness.store.save(&successful_login(Some(expires), &["USER"]));

        assert!(harness.store.is_authenticated());
        let record = harness.store.record().unwrap();
        assert_eq!(record.access_token, "token-123");
        assert_eq!(record.expires_at, Some(expires));
        assert!(harness.store.has_role("USER"));
        assert!(!harness.store.has_role("ADMIN"));
    }

    #[rstest]
    fn failed_result_is_not_persisted(harness: Harness) {
        let mut result = successful_login(None, &[]);
        result.is_success = false;
        harness.store.save(&result);

        assert!(!harness.store.is_authenticated());
        assert!(harness.local.get(TOKEN_KEY).is_none());
    }

    #[rstest]
    fn not_authenticated_after_clear(harness: Harness) {
        harness.store.save(&successful_login(None, &[]));
        harness.store.clear();
        assert!(!harness.store.is_authenticated());
        assert!(harness.store.record().is_none());
    }

    #[rstest]
    fn expiry_clears_record_without_explicit_logout(harness: Harness) {
        let expires = harness.clock.utc() + TimeDelta::minutes(5);
        harness.store.save(&successful_login(Some(expires), &["USER"]));
        assert!(harness.store.is_authenticated());

        harness.clock.advance(TimeDelta::minutes(6));

        assert!(!harness.store.is_authenticated());
        assert!(harness.local.get(TOKEN_KEY).is_none());
        assert!(harness.local.get(USER_KEY).is_none());
        assert!(harness.store.roles().is_empty());
    }

    #[rstest]
    fn missing_expiry_never_expires(harness: Harness) {
        harness.store.save(&successful_login(None, &[]));
        harness.clock.advance(TimeDelta::days(365));
        assert!(harness.store.is_authenticated());
    }

    #[rstest]
    fn unreadable_user_blob_still_counts_token(harness: Harness) {
        harness.local.set(TOKEN_KEY, "raw-token");
        harness.local.set(USER_KEY, "{not json");
        assert!(harness.store.is_authenticated());
        assert!(harness.store.roles().is_empty());
    }

    #[rstest]
    fn relogin_overwrites_previous_record(harness: Harness) {
        harness.store.save(&successful_login(None, &["USER"]));
        let mut second = successful_login(None, &["ADMIN"]);
        second.access_token = Some("token-456".to_string());
        harness.store.save(&second);

        let record = harness.store.record().unwrap();
        assert_eq!(record.access_token, "token-456");
        assert_eq!(record.roles, BTreeSet::from(["ADMIN".to_string()]));
    }

    #[rstest]
    fn redirect_is_one_shot(harness: Harness) {
        harness.store.remember_redirect("/projects/7");
        assert_eq!(harness.store.take_redirect().as_deref(), Some("/projects/7"));
        assert_eq!(harness.store.take_redirect(), None);
    }
}
