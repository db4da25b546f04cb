//! services/api/src/adapters/memory.rs
//!
//! An in-process `DatabaseService`, used by the integration tests and for
//! running the service without Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use launchpad_core::domain::{AdminCredential, AdminSession, NewNewsletterSignup, NewsletterSignup};
use launchpad_core::ports::{DatabaseService, PortError, PortResult, SharedClock};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    newsletters: Vec<NewsletterSignup>,
    admins: Vec<AdminCredential>,
    sessions: HashMap<String, AdminSession>,
    next_newsletter_id: i32,
    next_admin_id: i32,
}

/// In-memory storage with the same uniqueness rules as the SQL schema.
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
    clock: SharedClock,
}

impl InMemoryDatabase {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }
}

#[async_trait]
impl DatabaseService for InMemoryDatabase {
    async fn find_newsletter_by_email(&self, email: &str) -> PortResult<Option<NewsletterSignup>> {
        let tables = self.tables.read().await;
        Ok(tables
            .newsletters
            .iter()
            .find(|n| n.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_newsletter(
        &self,
        signup: &NewNewsletterSignup,
    ) -> PortResult<NewsletterSignup> {
        let mut tables = self.tables.write().await;
        if tables
            .newsletters
            .iter()
            .any(|n| n.email.eq_ignore_ascii_case(&signup.email))
        {
            return Err(PortError::Unexpected(format!(
                "duplicate newsletter email {}",
                signup.email
            )));
        }

        tables.next_newsletter_id += 1;
        let record = NewsletterSignup {
            id: tables.next_newsletter_id,
            name: signup.name.clone(),
            email: signup.email.clone(),
            telegram_username: signup.telegram_username.clone(),
            created_at: self.clock.utc(),
        };
        tables.newsletters.push(record.clone());
        Ok(record)
    }

    async fn list_newsletters(&self) -> PortResult<Vec<NewsletterSignup>> {
        let mut signups = self.tables.read().await.newsletters.clone();
        signups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(signups)
    }

    async fn delete_newsletter(&self, id: i32) -> PortResult<()> {
        self.tables.write().await.newsletters.retain(|n| n.id != id);
        Ok(())
    }

    async fn get_admin_by_username(&self, username: &str) -> PortResult<AdminCredential> {
        self.tables
            .read()
            .await
            .admins
            .iter()
            .find(|a| a.username == username)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Admin {} not found", username)))
    }

    async fn create_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> PortResult<AdminCredential> {
        let mut tables = self.tables.write().await;
        if tables.admins.iter().any(|a| a.username == username) {
            return Err(PortError::Unexpected(format!("duplicate admin {}", username)));
        }

        tables.next_admin_id += 1;
        let admin = AdminCredential {
            id: tables.next_admin_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        tables.admins.push(admin.clone());
        Ok(admin)
    }

    async fn create_admin_session(&self, session: &AdminSession) -> PortResult<()> {
        self.tables
            .write()
            .await
            .sessions
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get_admin_session(&self, session_id: &str) -> PortResult<AdminSession> {
        self.tables
            .read()
            .await
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Admin session not found".to_string()))
    }

    async fn delete_admin_session(&self, session_id: &str) -> PortResult<()> {
        self.tables.write().await.sessions.remove(session_id);
        Ok(())
    }

    async fn delete_expired_admin_sessions(&self, now: DateTime<Utc>) -> PortResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, session| session.expires_at > now);
        Ok((before - tables.sessions.len()) as u64)
    }
}
