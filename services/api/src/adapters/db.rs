//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use launchpad_core::domain::{AdminCredential, AdminSession, NewNewsletterSignup, NewsletterSignup};
use launchpad_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct NewsletterRecord {
    id: i32,
    name: String,
    email: String,
    telegram_username: Option<String>,
    created_at: DateTime<Utc>,
}
impl NewsletterRecord {
    fn to_domain(self) -> NewsletterSignup {
        NewsletterSignup {
            id: self.id,
            name: self.name,
            email: self.email,
            telegram_username: self.telegram_username,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct AdminRecord {
    id: i32,
    username: String,
    password: String,
}
impl AdminRecord {
    fn to_domain(self) -> AdminCredential {
        AdminCredential {
            id: self.id,
            username: self.username,
            password_hash: self.password,
        }
    }
}

#[derive(FromRow)]
struct AdminSessionRecord {
    id: String,
    username: String,
    client_ip: Option<String>,
    expires_at: DateTime<Utc>,
}
impl AdminSessionRecord {
    fn to_domain(self) -> AdminSession {
        AdminSession {
            id: self.id,
            username: self.username,
            client_ip: self.client_ip,
            expires_at: self.expires_at,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn find_newsletter_by_email(&self, email: &str) -> PortResult<Option<NewsletterSignup>> {
        let record = sqlx::query_as::<_, NewsletterRecord>(
            "SELECT id, name, email, telegram_username, created_at FROM newsletters WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(NewsletterRecord::to_domain))
    }

    async fn create_newsletter(
        &self,
        signup: &NewNewsletterSignup,
    ) -> PortResult<NewsletterSignup> {
        let record = sqlx::query_as::<_, NewsletterRecord>(
            "INSERT INTO newsletters (name, email, telegram_username) VALUES ($1, $2, $3) RETURNING id, name, email, telegram_username, created_at",
        )
        .bind(&signup.name)
        .bind(&signup.email)
        .bind(&signup.telegram_username)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_newsletters(&self) -> PortResult<Vec<NewsletterSignup>> {
        let records = sqlx::query_as::<_, NewsletterRecord>(
            "SELECT id, name, email, telegram_username, created_at FROM newsletters ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let signups = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(signups)
    }

    async fn delete_newsletter(&self, id: i32) -> PortResult<()> {
        sqlx::query("DELETE FROM newsletters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn get_admin_by_username(&self, username: &str) -> PortResult<AdminCredential> {
        let record = sqlx::query_as::<_, AdminRecord>(
            "SELECT id, username, password FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Admin {} not found", username))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> PortResult<AdminCredential> {
        let record = sqlx::query_as::<_, AdminRecord>(
            "INSERT INTO admins (username, password) VALUES ($1, $2) RETURNING id, username, password",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn create_admin_session(&self, session: &AdminSession) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO admin_sessions (id, username, client_ip, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.id)
        .bind(&session.username)
        .bind(&session.client_ip)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_admin_session(&self, session_id: &str) -> PortResult<AdminSession> {
        let record = sqlx::query_as::<_, AdminSessionRecord>(
            "SELECT id, username, client_ip, expires_at FROM admin_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound("Admin session not found".to_string()),
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn delete_admin_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn delete_expired_admin_sessions(&self, now: DateTime<Utc>) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected())
    }
}
