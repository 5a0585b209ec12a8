//! SqliteSessionStore
//! --------------------
//! This module provides a **SQLite-backed implementation** of the
//! `SessionStore` trait used by the session::manager subsystem. It is
//! responsible for durable persistence of the login session so that:
//!
//!  - the session survives restarts (no re-login on every launch)
//!  - token and profile are written as a single value, never as two
//!    independent keys (a crash mid-write cannot produce a torn session)
//!  - a malformed entry is discarded instead of wedging startup
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::warn;

use super::SessionStore;
use crate::model::AuthSession;

/// SQLite-based persistence backend for the login session.
///
/// There is at most one session per install, so the table holds a single
/// row (`slot = 0`) and `save()` has upsert semantics.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new SQLite-backed store and ensure schema exists.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(path).await?;

        let store = Self::from_pool(pool);
        store.ensure_schema().await?;

        Ok(store)
    }

    /// Creates the table if it does not exist.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS auth_session (
                slot INTEGER PRIMARY KEY CHECK (slot = 0),
                session_json TEXT NOT NULL
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    /// Load the persisted session.
    ///
    /// Called once at startup by the session manager. An entry that no
    /// longer deserializes (schema drift, hand-edited file, torn write from
    /// an older two-key layout) is deleted and reported as absent.
    async fn load(&self) -> anyhow::Result<Option<AuthSession>> {
        let row = sqlx::query("SELECT session_json FROM auth_session WHERE slot = 0")
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row.get("session_json");

        match serde_json::from_str::<AuthSession>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "discarding malformed persisted session");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    /// Store or replace the session.
    ///
    /// `save()` uses INSERT OR UPDATE semantics on the single slot row, so
    /// token and profile land in one statement.
    async fn save(&self, session: &AuthSession) -> anyhow::Result<()> {
        let session_json = serde_json::to_string(session)?;

        sqlx::query(
            r#"
            INSERT INTO auth_session (slot, session_json)
            VALUES (0, ?)
            ON CONFLICT(slot) DO UPDATE SET
                session_json = excluded.session_json;
        "#,
        )
        .bind(session_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove the persisted session.
    ///
    /// Called by the session manager on logout and by the gateway when the
    /// server rejects the token.
    async fn clear(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM auth_session WHERE slot = 0")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
