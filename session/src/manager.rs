use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::model::{AuthSession, ProfilePatch, SessionPhase};
use crate::store::SessionStore;

/// What the HTTP gateway needs from the session subsystem: the token to
/// attach to outgoing requests, and a forced logout when the server rejects
/// that token. The gateway must observe the same value the manager reports.
#[async_trait]
pub trait SessionAccess: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
    async fn force_clear(&self);
}

enum Slot {
    Unknown,
    Anonymous,
    Authenticated(AuthSession),
}

/// Single source of truth for "who is logged in".
///
/// Holds the live session in memory and mirrors every change to a durable
/// store. The durable copy is written before the in-memory state is
/// considered committed, so a crash between the two leaves storage ahead of
/// memory, never behind. On disagreement the in-memory copy wins until the
/// next `initialize()`.
pub struct SessionManager<S: SessionStore> {
    slot: Mutex<Slot>,
    store: Arc<S>,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            slot: Mutex::new(Slot::Unknown),
            store,
        }
    }

    /// Restore any previously persisted session. Runs once at startup; no
    /// network call. A malformed entry has already been dropped by the
    /// store, so it simply shows up here as "nobody logged in".
    pub async fn initialize(&self) -> anyhow::Result<()> {
        let restored = self.store.load().await?;

        let mut slot = self.slot.lock();
        *slot = match restored {
            Some(session) => {
                info!(user_id = session.user.id, role = %session.user.role, "session restored");
                Slot::Authenticated(session)
            }
            None => Slot::Anonymous,
        };

        Ok(())
    }

    /// Commit a freshly authenticated session (login or auto-authenticating
    /// registration). Persist first, then publish to memory.
    pub async fn establish(&self, session: AuthSession) -> anyhow::Result<()> {
        self.store.save(&session).await?;

        *self.slot.lock() = Slot::Authenticated(session);
        Ok(())
    }

    /// Log out. Memory is cleared unconditionally; a failed durable delete
    /// is logged and swallowed so logout can never fail.
    pub async fn clear(&self) {
        *self.slot.lock() = Slot::Anonymous;

        if let Err(e) = self.store.clear().await {
            warn!(error = ?e, "failed to clear persisted session");
        }
    }

    /// Merge a profile patch into the current user, in memory and in the
    /// durable store. No-op when nobody is logged in or the patch is empty.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> anyhow::Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let updated = {
            let slot = self.slot.lock();
            match &*slot {
                Slot::Authenticated(session) => {
                    let mut next = session.clone();
                    patch.apply_to(&mut next.user);
                    Some(next)
                }
                _ => None,
            }
        };

        let Some(next) = updated else { return Ok(()) };

        self.store.save(&next).await?;
        *self.slot.lock() = Slot::Authenticated(next);

        Ok(())
    }

    /// Synchronous read of the in-memory session.
    pub fn current(&self) -> Option<AuthSession> {
        match &*self.slot.lock() {
            Slot::Authenticated(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match &*self.slot.lock() {
            Slot::Unknown => SessionPhase::Unknown,
            Slot::Anonymous => SessionPhase::Anonymous,
            Slot::Authenticated(_) => SessionPhase::Authenticated,
        }
    }
}

#[async_trait]
impl<S: SessionStore> SessionAccess for SessionManager<S> {
    fn bearer_token(&self) -> Option<String> {
        match &*self.slot.lock() {
            Slot::Authenticated(session) => Some(session.token.clone()),
            _ => None,
        }
    }

    async fn force_clear(&self) {
        self.clear().await;
    }
}
