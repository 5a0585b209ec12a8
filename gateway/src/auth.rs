//! Login, registration, and profile flows.
//!
//! Composes the gateway (network) with the session manager (state). The
//! credential endpoints dispatch through `post_public`, so a rejected
//! login can never tear down a session that is already established.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use session::manager::SessionManager;
use session::model::{AuthSession, ProfilePatch, Role, UserProfile};
use session::store::SessionStore;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::resources::Ack;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to student server-side when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "access_token")]
    token: String,
    user: UserProfile,
}

#[derive(Debug, Default, Deserialize)]
struct RegisterResponse {
    #[serde(default, alias = "access_token")]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default, alias = "message")]
    msg: Option<String>,
}

/// What `register` actually did. Some backend revisions hand back a
/// ready-to-use token, others only an acknowledgment; callers must not
/// assume either.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// The backend auto-authenticated; a session is already established.
    Authenticated(AuthSession),
    /// Account created; a subsequent `login` is required.
    Registered { message: String },
}

/// Authentication front door: owns the login/register/logout/profile flows
/// on top of the gateway and the session manager.
pub struct AuthClient<S: SessionStore> {
    gateway: Arc<GatewayClient>,
    sessions: Arc<SessionManager<S>>,
}

impl<S: SessionStore> AuthClient<S> {
    pub fn new(gateway: Arc<GatewayClient>, sessions: Arc<SessionManager<S>>) -> Self {
        Self { gateway, sessions }
    }

    /// POST /auth/login. On success the returned token and profile are
    /// persisted and published as one unit; on failure any existing
    /// session is left untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, GatewayError> {
        let resp: LoginResponse = self.gateway.post_public("/auth/login", credentials).await?;

        let session = AuthSession {
            token: resp.token,
            user: resp.user,
        };

        self.sessions
            .establish(session.clone())
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;

        Ok(session)
    }

    /// POST /auth/register. Establishes a session only when the response
    /// carries both a token and a profile.
    pub async fn register(&self, account: &NewAccount) -> Result<RegisterOutcome, GatewayError> {
        let resp: RegisterResponse = self.gateway.post_public("/auth/register", account).await?;

        match (resp.token, resp.user) {
            (Some(token), Some(user)) => {
                let session = AuthSession { token, user };
                self.sessions
                    .establish(session.clone())
                    .await
                    .map_err(|e| GatewayError::Storage(e.to_string()))?;
                Ok(RegisterOutcome::Authenticated(session))
            }
            _ => Ok(RegisterOutcome::Registered {
                message: resp.msg.unwrap_or_else(|| "Registered".to_string()),
            }),
        }
    }

    /// Clear the session, in memory and on disk. Local-only and
    /// unconditional; never fails.
    pub async fn logout(&self) {
        self.sessions.clear().await;
    }

    /// PUT /auth/profile, then merge the patch locally. No-op when nobody
    /// is logged in.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<(), GatewayError> {
        if self.sessions.current().is_none() || patch.is_empty() {
            return Ok(());
        }

        let _: Ack = self.gateway.put("/auth/profile", patch).await?;

        self.sessions
            .update_profile(patch)
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;

        Ok(())
    }

    /// POST /auth/change-password. The token stays valid; nothing to
    /// update locally.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), GatewayError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            current_password: &'a str,
            new_password: &'a str,
        }

        let _: Ack = self
            .gateway
            .post(
                "/auth/change-password",
                &Payload {
                    current_password,
                    new_password,
                },
            )
            .await?;

        Ok(())
    }

    /// Synchronous read of the in-memory session.
    pub fn current_session(&self) -> Option<AuthSession> {
        self.sessions.current()
    }
}
