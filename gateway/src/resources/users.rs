use std::sync::Arc;

use serde::Deserialize;

use session::model::UserProfile;

use crate::client::GatewayClient;
use crate::error::GatewayError;

#[derive(Debug, Deserialize)]
struct UserListEnvelope {
    users: Vec<UserProfile>,
}

pub struct UsersApi {
    gateway: Arc<GatewayClient>,
}

impl UsersApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    /// The profile behind the current token, straight from the server
    /// (the locally cached copy may lag a concurrent admin edit).
    pub async fn me(&self) -> Result<UserProfile, GatewayError> {
        self.gateway.get("/users/me").await
    }

    /// Admin-only.
    pub async fn list(&self) -> Result<Vec<UserProfile>, GatewayError> {
        let env: UserListEnvelope = self.gateway.get("/users/").await?;
        Ok(env.users)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<UserProfile>, GatewayError> {
        let env: UserListEnvelope = self
            .gateway
            .get_query("/users/search", &[("q", query.to_string())])
            .await?;
        Ok(env.users)
    }
}
