pub mod sqlite_store;

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if any. Implementations must treat a
    /// malformed entry as absent and remove it rather than return an error.
    async fn load(&self) -> anyhow::Result<Option<crate::model::AuthSession>>;
    async fn save(&self, session: &crate::model::AuthSession) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}
