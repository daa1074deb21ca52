use crate::Credential;

/// Durable slot holding the single persisted credential.
#[async_trait::async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Returns `None` when nothing has been persisted yet.
    async fn read(&self) -> anyhow::Result<Option<Credential>>;

    /// Replaces the persisted credential.
    async fn write(&self, credential: &Credential) -> anyhow::Result<()>;
}
