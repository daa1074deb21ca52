use crate::{ChatRequest, ChatResponse, Credential, OutgoingMessage};

/// Issues and renews credentials against the OAuth provider.
#[async_trait::async_trait]
pub trait Authorizer: Send + Sync {
    /// Exchanges the credential's refresh token for a new access token.
    async fn refresh(&self, credential: &Credential) -> anyhow::Result<Credential>;

    /// Runs the interactive consent flow and returns a fresh credential.
    async fn authorize(&self, scopes: &[String]) -> anyhow::Result<Credential>;
}

/// Text generation backend.
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse>;
}

/// Authenticated mail submission.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    /// Submits the encoded message once. Errors are returned unchanged.
    async fn send(&self, credential: &Credential, raw: &[u8]) -> anyhow::Result<()>;
}
