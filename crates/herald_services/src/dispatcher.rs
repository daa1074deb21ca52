use std::sync::Arc;

use herald_domain::{Credential, MailTransport, OutgoingMessage};

use crate::mime;

/// Encodes a message and submits it once through the mail transport.
pub struct Dispatcher<T> {
    transport: Arc<T>,
}

impl<T: MailTransport> Dispatcher<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Transport failures are returned as-is; nothing is retried.
    pub async fn send(
        &self,
        credential: &Credential,
        message: &OutgoingMessage,
    ) -> anyhow::Result<()> {
        let raw = mime::encode(message, &mime::boundary());
        self.transport.send(credential, &raw).await?;
        tracing::info!(recipient = %message.recipient(), "Message sent");
        Ok(())
    }
}
