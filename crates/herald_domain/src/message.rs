use serde::{Deserialize, Serialize};

/// Mailbox address as written in `From:` and `To:` headers.
#[derive(
    Clone,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Display,
    derive_more::Deref,
    Debug,
    PartialEq,
    Eq,
)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(address: impl ToString) -> Self {
        Self(address.to_string())
    }
}

/// A fully assembled e-mail, built once per run and sent exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    sender: EmailAddress,
    recipient: EmailAddress,
    subject: String,
    plain_body: String,
    html_body: String,
}

impl OutgoingMessage {
    pub fn new(
        sender: EmailAddress,
        recipient: EmailAddress,
        subject: impl Into<String>,
        plain_body: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            recipient,
            subject: subject.into(),
            plain_body: plain_body.into(),
            html_body: html_body.into(),
        }
    }

    pub fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    pub fn recipient(&self) -> &EmailAddress {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn plain_body(&self) -> &str {
        &self.plain_body
    }

    pub fn html_body(&self) -> &str {
        &self.html_body
    }
}
