use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use herald_domain::{Credential, Error, MailTransport};
use serde::{Deserialize, Serialize};
use url::Url;

/// Gmail `users.messages.send` over REST.
pub struct GmailTransport {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Serialize)]
struct SendRequest {
    raw: String,
}

#[derive(Deserialize)]
struct SendResponse {
    id: Option<String>,
}

impl GmailTransport {
    pub fn new(base_url: Url) -> Self {
        Self { client: reqwest::Client::new(), base_url }
    }
}

#[async_trait::async_trait]
impl MailTransport for GmailTransport {
    async fn send(&self, credential: &Credential, raw: &[u8]) -> anyhow::Result<()> {
        let url = self.base_url.join("users/me/messages/send")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(credential.access_token.as_str())
            .json(&SendRequest { raw: URL_SAFE.encode(raw) })
            .send()
            .await
            .context("Failed to reach the mail API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport { status: status.as_u16(), body }.into());
        }

        let sent: SendResponse = response.json().await.unwrap_or(SendResponse { id: None });
        tracing::debug!(id = sent.id.as_deref().unwrap_or("unknown"), "Mail API accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn fixture_credential() -> Credential {
        Credential::new(
            "ya29.token".to_string(),
            "https://oauth2.googleapis.com/token".to_string(),
            "client".to_string(),
            "secret".to_string(),
        )
    }

    fn fixture_transport(server: &mockito::Server) -> GmailTransport {
        GmailTransport::new(Url::parse(&format!("{}/gmail/v1/", server.url())).unwrap())
    }

    #[tokio::test]
    async fn test_send_posts_url_safe_raw_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let fixture = b"Subject: ??>\r\n\r\nhi";
        let mock = server
            .mock("POST", "/gmail/v1/users/me/messages/send")
            .match_header("authorization", "Bearer ya29.token")
            .match_body(mockito::Matcher::Json(json!({"raw": URL_SAFE.encode(fixture)})))
            .with_status(200)
            .with_body(r#"{"id": "18c0", "threadId": "18c0"}"#)
            .create_async()
            .await;

        fixture_transport(&server)
            .send(&fixture_credential(), fixture)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn test_raw_encoding_uses_url_safe_alphabet() {
        let fixture = b"Subject: ??>\r\n";

        let actual = URL_SAFE.encode(fixture);

        assert!(!actual.contains('+'));
        assert!(!actual.contains('/'));
        assert_eq!(URL_SAFE.decode(actual).unwrap(), fixture.to_vec());
    }

    #[tokio::test]
    async fn test_rejection_becomes_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gmail/v1/users/me/messages/send")
            .with_status(403)
            .with_body("insufficient scope")
            .create_async()
            .await;

        let actual = fixture_transport(&server)
            .send(&fixture_credential(), b"raw")
            .await
            .unwrap_err();

        assert_eq!(
            actual.to_string(),
            "Mail transport rejected the message (403): insufficient scope"
        );
    }
}
