use serde::{Deserialize, Serialize};

use crate::{AuthUrl, ClientId, ClientSecret, Error, TokenUrl};

/// OAuth client registration for an installed application, as downloaded
/// from the provider console (`client_secret.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthClientConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    #[serde(rename = "auth_uri")]
    pub auth_url: AuthUrl,
    #[serde(rename = "token_uri")]
    pub token_url: TokenUrl,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// The console wraps the registration in a section named after the
/// application type.
#[derive(Deserialize)]
enum ClientConfigFile {
    #[serde(rename = "installed")]
    Installed(OAuthClientConfig),
    #[serde(rename = "web")]
    Web(OAuthClientConfig),
}

impl OAuthClientConfig {
    pub fn parse(content: &str) -> Result<Self, Error> {
        let file: ClientConfigFile = serde_json::from_str(content)
            .map_err(|e| Error::InvalidClientConfig(e.to_string()))?;
        match file {
            ClientConfigFile::Installed(config) | ClientConfigFile::Web(config) => Ok(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_installed_section() {
        let fixture = r#"{
            "installed": {
                "client_id": "id.apps.googleusercontent.com",
                "project_id": "herald",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
                "client_secret": "shh",
                "redirect_uris": ["http://localhost"]
            }
        }"#;

        let actual = OAuthClientConfig::parse(fixture).unwrap();

        let expected = OAuthClientConfig {
            client_id: "id.apps.googleusercontent.com".to_string().into(),
            client_secret: "shh".to_string().into(),
            auth_url: "https://accounts.google.com/o/oauth2/auth".to_string().into(),
            token_url: "https://oauth2.googleapis.com/token".to_string().into(),
            redirect_uris: vec!["http://localhost".to_string()],
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_parse_web_section() {
        let fixture = r#"{"web": {
            "client_id": "id",
            "client_secret": "secret",
            "auth_uri": "https://example.com/auth",
            "token_uri": "https://example.com/token"
        }}"#;

        let actual = OAuthClientConfig::parse(fixture).unwrap();

        assert_eq!(actual.client_id.as_str(), "id");
        assert!(actual.redirect_uris.is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_layout() {
        let fixture = r#"{"client_id": "id"}"#;

        let actual = OAuthClientConfig::parse(fixture);

        assert!(matches!(actual, Err(Error::InvalidClientConfig(_))));
    }
}
