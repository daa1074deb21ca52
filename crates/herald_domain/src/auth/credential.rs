use chrono::{DateTime, Duration, Utc};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::{AccessToken, ClientId, ClientSecret, RefreshToken, TokenUrl};

/// Tokens closer than this to their expiry are treated as already expired so
/// that a request issued right after `acquire` does not race the deadline.
pub fn expiry_skew() -> Duration {
    Duration::seconds(60)
}

/// An authorized-user credential for the mail transport.
///
/// The serialized layout follows the authorized-user JSON files written by
/// Google's client libraries (`token`, `refresh_token`, `token_uri`, ...), so
/// the same file can be shared with other tooling for the same OAuth client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(strip_option, into)]
pub struct Credential {
    #[serde(rename = "token")]
    pub access_token: AccessToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshToken>,
    pub token_uri: TokenUrl,
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// Outcome of checking a persisted credential against the current run's
/// requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CredentialStatus {
    Valid,
    Expired,
    MissingScopes,
}

impl Credential {
    pub fn new(
        access_token: impl Into<AccessToken>,
        token_uri: impl Into<TokenUrl>,
        client_id: impl Into<ClientId>,
        client_secret: impl Into<ClientSecret>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_uri: token_uri.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: Vec::new(),
            expiry: None,
        }
    }

    /// A credential without an expiry never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .map(|expiry| now + expiry_skew() >= expiry)
            .unwrap_or(false)
    }

    /// Files written without a scope list are assumed to carry the scopes
    /// they were loaded for.
    pub fn has_scopes(&self, required: &[String]) -> bool {
        self.scopes.is_empty() || required.iter().all(|scope| self.scopes.contains(scope))
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_ref()
            .is_some_and(|token| !token.is_empty())
    }

    pub fn status(&self, required: &[String], now: DateTime<Utc>) -> CredentialStatus {
        if !self.has_scopes(required) {
            CredentialStatus::MissingScopes
        } else if self.access_token.is_empty() || self.is_expired_at(now) {
            CredentialStatus::Expired
        } else {
            CredentialStatus::Valid
        }
    }

    /// Applies a token endpoint response to this credential. The previous
    /// refresh token is kept when the endpoint does not rotate it.
    pub fn refreshed(
        mut self,
        access_token: impl Into<AccessToken>,
        refresh_token: Option<RefreshToken>,
        expires_in: Option<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        self.access_token = access_token.into();
        if let Some(refresh_token) = refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        self.expiry = expires_in.map(|seconds| now + Duration::seconds(seconds));
        self
    }
}
