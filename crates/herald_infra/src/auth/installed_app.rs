use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, Utc};
use herald_domain::{
    AuthorizationCode, Authorizer, Credential, Error, OAuthClientConfig, PkceVerifier,
    RefreshToken, State,
};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{AuthType, CsrfToken, PkceCodeChallenge, PkceCodeVerifier, Scope, TokenResponse};
use url::Url;

use super::CallbackListener;

/// OAuth2 for installed applications: a consent page in the system browser
/// redirecting to a loopback listener, with PKCE.
///
/// Refreshing only needs the fields stored in the credential itself, so the
/// client configuration file is read only when consent is actually needed.
pub struct InstalledAppAuthorizer {
    client_secret_path: PathBuf,
    http: reqwest::Client,
    open_browser: bool,
}

/// The consent URL together with the secrets needed to finish the exchange.
#[derive(Debug, Clone)]
pub struct ConsentRequest {
    pub url: Url,
    pub state: State,
    pub verifier: PkceVerifier,
}

impl InstalledAppAuthorizer {
    pub fn new(client_secret_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            // Token endpoints must not redirect
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client_secret_path: client_secret_path.into(), http, open_browser: true })
    }

    /// Prints the consent URL without launching a browser.
    pub fn headless(mut self) -> Self {
        self.open_browser = false;
        self
    }

    pub async fn load_client_config(&self) -> anyhow::Result<OAuthClientConfig> {
        if !tokio::fs::try_exists(&self.client_secret_path).await? {
            return Err(Error::MissingClientConfig(self.client_secret_path.clone()).into());
        }
        let content = tokio::fs::read_to_string(&self.client_secret_path).await?;
        Ok(OAuthClientConfig::parse(&content)?)
    }

    /// Builds the consent page URL. `access_type=offline` and
    /// `prompt=consent` make the provider issue a refresh token every time.
    pub fn consent_request(
        config: &OAuthClientConfig,
        redirect_uri: &str,
        scopes: &[String],
    ) -> anyhow::Result<ConsentRequest> {
        let client = BasicClient::new(oauth2::ClientId::new(config.client_id.to_string()))
            .set_auth_uri(oauth2::AuthUrl::new(config.auth_url.to_string())?)
            .set_redirect_uri(oauth2::RedirectUrl::new(redirect_uri.to_string())?);

        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        let (url, state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(challenge)
            .url();

        Ok(ConsentRequest {
            url,
            state: State::from(state.secret().to_string()),
            verifier: PkceVerifier::from(verifier.secret().to_string()),
        })
    }

    /// Trades the authorization code for tokens at the configured token
    /// endpoint.
    pub async fn exchange(
        &self,
        config: &OAuthClientConfig,
        redirect_uri: &str,
        code: AuthorizationCode,
        verifier: PkceVerifier,
        scopes: &[String],
    ) -> anyhow::Result<Credential> {
        let client = BasicClient::new(oauth2::ClientId::new(config.client_id.to_string()))
            .set_client_secret(oauth2::ClientSecret::new(
                config.client_secret.as_str().to_string(),
            ))
            .set_auth_type(AuthType::RequestBody)
            .set_token_uri(oauth2::TokenUrl::new(config.token_url.to_string())?)
            .set_redirect_uri(oauth2::RedirectUrl::new(redirect_uri.to_string())?);

        let response = client
            .exchange_code(oauth2::AuthorizationCode::new(code.as_str().to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(verifier.as_str().to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| Error::Authorization(format!("code exchange failed: {e}")))?;

        let credential = Credential::new(
            response.access_token().secret().to_string(),
            config.token_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )
        .scopes(granted_scopes(&response, scopes));

        Ok(apply_token_response(credential, &response))
    }
}

#[async_trait::async_trait]
impl Authorizer for InstalledAppAuthorizer {
    async fn refresh(&self, credential: &Credential) -> anyhow::Result<Credential> {
        let refresh_token = credential
            .refresh_token
            .as_ref()
            .context("Credential has no refresh token")?;

        let client = BasicClient::new(oauth2::ClientId::new(credential.client_id.to_string()))
            .set_client_secret(oauth2::ClientSecret::new(
                credential.client_secret.as_str().to_string(),
            ))
            .set_auth_type(AuthType::RequestBody)
            .set_token_uri(oauth2::TokenUrl::new(credential.token_uri.to_string())?);

        let refresh_token = oauth2::RefreshToken::new(refresh_token.as_str().to_string());
        let response = client
            .exchange_refresh_token(&refresh_token)
            .request_async(&self.http)
            .await
            .map_err(|e| Error::Authorization(format!("token refresh failed: {e}")))?;

        Ok(apply_token_response(credential.clone(), &response))
    }

    async fn authorize(&self, scopes: &[String]) -> anyhow::Result<Credential> {
        let config = self.load_client_config().await?;
        let listener = CallbackListener::bind().await?;
        let redirect_uri = listener.redirect_uri();
        let request = Self::consent_request(&config, &redirect_uri, scopes)?;

        println!("Please visit this URL to authorize this application:\n{}\n", request.url);
        if self.open_browser
            && let Err(error) = open::that(request.url.as_str())
        {
            tracing::warn!(error = %error, "Failed to open browser, use the printed URL");
        }

        tracing::info!(port = listener.port(), "Waiting for OAuth callback");
        let code = listener.wait(&request.state).await?;
        self.exchange(&config, &redirect_uri, code, request.verifier, scopes).await
    }
}

fn apply_token_response(credential: Credential, response: &BasicTokenResponse) -> Credential {
    let expires_in = response
        .expires_in()
        .and_then(|duration| Duration::from_std(duration).ok())
        .map(|duration| duration.num_seconds());

    credential.refreshed(
        response.access_token().secret().to_string(),
        response
            .refresh_token()
            .map(|token| RefreshToken::from(token.secret().to_string())),
        expires_in,
        Utc::now(),
    )
}

/// The provider may omit the granted scopes, in which case the requested
/// ones are recorded.
fn granted_scopes(response: &BasicTokenResponse, requested: &[String]) -> Vec<String> {
    match response.scopes() {
        Some(granted) if !granted.is_empty() => {
            granted.iter().map(|scope| scope.as_str().to_string()).collect()
        }
        _ => requested.to_vec(),
    }
}
