use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{EmailAddress, Error, ModelId};

pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/";
pub const DEFAULT_GMAIL_URL: &str = "https://gmail.googleapis.com/gmail/v1/";

/// API key for the generation service
#[derive(
    Clone, Serialize, Deserialize, derive_more::From, derive_more::Deref, PartialEq, Eq, Hash, Debug,
)]
#[serde(transparent)]
pub struct ApiKey(String);

/// Run configuration, resolved once at process start and handed to every
/// component that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub base_path: PathBuf,
    pub token_path: PathBuf,
    pub client_secret_path: PathBuf,
    pub goals_path: PathBuf,
    pub log_dir: PathBuf,
    pub api_key: Option<ApiKey>,
    pub recipient: Option<EmailAddress>,
    pub sender: Option<EmailAddress>,
    pub coachee_name: String,
    pub model: ModelId,
    pub anthropic_url: Url,
    pub gmail_url: Url,
    pub max_search_uses: u32,
    pub max_tool_rounds: usize,
}

impl Environment {
    /// Builds the environment from a variable lookup. Blank values count as
    /// unset. Paths default to files inside `HERALD_HOME`, which itself
    /// defaults to `cwd`.
    pub fn from_lookup(
        cwd: PathBuf,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let base_path = get("HERALD_HOME").map(PathBuf::from).unwrap_or(cwd);
        let path = |name: &str, file: &str| {
            get(name)
                .map(PathBuf::from)
                .unwrap_or_else(|| base_path.join(file))
        };

        Ok(Self {
            token_path: path("HERALD_TOKEN_PATH", "token.json"),
            client_secret_path: path("HERALD_CLIENT_SECRET_PATH", "client_secret.json"),
            goals_path: path("HERALD_GOALS_PATH", "goals.md"),
            log_dir: get("HERALD_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| base_path.clone()),
            api_key: get("ANTHROPIC_API_KEY").map(ApiKey::from),
            recipient: get("RECIPIENT_EMAIL").map(EmailAddress::from),
            sender: get("SENDER_EMAIL").map(EmailAddress::from),
            coachee_name: get("HERALD_COACHEE_NAME").unwrap_or_else(|| "friend".to_string()),
            model: ModelId::new(
                get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ),
            anthropic_url: parse_url("ANTHROPIC_URL", get("ANTHROPIC_URL"), DEFAULT_ANTHROPIC_URL)?,
            gmail_url: parse_url("GMAIL_URL", get("GMAIL_URL"), DEFAULT_GMAIL_URL)?,
            max_search_uses: parse_number(
                "HERALD_MAX_SEARCH_USES",
                get("HERALD_MAX_SEARCH_USES"),
                15,
            )?,
            max_tool_rounds: parse_number(
                "HERALD_MAX_TOOL_ROUNDS",
                get("HERALD_MAX_TOOL_ROUNDS"),
                20,
            )?,
            base_path,
        })
    }

    pub fn api_key(&self) -> Result<&ApiKey, Error> {
        self.api_key.as_ref().ok_or(Error::MissingEnv("ANTHROPIC_API_KEY"))
    }

    pub fn recipient(&self) -> Result<&EmailAddress, Error> {
        self.recipient.as_ref().ok_or(Error::MissingEnv("RECIPIENT_EMAIL"))
    }

    /// Mail is sent from the recipient's own mailbox unless a sender is set.
    pub fn sender(&self) -> Result<&EmailAddress, Error> {
        match &self.sender {
            Some(sender) => Ok(sender),
            None => self.recipient(),
        }
    }

    pub fn scopes(&self) -> Vec<String> {
        vec![GMAIL_SEND_SCOPE.to_string()]
    }
}

/// Base URLs must end with `/` so relative paths join below them.
fn parse_url(name: &'static str, value: Option<String>, default: &str) -> Result<Url, Error> {
    let mut raw = value.unwrap_or_else(|| default.to_string());
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|_| Error::InvalidEnv { name, value: raw })
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, Error> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidEnv { name, value }),
        None => Ok(default),
    }
}
