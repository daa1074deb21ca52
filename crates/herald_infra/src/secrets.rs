use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const TOKEN_SECRET_NAME: &str = "GMAIL_TOKEN_JSON_B64";
pub const CLIENT_SECRET_NAME: &str = "GMAIL_CLIENT_SECRET_JSON_B64";

/// One file encoded for a CI secret store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretExport {
    pub name: &'static str,
    pub path: PathBuf,
    /// `None` when the file does not exist.
    pub value: Option<String>,
}

/// Encodes the credential file and the client configuration as standard
/// base64, in that order.
pub async fn export_secrets(
    token_path: &Path,
    client_secret_path: &Path,
) -> anyhow::Result<Vec<SecretExport>> {
    let mut exports = Vec::with_capacity(2);
    for (name, path) in [(TOKEN_SECRET_NAME, token_path), (CLIENT_SECRET_NAME, client_secret_path)] {
        let value = if tokio::fs::try_exists(path).await? {
            Some(STANDARD.encode(tokio::fs::read(path).await?))
        } else {
            tracing::warn!(path = %path.display(), secret = name, "File not found, skipping");
            None
        };
        exports.push(SecretExport { name, path: path.to_path_buf(), value });
    }
    Ok(exports)
}
