use std::path::{Path, PathBuf};

use anyhow::Context;
use herald_domain::{Credential, CredentialRepository};

/// Stores the credential as an authorized-user JSON file.
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CredentialRepository for CredentialFile {
    async fn read(&self) -> anyhow::Result<Option<Credential>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let credential = serde_json::from_str(&content)
            .with_context(|| format!("Malformed credential file {}", self.path.display()))?;
        Ok(Some(credential))
    }

    /// Writes a sibling temp file and renames it over the target, so readers
    /// never observe a partially written credential.
    async fn write(&self, credential: &Credential) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(credential)?;
        let temp = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp, content)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        restrict_permissions(&temp).await?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "Credential saved");
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}
