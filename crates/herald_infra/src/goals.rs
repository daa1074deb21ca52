use std::path::Path;

use anyhow::Context;
use herald_domain::Error;

/// Reads the coaching goals document.
pub async fn load_goals(path: &Path) -> anyhow::Result<String> {
    if !tokio::fs::try_exists(path).await? {
        return Err(Error::MissingFile(path.to_path_buf()).into());
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}
