use std::path::{Path, PathBuf};

use herald_domain::Environment;

/// Resolves the run configuration for `cwd`.
///
/// `.env` files in `cwd` and its ancestors are loaded first. Variables that
/// are already set are never overwritten, so the process environment wins over
/// every file and a closer file wins over a more distant one.
pub fn load_environment(cwd: &Path) -> anyhow::Result<Environment> {
    load_all(cwd);
    Ok(Environment::from_lookup(cwd.to_path_buf(), |name| std::env::var(name).ok())?)
}

fn load_all(cwd: &Path) {
    let mut paths = vec![];
    let mut current = PathBuf::new();

    for component in cwd.components() {
        current.push(component);
        paths.push(current.clone());
    }

    paths.reverse();

    for path in paths {
        let env_file = path.join(".env");
        if env_file.is_file() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => tracing::debug!(path = %env_file.display(), "Loaded env file"),
                Err(error) => {
                    tracing::warn!(path = %env_file.display(), error = %error, "Skipping unreadable env file")
                }
            }
        }
    }
}
