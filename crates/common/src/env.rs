//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories and data files exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure expected directories exist; warn on missing optional ones.
pub async fn ensure_dirs(public_dir: &str, dirs: &[&str]) -> anyhow::Result<()> {
    if tokio::fs::metadata(public_dir).await.is_err() {
        warn!(%public_dir, "public directory not found; creating it");
    }
    tokio::fs::create_dir_all(public_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {public_dir}: {e}"))?;
    for dir in dirs {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    }
    Ok(())
}

/// Seed a JSON document holding an empty array when `path` does not exist.
///
/// Stores never create their backing file themselves, so the server does it
/// once before handing paths to them. Existing files are left untouched.
pub async fn ensure_json_array_file(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    if tokio::fs::try_exists(path).await? {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }
    tokio::fs::write(path, b"[]")
        .await
        .map_err(|e| anyhow::anyhow!("cannot seed {}: {e}", path.display()))?;
    info!(path = %path.display(), "seeded empty data file");
    Ok(())
}
