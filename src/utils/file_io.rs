use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::Result;
use crate::StorageConfig;

/// Creates a fresh, uniquely named data directory that outlives this call.
pub fn create_temp_data_dir(config: &StorageConfig) -> Result<PathBuf> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(&config.dir_prefix);

    let dir = match &config.temp_root {
        Some(root) => {
            std::fs::create_dir_all(root)?;
            builder.tempdir_in(root)?
        }
        None => builder.tempdir()?,
    };

    let path = dir.keep();
    debug!(?path, "created data directory");
    Ok(path)
}

/// Removes `path` and everything below it. A missing directory counts as removed.
pub async fn delete_dir_recursively(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Blocking variant of [`delete_dir_recursively`] for `Drop` paths.
pub fn delete_dir_recursively_blocking(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_dir_all(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
