//! File system utilities for packaging.
//!
//! Every I/O failure is reported with the path it happened on.

use crate::error::{ErrorExt, PackagerError, Result};
use std::path::Path;
use tokio::fs;

/// Deletes `path` recursively if it exists, then creates it empty.
pub async fn recreate_dir(path: &Path) -> Result<()> {
    remove_dir_all(path).await?;
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Creates `path` and any missing parents; a no-op if it already exists.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .await
            .fs_context("removing directory", path)
    } else {
        Ok(())
    }
}

/// Copies a regular file, overwriting the destination.
///
/// Fails if the source path is not a regular file.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(PackagerError::MissingFile {
            path: from.to_path_buf(),
        });
    }
    fs::copy(from, to).await.fs_context("copying file to", to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recreate_dir_clears_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        std::fs::create_dir_all(dir.join("stale")).unwrap();
        std::fs::write(dir.join("stale/old.tar.gz"), b"old").unwrap();

        recreate_dir(&dir).await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_copy_file_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("README.md");
        let dst = tmp.path().join("copy.md");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dst, b"old").unwrap();

        copy_file(&src, &dst).await.unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_copy_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = copy_file(&tmp.path().join("LICENSE.md"), &tmp.path().join("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PackagerError::MissingFile { .. }));
    }
}
