//! Release archive creation.
//!
//! Each per-target directory is packed flat (files at the archive root, no
//! enclosing folder) into either a zip or a gzipped tarball. The choice is a
//! pure function of the target OS: Windows and macOS get zip, everything else
//! gets tar.gz.
//!
//! Output is deterministic: entries are added in file-name order and carry
//! fixed timestamps and ownership, so identical inputs produce byte-identical
//! archives.

mod tarball;
mod zip_archive;

use crate::error::{ArchiveError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Permission bits for the executable entry
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Permission bits for every other entry
pub const REGULAR_MODE: u32 = 0o644;

/// Supported archive formats
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ArchiveFormat {
    /// `.zip`, used for Windows and macOS targets
    Zip,
    /// `.tar.gz`, used for every other target
    TarGz,
}

impl ArchiveFormat {
    /// Pick the archive format for a target OS identifier (case-insensitive).
    pub fn for_os(os: &str) -> Self {
        if os.eq_ignore_ascii_case("windows") || os.eq_ignore_ascii_case("darwin") {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::TarGz
        }
    }

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Permission bits stored for an archive entry.
///
/// Only the entry named exactly `binary_name` is executable; a Windows
/// `<name>.exe` is not an exact match and stays `0644`.
pub fn entry_mode(entry_name: &str, binary_name: &str) -> u32 {
    if entry_name == binary_name {
        EXECUTABLE_MODE
    } else {
        REGULAR_MODE
    }
}

/// A file to be stored at the archive root
#[derive(Debug, Clone)]
pub(crate) struct ArchiveEntry {
    /// Name inside the archive
    pub name: String,
    /// Path on disk
    pub path: PathBuf,
}

/// List the top-level files of `dir`, sorted by name.
///
/// Archiving is non-recursive; subdirectories and other non-file entries
/// are skipped.
pub(crate) fn collect_entries(dir: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            log::warn!("Skipping non-file entry {}", entry.path().display());
            continue;
        }

        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| ArchiveError::NonUtf8Name {
                path: entry.path().to_path_buf(),
            })?
            .to_string();

        entries.push(ArchiveEntry {
            name,
            path: entry.into_path(),
        });
    }

    Ok(entries)
}

/// Archive the top-level files of `source_dir` into `dest`.
///
/// Returns the number of entries written. The blocking archive writers run on
/// tokio's blocking pool.
pub async fn create_archive(
    format: ArchiveFormat,
    source_dir: &Path,
    dest: &Path,
    binary_name: &str,
) -> Result<usize> {
    let source_dir = source_dir.to_path_buf();
    let dest_path = dest.to_path_buf();
    let binary_name = binary_name.to_string();

    log::debug!(
        "Archiving {} into {} ({})",
        source_dir.display(),
        dest_path.display(),
        format
    );

    let task_dest = dest_path.clone();
    tokio::task::spawn_blocking(move || -> Result<usize> {
        let entries = collect_entries(&source_dir)?;
        match format {
            ArchiveFormat::Zip => zip_archive::write_zip(&entries, &task_dest, &binary_name)?,
            ArchiveFormat::TarGz => tarball::write_tar_gz(&entries, &task_dest, &binary_name)?,
        }
        Ok(entries.len())
    })
    .await
    .map_err(|e| ArchiveError::TaskFailed {
        path: dest_path,
        reason: e.to_string(),
    })?
}
