//! Zip writer.

use super::{ArchiveEntry, entry_mode};
use crate::error::{ArchiveError, ErrorExt, Result};
use std::fs::File;
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Write `entries` into a new `.zip` at `dest`.
pub(super) fn write_zip(entries: &[ArchiveEntry], dest: &Path, binary_name: &str) -> Result<()> {
    let zip_err = |source: zip::result::ZipError| ArchiveError::Zip {
        path: dest.to_path_buf(),
        source,
    };

    let file = File::create(dest).fs_context("creating zip archive", dest)?;
    let mut writer = zip::ZipWriter::new(file);

    for entry in entries {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(entry_mode(&entry.name, binary_name));

        writer
            .start_file(entry.name.as_str(), options)
            .map_err(zip_err)?;

        let mut src = File::open(&entry.path).fs_context("opening", &entry.path)?;
        std::io::copy(&mut src, &mut writer).fs_context("writing zip entry for", &entry.path)?;
    }

    writer.finish().map_err(zip_err)?;
    Ok(())
}
