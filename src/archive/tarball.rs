//! Gzipped tarball writer.

use super::{ArchiveEntry, entry_mode};
use crate::error::{ErrorExt, Result};
use flate2::{Compression, write::GzEncoder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tar::HeaderMode;

/// Write `entries` into a new `.tar.gz` at `dest`.
///
/// Headers use deterministic metadata; permission bits are replaced by
/// [`entry_mode`] so the binary is `0755` and everything else `0644`.
pub(super) fn write_tar_gz(entries: &[ArchiveEntry], dest: &Path, binary_name: &str) -> Result<()> {
    let file = File::create(dest).fs_context("creating tar.gz archive", dest)?;
    let enc = GzEncoder::new(file, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for entry in entries {
        let metadata =
            std::fs::metadata(&entry.path).fs_context("reading metadata of", &entry.path)?;

        let mut header = tar::Header::new_gnu();
        header.set_metadata_in_mode(&metadata, HeaderMode::Deterministic);
        header.set_mode(entry_mode(&entry.name, binary_name));

        let mut file = File::open(&entry.path).fs_context("opening", &entry.path)?;
        tar.append_data(&mut header, &entry.name, &mut file)
            .fs_context("appending to tar.gz archive", dest)?;
    }

    let enc = tar.into_inner().fs_context("finishing tar stream", dest)?;
    let mut finished = enc.finish().fs_context("finishing gzip stream", dest)?;
    finished.flush().fs_context("flushing", dest)?;
    Ok(())
}
