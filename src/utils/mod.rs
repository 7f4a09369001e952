//! Filesystem and checksum helpers shared by the packaging pipeline.

pub mod checksum;
pub mod fs;
