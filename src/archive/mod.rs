use std::path::{Path, PathBuf};

pub mod zip;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read zip archive: {0}")]
    Zip(#[from] ::zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Path relative to the extraction folder
    pub path: PathBuf,

    /// Uncompressed size, in bytes
    pub size: u64,

    pub is_dir: bool
}

/// Open the zip archive and extract its content into the given folder,
/// overwriting already existing files
///
/// `progress` receives (unpacked bytes, total bytes).
/// Return total amount of unpacked bytes
#[inline]
pub fn extract(archive: impl AsRef<Path>, extract_to: impl AsRef<Path>, progress: impl Fn(u64, u64)) -> Result<u64, Error> {
    zip::Archive::open(archive)?.extract(extract_to, progress)
}
