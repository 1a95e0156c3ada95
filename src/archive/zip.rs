use std::path::{Path, PathBuf};
use std::fs::File;

use zip::ZipArchive;

use super::{Entry, Error};

pub struct Archive {
    path: PathBuf,
    archive: ZipArchive<File>
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl Archive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let archive = ZipArchive::new(File::open(&path)?)?;

        Ok(Self {
            path,
            archive
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// List archive entries
    ///
    /// Entries with unsafe paths (absolute or escaping the extraction folder) are skipped
    pub fn entries(&mut self) -> Result<Vec<Entry>, Error> {
        let mut entries = Vec::with_capacity(self.archive.len());

        for i in 0..self.archive.len() {
            let entry = self.archive.by_index(i)?;

            if let Some(path) = entry.enclosed_name() {
                entries.push(Entry {
                    path,
                    size: entry.size(),
                    is_dir: entry.is_dir()
                });
            }
        }

        Ok(entries)
    }

    /// Sum of uncompressed entries sizes
    #[inline]
    pub fn total_size(&mut self) -> Result<u64, Error> {
        Ok(self.entries()?.iter().map(|entry| entry.size).sum())
    }

    /// Extract archive's content into the folder, overwriting existing files
    ///
    /// Nothing is rolled back on failure, already unpacked files stay on the disk
    #[tracing::instrument(level = "debug", skip(progress, folder), fields(folder = ?folder.as_ref()))]
    pub fn extract(&mut self, folder: impl AsRef<Path>, progress: impl Fn(u64, u64)) -> Result<u64, Error> {
        let folder = folder.as_ref();
        let total = self.total_size()?;

        let mut unpacked = 0;

        std::fs::create_dir_all(folder)?;

        progress(0, total);

        for i in 0..self.archive.len() {
            let mut entry = self.archive.by_index(i)?;

            let Some(relative) = entry.enclosed_name() else {
                tracing::warn!("Skipping archive entry with unsafe path: {}", entry.name());

                continue;
            };

            let path = folder.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&path)?;

                continue;
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut file = File::create(&path)?;

            unpacked += std::io::copy(&mut entry, &mut file)?;

            set_permissions(&path, entry.unix_mode())?;

            progress(unpacked, total);
        }

        tracing::debug!(unpacked, "Archive extracted");

        Ok(unpacked)
    }
}

#[cfg(unix)]
fn set_permissions(path: &Path, mode: Option<u32>) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    match mode {
        Some(mode) => std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)),
        None => Ok(())
    }
}

#[cfg(not(unix))]
#[inline]
fn set_permissions(_path: &Path, _mode: Option<u32>) -> std::io::Result<()> {
    Ok(())
}
