use std::path::Path;
use std::fs::File;
use std::io::Write;

use super::Error;

/// Default downloading chunk size, in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloader {
    uri: String,
    timeout: Option<u64>,

    /// Amount of bytes stored in memory before writing them onto the disk
    pub chunk_size: usize
}

impl Downloader {
    #[inline]
    pub fn new(uri: impl AsRef<str>) -> Self {
        Self {
            uri: uri.as_ref().to_string(),
            timeout: None,
            chunk_size: DEFAULT_CHUNK_SIZE
        }
    }

    #[inline]
    pub fn with_timeout(self, timeout: Option<u64>) -> Self {
        Self {
            timeout,
            ..self
        }
    }

    #[inline]
    pub fn with_chunk_size(self, chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            ..self
        }
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Download URI content and save it as `download_path`, overwriting existing file
    ///
    /// `progress` receives (downloaded bytes, total bytes)
    #[tracing::instrument(level = "debug", skip(progress))]
    pub fn download(&self, download_path: impl AsRef<Path> + std::fmt::Debug, progress: impl Fn(u64, u64)) -> Result<(), Error> {
        let mut request = minreq::get(&self.uri);

        if let Some(timeout) = self.timeout {
            request = request.with_timeout(timeout);
        }

        let mut response = request.send_lazy()?;

        if !(200..300).contains(&response.status_code) {
            return Err(Error::Status(response.status_code, response.reason_phrase.clone()));
        }

        let content_size = response.headers.get("content-length")
            .and_then(|value| value.parse::<u64>().ok());

        let hint = response.size_hint();
        let total = content_size.unwrap_or(hint.1.unwrap_or(hint.0) as u64);

        tracing::debug!(?content_size, "Downloading {}", self.uri);

        let mut file = File::create(download_path.as_ref())?;

        let mut buffer = Vec::with_capacity(self.chunk_size);
        let mut downloaded = 0u64;

        progress(0, total);

        for byte in response.by_ref() {
            let (byte, _) = byte?;

            buffer.push(byte);

            if buffer.len() == self.chunk_size {
                file.write_all(&buffer)?;

                downloaded += buffer.len() as u64;
                buffer.clear();

                progress(downloaded, total.max(downloaded));
            }
        }

        file.write_all(&buffer)?;
        file.flush()?;

        downloaded += buffer.len() as u64;

        progress(downloaded, total.max(downloaded));

        tracing::debug!(downloaded, "Downloading finished");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_size() {
        assert_eq!(Downloader::new("https://example.com").chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(Downloader::new("https://example.com").with_chunk_size(0).chunk_size, 1);
        assert_eq!(Downloader::new("https://example.com").with_chunk_size(4096).chunk_size, 4096);
    }

    #[test]
    fn invalid_uri() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let path = root.path().join("archive.zip");

        let result = Downloader::new("not a uri")
            .download(&path, |_, _| {});

        assert!(result.is_err());
        assert!(!path.exists());

        Ok(())
    }
}
