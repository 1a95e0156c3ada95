use std::path::Path;

pub mod downloader;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch data: {0}")]
    Minreq(#[from] minreq::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server responded with status {0} {1}")]
    Status(i32, String),

    #[error("Response is not a valid utf-8 text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error)
}

/// Network access used by the launcher
///
/// `Transport` is the default implementation; anything else
/// (mirrors, local files, test fakes) can be plugged into the launcher
pub trait TransportExt: Send + Sync {
    /// Fetch text content of the URI into memory
    fn fetch_string(&self, uri: &str) -> Result<String, Error>;

    /// Download URI content and save it as `path`
    ///
    /// `progress` receives (downloaded bytes, total bytes).
    /// Total is `0` when the content size is unknown
    fn download(&self, uri: &str, path: &Path, progress: &dyn Fn(u64, u64)) -> Result<(), Error>;
}

/// HTTP(S) transport based on `minreq`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Transport {
    /// Requests timeout, in seconds
    pub timeout: Option<u64>
}

impl Transport {
    #[inline]
    pub fn new(timeout: Option<u64>) -> Self {
        Self {
            timeout
        }
    }
}

impl TransportExt for Transport {
    #[tracing::instrument(level = "trace", skip(self))]
    fn fetch_string(&self, uri: &str) -> Result<String, Error> {
        let mut request = minreq::get(uri);

        if let Some(timeout) = self.timeout {
            request = request.with_timeout(timeout);
        }

        let response = request.send()?;

        if !(200..300).contains(&response.status_code) {
            return Err(Error::Status(response.status_code, response.reason_phrase));
        }

        Ok(String::from_utf8(response.into_bytes())?)
    }

    #[inline]
    fn download(&self, uri: &str, path: &Path, progress: &dyn Fn(u64, u64)) -> Result<(), Error> {
        downloader::Downloader::new(uri)
            .with_timeout(self.timeout)
            .download(path, progress)
    }
}
