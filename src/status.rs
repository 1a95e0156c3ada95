use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LauncherStatus {
    /// Game is installed and up to date
    Ready,

    /// Last update attempt has failed, next launch request will retry it
    Failed,

    /// Game is not installed and is being downloaded
    DownloadingGame,

    /// Installed game is outdated and its update is being downloaded
    DownloadingUpdate
}

impl Default for LauncherStatus {
    #[inline]
    fn default() -> Self {
        Self::Ready
    }
}

impl LauncherStatus {
    #[inline]
    pub fn list() -> &'static [LauncherStatus] {
        &[
            Self::Ready,
            Self::Failed,
            Self::DownloadingGame,
            Self::DownloadingUpdate
        ]
    }

    /// Label of the launcher's action button
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready             => "Launch Game",
            Self::Failed            => "Update Failed - Retry",
            Self::DownloadingGame   => "Downloading Game",
            Self::DownloadingUpdate => "Downloading Update"
        }
    }

    #[inline]
    pub fn is_downloading(&self) -> bool {
        matches!(self, Self::DownloadingGame | Self::DownloadingUpdate)
    }
}

impl std::fmt::Display for LauncherStatus {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
