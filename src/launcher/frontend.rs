use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::version::Version;
use crate::status::LauncherStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Update {
    /// (archive path)
    DownloadingStarted(PathBuf),
    /// (current bytes, total bytes)
    DownloadingProgress(u64, u64),
    DownloadingFinished,

    /// (installation path)
    UnpackingStarted(PathBuf),
    /// (current bytes, total bytes)
    UnpackingProgress(u64, u64),
    UnpackingFinished
}

/// Display layer of the launcher
///
/// Methods can be called from the installation worker thread,
/// not only from the thread that owns the `Launcher`
pub trait LauncherFrontend: Send + Sync {
    /// Launcher status was changed. Action button's label is `status.label()`
    fn status_changed(&self, _status: LauncherStatus) {}

    /// Installed game version was read or updated
    fn version_changed(&self, _version: Version) {}

    fn progress(&self, _update: Update) {}

    /// Show error message to the user
    fn show_error(&self, _message: String) {}

    /// Game was started and the launcher should be closed
    fn close_requested(&self) {}
}

/// Headless frontend, ignores everything
impl LauncherFrontend for () {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LauncherEvent {
    StatusChanged(LauncherStatus),
    VersionChanged(Version),
    Progress(Update),
    Error(String),
    CloseRequested
}

/// Forward launcher events into the channel, so they can be
/// processed by the UI thread
impl LauncherFrontend for flume::Sender<LauncherEvent> {
    // Send errors only mean that the receiver is gone

    #[inline]
    fn status_changed(&self, status: LauncherStatus) {
        let _ = self.send(LauncherEvent::StatusChanged(status));
    }

    #[inline]
    fn version_changed(&self, version: Version) {
        let _ = self.send(LauncherEvent::VersionChanged(version));
    }

    #[inline]
    fn progress(&self, update: Update) {
        let _ = self.send(LauncherEvent::Progress(update));
    }

    #[inline]
    fn show_error(&self, message: String) {
        let _ = self.send(LauncherEvent::Error(message));
    }

    #[inline]
    fn close_requested(&self) {
        let _ = self.send(LauncherEvent::CloseRequested);
    }
}
