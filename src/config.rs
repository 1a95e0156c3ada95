use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Folder all the other paths are relative to
    pub root_path: PathBuf,

    pub version_file: PathBuf,
    pub archive_file: PathBuf,
    pub install_folder: PathBuf,

    /// Relative to the `install_folder`
    pub executable: PathBuf,

    pub version_uri: String,
    pub archive_uri: String,

    /// Network requests timeout, in seconds. No timeout by default
    pub timeout: Option<u64>,

    /// Ask the frontend to close the launcher after the game was started
    pub close_on_launch: bool,

    /// Refuse to start new update while another one is downloading
    pub guard_concurrent_updates: bool
}

impl Default for LauncherConfig {
    #[inline]
    fn default() -> Self {
        Self::new(".")
    }
}

impl LauncherConfig {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),

            version_file: PathBuf::from(VERSION_FILE),
            archive_file: PathBuf::from(ARCHIVE_FILE),
            install_folder: PathBuf::from(INSTALL_FOLDER),
            executable: PathBuf::from(EXECUTABLE),

            version_uri: VERSION_URI.to_string(),
            archive_uri: ARCHIVE_URI.to_string(),

            timeout: None,
            close_on_launch: false,
            guard_concurrent_updates: true
        }
    }

    /// Use process's working directory as the root folder
    #[inline]
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Load config from the json file
    ///
    /// Missing fields are taken from `LauncherConfig::default`
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        tracing::debug!("Loading launcher config from {path:?}");

        let config = std::fs::read(path)?;

        Ok(serde_json::from_slice(&config)?)
    }

    #[inline]
    pub fn with_version_uri(self, version_uri: impl ToString) -> Self {
        Self {
            version_uri: version_uri.to_string(),
            ..self
        }
    }

    #[inline]
    pub fn with_archive_uri(self, archive_uri: impl ToString) -> Self {
        Self {
            archive_uri: archive_uri.to_string(),
            ..self
        }
    }

    #[inline]
    pub fn with_executable(self, executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..self
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
    pub fn with_close_on_launch(self, close_on_launch: bool) -> Self {
        Self {
            close_on_launch,
            ..self
        }
    }

    #[inline]
    pub fn with_concurrent_updates_guard(self, guard_concurrent_updates: bool) -> Self {
        Self {
            guard_concurrent_updates,
            ..self
        }
    }

    #[inline]
    pub fn version_file_path(&self) -> PathBuf {
        self.root_path.join(&self.version_file)
    }

    #[inline]
    pub fn archive_path(&self) -> PathBuf {
        self.root_path.join(&self.archive_file)
    }

    #[inline]
    pub fn install_path(&self) -> PathBuf {
        self.root_path.join(&self.install_folder)
    }

    #[inline]
    pub fn executable_path(&self) -> PathBuf {
        self.install_path().join(&self.executable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        let config = LauncherConfig::new("/opt/launcher");

        assert_eq!(config.version_file_path(), Path::new("/opt/launcher/Version.txt"));
        assert_eq!(config.archive_path(), Path::new("/opt/launcher/Build.zip"));
        assert_eq!(config.install_path(), Path::new("/opt/launcher/Build"));
        assert_eq!(config.executable_path(), Path::new("/opt/launcher/Build/testApp.exe"));
    }

    #[test]
    fn from_file() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let path = root.path().join("launcher.json");

        std::fs::write(&path, r#"{
            "root_path": "/games/example",
            "executable": "example.x86_64",
            "close_on_launch": true
        }"#)?;

        let config = LauncherConfig::from_file(&path)?;

        assert_eq!(config.executable_path(), Path::new("/games/example/Build/example.x86_64"));
        assert_eq!(config.version_uri, VERSION_URI);
        assert_eq!(config.timeout, None);
        assert!(config.close_on_launch);
        assert!(config.guard_concurrent_updates);

        Ok(())
    }

    #[test]
    fn from_broken_file() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let path = root.path().join("launcher.json");

        std::fs::write(&path, "not a json")?;

        assert!(LauncherConfig::from_file(&path).is_err());
        assert!(LauncherConfig::from_file(root.path().join("missing.json")).is_err());

        Ok(())
    }
}
