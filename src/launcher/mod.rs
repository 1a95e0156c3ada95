use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, RwLock, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::LauncherConfig;
use crate::version::Version;
use crate::status::LauncherStatus;
use crate::network::{self, Transport, TransportExt};
use crate::archive;

pub mod frontend;
pub mod updater;

use frontend::{LauncherFrontend, Update};
use updater::InstallUpdater;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Network(#[from] network::Error),

    #[error("{0}")]
    Extraction(#[from] archive::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start {path:?}: {source}")]
    Launch {
        path: PathBuf,
        source: std::io::Error
    },

    #[error("Another game files installation is already in progress")]
    UpdateInProgress,

    #[error("Installation worker has panicked")]
    WorkerPanicked
}

/// Result of the finished archive downloading, passed to
/// `Launcher::on_download_completed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Version the downloaded archive belongs to
    pub version: Version,

    pub archive: PathBuf
}

#[derive(Debug)]
pub enum LaunchAction {
    /// Game process was started
    Launched {
        pid: u32,
        close_requested: bool
    },

    /// Last update has failed and the launcher has tried again.
    /// Contains installation handle if the new attempt started downloading
    Retrying(Option<InstallUpdater>),

    /// Last update has failed, but another installation is still
    /// holding the updates guard, so nothing was retried
    Busy,

    /// Game is being downloaded or its executable is missing
    Ignored
}

/// Releases installation slot when the worker finishes, even by panicking
struct TransferGuard<'a> {
    launcher: &'a Launcher
}

impl Drop for TransferGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!("{}", Error::WorkerPanicked);

            // Frontend callbacks are skipped here, the panic could come from them
            *self.launcher.inner.status.write().unwrap_or_else(PoisonError::into_inner) = LauncherStatus::Failed;
        }

        self.launcher.release_transfer();
    }
}

struct Inner {
    config: LauncherConfig,
    transport: Box<dyn TransportExt>,
    frontend: Box<dyn LauncherFrontend>,

    status: RwLock<LauncherStatus>,

    /// Amount of running installations
    transfers: AtomicUsize
}

/// Game updater and launcher
///
/// Cloned values share the same state
#[derive(Clone)]
pub struct Launcher {
    inner: Arc<Inner>
}

impl std::fmt::Debug for Launcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launcher")
            .field("config", &self.inner.config)
            .field("status", &self.status())
            .field("transfers", &self.inner.transfers.load(Ordering::Acquire))
            .finish()
    }
}

impl Launcher {
    /// Create launcher which uses `minreq` to access the network
    #[inline]
    pub fn new(config: LauncherConfig, frontend: impl LauncherFrontend + 'static) -> Self {
        let transport = Transport::new(config.timeout);

        Self::with_transport(config, transport, frontend)
    }

    pub fn with_transport(config: LauncherConfig, transport: impl TransportExt + 'static, frontend: impl LauncherFrontend + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                transport: Box::new(transport),
                frontend: Box::new(frontend),

                status: RwLock::new(LauncherStatus::default()),
                transfers: AtomicUsize::new(0)
            })
        }
    }

    #[inline]
    pub fn config(&self) -> &LauncherConfig {
        &self.inner.config
    }

    #[inline]
    pub fn status(&self) -> LauncherStatus {
        *self.inner.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    /// Check if some game files installation is running
    pub fn is_installing(&self) -> bool {
        self.inner.transfers.load(Ordering::Acquire) > 0
    }

    fn set_status(&self, status: LauncherStatus) {
        tracing::trace!(?status, "Updating launcher status");

        *self.inner.status.write().unwrap_or_else(PoisonError::into_inner) = status;

        self.inner.frontend.status_changed(status);
    }

    fn fail(&self, context: &str, err: &Error) {
        tracing::error!("{context}: {err}");

        self.set_status(LauncherStatus::Failed);

        self.inner.frontend.show_error(format!("{context}: {err}"));
    }

    /// Reserve installation slot. Fails if concurrent updates are
    /// guarded and another installation is running
    fn acquire_transfer(&self) -> bool {
        if self.inner.config.guard_concurrent_updates {
            self.inner.transfers.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire).is_ok()
        }

        else {
            self.inner.transfers.fetch_add(1, Ordering::AcqRel);

            true
        }
    }

    fn release_transfer(&self) {
        let _ = self.inner.transfers.fetch_update(Ordering::AcqRel, Ordering::Acquire, |transfers| {
            transfers.checked_sub(1)
        });
    }

    /// Read installed game version
    ///
    /// Return `None` if the version file doesn't exist
    pub fn installed_version(&self) -> std::io::Result<Option<Version>> {
        let path = self.inner.config.version_file_path();

        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(Version::parse(std::fs::read_to_string(path)?)))
    }

    #[tracing::instrument(level = "debug", skip(self), ret)]
    /// Fetch latest game version from the remote version marker
    pub fn latest_version(&self) -> Result<Version, Error> {
        let version = self.inner.transport.fetch_string(&self.inner.config.version_uri)?;

        Ok(Version::parse(version))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    /// Compare installed game version with the latest one and start
    /// game files installation if they differ
    ///
    /// Return installation handle if downloading was started.
    /// Otherwise launcher status is either `Ready` or `Failed`, or stays
    /// untouched when another installation holds the updates guard
    pub fn check_for_updates(&self) -> Option<InstallUpdater> {
        if self.inner.config.guard_concurrent_updates && self.is_installing() {
            tracing::warn!("Game files are already being installed, skipping updates check");

            return None;
        }

        let installed = match self.installed_version() {
            Ok(Some(version)) => version,

            Ok(None) => {
                tracing::debug!("Game is not installed");

                return self.install_game_files(false, Version::ZERO);
            }

            Err(err) => {
                self.fail("Error checking for game updates", &err.into());

                return None;
            }
        };

        self.inner.frontend.version_changed(installed);

        match self.latest_version() {
            Ok(latest) if latest.differs(&installed) => {
                tracing::info!("Game is outdated: {installed} -> {latest}");

                self.install_game_files(true, latest)
            }

            Ok(_) => {
                tracing::debug!("Game version is latest");

                self.set_status(LauncherStatus::Ready);

                None
            }

            Err(err) => {
                self.fail("Error checking for game updates", &err);

                None
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    /// Start downloading game archive in the background
    ///
    /// Fresh installation (`is_update == false`) fetches the latest
    /// version itself and ignores `latest`
    pub fn install_game_files(&self, is_update: bool, latest: Version) -> Option<InstallUpdater> {
        if !self.acquire_transfer() {
            tracing::warn!("{}", Error::UpdateInProgress);

            return None;
        }

        let latest = if is_update {
            self.set_status(LauncherStatus::DownloadingUpdate);

            latest
        }

        else {
            self.set_status(LauncherStatus::DownloadingGame);

            match self.latest_version() {
                Ok(version) => version,
                Err(err) => {
                    self.release_transfer();
                    self.fail("Error checking for game files", &err);

                    return None;
                }
            }
        };

        tracing::info!(is_update, "Installing game version {latest}");

        let (sender, receiver) = flume::unbounded();
        let launcher = self.clone();

        let worker = std::thread::Builder::new()
            .name(String::from("game-installer"))
            .spawn(move || {
                let _guard = TransferGuard {
                    launcher: &launcher
                };

                let result = launcher.download_archive(sender)
                    .map(|archive| DownloadOutcome {
                        version: latest,
                        archive
                    });

                launcher.finish_install(result)
            });

        match worker {
            Ok(worker) => Some(InstallUpdater::new(latest, is_update, worker, receiver)),

            Err(err) => {
                self.release_transfer();
                self.fail("Error checking for game files", &err.into());

                None
            }
        }
    }

    fn download_archive(&self, progress: flume::Sender<(u64, u64)>) -> Result<PathBuf, Error> {
        let config = &self.inner.config;
        let frontend = &self.inner.frontend;

        let archive = config.archive_path();

        frontend.progress(Update::DownloadingStarted(archive.clone()));

        self.inner.transport.download(&config.archive_uri, &archive, &|current, total| {
            // Installation handle could be dropped
            let _ = progress.send((current, total));

            frontend.progress(Update::DownloadingProgress(current, total));
        })?;

        frontend.progress(Update::DownloadingFinished);

        Ok(archive)
    }

    fn unpack_archive(&self, outcome: DownloadOutcome) -> Result<Version, Error> {
        let config = &self.inner.config;
        let frontend = &self.inner.frontend;

        let install_path = config.install_path();

        frontend.progress(Update::UnpackingStarted(install_path.clone()));

        archive::extract(&outcome.archive, &install_path, |current, total| {
            frontend.progress(Update::UnpackingProgress(current, total));
        })?;

        frontend.progress(Update::UnpackingFinished);

        std::fs::remove_file(&outcome.archive)?;
        std::fs::write(config.version_file_path(), outcome.version.to_string())?;

        Ok(outcome.version)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    /// Finish game files installation: unpack downloaded archive,
    /// remove it and store installed version
    ///
    /// Called once per started installation from its worker thread.
    /// On failure the version file stays untouched so the next
    /// updates check will try again. Partially unpacked files are not removed
    pub fn on_download_completed(&self, result: Result<DownloadOutcome, Error>) -> Result<Version, Error> {
        let result = self.finish_install(result);

        // Installation slot is held until the final status is set
        self.release_transfer();

        result
    }

    fn finish_install(&self, result: Result<DownloadOutcome, Error>) -> Result<Version, Error> {
        let result = result.and_then(|outcome| self.unpack_archive(outcome));

        match &result {
            Ok(version) => {
                tracing::info!("Game version {version} installed");

                self.inner.frontend.version_changed(*version);
                self.set_status(LauncherStatus::Ready);
            }

            Err(err) => self.fail("Error finishing download", err)
        }

        result
    }

    #[tracing::instrument(level = "debug", skip(self))]
    /// Handle launcher's action button click
    ///
    /// Start the game if it's ready, retry the update if it has failed,
    /// otherwise do nothing
    pub fn on_launch_requested(&self) -> Result<LaunchAction, Error> {
        let status = self.status();
        let executable = self.inner.config.executable_path();

        if status == LauncherStatus::Ready && executable.is_file() {
            tracing::info!("Starting {executable:?}");

            let child = Command::new(&executable)
                .current_dir(self.inner.config.install_path())
                .spawn();

            match child {
                Ok(child) => {
                    let close_requested = self.inner.config.close_on_launch;

                    if close_requested {
                        self.inner.frontend.close_requested();
                    }

                    Ok(LaunchAction::Launched {
                        pid: child.id(),
                        close_requested
                    })
                }

                Err(source) => {
                    let err = Error::Launch {
                        path: executable,
                        source
                    };

                    tracing::error!("{err}");

                    self.inner.frontend.show_error(err.to_string());

                    Err(err)
                }
            }
        }

        else if status == LauncherStatus::Failed && self.inner.config.guard_concurrent_updates && self.is_installing() {
            tracing::debug!("Failed installation is still finishing, retry skipped");

            Ok(LaunchAction::Busy)
        }

        else if status == LauncherStatus::Failed {
            tracing::debug!("Retrying failed update");

            Ok(LaunchAction::Retrying(self.check_for_updates()))
        }

        else {
            tracing::debug!(?status, "Launch request ignored");

            Ok(LaunchAction::Ignored)
        }
    }
}
