use std::thread::JoinHandle;
use std::cell::Cell;

use crate::version::Version;
use crate::updater::UpdaterExt;

use super::Error;

/// Handle to the game files installation running in the background
///
/// Progress reports downloaded bytes. Dropping the handle doesn't
/// cancel the installation
pub struct InstallUpdater {
    version: Version,
    is_update: bool,

    worker: Option<JoinHandle<Result<Version, Error>>>,
    worker_result: Option<Result<Version, Error>>,

    progress: flume::Receiver<(u64, u64)>,

    current: Cell<u64>,
    total: Cell<u64>
}

impl std::fmt::Debug for InstallUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallUpdater")
            .field("version", &self.version)
            .field("is_update", &self.is_update)
            .field("current", &self.current.get())
            .field("total", &self.total.get())
            .finish()
    }
}

impl InstallUpdater {
    pub(super) fn new(version: Version, is_update: bool, worker: JoinHandle<Result<Version, Error>>, progress: flume::Receiver<(u64, u64)>) -> Self {
        Self {
            version,
            is_update,

            worker: Some(worker),
            worker_result: None,

            progress,

            current: Cell::new(0),
            total: Cell::new(0)
        }
    }

    /// Version being installed
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether this is an update of an installed game or a fresh installation
    #[inline]
    pub fn is_update(&self) -> bool {
        self.is_update
    }

    fn join(worker: JoinHandle<Result<Version, Error>>) -> Result<Version, Error> {
        worker.join().unwrap_or(Err(Error::WorkerPanicked))
    }

    fn poll_progress(&self) {
        while let Ok((current, total)) = self.progress.try_recv() {
            self.current.set(current);
            self.total.set(total);
        }
    }
}

impl UpdaterExt for InstallUpdater {
    type Error = Error;
    type Status = bool;
    type Result = Version;

    fn status(&mut self) -> Result<Self::Status, &Self::Error> {
        if let Some(worker) = self.worker.take() {
            if !worker.is_finished() {
                self.worker = Some(worker);

                return Ok(false);
            }

            self.worker_result = Some(Self::join(worker));
        }

        match &self.worker_result {
            Some(Ok(_)) => Ok(true),
            Some(Err(err)) => Err(err),

            None => Ok(false)
        }
    }

    fn wait(mut self) -> Result<Self::Result, Self::Error> {
        if let Some(worker) = self.worker.take() {
            return Self::join(worker);
        }

        self.worker_result.take()
            .unwrap_or(Err(Error::WorkerPanicked))
    }

    #[inline]
    fn is_finished(&mut self) -> bool {
        matches!(self.status(), Ok(true) | Err(_))
    }

    #[inline]
    fn current(&self) -> u64 {
        self.poll_progress();

        self.current.get()
    }

    #[inline]
    fn total(&self) -> u64 {
        self.poll_progress();

        self.total.get()
    }
}
