use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use zip::write::SimpleFileOptions;

use crate::network::{self, TransportExt};
use crate::version::Version;
use crate::status::LauncherStatus;
use crate::launcher::frontend::{LauncherFrontend, LauncherEvent, Update};


/// In-memory transport serving the version marker and the game archive
#[derive(Debug, Default)]
pub struct FakeTransport {
    /// `None` makes the version request fail
    pub version: Mutex<Option<String>>,

    /// `None` makes the archive download fail
    pub archive: Mutex<Option<Vec<u8>>>,

    /// Downloads wait for a message from this channel before writing the archive
    pub gate: Option<flume::Receiver<()>>,

    pub version_requests: AtomicUsize,
    pub downloads: AtomicUsize
}

impl FakeTransport {
    pub fn new(version: Option<&str>, archive: Option<Vec<u8>>) -> Self {
        Self {
            version: Mutex::new(version.map(String::from)),
            archive: Mutex::new(archive),

            ..Self::default()
        }
    }

    pub fn with_gate(self, gate: flume::Receiver<()>) -> Self {
        Self {
            gate: Some(gate),
            ..self
        }
    }

    pub fn set_version(&self, version: Option<&str>) {
        *self.version.lock().unwrap() = version.map(String::from);
    }

    pub fn version_requests(&self) -> usize {
        self.version_requests.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

impl TransportExt for Arc<FakeTransport> {
    fn fetch_string(&self, _uri: &str) -> Result<String, network::Error> {
        self.version_requests.fetch_add(1, Ordering::SeqCst);

        self.version.lock().unwrap()
            .clone()
            .ok_or_else(|| network::Error::Status(404, String::from("Not Found")))
    }

    fn download(&self, _uri: &str, path: &Path, progress: &dyn Fn(u64, u64)) -> Result<(), network::Error> {
        self.downloads.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let _ = gate.recv();
        }

        let archive = self.archive.lock().unwrap()
            .clone()
            .ok_or_else(|| network::Error::Status(404, String::from("Not Found")))?;

        std::fs::write(path, &archive)?;

        progress(archive.len() as u64, archive.len() as u64);

        Ok(())
    }
}

/// Build zip archive in memory. Files are created with `0o755` permissions
pub fn make_archive(files: &[(&str, &str)]) -> anyhow::Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));

    let options = SimpleFileOptions::default()
        .unix_permissions(0o755);

    for (name, content) in files {
        writer.start_file(*name, options)?;
        writer.write_all(content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Frontend forwarding events into the channel, which stops on the first
/// event matching `block_on` until the gate receives a message
pub struct BlockingFrontend {
    pub events: flume::Sender<LauncherEvent>,

    /// Notified when the frontend has stopped
    pub entered: flume::Sender<()>,
    pub gate: flume::Receiver<()>,

    pub block_on: Box<dyn Fn(&LauncherEvent) -> bool + Send + Sync>,
    pub armed: AtomicBool
}

impl BlockingFrontend {
    fn handle(&self, event: LauncherEvent) {
        if (self.block_on)(&event) && self.armed.swap(false, Ordering::SeqCst) {
            let _ = self.entered.send(());
            let _ = self.gate.recv();
        }

        let _ = self.events.send(event);
    }
}

impl LauncherFrontend for BlockingFrontend {
    fn status_changed(&self, status: LauncherStatus) {
        self.handle(LauncherEvent::StatusChanged(status));
    }

    fn version_changed(&self, version: Version) {
        self.handle(LauncherEvent::VersionChanged(version));
    }

    fn progress(&self, update: Update) {
        self.handle(LauncherEvent::Progress(update));
    }

    fn show_error(&self, message: String) {
        self.handle(LauncherEvent::Error(message));
    }

    fn close_requested(&self) {
        self.handle(LauncherEvent::CloseRequested);
    }
}

/// Frontend which panics when the archive is unpacked
pub struct PanickingFrontend;

impl LauncherFrontend for PanickingFrontend {
    fn progress(&self, update: Update) {
        if update == Update::UnpackingFinished {
            panic!("frontend failed to render unpacking progress");
        }
    }
}
