pub mod consts;
pub mod config;
pub mod version;
pub mod status;
pub mod updater;
pub mod network;
pub mod archive;
pub mod launcher;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use super::consts::*;
    pub use super::config::LauncherConfig;
    pub use super::version::Version;
    pub use super::status::LauncherStatus;
    pub use super::updater::UpdaterExt;
    pub use super::network::{Transport, TransportExt};

    pub use super::launcher::{
        Launcher,
        LaunchAction,
        DownloadOutcome,
        Error as LauncherError
    };

    pub use super::launcher::frontend::{
        LauncherFrontend,
        LauncherEvent,
        Update as LauncherUpdate
    };

    pub use super::launcher::updater::InstallUpdater;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
