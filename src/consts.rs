/// Text resource with the latest game version, `major.minor.patch`
pub const VERSION_URI: &str = "https://drive.google.com/uc?id=1eTrK-nWdsoE5LW3vq-ffZ5KVSJAOon2U&export=download";

/// Zip archive with the latest game build
pub const ARCHIVE_URI: &str = "https://www.dropbox.com/s/34jjyctywi3jnwd/testApp.zip?dl=1";

/// Local version file name, relative to the launcher's root folder
pub const VERSION_FILE: &str = "Version.txt";

/// Downloaded archive name, relative to the launcher's root folder.
/// Removed after unpacking
pub const ARCHIVE_FILE: &str = "Build.zip";

/// Game installation folder name, relative to the launcher's root folder
pub const INSTALL_FOLDER: &str = "Build";

/// Game executable name, relative to the installation folder
pub const EXECUTABLE: &str = "testApp.exe";
