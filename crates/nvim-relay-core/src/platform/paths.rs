//! Platform-specific paths and addresses.
//!
//! - The registry slot lives in the system temporary directory
//! - Server addresses are named pipes on Windows and socket files elsewhere

use crate::config::RelayConfig;
use std::path::PathBuf;

/// Get the default location of the registry slot.
///
/// # Platform Behavior
/// - **Linux/macOS**: `$TMPDIR/nvim-unity-server.txt` (usually `/tmp`)
/// - **Windows**: `%TEMP%\nvim-unity-server.txt`
pub fn registry_file_path() -> PathBuf {
    std::env::temp_dir().join(RelayConfig::REGISTRY_FILE_NAME)
}

/// Build the listen address for a server identified by `unique`.
///
/// # Platform Behavior
/// - **Windows**: `\\.\pipe\nvim-unity-{unique}`
/// - **Linux/macOS**: `$TMPDIR/nvim-unity-{unique}.sock`
pub fn server_address(unique: &str) -> String {
    #[cfg(windows)]
    {
        format!(r"\\.\pipe\{}{}", RelayConfig::ADDRESS_PREFIX, unique)
    }

    #[cfg(not(windows))]
    {
        std::env::temp_dir()
            .join(format!("{}{}.sock", RelayConfig::ADDRESS_PREFIX, unique))
            .to_string_lossy()
            .into_owned()
    }
}
