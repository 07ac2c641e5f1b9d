//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here rather than being
//! scattered through the coordination logic.
//!
//! - `paths` - Registry slot location and server address format

pub mod paths;

pub use paths::{registry_file_path, server_address};
