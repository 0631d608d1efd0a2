//! Filesystem utilities

use std::path::Path;

use log::warn;

/// Check if a path exists
pub fn path_exists(path: &str) -> bool {
    Path::new(path).exists()
}

/// Check if a path points to a regular file
///
/// Logs a warning when the path exists but is something else (e.g. a directory).
pub fn is_file(path: &str) -> bool {
    let path = Path::new(path);
    if path.is_file() {
        return true;
    }
    if path.exists() {
        warn!("Expected a file but found something else: {}", path.display());
    }
    false
}
