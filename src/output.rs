//! Output directories and file writing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::AssetError;

/// Name of the folder compressed SVGs are written to.
pub const COMPRESSED_DIR_NAME: &str = "CompressedSVG";

/// `<dir of first input>/CompressedSVG`
pub fn compressed_output_dir(first_input: &Path) -> PathBuf {
    parent_dir(first_input).join(COMPRESSED_DIR_NAME)
}

/// `<Desktop>/CompressedSVG`, used when the primary folder can't be created.
pub fn fallback_output_dir() -> PathBuf {
    let desktop = dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .unwrap_or_else(|| PathBuf::from("Desktop"));
    desktop.join(COMPRESSED_DIR_NAME)
}

/// The directory a file lives in, `.` for bare file names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Create `primary`, or `fallback` if we lack permission for `primary`.
///
/// Returns the directory that was created. Errors other than permission
/// denied are not retried.
pub fn ensure_dir_with_fallback(primary: &Path, fallback: &Path) -> Result<PathBuf, AssetError> {
    create_dir_with_fallback(primary, fallback, |dir| fs::create_dir_all(dir))
}

fn create_dir_with_fallback<F>(
    primary: &Path,
    fallback: &Path,
    mut create: F,
) -> Result<PathBuf, AssetError>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    match create(primary) {
        Ok(()) => Ok(primary.to_path_buf()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            create(fallback).map_err(|e| AssetError::file(fallback, e))?;
            tracing::warn!(
                "No permission to create {}, writing to {} instead",
                primary.display(),
                fallback.display()
            );
            Ok(fallback.to_path_buf())
        }
        Err(e) => Err(AssetError::file(primary, e)),
    }
}

/// Create a directory and its parents.
pub fn ensure_dir(dir: &Path) -> Result<(), AssetError> {
    fs::create_dir_all(dir).map_err(|e| AssetError::file(dir, e))
}

/// Fail if `output` is the same file as `input`.
pub fn ensure_distinct(input: &Path, output: &Path) -> Result<(), AssetError> {
    let input = fs::canonicalize(input).map_err(|e| AssetError::file(input, e))?;
    match fs::canonicalize(output) {
        Ok(output) if output == input => Err(AssetError::WouldOverwrite(input)),
        _ => Ok(()),
    }
}

/// Write `contents` to `path`, tagging errors with the path.
pub fn write_output(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), AssetError> {
    fs::write(path, contents).map_err(|e| AssetError::file(path, e))
}
