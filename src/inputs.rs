//! Input file discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::AssetError;

/// Extensions picked up when walking directories for SVG inputs.
pub const SVG_EXTENSIONS: &[&str] = &["svg"];

/// Extensions picked up when walking directories for JPEG inputs.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Expand the given paths into a list of input files.
///
/// Files are taken as given. Directories are walked recursively, keeping files
/// whose extension is in `extensions` (case-insensitive), in path order.
/// Hidden files and ignore files are not special. Each file appears once, at
/// its first position.
pub fn collect_inputs<P: AsRef<Path>>(
    paths: &[P],
    extensions: &[&str],
) -> Result<Vec<PathBuf>, AssetError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|e| AssetError::file(path, e))?;

        if meta.is_dir() {
            for found in walk_dir(path, extensions)? {
                if seen.insert(found.clone()) {
                    files.push(found);
                }
            }
        } else if seen.insert(path.to_path_buf()) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn walk_dir(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, AssetError> {
    let mut files = Vec::new();

    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_some_and(|t| t.is_file()) && has_extension(entry.path(), extensions)
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}
