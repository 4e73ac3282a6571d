//! Finding candidate files to lint

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never worth descending into
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "bin", "obj"];

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonc"))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// JSON files under `paths`, sorted and deduplicated
///
/// Files named explicitly are kept whatever their extension.
pub fn discover(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_skipped_dir(entry))
        {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_json(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable path: {}", e),
            }
        }
    }

    files.sort();
    files.dedup();
    files
}
