// Cache path utilities.
// Resolves the cache directory and maps store keys to file names.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/article-feed on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "article-feed").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the file backing a store key.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_name(key)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' => '_',
            _ => c,
        })
        .collect()
}
