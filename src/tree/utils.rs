//! Shared utility functions for tree walking

use std::path::Path;

use glob::Pattern;

use super::config::WalkerConfig;

/// Check if a path should be ignored based on its name and the ignore patterns.
pub fn should_ignore_path(path: &Path, ignore_patterns: &[String]) -> bool {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    ignore_patterns
        .iter()
        .any(|pattern| name == *pattern || glob_match(pattern, &name))
}

/// Match a glob pattern against a name.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}

/// Check if a child entry passes the walker's filters.
///
/// `is_dir` follows symlinks, so a link to a directory counts as a directory.
pub fn should_include_path(path: &Path, is_dir: bool, config: &WalkerConfig) -> bool {
    if should_ignore_path(path, &config.ignore_patterns) {
        return false;
    }
    if is_dir {
        return true;
    }
    if config.dirs_only {
        return false;
    }
    passes_time_filter(path, config)
}

/// Check if a file passes the time filter based on its modification time.
pub fn passes_time_filter(path: &Path, config: &WalkerConfig) -> bool {
    if config.newer_than.is_none() && config.older_than.is_none() {
        return true;
    }

    let mtime = match path.symlink_metadata().and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return true, // unreadable entries still show up as placeholders
    };

    if let Some(newer) = config.newer_than {
        if mtime < newer {
            return false;
        }
    }

    if let Some(older) = config.older_than {
        if mtime > older {
            return false;
        }
    }

    true
}
