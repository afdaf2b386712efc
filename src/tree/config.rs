//! Configuration types for the path walker

use std::time::SystemTime;

/// Configuration for tree walking behavior.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Deepest level yielded; a directory at this level is not descended.
    pub max_depth: Option<usize>,
    pub dirs_only: bool,
    pub ignore_patterns: Vec<String>,
    /// Descend into symlinked directories (cycles are never descended)
    pub follow_symlinks: bool,
    /// Only include files modified after this time
    pub newer_than: Option<SystemTime>,
    /// Only include files modified before this time
    pub older_than: Option<SystemTime>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            dirs_only: false,
            ignore_patterns: Vec::new(),
            follow_symlinks: true,
            newer_than: None,
            older_than: None,
        }
    }
}
