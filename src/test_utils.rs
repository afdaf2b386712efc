//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory for testing.
///
/// Provides methods for creating files and directories. Everything is
/// removed when dropped.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add a directory, creating parent directories as needed.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Build a tree `width` entries wide and `depth` levels deep.
    ///
    /// Every level holds `width` files plus one subdirectory for the next level.
    pub fn populate(&self, width: usize, depth: usize) {
        let mut dir = String::new();
        for level in 0..depth {
            for i in 0..width {
                self.add_file(&format!("{}file_{}_{}.txt", dir, level, i), "content\n");
            }
            dir.push_str(&format!("level_{}/", level));
            self.add_dir(&dir);
        }
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}
