//! Path walking
//!
//! This module turns a root path into a lazy, pre-order sequence of
//! [`WalkEntry`] values:
//!
//! - `Walker`: holds a [`WalkerConfig`] and starts independent walks
//! - `Walk`: the iterator itself, with depth limits, filters and symlink cycle detection

mod config;
mod utils;
mod walker;

// Re-export public types
pub use config::WalkerConfig;
pub use utils::{glob_match, should_ignore_path};
pub use walker::{Walk, WalkEntry, Walker, walk};
