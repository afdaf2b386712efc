//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Print the `N directories, M files` line after a tree
    pub show_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: false,
            show_report: true,
        }
    }
}

impl OutputConfig {
    pub fn plain() -> Self {
        Self::default()
    }
}
