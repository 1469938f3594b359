//! Line/column positions for display.

use std::fmt;
use std::path::PathBuf;

/// A span resolved to 1-indexed line and column coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path (or synthetic name) of the file.
    pub path: PathBuf,
    /// Line of the span start.
    pub line: u32,
    /// Column of the span start.
    pub column: u32,
    /// Line of the last byte of the span.
    pub end_line: u32,
    /// Column of the last byte of the span.
    pub end_column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}
