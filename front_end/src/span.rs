//! Source spans
//!
//! Every AST node carries a span so later phases can point back at the
//! source code that produced it.

use std::fmt;

/// A region of source code, line/column based
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub source_file: Option<String>,
}

impl Span {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
            source_file: None,
        }
    }

    pub fn with_file(mut self, file: &str) -> Self {
        self.source_file = Some(file.to_string());
        self
    }

    /// Create a single-point span (for when we only have a position, not a range)
    pub fn point(line: usize, column: usize) -> Self {
        Self::new(line, column, line, column)
    }

    /// Combine two spans into one that encompasses both
    pub fn combine(&self, other: &Span) -> Self {
        let start_line = self.start_line.min(other.start_line);
        let start_column = if self.start_line < other.start_line {
            self.start_column
        } else if self.start_line > other.start_line {
            other.start_column
        } else {
            self.start_column.min(other.start_column)
        };

        let end_line = self.end_line.max(other.end_line);
        let end_column = if self.end_line > other.end_line {
            self.end_column
        } else if self.end_line < other.end_line {
            other.end_column
        } else {
            self.end_column.max(other.end_column)
        };

        Self {
            start_line,
            start_column,
            end_line,
            end_column,
            source_file: self.source_file.clone().or_else(|| other.source_file.clone()),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.source_file {
            write!(f, "{}:{}:{}", file, self.start_line, self.start_column)
        } else {
            write!(f, "{}:{}", self.start_line, self.start_column)
        }
    }
}
