//! Diagnostic system
//!
//! This module provides a unified system for error reporting across all
//! phases that consume the AST.

use crate::span::Span;
use colored::Colorize;
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Error - prevents the run from succeeding
    Error,
    /// Warning - allows the run but indicates potential issues
    Warning,
    /// Hint - suggestions for improvement
    Hint,
    /// Note - additional information
    Note,
}

/// A diagnostic message with source information and suggestions
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,

    /// Primary message
    pub message: String,

    /// Optional detailed explanation
    pub details: Option<String>,

    /// Source location
    pub location: Option<Span>,

    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,

    /// Related diagnostic messages
    pub notes: Vec<Diagnostic>,
}

impl Diagnostic {
    fn with_level(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            details: None,
            location: None,
            suggestion: None,
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, message)
    }

    /// Create a new warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Warning, message)
    }

    /// Create a new hint diagnostic
    pub fn hint(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Hint, message)
    }

    /// Create a new note diagnostic
    pub fn note(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Note, message)
    }

    /// Add a source location to this diagnostic
    pub fn with_location(mut self, location: Span) -> Self {
        self.location = Some(location);
        self
    }

    /// Add detailed explanation
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a related note
    pub fn with_note(mut self, note: Diagnostic) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            DiagnosticLevel::Error => write!(f, "{}: ", "error".red().bold())?,
            DiagnosticLevel::Warning => write!(f, "{}: ", "warning".yellow().bold())?,
            DiagnosticLevel::Hint => write!(f, "{}: ", "hint".cyan())?,
            DiagnosticLevel::Note => write!(f, "{}: ", "note".blue())?,
        }

        writeln!(f, "{}", self.message)?;

        if let Some(loc) = &self.location {
            writeln!(f, " --> {}", loc)?;
        }

        if let Some(details) = &self.details {
            writeln!(f, "\n{}", details)?;
        }

        if let Some(suggestion) = &self.suggestion {
            writeln!(f, "\nsuggestion: {}", suggestion)?;
        }

        for note in &self.notes {
            write!(f, "\n{}", note)?;
        }

        Ok(())
    }
}

/// A reporter that collects diagnostics
pub struct DiagnosticReporter {
    /// All diagnostics collected
    pub diagnostics: Vec<Diagnostic>,

    /// Count of errors
    pub error_count: usize,

    /// Count of warnings
    pub warning_count: usize,
}

impl DiagnosticReporter {
    /// Create a new reporter
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
        }
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Error => self.error_count += 1,
            DiagnosticLevel::Warning => self.warning_count += 1,
            _ => {}
        }

        self.diagnostics.push(diagnostic);
    }

    /// Report all diagnostics
    pub fn report(&self) -> String {
        let mut output = String::new();

        for diagnostic in &self.diagnostics {
            output.push_str(&format!("{}\n\n", diagnostic));
        }

        output.push_str(&format!(
            "{} error(s), {} warning(s) emitted\n",
            self.error_count, self.warning_count
        ));

        output
    }

    /// Check if any errors were reported
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
