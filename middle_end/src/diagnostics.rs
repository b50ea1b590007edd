//! Diagnostic conversions
//!
//! Turns the structured lowering and runtime errors into the shared
//! diagnostic type so drivers report every phase the same way.

use crate::interpreter::RuntimeError;
use crate::ir::lowering::LowerError;
use front_end::diagnostics::Diagnostic;

/// Convert a lowering failure into a reportable diagnostic
pub fn lower_error_to_diagnostic(error: &LowerError) -> Diagnostic {
    let diagnostic = Diagnostic::error(error.to_string()).with_location(error.span().clone());

    match error {
        LowerError::UndefinedFunction { name, .. } => diagnostic.with_suggestion(format!(
            "define `{}` before the first call to it",
            name
        )),
        LowerError::DuplicateFunction { name, .. } => diagnostic.with_suggestion(format!(
            "rename one of the definitions of `{}`",
            name
        )),
        LowerError::DefAfterTopLevelCode { .. } => diagnostic
            .with_suggestion("move all function definitions above the top-level statements"),
        LowerError::UnreachableStatement { .. } => {
            diagnostic.with_suggestion("remove the statements after the return")
        }
        LowerError::ArityMismatch { .. } | LowerError::MisplacedNode { .. } => diagnostic,
    }
}

/// Convert a runtime failure into a reportable diagnostic
pub fn runtime_error_to_diagnostic(error: &RuntimeError) -> Diagnostic {
    let diagnostic = Diagnostic::error(error.to_string());

    match error.span() {
        Some(span) => diagnostic.with_location(span.clone()),
        None => diagnostic,
    }
}
