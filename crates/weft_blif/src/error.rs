//! Fatal netlist errors and the diagnostic codes used by the reader.

use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use weft_ir::IrError;
use weft_source::Span;

/// Malformed netlist text.
pub const SYNTAX: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 101,
};
/// More than one `.model`.
pub const MULTIPLE_MODELS: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 102,
};
/// A cover that is not one of the recognized gates.
pub const UNSUPPORTED_COVER: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 103,
};
/// An unrecognized directive or `.subckt` cell.
pub const UNKNOWN_COMMAND: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 104,
};
/// The netlist describes an ill-formed circuit.
pub const INVALID_CIRCUIT: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 105,
};
/// A flip-flop reset net was dropped.
pub const RESET_IGNORED: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 201,
};
/// Indexed port bits that could not be merged into a vector.
pub const VECTOR_NOT_MERGED: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 202,
};
/// A `.latch` initial value was dropped.
pub const LATCH_INIT_IGNORED: DiagnosticCode = DiagnosticCode {
    category: Category::Note,
    number: 301,
};

/// A fatal problem found while reading a netlist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetlistError {
    /// The text does not follow the BLIF grammar.
    #[error("{message}")]
    Syntax {
        /// What was wrong.
        message: String,
        /// Where.
        span: Span,
    },

    /// A second `.model` was found.
    #[error("only a single flattened `.model` is supported")]
    MultipleModelsUnsupported {
        /// The second `.model` directive.
        span: Span,
    },

    /// A `.names` cover does not match any recognized gate.
    #[error("unsupported cover for `.names {signals}`")]
    UnsupportedCoverPattern {
        /// The signal list, space separated.
        signals: String,
        /// The rows, comma separated.
        rows: String,
        /// The `.names` command.
        span: Span,
    },

    /// An unrecognized directive or flip-flop cell.
    #[error("unknown command `{command}`")]
    UnknownCommand {
        /// The directive (plus cell name for `.subckt`).
        command: String,
        /// Where.
        span: Span,
    },

    /// The described circuit breaks an IR invariant.
    #[error("{source}")]
    Ir {
        /// The violated invariant.
        source: IrError,
        /// The construct that triggered it.
        span: Span,
    },
}

impl NetlistError {
    /// Location of the error.
    pub fn span(&self) -> Span {
        match self {
            NetlistError::Syntax { span, .. }
            | NetlistError::MultipleModelsUnsupported { span }
            | NetlistError::UnsupportedCoverPattern { span, .. }
            | NetlistError::UnknownCommand { span, .. }
            | NetlistError::Ir { span, .. } => *span,
        }
    }

    /// The diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            NetlistError::Syntax { .. } => SYNTAX,
            NetlistError::MultipleModelsUnsupported { .. } => MULTIPLE_MODELS,
            NetlistError::UnsupportedCoverPattern { .. } => UNSUPPORTED_COVER,
            NetlistError::UnknownCommand { .. } => UNKNOWN_COMMAND,
            NetlistError::Ir { .. } => INVALID_CIRCUIT,
        }
    }

    /// Converts the error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let span = self.span();
        let diag = Diagnostic::error(self.code(), self.to_string(), span);
        match self {
            NetlistError::UnsupportedCoverPattern { rows, .. } => {
                let rows = if rows.is_empty() { "(none)" } else { rows };
                diag.with_label(Label::primary(span, format!("rows: {rows}")))
                    .with_note("recognized covers are constants, buffer, not, and, or, xor and 2:1 mux")
            }
            NetlistError::MultipleModelsUnsupported { .. } => {
                diag.with_help("flatten the design into one model before exporting BLIF")
            }
            NetlistError::UnknownCommand { .. } => diag.with_note(
                "supported commands are `.names`, `.latch` and `.subckt` with `$_DFF_*` cells",
            ),
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_diagnostics::Severity;

    #[test]
    fn codes_per_variant() {
        let err = NetlistError::UnknownCommand {
            command: ".gate".to_string(),
            span: Span::DUMMY,
        };
        assert_eq!(err.code().to_string(), "E104");
        assert_eq!(err.to_string(), "unknown command `.gate`");

        let err = NetlistError::Ir {
            source: IrError::DuplicateName {
                name: "a".to_string(),
            },
            span: Span::DUMMY,
        };
        assert_eq!(err.code().to_string(), "E105");
        assert_eq!(err.to_string(), "duplicate wire name `a`");
    }

    #[test]
    fn cover_error_diagnostic_lists_rows() {
        let err = NetlistError::UnsupportedCoverPattern {
            signals: "a b y".to_string(),
            rows: "00 1".to_string(),
            span: Span::DUMMY,
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code, UNSUPPORTED_COVER);
        assert_eq!(diag.message, "unsupported cover for `.names a b y`");
        assert_eq!(diag.labels[0].message, "rows: 00 1");
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn warning_codes_render() {
        assert_eq!(RESET_IGNORED.to_string(), "W201");
        assert_eq!(VECTOR_NOT_MERGED.to_string(), "W202");
        assert_eq!(LATCH_INIT_IGNORED.to_string(), "N301");
    }
}
