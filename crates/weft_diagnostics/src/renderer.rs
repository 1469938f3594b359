//! Human-readable diagnostic rendering.

use crate::diagnostic::{Diagnostic, LabelStyle};
use weft_source::SourceDb;

/// Formats a diagnostic for some output target.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// rustc-style terminal output:
///
/// ```text
/// error[E103]: unsupported cover pattern for `.names a b y`
///   --> top.blif:5:1
///   |
/// 5 | .names a b y
///   | ^^^^^^ rows: 00 1
///   = note: ...
/// ```
pub struct TerminalRenderer {
    /// Wrap the header in ANSI color codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let head = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return format!("{head}: {}\n", diag.message);
        }
        let color = match diag.severity {
            crate::Severity::Error => "31",
            crate::Severity::Warning => "33",
            crate::Severity::Note => "36",
        };
        format!("\x1b[1;{color}m{head}\x1b[0m: {}\n", diag.message)
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = self.header(diag);

        if !diag.primary_span.is_dummy() {
            let span = diag.primary_span;
            let loc = source_db.locate(span);
            out.push_str(&format!("  --> {loc}\n"));

            let file = source_db.get_file(span.file);
            let line_num = loc.line.to_string();
            let gutter = " ".repeat(line_num.len());
            let text = file.line_text(span.start);

            // Underline stops at the end of the first line of a multi-line span.
            let width = if loc.end_line == loc.line {
                (loc.end_column + 1).saturating_sub(loc.column).max(1)
            } else {
                (text.len() as u32 + 1).saturating_sub(loc.column).max(1)
            };
            let label = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| format!(" {}", l.message))
                .unwrap_or_default();

            out.push_str(&format!("{gutter} |\n"));
            out.push_str(&format!("{line_num} | {text}\n"));
            out.push_str(&format!(
                "{gutter} | {}{}{label}\n",
                " ".repeat(loc.column as usize - 1),
                "^".repeat(width as usize)
            ));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}
