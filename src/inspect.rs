//! Inspection driver: walks parsed source and reports diagnostics
//!
//! Visits every outermost expression top-down. A node that the recognizer
//! accepts is reported and its subtree is skipped, so a guarded form is
//! reported once and not again for the `equals` call inside it. Parentheses
//! are never reported themselves; the expression inside them is.

use crate::ast::*;
use crate::config::InspectionConfig;
use crate::error::{Error, Result};
use crate::parse::parse_java;
use crate::recognize::{EqualsMatch, Polarity, Recognizer, Shape};
use crate::stack::ensure_sufficient_stack;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Receives diagnostics as the inspector finds them
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// One replaceable expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub span: Span,
    /// `'<expression>' replaceable by 'Objects.equals()' expression`
    pub message: String,
    /// Suggested `Objects.equals(...)` expression
    pub replacement: String,
    pub polarity: Polarity,
    pub shape: Shape,
}

impl Diagnostic {
    /// Build the diagnostic for a match on `expr`
    pub fn from_match(expr: &Expr, found: &EqualsMatch<'_>) -> Self {
        Self {
            span: found.span,
            message: message_for(expr),
            replacement: found.replacement(),
            polarity: found.polarity,
            shape: found.shape,
        }
    }
}

/// Diagnostic message for a reported expression
pub fn message_for(expr: &Expr) -> String {
    format!("'{}' replaceable by 'Objects.equals()' expression", expr)
}

/// Result of inspecting one source text
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InspectionReport {
    pub source_hash: String,
    pub diagnostics: Vec<Diagnostic>,
    pub syntax_errors: Vec<SyntaxErrorInfo>,
}

/// Result of inspecting one file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: InspectionReport,
}

/// Inspect a parsed unit
pub fn inspect(unit: &SourceUnit, config: &InspectionConfig) -> InspectionReport {
    Inspector::with_config(config.clone()).inspect(unit)
}

/// Parse and inspect Java source text
pub fn inspect_source(source: &str, config: &InspectionConfig) -> Result<InspectionReport> {
    let unit = parse_java(source)?;
    Ok(inspect(&unit, config))
}

/// Inspect a Java file
pub fn inspect_file(path: &Path, config: &InspectionConfig) -> Result<FileReport> {
    let source = std::fs::read_to_string(path).map_err(Error::Io)?;
    let report = inspect_source(&source, config)?;
    Ok(FileReport {
        path: path.to_path_buf(),
        report,
    })
}

/// Inspect many files in parallel. Files are independent, so results come
/// back in input order with one `Result` per file.
pub fn inspect_files(paths: &[PathBuf], config: &InspectionConfig) -> Vec<Result<FileReport>> {
    paths
        .par_iter()
        .map(|path| {
            inspect_file(path, config).inspect_err(|e| {
                tracing::warn!(path = %path.display(), error = %e, "failed to inspect file");
            })
        })
        .collect()
}

/// Tree walker feeding recognizer matches into a sink
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    recognizer: Recognizer,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InspectionConfig) -> Self {
        Self {
            recognizer: Recognizer::with_config(config),
        }
    }

    pub fn inspect(&self, unit: &SourceUnit) -> InspectionReport {
        let mut diagnostics = Vec::new();
        for root in &unit.roots {
            self.inspect_expr(root, &mut diagnostics);
        }

        InspectionReport {
            source_hash: unit.source_hash.clone(),
            diagnostics,
            syntax_errors: unit.syntax_errors.clone(),
        }
    }

    /// Report matches in `expr` and below into `sink`
    pub fn inspect_expr(&self, expr: &Expr, sink: &mut dyn DiagnosticSink) {
        ensure_sufficient_stack(|| self.inspect_node(expr, sink))
    }

    fn inspect_node(&self, expr: &Expr, sink: &mut dyn DiagnosticSink) {
        if !matches!(expr, Expr::Paren { .. }) {
            if let Some(found) = self.recognizer.recognize(expr) {
                tracing::debug!(
                    line = found.span.start_line,
                    shape = ?found.shape,
                    expr = %expr,
                    "replaceable by Objects.equals()"
                );
                sink.report(Diagnostic::from_match(expr, &found));
                return;
            }
        }
        for child in expr.children() {
            self.inspect_expr(child, sink);
        }
    }
}

impl InspectionReport {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn to_report(&self) -> String {
        let mut out = String::new();
        for d in &self.diagnostics {
            out.push_str(&format!(
                "{}:{}: {}\n    suggestion: {}\n",
                d.span.start_line,
                d.span.start_col + 1,
                d.message,
                d.replacement
            ));
        }
        for e in &self.syntax_errors {
            out.push_str(&format!(
                "{}:{}: syntax error: {} near '{}'\n",
                e.span.start_line,
                e.span.start_col + 1,
                e.message,
                e.source_text
            ));
        }
        out
    }
}

impl FileReport {
    pub fn to_report(&self) -> String {
        self.report
            .to_report()
            .lines()
            .map(|line| {
                if line.starts_with(' ') {
                    format!("{}\n", line)
                } else {
                    format!("{}:{}\n", self.path.display(), line)
                }
            })
            .collect()
    }
}
