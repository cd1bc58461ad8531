// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # eqguard
//!
//! Finds hand-written null-safe equality tests in Java code that
//! `java.util.Objects.equals()` can replace.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use eqguard::{inspect_source, InspectionConfig};
//!
//! let report = inspect_source(
//!     "class A { boolean f(Object a, Object b) { return a != null && a.equals(b); } }",
//!     &InspectionConfig::default(),
//! )?;
//! for d in &report.diagnostics {
//!     println!("{}: {} -> {}", d.span.start_line, d.message, d.replacement);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Java source ──► parse_java ──► SourceUnit (expression trees)
//!                                     │
//!                                     ▼
//!                 Inspector ── walks every node ──► Recognizer ──► EqualsMatch
//!                                     │                  │
//!                                     ▼                  └── equivalence::same_operand
//!                              DiagnosticSink
//! ```
//!
//! The recognizer is a pure function of one subtree, so files (and
//! expressions) can be inspected on any number of threads.
//!
//! ## Logging
//!
//! Call [`init_tracing`] and set `RUST_LOG`, e.g. `RUST_LOG=eqguard=debug`
//! for every reported match or `RUST_LOG=eqguard::recognize=trace` for
//! rejected candidates.

pub mod ast;
pub mod config;
pub mod equivalence;
pub mod error;
pub mod fixture;
pub mod inspect;
pub mod parse;
pub mod recognize;
mod stack;

// Re-exports
pub use ast::{BinaryOp, Expr, Language, LiteralKind, SourceUnit, Span, UnaryOp, UpdateOp};
pub use config::InspectionConfig;
pub use equivalence::{is_side_effect_free, same_operand, strip_parens};
pub use error::{Error, Result};
pub use fixture::{ExpectedWarning, Fixture, FixtureOutcome};
pub use inspect::{
    inspect, inspect_file, inspect_files, inspect_source, Diagnostic, DiagnosticSink, FileReport,
    InspectionReport, Inspector,
};
pub use parse::{detect_language, parse_java, to_sexp};
pub use recognize::{recognize, EqualsMatch, Polarity, Recognizer, Shape};

use std::sync::Once;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}
