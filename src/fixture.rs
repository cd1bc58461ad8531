//! Highlighting fixtures
//!
//! A fixture is Java source with the expected diagnostics marked inline:
//!
//! ```text
//! boolean c = <warning descr="'a.equals(b)' replaceable by 'Objects.equals()' expression">a.equals(b)</warning>;
//! ```
//!
//! [`Fixture::parse`] strips the markup and remembers where each warning
//! sits in the stripped text; [`Fixture::check`] inspects the stripped text
//! and compares. A warning without `descr` accepts any message.

use crate::config::InspectionConfig;
use crate::error::{Error, Result};
use crate::inspect::{inspect_source, Diagnostic};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

fn markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<warning(?:\s+descr="(?P<descr>[^"]*)")?\s*>|(?P<close></warning>)"#)
            .unwrap_or_else(|e| panic!("invalid fixture markup pattern: {}", e))
    })
}

/// A warning the fixture expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExpectedWarning {
    /// Byte range in the stripped source
    pub range: Range<usize>,
    /// 1-based line in the stripped source
    pub line: usize,
    /// Expected message, if the markup gave one
    pub descr: Option<String>,
}

/// Markup-free source plus expectations
#[derive(Debug, Clone)]
pub struct Fixture {
    pub source: String,
    pub expected: Vec<ExpectedWarning>,
}

/// Comparison of expected against produced warnings
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FixtureOutcome {
    pub matched: usize,
    /// Expected but not produced
    pub missing: Vec<ExpectedWarning>,
    /// Produced but not expected
    pub unexpected: Vec<Diagnostic>,
}

impl Fixture {
    /// Strip `<warning>` markup
    pub fn parse(text: &str) -> Result<Self> {
        let mut source = String::with_capacity(text.len());
        let mut open: Vec<(usize, Option<String>)> = Vec::new();
        let mut expected = Vec::new();
        let mut last = 0;

        for caps in markup_pattern().captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            source.push_str(&text[last..whole.start()]);
            last = whole.end();

            if caps.name("close").is_some() {
                let (start, descr) = open.pop().ok_or_else(|| {
                    Error::Fixture(format!(
                        "unmatched </warning> at line {}",
                        line_of(text, whole.start())
                    ))
                })?;
                expected.push(ExpectedWarning {
                    range: start..source.len(),
                    line: line_of(&source, start),
                    descr,
                });
            } else {
                let descr = caps.name("descr").map(|d| unescape(d.as_str()));
                open.push((source.len(), descr));
            }
        }
        source.push_str(&text[last..]);

        if let Some((start, _)) = open.first() {
            return Err(Error::Fixture(format!(
                "unclosed <warning> at line {}",
                line_of(&source, *start)
            )));
        }

        expected.sort_by_key(|w| (w.range.start, w.range.end));
        Ok(Self { source, expected })
    }

    /// Inspect the stripped source and compare with the expectations
    pub fn check(&self, config: &InspectionConfig) -> Result<FixtureOutcome> {
        let report = inspect_source(&self.source, config)?;
        Ok(self.compare(report.diagnostics))
    }

    fn compare(&self, diagnostics: Vec<Diagnostic>) -> FixtureOutcome {
        let mut outcome = FixtureOutcome::default();
        let mut remaining = diagnostics;

        for warning in &self.expected {
            let found = remaining.iter().position(|d| {
                d.span.byte_range() == warning.range
                    && warning.descr.as_ref().is_none_or(|descr| *descr == d.message)
            });
            match found {
                Some(index) => {
                    remaining.remove(index);
                    outcome.matched += 1;
                }
                None => outcome.missing.push(warning.clone()),
            }
        }

        outcome.unexpected = remaining;
        outcome
    }
}

impl FixtureOutcome {
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }

    pub fn to_report(&self, source: &str) -> String {
        let mut out = String::new();
        for w in &self.missing {
            let text = source.get(w.range.clone()).unwrap_or("");
            out.push_str(&format!(
                "missing    {}: '{}' {}\n",
                w.line,
                text,
                w.descr.as_deref().unwrap_or("(any message)")
            ));
        }
        for d in &self.unexpected {
            out.push_str(&format!(
                "unexpected {}: {}\n",
                d.span.start_line, d.message
            ));
        }
        out.push_str(&format!(
            "{} matched, {} missing, {} unexpected\n",
            self.matched,
            self.missing.len(),
            self.unexpected.len()
        ));
        out
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}

fn unescape(descr: &str) -> String {
    descr
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_strips_markup() {
        let fixture =
            Fixture::parse(r#"x = <warning descr="m &lt;1&gt; &quot;q&quot;">a.equals(b)</warning>;"#)
                .unwrap();
        assert_eq!(fixture.source, "x = a.equals(b);");
        assert_eq!(fixture.expected.len(), 1);
        assert_eq!(fixture.expected[0].range, 4..15);
        assert_eq!(fixture.expected[0].descr.as_deref(), Some(r#"m <1> "q""#));
    }

    #[test]
    fn test_parse_nested_and_bare_markup() {
        let text = "a\n<warning>b <warning descr=\"x\">c</warning></warning>";
        let fixture = Fixture::parse(text).unwrap();
        assert_eq!(fixture.source, "a\nb c");
        let ranges: Vec<_> = fixture.expected.iter().map(|w| w.range.clone()).collect();
        assert_eq!(ranges, vec![2..5, 4..5]);
        assert_eq!(fixture.expected[0].descr, None);
        assert_eq!(fixture.expected[0].line, 2);
    }

    #[test]
    fn test_parse_unbalanced() {
        assert!(matches!(Fixture::parse("a</warning>"), Err(Error::Fixture(_))));
        assert!(matches!(Fixture::parse("<warning>a"), Err(Error::Fixture(_))));
    }

    #[test]
    fn test_check_reports_missing_and_unexpected() {
        let text = r#"class T {
  boolean f() { return <warning descr="'a.equals(b)' replaceable by 'Objects.equals()' expression">a.equals(b)</warning>; }
  boolean g() { return <warning>c.d</warning>; }
  boolean h() { return e.equals(f); }
}"#;
        let fixture = Fixture::parse(text).unwrap();
        let outcome = fixture.check(&InspectionConfig::default()).unwrap();
        assert!(!outcome.passed());
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing[0].line, 3);
        assert_eq!(outcome.unexpected.len(), 1);
        assert_eq!(
            outcome.unexpected[0].message,
            "'e.equals(f)' replaceable by 'Objects.equals()' expression"
        );
        assert!(outcome.to_report(&fixture.source).contains("1 matched, 1 missing, 1 unexpected"));
    }
}
