//! Inspection CLI commands: check, fixture, sexp

use super::util::{has_flag, load_config, parse_output_arg, positional_args, write_output};
use super::Outcome;
use eqguard::*;
use std::fs;
use std::path::PathBuf;

pub fn cmd_check(args: &[String]) -> Result<Outcome> {
    let files = positional_args(args);
    if files.is_empty() {
        return Err(
            "Usage: eqguard check <File.java>... [--json] [--config <file>] [--guarded-only]"
                .into(),
        );
    }

    let json_output = has_flag(args, "--json");
    let output = parse_output_arg(args);
    let config = load_config(args)?;

    for file in &files {
        if detect_language(file) == Language::Unknown {
            eprintln!("Warning: '{}' does not look like a Java file", file);
        }
    }

    let paths: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    let mut reports = Vec::with_capacity(paths.len());
    let mut failures = 0;
    for (path, result) in paths.iter().zip(inspect_files(&paths, &config)) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    let rendered = if json_output {
        format!("{}\n", serde_json::to_string_pretty(&reports)?)
    } else {
        let mut out: String = reports.iter().map(FileReport::to_report).collect();
        let found: usize = reports.iter().map(|r| r.report.diagnostics.len()).sum();
        out.push_str(&format!(
            "{} replaceable expression(s) in {} file(s)\n",
            found,
            reports.len()
        ));
        out
    };
    write_output(&output, &rendered)?;

    if failures > 0 {
        return Err(format!("{} file(s) could not be inspected", failures).into());
    }
    if reports.iter().any(|r| r.report.has_diagnostics()) {
        Ok(Outcome::Findings)
    } else {
        Ok(Outcome::Clean)
    }
}

pub fn cmd_fixture(args: &[String]) -> Result<Outcome> {
    let Some(fixture_path) = positional_args(args).first().copied() else {
        return Err("Usage: eqguard fixture <File.java> [--json] [--config <file>]".into());
    };

    let json_output = has_flag(args, "--json");
    let output = parse_output_arg(args);
    let config = load_config(args)?;

    let text = fs::read_to_string(fixture_path).map_err(Error::Io)?;
    let fixture = Fixture::parse(&text)?;
    let outcome = fixture.check(&config)?;

    let rendered = if json_output {
        format!("{}\n", serde_json::to_string_pretty(&outcome)?)
    } else {
        outcome.to_report(&fixture.source)
    };
    write_output(&output, &rendered)?;

    if outcome.passed() {
        Ok(Outcome::Clean)
    } else {
        Ok(Outcome::Findings)
    }
}

pub fn cmd_sexp(args: &[String]) -> Result<Outcome> {
    let Some(code_path) = positional_args(args).first().copied() else {
        return Err("Usage: eqguard sexp <File.java>".into());
    };
    let output = parse_output_arg(args);

    let lang = match detect_language(code_path) {
        // Anything handed to sexp is treated as Java
        Language::Unknown => Language::Java,
        lang => lang,
    };

    let content = fs::read_to_string(code_path).map_err(Error::Io)?;
    let sexp = to_sexp(&content, lang)?;
    write_output(&output, &format!("{}\n", sexp))?;
    Ok(Outcome::Clean)
}
