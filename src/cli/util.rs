//! CLI utility helpers

use eqguard::{Error, InspectionConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Flags that take a value
const VALUE_FLAGS: &[&str] = &["--config", "-c", "--output", "-o"];

/// Parse --output argument to determine output file path
pub fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    flag_value(args, &["--output", "-o"]).map(PathBuf::from)
}

/// Positional arguments: everything that is neither a flag nor a flag value
pub fn positional_args(args: &[String]) -> Vec<&str> {
    let mut positional = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with('-') {
            positional.push(arg.as_str());
        }
    }
    positional
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

/// Resolve the inspection config from --config, ./eqguard.yaml and
/// --guarded-only, in that order
pub fn load_config(args: &[String]) -> Result<InspectionConfig> {
    let mut config = match flag_value(args, &["--config", "-c"]) {
        Some(path) => InspectionConfig::load(Path::new(path))?,
        None => {
            let current_dir = std::env::current_dir().map_err(Error::Io)?;
            InspectionConfig::discover(&current_dir)?
        }
    };
    if has_flag(args, "--guarded-only") {
        config.ignore_null_check = false;
    }
    Ok(config)
}

/// Write content to file or stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
