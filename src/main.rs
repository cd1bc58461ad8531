//! eqguard CLI - Command-line interface
//!
//! Commands:
//!   check    - Report expressions replaceable by Objects.equals()
//!   fixture  - Verify a <warning> markup fixture
//!   sexp     - Dump the tree-sitter parse tree
//!   schema   - Print JSON schema for config or report
//!   version  - Print version

mod cli;

use eqguard::VERSION;
use std::process::ExitCode;

fn main() -> ExitCode {
    eqguard::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(2);
    }

    let result = match args[1].as_str() {
        "check" => cli::cmd_check(&args[2..]),
        "fixture" => cli::cmd_fixture(&args[2..]),
        "sexp" => cli::cmd_sexp(&args[2..]),
        "schema" => cli::cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("eqguard {}", VERSION);
            Ok(cli::Outcome::Clean)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(cli::Outcome::Clean)
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(cli::Outcome::Clean) => ExitCode::SUCCESS,
        Ok(cli::Outcome::Findings) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn print_usage() {
    println!(
        r#"
eqguard - find null-safe equality tests replaceable by Objects.equals()

USAGE:
    eqguard <COMMAND> [OPTIONS]

COMMANDS:
    check <File.java>...             Report replaceable expressions
    fixture <File.java>              Verify <warning descr="..."> markup
    sexp <File.java>                 Print the tree-sitter S-expression
    schema [config|report|fixture]   Print JSON schema
    version                          Print version

OPTIONS:
    --json                  JSON output format (check, fixture)
    --config <file>         Config file (default: ./eqguard.yaml if present)
    --guarded-only          Do not report bare a.equals(b) calls
    --output <file>         Output file (default: stdout)

EXIT STATUS:
    0 nothing found, 1 findings or fixture mismatch, 2 error

EXAMPLES:
    eqguard check src/main/java/Foo.java src/main/java/Bar.java
    eqguard check Foo.java --guarded-only --json
    RUST_LOG=eqguard=debug eqguard fixture EqualsReplaceableByObjectsCall.java
"#
    );
}
