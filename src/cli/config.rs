//! Schema CLI command

use eqguard::*;

pub fn cmd_schema(args: &[String]) -> Result<super::Outcome> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: config, report, fixture");
            Ok(())
        }
        "config" => print_schema::<InspectionConfig>(),
        "report" => print_schema::<Vec<FileReport>>(),
        "fixture" => print_schema::<FixtureOutcome>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }?;
    Ok(super::Outcome::Clean)
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
