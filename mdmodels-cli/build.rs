use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the views from src/inspect.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_VIEWS: &[&str] = &["model-json", "blocks", "graph", "outline", "lint"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("mdmodels")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate and convert markdown data models")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a model with a template (default command)")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("to").long("to").short('t').value_hint(ValueHint::Other))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(Arg::new("root").long("root"))
                .arg(
                    Arg::new("resolve-refs")
                        .long("resolve-refs")
                        .action(ArgAction::SetTrue),
                )
                .arg(Arg::new("strict").long("strict").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a model and report its errors")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect internal representations of a model")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS))
                        .index(2),
                ),
        )
        .subcommand(Command::new("templates").about("List available conversion templates"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "mdmodels", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "mdmodels", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "mdmodels", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
