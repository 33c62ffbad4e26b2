// Command-line interface for markdown data models
//
// This binary validates markdown data models and converts them into schemas, code stubs
// and documentation through the mdmodels-core template converter.
//
// Usage:
//  mdmodels <input> --to <template> [--output <file>]           - Convert (default)
//  mdmodels convert <input> --to <template> [--output <file>]   - Same as above (explicit)
//  mdmodels validate <input> [--json]                           - Report validation errors
//  mdmodels inspect <input> [<view>]                            - Show a pipeline stage
//  mdmodels templates                                           - List conversion templates
//
// Extra Parameters:
//
// Template-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the template.
// Example:
//  mdmodels model.md --to json-schema --extra-strict true

mod inspect;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use mdmodels_config::{Loader, MdModelsConfig};
use mdmodels_core::export::{self, ExportArtifact, ExportSpec};
use mdmodels_core::validation::Validator;
use mdmodels_core::{validate, TemplateId, TemplateRegistry};
use std::collections::HashMap;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "validate", "inspect", "templates", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));
            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("mdmodels")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate and convert markdown data models")
        .long_about(
            "mdmodels works with data models written in markdown.\n\n\
            Commands:\n  \
            - convert:   Render a model as a schema, code or docs (default)\n  \
            - validate:  Report every problem of a model with its position\n  \
            - inspect:   View internal representations (model, blocks, graph)\n  \
            - templates: List the conversion targets\n\n\
            Examples:\n  \
            mdmodels model.md --to json-schema          # JSON Schema on stdout\n  \
            mdmodels model.md --to python-pydantic -o model.py\n  \
            mdmodels validate model.md --json           # Errors as JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mdmodels.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a model with a template (default command)")
                .long_about(
                    "Render a markdown data model with one of the built-in templates.\n\n\
                    The model must validate; otherwise the errors are printed and nothing\n\
                    is written. Without --to, the template is detected from the --output\n\
                    extension, then taken from the configuration.\n\n\
                    Examples:\n  \
                    mdmodels convert model.md --to rust\n  \
                    mdmodels convert model.md -o schema.json\n  \
                    mdmodels convert model.md --to json-schema --root Dataset --resolve-refs",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Target template (see `mdmodels templates`)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file or directory (defaults to stdout)")
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_name("OBJECT")
                        .help("Root object of the JSON Schema"),
                )
                .arg(
                    Arg::new("resolve-refs")
                        .long("resolve-refs")
                        .help("Inline JSON Schema definitions instead of using $defs")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Require every JSON Schema property and forbid others")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a model and report its errors")
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the validation report as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect internal representations of a model")
                .arg(
                    Arg::new("path")
                        .help("Path to the markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to show. Defaults to 'model-json'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            inspect::AVAILABLE_VIEWS,
                        ))
                        .index(2),
                ),
        )
        .subcommand(Command::new("templates").about("List available conversion templates"))
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_tracing(&config, matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => handle_convert_command(sub_matches, extra_params, &config),
        Some(("validate", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            handle_validate_command(input, sub_matches.get_flag("json"), &config);
        }
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or(inspect::DEFAULT_VIEW);
            handle_inspect_command(path, view);
        }
        Some(("templates", _)) => handle_templates_command(),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_tracing(config: &MdModelsConfig, verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(
    sub_matches: &ArgMatches,
    extra_params: HashMap<String, String>,
    config: &MdModelsConfig,
) {
    let input = sub_matches
        .get_one::<String>("input")
        .expect("input is required");
    let output = sub_matches.get_one::<String>("output");
    let template = resolve_template(sub_matches.get_one::<String>("to"), output, config)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });
    let options = template_options(template, sub_matches, extra_params, config);
    debug!(%template, ?options, "resolved conversion");

    let source = read_source(input);
    let mut spec = ExportSpec::new(&source, template);
    spec.options = options;
    if let Some(path) = output {
        spec = spec.with_output_path(path);
    } else if let Some(dir) = &config.convert.output_dir {
        spec = spec.with_output_dir(dir);
    }

    match export::export(spec) {
        Ok(ExportArtifact::InMemory(text)) => print!("{text}"),
        Ok(ExportArtifact::File(path)) => eprintln!("Wrote {}", path.display()),
        Err(mdmodels_core::ConvertError::InvalidModel(errors)) => {
            eprintln!("Error: '{input}' is not a valid model");
            for error in errors {
                eprintln!("  {error}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Conversion error: {e}");
            std::process::exit(1);
        }
    }
}

/// `--to`, else the template matching the output extension, else the configured default.
fn resolve_template(
    to: Option<&String>,
    output: Option<&String>,
    config: &MdModelsConfig,
) -> Result<TemplateId, mdmodels_core::ConvertError> {
    if let Some(name) = to {
        return name.parse();
    }
    let detected = output.and_then(|path| {
        TemplateRegistry::with_defaults().detect_template_from_filename(path)
    });
    Ok(detected.unwrap_or(config.convert.default_template))
}

fn template_options(
    template: TemplateId,
    sub_matches: &ArgMatches,
    extra_params: HashMap<String, String>,
    config: &MdModelsConfig,
) -> HashMap<String, String> {
    let mut options = HashMap::new();
    if template == TemplateId::JsonSchema {
        let json_schema = &config.convert.json_schema;
        let resolve_refs = json_schema.resolve_refs || sub_matches.get_flag("resolve-refs");
        let strict = json_schema.strict || sub_matches.get_flag("strict");
        options.insert("resolve-refs".to_string(), resolve_refs.to_string());
        options.insert("strict".to_string(), strict.to_string());
    } else if sub_matches.get_flag("resolve-refs") || sub_matches.get_flag("strict") {
        eprintln!("Error: --resolve-refs and --strict only apply to json-schema");
        std::process::exit(1);
    }
    if let Some(root) = sub_matches.get_one::<String>("root") {
        options.insert("root".to_string(), root.clone());
    }
    options.extend(extra_params);
    options
}

/// Handle the validate command
fn handle_validate_command(input: &str, json: bool, config: &MdModelsConfig) {
    let source = read_source(input);
    let mut report = validate(&source);
    if config.validate.ignore_empty_document {
        report = report.without_sentinel();
    }

    if json {
        let text = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("JSON serialization failed: {e}");
            std::process::exit(1);
        });
        println!("{text}");
    } else {
        print_report(input, &report);
    }

    if !report.is_valid {
        std::process::exit(1);
    }
}

fn print_report(input: &str, report: &Validator) {
    if report.is_valid {
        println!("{input}: valid");
        return;
    }
    println!("{input}: {} error(s)", report.errors.len());
    for error in &report.errors {
        println!("  {error}");
    }
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, view: &str) {
    let source = read_source(path);
    let output = inspect::execute_view(&source, view).unwrap_or_else(|e| {
        eprintln!("Execution error: {e}");
        std::process::exit(1);
    });
    print!("{output}");
}

/// Handle the templates command
fn handle_templates_command() {
    let registry = TemplateRegistry::with_defaults();
    println!("Available templates:\n");
    for id in TemplateId::ALL {
        if let Ok(template) = registry.get_by_id(id) {
            println!(
                "  {:<22} .{:<8} {}",
                template.name(),
                template.file_extension(),
                template.description()
            );
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MdModelsConfig {
    let loader = Loader::new().with_optional_file("mdmodels.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_extra_args_empty() {
        let input = args(&["mdmodels", "validate", "model.md"]);
        let (cleaned, extra) = parse_extra_args(&input);
        assert_eq!(cleaned, input);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_parse_extra_args_value_and_flag() {
        let input = args(&[
            "mdmodels",
            "model.md",
            "--extra-root",
            "Dataset",
            "--to",
            "json-schema",
            "--extra-strict",
        ]);
        let (cleaned, extra) = parse_extra_args(&input);
        assert_eq!(cleaned, args(&["mdmodels", "model.md", "--to", "json-schema"]));
        assert_eq!(extra.get("root"), Some(&"Dataset".to_string()));
        assert_eq!(extra.get("strict"), Some(&"true".to_string()));
    }

    #[test]
    fn test_resolve_template_order() {
        let config = load_cli_config(None);
        let to = "rust".to_string();
        let output = "model.py".to_string();

        assert_eq!(resolve_template(Some(&to), Some(&output), &config).unwrap(), TemplateId::Rust);
        assert_eq!(
            resolve_template(None, Some(&output), &config).unwrap(),
            TemplateId::PythonPydanticXML
        );
        assert_eq!(resolve_template(None, None, &config).unwrap(), TemplateId::JsonSchema);
        assert!(resolve_template(Some(&"cobol".to_string()), None, &config).is_err());
    }

    #[test]
    fn test_json_schema_options_follow_config_and_flags() {
        let config = load_cli_config(None);
        let matches = build_cli()
            .try_get_matches_from(["mdmodels", "convert", "m.md", "--strict", "--root", "A"])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();

        let options = template_options(TemplateId::JsonSchema, sub_matches, HashMap::new(), &config);
        assert_eq!(options.get("strict"), Some(&"true".to_string()));
        assert_eq!(options.get("resolve-refs"), Some(&"false".to_string()));
        assert_eq!(options.get("root"), Some(&"A".to_string()));
    }
}
