use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::{IsTerminal, Read};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hed::parsing;
use hed::problem::{
    filter_issues_by_count, html_issues, printable_issues, ContextType, Issue,
    DOCUMENTATION_URL,
};
use hed::rendering::{Identity, Terminal};
use hed::schema::{ReservedTags, Schema, SchemaGroup, SchemaProvider};
use hed::validation::{HedValidator, ValidatorOptions};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hed=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("hed")
        .version(VERSION)
        .propagate_version(true)
        .author("HED Working Group")
        .about("Validate Hierarchical Event Descriptor annotation strings.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("check")
                .about("Validate HED strings, one per line")
                .arg(
                    Arg::new("schema")
                        .short('s')
                        .long("schema")
                        .action(ArgAction::Append)
                        .help("Schema to validate against, as JSON. Give more than once to add library schemas. Without one only structure is checked."),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("JSON file of validator options."),
                )
                .arg(
                    Arg::new("errors-only")
                        .short('e')
                        .long("errors-only")
                        .action(ArgAction::SetTrue)
                        .help("Leave warnings out of the report."),
                )
                .arg(
                    Arg::new("placeholders")
                        .long("placeholders")
                        .action(ArgAction::SetTrue)
                        .help("Permit '#' placeholders, as in sidecar templates."),
                )
                .arg(
                    Arg::new("series")
                        .long("series")
                        .action(ArgAction::SetTrue)
                        .help("Treat the lines as consecutive rows, checking Offset and Inset against earlier Onsets."),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .help("Report at most this many issues of each code."),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .action(ArgAction::SetTrue)
                        .help("Emit the report as HTML."),
                )
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for highlighting even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .help("The file of HED strings to check. Reads standard input if absent or '-'."),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Rewrite HED strings in long or short form")
                .arg(
                    Arg::new("schema")
                        .short('s')
                        .long("schema")
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Schema the tags belong to, as JSON."),
                )
                .arg(
                    Arg::new("short")
                        .long("short")
                        .action(ArgAction::SetTrue)
                        .help("Write the short form rather than the long."),
                )
                .arg(
                    Arg::new("filename")
                        .help("The file of HED strings to convert. Reads standard input if absent or '-'."),
                ),
        )
        .get_matches();

    let code = match matches.subcommand() {
        Some(("check", submatches)) => check(submatches),
        Some(("convert", submatches)) => convert(submatches),
        Some(_) => {
            println!("No valid subcommand was used");
            2
        }
        None => {
            println!("usage: hed [COMMAND] ...");
            println!("Try '--help' for more information.");
            2
        }
    };
    std::process::exit(code);
}

/// Read the input named on the command line, or standard input.
fn input(submatches: &ArgMatches) -> Result<String, String> {
    match submatches.get_one::<String>("filename") {
        Some(filename) if filename != "-" => {
            parsing::load(Path::new(filename)).map_err(|error| error.to_string())
        }
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|error| format!("Failed reading standard input: {}", error))?;
            Ok(content)
        }
    }
}

fn schemas(submatches: &ArgMatches) -> Result<Option<SchemaGroup>, String> {
    let filenames: Vec<&String> = match submatches.get_many::<String>("schema") {
        Some(values) => values.collect(),
        None => return Ok(None),
    };

    let mut group = SchemaGroup::default();
    for filename in filenames {
        let path = Path::new(filename);
        let content = parsing::load(path).map_err(|error| error.to_string())?;
        let schema = Schema::from_json(&content)
            .map_err(|error| format!("{}: {}", path.display(), error))?;
        info!("Loaded schema {} version {}", schema.name, schema.version);
        group
            .add(schema)
            .map_err(|error| format!("{}: {}", path.display(), error))?;
    }
    Ok(Some(group))
}

fn options(submatches: &ArgMatches) -> Result<ValidatorOptions, String> {
    let mut options = match submatches.get_one::<String>("config") {
        Some(filename) => {
            let path = Path::new(filename);
            let content = parsing::load(path).map_err(|error| error.to_string())?;
            serde_json::from_str(&content)
                .map_err(|error| format!("Malformed options: {} ({})", path.display(), error))?
        }
        None => ValidatorOptions::default(),
    };
    if submatches.get_flag("errors-only") {
        options.check_for_warnings = false;
    }
    if submatches.get_flag("placeholders") {
        options.allow_placeholders = true;
    }
    debug!(?options);
    Ok(options)
}

fn check(submatches: &ArgMatches) -> i32 {
    let prepared = schemas(submatches).and_then(|group| {
        let options = options(submatches)?;
        let content = input(submatches)?;
        Ok((group, options, content))
    });
    let (group, options, content) = match prepared {
        Ok(prepared) => prepared,
        Err(message) => {
            eprintln!("error: {}", message);
            return 2;
        }
    };

    let reserved = ReservedTags::standard();
    let provider = group
        .as_ref()
        .map(|group| group as &dyn SchemaProvider);
    let mut validator = HedValidator::new(provider, &reserved, options);
    let mut handler = validator.handler();

    let lines = parsing::lines(&content);
    let mut issues: Vec<Issue> = Vec::new();
    if submatches.get_flag("series") {
        let rows: Vec<&str> = lines
            .iter()
            .map(|(_, line)| *line)
            .collect();
        let (found, state) = validator.validate_series(&rows, &mut handler);
        issues.extend(found);
        if !state.is_empty() {
            info!("Still open at end: {}", state.open_names().join(", "));
        }
    } else {
        for (number, line) in &lines {
            handler.push_error_context(ContextType::Line, *number);
            issues.extend(validator.validate(line, &mut handler));
            handler.pop_error_context();
        }
    }

    let failed = issues
        .iter()
        .any(Issue::is_error);
    if let Some(limit) = submatches.get_one::<usize>("limit") {
        let (kept, totals) = filter_issues_by_count(&issues, *limit, false);
        for (code, total) in totals {
            if total > *limit {
                info!("{} reported {} of {} times", code, limit, total);
            }
        }
        issues = kept;
    }

    if !issues.is_empty() {
        let title = format!("{} lines checked", lines.len());
        let report = if submatches.get_flag("html") {
            html_issues(&issues, Some(&title), false, Some(DOCUMENTATION_URL))
        } else if submatches.get_flag("raw-control-chars") || std::io::stdout().is_terminal() {
            printable_issues(&issues, Some(&title), false, &Terminal)
        } else {
            printable_issues(&issues, Some(&title), false, &Identity)
        };
        print!("{}", report);
    }

    if failed {
        1
    } else {
        0
    }
}

fn convert(submatches: &ArgMatches) -> i32 {
    let prepared = schemas(submatches).and_then(|group| Ok((group, input(submatches)?)));
    let (group, content) = match prepared {
        Ok((Some(group), content)) => (group, content),
        Ok((None, _)) => {
            eprintln!("error: a schema is required");
            return 2;
        }
        Err(message) => {
            eprintln!("error: {}", message);
            return 2;
        }
    };

    let reserved = ReservedTags::standard();
    let validator = HedValidator::new(Some(&group), &reserved, ValidatorOptions::default());
    let mut failed = false;

    for (number, line) in parsing::lines(&content) {
        let (hed, issues) = validator.parse(line);
        let errors: Vec<&Issue> = issues
            .iter()
            .filter(|issue| issue.is_error())
            .collect();
        if !errors.is_empty() {
            for issue in errors {
                eprintln!("line {}: {}: {}", number, issue.code, issue.message);
            }
            failed = true;
            continue;
        }
        if submatches.get_flag("short") {
            println!("{}", hed.short_form_text());
        } else {
            println!("{}", hed.long_form_text());
        }
    }

    if failed {
        1
    } else {
        0
    }
}
