// Command-line interface for factuator
//
// Converts a single wiki page source file into the batch of edit requests that
// rebuilds it in a destination document, and repairs placeholder links in a
// document fetched from the destination once more pages have been converted.
//
// Talking to the wiki and to the document service is left to the caller: this
// binary reads and writes files, so batches can be reviewed before they are
// sent.
//
// Usage:
//  factuator convert <page.wiki> [--title <title>] [--mappings <file>] [--assets <dir>] [-o <file>]
//  factuator inspect <page.wiki> [<view>]       - Show an intermediate stage (defaults to "node-tree")
//  factuator relink <document.json> [--mappings <file>] [-o <file>]
//
// Configuration is read from the built-in defaults, then ./factuator.toml, then --config.

use factuator_cli::inspect::{self, AVAILABLE_VIEWS, DEFAULT_VIEW};

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use factuator_babel::assets::{AssetSource, DirectoryAssets, NoAssets};
use factuator_babel::ir::document::Document;
use factuator_babel::ir::operations::Operation;
use factuator_babel::ir::requests::BatchUpdate;
use factuator_babel::relink::relink;
use factuator_babel::{convert_page, ConvertOptions, Mappings, Translator};
use factuator_config::{FactuatorConfig, Loader};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

fn build_cli() -> Command {
    Command::new("factuator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert wiki pages into document edit batches")
        .long_about(
            "factuator turns wiki markup into the positional edit requests of a document service.\n\n\
            Commands:\n  \
            - convert: Produce the request batch for one page\n  \
            - inspect: View intermediate stages (nodes, operations, table layout)\n  \
            - relink:  Repair placeholder links in a fetched document\n\n\
            Examples:\n  \
            factuator convert Lab_safety.wiki -o batch.json\n  \
            factuator inspect Lab_safety.wiki table-layout\n  \
            factuator relink document.json --mappings mappings.json"
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a factuator.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log progress to stderr (-vv for debug output)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a wiki page into a request batch")
                .long_about(
                    "Convert one wiki page into the JSON batch of edit requests that\n\
                    rebuilds it in an empty destination document.\n\n\
                    The page title defaults to the file name, with underscores read as spaces.\n\
                    Output goes to stdout by default, or use -o to specify a file."
                )
                .arg(input_arg())
                .arg(title_arg())
                .arg(mappings_arg())
                .arg(
                    Arg::new("assets")
                        .long("assets")
                        .value_name("DIR")
                        .help("Directory of downloaded wiki files used for inline images")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(output_arg())
                .arg(
                    Arg::new("no-title")
                        .long("no-title")
                        .help("Do not insert the page title heading")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-source-link")
                        .long("no-source-link")
                        .help("Do not insert the link back to the wiki page")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect intermediate stages of a conversion")
                .arg(input_arg())
                .arg(
                    Arg::new("view")
                        .help("View to show. Defaults to 'node-tree'")
                        .required(false)
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS))
                        .value_hint(ValueHint::Other),
                )
                .arg(title_arg())
                .arg(mappings_arg()),
        )
        .subcommand(
            Command::new("relink")
                .about("Repair placeholder links in a fetched destination document")
                .long_about(
                    "Reads a document as returned by the destination service and writes the\n\
                    batch of link updates for every placeholder link whose target now has a\n\
                    document. An empty batch means nothing can be repaired yet."
                )
                .arg(
                    Arg::new("document")
                        .help("Path to the fetched document JSON")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(mappings_arg())
                .arg(output_arg()),
        )
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Path to the wiki page source")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn title_arg() -> Arg {
    Arg::new("title")
        .long("title")
        .help("Page title (defaults to the file name)")
}

fn mappings_arg() -> Arg {
    Arg::new("mappings")
        .long("mappings")
        .value_name("PATH")
        .help("Title/document mapping file (defaults to the configured path)")
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let config = load_cli_config(&matches, convert_overrides(sub_matches));
            handle_convert_command(sub_matches, &config);
        }
        Some(("inspect", sub_matches)) => {
            let config = load_cli_config(&matches, Vec::new());
            handle_inspect_command(sub_matches, &config);
        }
        Some(("relink", sub_matches)) => {
            let config = load_cli_config(&matches, Vec::new());
            handle_relink_command(sub_matches, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::builder()
        .filter_module("factuator_babel", level)
        .filter_module("factuator", level)
        .format_timestamp(None)
        .try_init();
}

fn handle_convert_command(matches: &ArgMatches, config: &FactuatorConfig) {
    let input = required(matches, "input");
    let source = read_input(input);
    let title = page_title(matches, input);
    let mappings = load_mappings(matches, config);
    let options = ConvertOptions::from(config);

    let assets: Box<dyn AssetSource> = match assets_directory(matches, config) {
        Some(dir) => Box::new(DirectoryAssets::new(dir, config.assets.http_prefix.clone())),
        None => Box::new(NoAssets),
    };
    let translator = Translator::new(&options, &mappings, assets.as_ref());

    let conversion = convert_page(&title, &source, &translator);
    log::info!(
        "{title}: {} operations, {} linked page(s) already converted",
        conversion.operation_count(),
        conversion.linked_titles.len()
    );
    write_json(&conversion.batch(), matches.get_one::<String>("output"));
}

fn handle_inspect_command(matches: &ArgMatches, config: &FactuatorConfig) {
    let input = required(matches, "input");
    let source = read_input(input);
    let title = page_title(matches, input);
    let view = matches
        .get_one::<String>("view")
        .map(String::as_str)
        .unwrap_or(DEFAULT_VIEW);
    let mappings = load_mappings(matches, config);
    let options = ConvertOptions::from(config);
    let translator = Translator::new(&options, &mappings, &NoAssets);

    match inspect::execute_view(&source, &title, view, &translator) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn handle_relink_command(matches: &ArgMatches, config: &FactuatorConfig) {
    let path = required(matches, "document");
    let raw = read_input(path);
    let document: Document = serde_json::from_str(&raw).unwrap_or_else(|e| {
        eprintln!("Error reading document '{path}': {e}");
        std::process::exit(1);
    });
    let mappings = load_mappings(matches, config);
    let options = ConvertOptions::from(config);

    let operations = relink(&document, &mappings, &options);
    log::info!("{path}: {} link(s) can be repaired", operations.len());
    let batch = BatchUpdate {
        requests: operations.iter().flat_map(Operation::to_requests).collect(),
    };
    write_json(&batch, matches.get_one::<String>("output"));
}

fn convert_overrides(matches: &ArgMatches) -> Vec<(&'static str, bool)> {
    let mut overrides = Vec::new();
    if matches.get_flag("no-title") {
        overrides.push(("convert.include_title", false));
    }
    if matches.get_flag("no-source-link") {
        overrides.push(("convert.include_source_link", false));
    }
    overrides
}

fn load_cli_config(matches: &ArgMatches, overrides: Vec<(&str, bool)>) -> FactuatorConfig {
    let loader = Loader::new().with_optional_file("factuator.toml");
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => loader.with_file(path),
        None => loader,
    };
    for (key, value) in overrides {
        loader = loader.set_override(key, value).unwrap_or_else(|err| {
            eprintln!("Invalid setting {key}: {err}");
            std::process::exit(1);
        });
    }

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn load_mappings(matches: &ArgMatches, config: &FactuatorConfig) -> Mappings {
    let path = matches
        .get_one::<String>("mappings")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.mappings.path.clone());
    Mappings::load(&path).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    })
}

fn assets_directory(matches: &ArgMatches, config: &FactuatorConfig) -> Option<PathBuf> {
    matches
        .get_one::<String>("assets")
        .map(PathBuf::from)
        .or_else(|| config.assets.directory.clone())
}

/// `--title`, or the file stem with underscores read as spaces.
fn page_title(matches: &ArgMatches, input: &str) -> String {
    if let Some(title) = matches.get_one::<String>("title") {
        return title.clone();
    }
    Path::new(input)
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace('_', " "))
        .unwrap_or_else(|| input.to_string())
}

fn required<'m>(matches: &'m ArgMatches, name: &str) -> &'m str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| {
            eprintln!("Missing argument: {name}");
            std::process::exit(1);
        })
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&String>) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, format!("{json}\n")) {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            }
            log::info!("wrote {path}");
        }
        None => println!("{json}"),
    }
}
