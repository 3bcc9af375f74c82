use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of AVAILABLE_VIEWS in src/inspect.rs; build scripts can't reach src/ modules.
const AVAILABLE_VIEWS: &[&str] = &[
    "nodes",
    "node-tree",
    "operations",
    "requests",
    "table-layout",
];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let input = || {
        Arg::new("input")
            .help("Path to the wiki page source")
            .required(true)
            .index(1)
            .value_hint(ValueHint::FilePath)
    };

    let mut cmd = Command::new("factuator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert wiki pages into document edit batches")
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
                .arg(input())
                .arg(Arg::new("title").long("title"))
                .arg(
                    Arg::new("mappings")
                        .long("mappings")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("assets")
                        .long("assets")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("no-title").long("no-title").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("no-source-link")
                        .long("no-source-link")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .arg(input())
                .arg(
                    Arg::new("view")
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS)),
                )
                .arg(Arg::new("title").long("title")),
        )
        .subcommand(
            Command::new("relink")
                .arg(
                    Arg::new("document")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("mappings")
                        .long("mappings")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        );

    generate_to(Bash, &mut cmd, "factuator", &outdir)?;
    generate_to(Zsh, &mut cmd, "factuator", &outdir)?;
    generate_to(Fish, &mut cmd, "factuator", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
