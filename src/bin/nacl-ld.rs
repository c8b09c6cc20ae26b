//! CLI driver: parses arguments, resolves library search paths, reads
//! every input fully into memory, and runs the sniff -> decode -> extract
//! -> resolve pipeline.
//!
//! This is the "external collaborator" layer spec.md scopes out of the
//! core (command-line parsing, filesystem search-path resolution): it is
//! a thin binary over [`nacl_ld::orchestrate::link`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use nacl_ld::config::LinkConfig;
use nacl_ld::error::{Error, ErrorContext};
use nacl_ld::orchestrate::link;
use nacl_ld::search_paths::resolve_paths;

/// A small static linker core for ELF objects targeting Native Client.
#[derive(Debug, Parser)]
#[command(name = "nacl-ld", version, about)]
struct Args {
    /// Output filename.
    #[arg(short = 'o', long = "output", default_value = "a.out")]
    output: PathBuf,

    /// Add a library search path. May be repeated.
    #[arg(short = 'L', action = clap::ArgAction::Append)]
    search_path: Vec<PathBuf>,

    /// Link against a library. May be repeated; resolved against
    /// search paths and appended after positional inputs.
    #[arg(short = 'l', action = clap::ArgAction::Append)]
    library: Vec<String>,

    /// Entry-point symbol name.
    #[arg(short = 'e', long = "entry", default_value = "_start")]
    entry: String,

    /// Non-library input files.
    inputs: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = LinkConfig {
        output: args.output,
        entry: args.entry,
        search_paths: args.search_path,
        libraries: args.library,
        inputs: args.inputs,
        fail_on_unresolved: true,
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("nacl-ld: error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &LinkConfig) -> Result<(), String> {
    log::info!("writing to {}", config.output.display());
    log::info!("search paths: {:?}", config.search_paths);

    let lib_paths = resolve_paths(&config.libraries, &config.search_paths)
        .map_err(|e| e.to_string())?;

    let mut all_paths: Vec<PathBuf> = config.inputs.iter().map(PathBuf::from).collect();
    all_paths.extend(lib_paths);

    let mut blobs = Vec::with_capacity(all_paths.len());
    for path in &all_paths {
        let data = read_fully(path).map_err(|e| e.to_string())?;
        blobs.push((path.display().to_string(), data));
    }

    let result = link(blobs).map_err(|e| e.to_string())?;

    log::info!("decoded {} unit(s)", result.units.len());
    let unresolved = result.unresolved();
    for (unit, symbol) in &unresolved {
        log::warn!("unresolved symbol {symbol:?} referenced from {unit}");
    }

    if !unresolved.is_empty() && config.fail_on_unresolved {
        return Err(format!(
            "{} unresolved symbol(s), entry point {:?} not verified",
            unresolved.len(),
            config.entry
        ));
    }

    let _shell = nacl_ld::layout::do_layout(&result.units);
    log::info!(
        "layout stage is a stub; {} would be written with entry {:?} (not implemented)",
        config.output.display(),
        config.entry
    );

    Ok(())
}

fn read_fully(path: &std::path::Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| Error::Io {
        kind: e.kind(),
        context: ErrorContext::file(path.display().to_string()),
    })
}
