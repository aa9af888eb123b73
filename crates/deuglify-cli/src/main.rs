#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::missing_errors_doc)]

mod logging;

use clap::Parser;
use deuglify_core::{deuglify, Config, Error};
use miette::{IntoDiagnostic, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "deuglify")]
#[command(author, version, about = "Turn minified JavaScript back into readable code", long_about = None)]
struct Cli {
    /// JavaScript file to read (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Skip the expansion pass
    #[arg(long)]
    no_expand: bool,

    /// Skip renaming of single-character bindings
    #[arg(long)]
    no_mangle: bool,

    /// Parse the input as an ECMAScript module
    #[arg(long)]
    module: bool,

    /// Spaces per indentation level
    #[arg(long, value_name = "N", default_value_t = 2)]
    indent: usize,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config::default()
            .with_expand(!self.no_expand)
            .with_mangle(!self.no_mangle)
            .with_module(self.module)
            .with_indent(self.indent)
    }
}

fn read_input(file: Option<&Path>) -> deuglify_core::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| Error::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(source)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);
    let config = cli.config();
    debug!(version = %deuglify_core::version_string(&config), "starting");

    let source = read_input(cli.file.as_deref()).into_diagnostic()?;
    let output = deuglify(&source, &config).into_diagnostic()?;
    debug!(report = ?output.report, "transformed");

    let mut code = output.code;
    if !code.ends_with('\n') {
        code.push('\n');
    }
    std::io::stdout()
        .lock()
        .write_all(code.as_bytes())
        .into_diagnostic()?;
    Ok(())
}
