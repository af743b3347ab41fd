//! Sets the simulation code up after checkout: writes the version-specific
//! sources, points the makefile at the local libraries, optionally compiles,
//! and links the binaries into the binary directory.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod steps;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::Parser;
use log::{LevelFilter, error, info};

use crate::config::SetupConfig;
use crate::errors::SetupError;

/// The arguments passed to the setup.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Cli {
  /// The setup file.
  #[arg(default_value = "setup.toml")]
  config: PathBuf,
  /// Compile the code once it's set up.
  #[arg(long = "compile")]
  compile: bool,
  /// Switches passed to make when compiling.
  #[arg(long = "switches", default_value = "", allow_hyphen_values = true)]
  switches: String,
  /// Run `make clean` at the end.
  #[arg(long = "clean")]
  clean: bool,
  /// Output extra/debug info.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
}

/// Runs every step of the setup.
fn run(args: &Cli) -> Result<(), SetupError> {
  let config = SetupConfig::from_file(&args.config)?;
  let written = steps::write_variants(&config)?;
  info!("Wrote {} version-specific file(s).", written.len());
  if !config.paths.is_empty() {
    let changed = steps::rewrite_makefile(&config)?;
    info!("Set {} makefile variable(s).", changed);
  }
  if args.compile {
    steps::compile(&config, &args.switches)?;
  }
  if args.clean {
    steps::make(&config.basedir, &["clean"])?;
  }
  let links = steps::link_binaries(&config)?;
  info!("Made {} link(s).", links.len());
  return Ok(());
}

fn main() {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  if let Err(e) = run(&args) {
    error!("{}", e);
    std::process::exit(1);
  }
}
