//! Adds the deviatoric part of tensors, and optionally their hydrostatic
//! (spherical) part, as new columns.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use asciitable::prelude::*;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::LevelFilter;

/// The arguments passed to the filter.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Cli {
  /// Labels of the tensors to decompose, without the `1_` prefix. Can be
  /// specified more than once, or comma-separated.
  #[arg(short = 't', long = "tensor", value_delimiter = ',')]
  tensors: Vec<String>,
  /// Also add the hydrostatic part of every tensor.
  #[arg(short = 's', long = "spherical")]
  spherical: bool,
  /// Output extra/debug info while processing.
  #[arg(long = "verbose")]
  verbose: bool,
  /// Tables to modify in place. If absent, reads standard input and writes
  /// standard output.
  files: Vec<PathBuf>,
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
  if args.tensors.is_empty() {
    Cli::command().error(
      ErrorKind::MissingRequiredArgument,
      "no data column specified..."
    ).exit();
  }
  // go through the tables
  let argv = std::env::args().skip(1).collect::<Vec<_>>();
  let batch = Batch::new(
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION"),
    &argv,
    &args.files
  );
  let failures = batch.run(|table| {
    Ok(add_deviator(table, &args.tensors, args.spherical)?)
  });
  if failures > 0 {
    std::process::exit(1);
  }
}
