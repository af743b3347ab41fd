//! Adds the curl of vector and tensor fields as new columns, computed in
//! Fourier space.
//!
//! The table must hold a complete, periodic, regular grid with its rows in
//! x-fastest order. The grid's resolution and size are worked out from the
//! coordinate columns.

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
  /// Label of the cell-center coordinates, as in `1_ip` or `ip.x`.
  #[arg(short = 'c', long = "coordinates", default_value = "ip")]
  coordinates: String,
  /// Labels of the vector fields to curl. Can be specified more than once,
  /// or comma-separated.
  #[arg(short = 'v', long = "vector", value_delimiter = ',')]
  vectors: Vec<String>,
  /// Labels of the tensor fields to curl. Can be specified more than once,
  /// or comma-separated.
  #[arg(short = 't', long = "tensor", value_delimiter = ',')]
  tensors: Vec<String>,
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
  let info = DataInfo::new()
    .with(FieldKind::Vector, &args.vectors)
    .with(FieldKind::Tensor, &args.tensors);
  if info.is_empty() {
    Cli::command().error(
      ErrorKind::MissingRequiredArgument,
      "no data column specified..."
    ).exit();
  }
  // go through the tables; the whole grid is needed before anything can be
  // written, so output is held until the end
  let argv = std::env::args().skip(1).collect::<Vec<_>>();
  let batch = Batch::new(
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION"),
    &argv,
    &args.files
  ).buffered(true);
  let failures = batch.run(|table| Ok(add_curl(table, &info, &args.coordinates)?));
  if failures > 0 {
    std::process::exit(1);
  }
}
