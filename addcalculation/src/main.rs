//! Adds columns with values derived from other columns by user-given formulas.
//!
//! Columns are referred to as `#label#`, `#index#` (0-based) or `#_row_#` for
//! the row counter. Use ';' instead of ',' inside formulas, since commas split
//! the option lists. Example, the distance of a point from the origin:
//!
//!   addcalculation -l dist -f "math.sqrt(#1_ip#**2 + #2_ip#**2)" table.txt

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
  /// New column labels. Can be specified more than once, or comma-separated.
  #[arg(short = 'l', long = "label", value_delimiter = ',', allow_hyphen_values = true)]
  labels: Vec<String>,
  /// Formulas, one per label. Can be specified more than once, or
  /// comma-separated.
  #[arg(short = 'f', long = "formula", value_delimiter = ',', allow_hyphen_values = true)]
  formulas: Vec<String>,
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
  if args.labels.len() != args.formulas.len() {
    Cli::command().error(
      ErrorKind::WrongNumberOfValues,
      format!(
        "number of labels ({}) and formulas ({}) do not match",
        args.labels.len(),
        args.formulas.len()
      )
    ).exit();
  }
  let requests = args.labels.iter()
    .cloned()
    .zip(args.formulas.iter().cloned())
    .collect::<Vec<(String, String)>>();
  // go through the tables
  let argv = std::env::args().skip(1).collect::<Vec<_>>();
  let batch = Batch::new(
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION"),
    &argv,
    &args.files
  );
  let failures = batch.run(|table| Ok(add_calculation(table, &requests)?));
  if failures > 0 {
    std::process::exit(1);
  }
}
