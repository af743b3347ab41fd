//! This module runs a table transform over every file given to a filter.
//!
//! Without files, the table is read from standard input and written to
//! standard output. Files are modified in place: the new table is staged in a
//! temporary file next to the original and only renamed over it once it was
//! written completely. If anything fails, the temporary file is dropped and
//! the original stays as it was.

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::table::AsciiTable;
use crate::transforms::Outcome;

/// Anything a table can be read from.
pub trait TableSource: BufRead + Seek {}

impl<T: BufRead + Seek> TableSource for T {}

/// The table type filters work with.
pub type Table = AsciiTable<Box<dyn TableSource>, BufWriter<Box<dyn Write>>>;

/// Where a table comes from and goes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
  /// Standard input to standard output.
  Stdio,
  /// A file, modified in place.
  File(PathBuf),
}

impl Target {
  /// Turns command-line paths into targets. No paths means standard input;
  /// paths that don't exist are skipped.
  pub fn from_paths(paths: &[PathBuf]) -> Vec<Self> {
    if paths.is_empty() {
      return vec![Self::Stdio];
    }
    return paths.iter()
      .filter(|p| {
        let exists = p.exists();
        if !exists {
          debug!("Skipping {}, it doesn't exist.", p.display());
        }
        exists
      })
      .map(|p| Self::File(p.clone()))
      .collect();
  }
}

/// A filter run over a list of targets.
#[derive(Clone, Debug)]
pub struct Batch {
  /// The filter's name, for messages.
  name: String,
  /// The provenance line appended to every table's header.
  provenance: String,
  /// Whether tables hold their output until done.
  buffered: bool,
  /// What to process.
  targets: Vec<Target>,
}

impl Batch {
  /// Sets up a batch. The provenance line records the tool, its version and
  /// the arguments it was called with.
  pub fn new<S: AsRef<str>>(
    name: &str,
    version: &str,
    args: &[S],
    paths: &[PathBuf],
  ) -> Self {
    let args = args.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
    return Self {
      name: name.to_owned(),
      provenance: format!("{} {}\t{}", name, version, args),
      buffered: false,
      targets: Target::from_paths(paths),
    };
  }

  /// Makes tables hold all of their output until they're finished.
  pub fn buffered(mut self, buffered: bool) -> Self {
    self.buffered = buffered;
    return self;
  }

  /// The targets that will be processed.
  pub fn targets(&self) -> &[Target] {
    return &self.targets;
  }

  /// Runs a transform over every target. Failures are reported and the rest
  /// carry on. Returns how many targets failed.
  pub fn run<F>(&self, mut transform: F) -> usize
  where
    F: FnMut(&mut Table) -> Result<Outcome, Box<dyn Error>>,
  {
    let mut failures = 0;
    for target in self.targets.iter() {
      let res = match target {
        Target::Stdio => {
          info!("{}", self.name);
          self.run_stdio(&mut transform)
        },
        Target::File(p) => {
          info!("{}: {}", self.name, p.display());
          self.run_file(p, &mut transform)
        },
      };
      match res {
        Ok(Outcome::Written) => {},
        Ok(Outcome::Skipped) => info!("skipped"),
        Err(e) => {
          error!("{}", e);
          failures += 1;
        },
      }
    }
    return failures;
  }

  /// Reads the header, runs the transform and flushes the output.
  fn process<F>(
    &self,
    mut table: Table,
    transform: &mut F,
  ) -> Result<Outcome, Box<dyn Error>>
  where
    F: FnMut(&mut Table) -> Result<Outcome, Box<dyn Error>>,
  {
    table.head_read()?;
    table.info_append(self.provenance.clone());
    let outcome = transform(&mut table)?;
    if outcome == Outcome::Written {
      table.output_flush()?;
      let (_, out) = table.into_parts();
      out.into_inner().map_err(|e| e.into_error())?.flush()?;
    }
    return Ok(outcome);
  }

  /// Standard input can't be rewound, so it's read whole first.
  fn run_stdio<F>(&self, transform: &mut F) -> Result<Outcome, Box<dyn Error>>
  where
    F: FnMut(&mut Table) -> Result<Outcome, Box<dyn Error>>,
  {
    let mut buf = Vec::new();
    io::stdin().lock().read_to_end(&mut buf)?;
    let input: Box<dyn TableSource> = Box::new(Cursor::new(buf));
    let output: Box<dyn Write> = Box::new(io::stdout());
    let table = AsciiTable::with_buffering(
      input,
      BufWriter::new(output),
      self.buffered,
    );
    return self.process(table, transform);
  }

  /// Stages the new table next to the file and renames it over the file
  /// only once it was written in full.
  fn run_file<F>(
    &self,
    path: &Path,
    transform: &mut F,
  ) -> Result<Outcome, Box<dyn Error>>
  where
    F: FnMut(&mut Table) -> Result<Outcome, Box<dyn Error>>,
  {
    let dir = match path.parent() {
      Some(d) if !d.as_os_str().is_empty() => d,
      _ => Path::new("."),
    };
    let input: Box<dyn TableSource> = Box::new(BufReader::new(File::open(path)?));
    let (staged, staged_path) = tempfile::Builder::new()
      .prefix(".")
      .suffix("_tmp")
      .tempfile_in(dir)?
      .into_parts();
    let output: Box<dyn Write> = Box::new(staged);
    let table = AsciiTable::with_buffering(
      input,
      BufWriter::new(output),
      self.buffered,
    );
    let outcome = self.process(table, transform)?;
    if outcome == Outcome::Written {
      // the staged file is private, the table keeps its own permissions
      fs::set_permissions(&staged_path, fs::metadata(path)?.permissions())?;
      staged_path.persist(path)?;
      debug!("Replaced {}.", path.display());
    }
    // otherwise the staged file is removed when its path drops
    return Ok(outcome);
  }
}
