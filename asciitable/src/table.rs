//! This module implements the ASCII table itself: a header made of info lines
//! and a label line, then whitespace-separated data rows.
//!
//! The table doesn't hold its rows. It keeps one row buffer that is filled by
//! [`AsciiTable::data_read`], extended with derived values by
//! [`AsciiTable::data_append`] and written out by [`AsciiTable::data_write`].
//! The input must be seekable so the data section can be walked more than
//! once.

use std::io::{BufRead, Seek, SeekFrom, Write};

use itertools::Itertools;
use log::debug;

use crate::errors::TableError;
use crate::labels::{ColumnRange, LabelIndex};
use crate::util::{header_count, parse_real};

/// A table being streamed from an input to an output.
pub struct AsciiTable<R, W> {
  /// Where the table comes from.
  input: R,
  /// Where the table goes.
  output: W,
  /// If set, output lines are held until [`AsciiTable::output_flush`].
  buffered: bool,
  /// Lines held back by a buffered table.
  pending: Vec<String>,
  /// The header info lines, provenance history included.
  info: Vec<String>,
  /// The column labels.
  labels: Vec<String>,
  /// Number of labels the input rows have.
  input_width: usize,
  /// Whether the header went out already.
  header_written: bool,
  /// Byte offset of the first data row.
  data_start: u64,
  /// Data rows read since the last rewind.
  rows_read: usize,
  /// The current row buffer.
  data: Vec<String>,
}

impl<R: BufRead + Seek, W: Write> AsciiTable<R, W> {
  /// Creates an unbuffered table.
  pub fn new(input: R, output: W) -> Self {
    return Self::with_buffering(input, output, false);
  }

  /// Creates a table, optionally holding all output until flushed.
  pub fn with_buffering(input: R, output: W, buffered: bool) -> Self {
    return Self {
      input,
      output,
      buffered,
      pending: Vec::new(),
      info: Vec::new(),
      labels: Vec::new(),
      input_width: 0,
      header_written: false,
      data_start: 0,
      rows_read: 0,
      data: Vec::new(),
    };
  }

  /// Reads the next line, without its line terminator.
  fn next_line(&mut self) -> Result<Option<String>, TableError> {
    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    return Ok(Some(line));
  }

  /// Reads the header: info lines and labels. Tables that start with a
  /// `<N> header` line have N-1 info lines before the labels; tables that
  /// don't are taken to have their first line as the only info line.
  pub fn head_read(&mut self) -> Result<(), TableError> {
    self.input.seek(SeekFrom::Start(0))?;
    let first = self.next_line()?.ok_or(TableError::TruncatedHeader)?;
    self.info.clear();
    if let Some(n) = header_count(&first) {
      for _ in 1..n {
        let line = self.next_line()?.ok_or(TableError::TruncatedHeader)?;
        self.info.push(line.trim().to_owned());
      }
    } else {
      debug!("No header count line, assuming a single info line.");
      self.info.push(first.trim().to_owned());
    }
    let label_line = self.next_line()?.ok_or(TableError::TruncatedHeader)?;
    self.labels = label_line.split_whitespace().map(String::from).collect();
    self.input_width = self.labels.len();
    self.data_start = self.input.stream_position()?;
    self.rows_read = 0;
    debug!(
      "Read header with {} info line(s) and {} label(s).",
      self.info.len(),
      self.labels.len()
    );
    return Ok(());
  }

  /// The header info lines.
  pub fn info(&self) -> &[String] {
    return &self.info;
  }

  /// The column labels, appended ones included.
  pub fn labels(&self) -> &[String] {
    return &self.labels;
  }

  /// Builds a lookup index over the current labels.
  pub fn label_index(&self) -> LabelIndex {
    return LabelIndex::new(&self.labels);
  }

  /// Appends a line to the header info.
  pub fn info_append<S: Into<String>>(&mut self, line: S) {
    self.info.push(line.into());
  }

  /// Appends new labels after the existing ones.
  pub fn labels_append<I, S>(&mut self, labels: I) -> Result<(), TableError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    if self.header_written {
      return Err(TableError::HeaderWritten);
    }
    self.labels.extend(labels.into_iter().map(Into::into));
    return Ok(());
  }

  /// Writes the header out. The labels are frozen from here on.
  pub fn head_write(&mut self) -> Result<(), TableError> {
    if self.header_written {
      return Err(TableError::HeaderWritten);
    }
    let mut lines = Vec::with_capacity(self.info.len() + 2);
    lines.push(format!("{}\theader", self.info.len() + 1));
    lines.extend(self.info.iter().cloned());
    lines.push(self.labels.iter().join("\t"));
    for line in lines {
      self.output_write(line)?;
    }
    self.header_written = true;
    return Ok(());
  }

  /// Goes back to the first data row.
  pub fn data_rewind(&mut self) -> Result<(), TableError> {
    self.input.seek(SeekFrom::Start(self.data_start))?;
    self.rows_read = 0;
    self.data.clear();
    return Ok(());
  }

  /// Reads the next data row into the row buffer. Fields past the input's
  /// label count are dropped, blank lines are skipped. Returns false once the
  /// data runs out.
  pub fn data_read(&mut self) -> Result<bool, TableError> {
    loop {
      let line = match self.next_line()? {
        Some(l) => l,
        None => {
          self.data.clear();
          return Ok(false);
        }
      };
      if line.trim().is_empty() {
        continue;
      }
      self.data = line.split_whitespace()
        .take(self.input_width)
        .map(String::from)
        .collect();
      self.rows_read += 1;
      return Ok(true);
    }
  }

  /// The current row buffer.
  pub fn data(&self) -> &[String] {
    return &self.data;
  }

  /// The 1-based number of the current row.
  pub const fn row(&self) -> usize {
    return self.rows_read;
  }

  /// Returns a run of fields of the current row as text.
  pub fn data_str(&self, cols: ColumnRange) -> Result<&[String], TableError> {
    return self.data.get(cols.range()).ok_or(TableError::ShortRow {
      row: self.rows_read,
      column: self.data.len().max(cols.start),
    });
  }

  /// Returns a run of fields of the current row as reals.
  pub fn data_f64(&self, cols: ColumnRange) -> Result<Vec<f64>, TableError> {
    return self.data_str(cols)?
      .iter()
      .enumerate()
      .map(|(i, s)| parse_real(s).ok_or_else(|| TableError::NotNumeric {
        row: self.rows_read,
        column: cols.start + i,
        value: s.clone(),
      }))
      .collect();
  }

  /// Appends fields to the current row buffer.
  pub fn data_append<I, S>(&mut self, fields: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.data.extend(fields.into_iter().map(Into::into));
  }

  /// Writes the current row buffer. It must have one field per label.
  pub fn data_write(&mut self) -> Result<(), TableError> {
    if self.data.len() != self.labels.len() {
      return Err(TableError::RowWidth {
        row: self.rows_read,
        expected: self.labels.len(),
        found: self.data.len(),
      });
    }
    let line = self.data.iter().join("\t");
    return self.output_write(line);
  }

  /// Writes a line, or holds on to it if the table is buffered.
  fn output_write(&mut self, line: String) -> Result<(), TableError> {
    if self.buffered {
      self.pending.push(line);
    } else {
      writeln!(self.output, "{}", line)?;
    }
    return Ok(());
  }

  /// Writes out everything held back and flushes the output.
  pub fn output_flush(&mut self) -> Result<(), TableError> {
    for line in self.pending.drain(..) {
      writeln!(self.output, "{}", line)?;
    }
    self.output.flush()?;
    return Ok(());
  }

  /// Takes the table apart, returning the input and the output.
  pub fn into_parts(self) -> (R, W) {
    return (self.input, self.output);
  }
}
