//! Contains the error types for table handling and formula evaluation.

use std::error::Error;
use std::fmt::Display;
use std::io;

/// Errors that come up while reading, transforming or writing a table.
#[derive(Debug)]
#[non_exhaustive]
pub enum TableError {
  /// The underlying reader or writer failed.
  Io(io::Error),
  /// The input ended before a complete header could be read.
  TruncatedHeader,
  /// Tried to modify the labels after the header was already written.
  HeaderWritten,
  /// A row was written with a different number of fields than labels.
  RowWidth {
    /// The 1-based data row.
    row: usize,
    /// The number of labels.
    expected: usize,
    /// The number of fields in the row buffer.
    found: usize,
  },
  /// A row ended before a requested column.
  ShortRow {
    /// The 1-based data row.
    row: usize,
    /// The first column that was missing.
    column: usize,
  },
  /// A field that should hold a number doesn't.
  NotNumeric {
    /// The 1-based data row.
    row: usize,
    /// The 0-based column.
    column: usize,
    /// The offending text.
    value: String,
  },
  /// A formula failed on a given row.
  Formula {
    /// The label the formula computes.
    label: String,
    /// The 1-based data row.
    row: usize,
    /// What went wrong.
    source: FormulaError,
  },
  /// A formula changed its result width between rows.
  ResultWidth {
    /// The label the formula computes.
    label: String,
    /// The 1-based data row.
    row: usize,
    /// Width taken from the first row.
    expected: usize,
    /// Width found in this row.
    found: usize,
  },
  /// The number of rows doesn't fill the inferred grid exactly.
  GridMismatch {
    /// Rows read.
    rows: usize,
    /// Cells in the inferred grid.
    cells: usize,
  },
}

impl Display for TableError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Io(e) => e.fmt(f),
      Self::TruncatedHeader => write!(f, "table ended inside its header"),
      Self::HeaderWritten => write!(f, "header was already written"),
      Self::RowWidth { row, expected, found } => write!(
        f,
        "row {} has {} fields but the table has {} labels",
        row,
        found,
        expected
      ),
      Self::ShortRow { row, column } => write!(
        f,
        "row {} ends before column {}",
        row,
        column
      ),
      Self::NotNumeric { row, column, value } => write!(
        f,
        "row {}, column {}: \"{}\" is not a number",
        row,
        column,
        value
      ),
      Self::Formula { label, row, source } => write!(
        f,
        "formula for {} failed on row {}: {}",
        label,
        row,
        source
      ),
      Self::ResultWidth { label, row, expected, found } => write!(
        f,
        "formula for {} gave {} values on row {}, expected {}",
        label,
        found,
        row,
        expected
      ),
      Self::GridMismatch { rows, cells } => write!(
        f,
        "{} rows don't fill a grid of {} cells",
        rows,
        cells
      ),
    };
  }
}

impl Error for TableError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    return match self {
      Self::Io(e) => Some(e),
      Self::Formula { source, .. } => Some(source),
      _ => None,
    };
  }
}

impl From<io::Error> for TableError {
  fn from(value: io::Error) -> Self {
    return Self::Io(value);
  }
}

/// Errors when compiling or evaluating a formula.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum FormulaError {
  /// Found text that isn't a token of the formula language.
  Lex {
    /// Byte offset of the bad text.
    pos: usize,
    /// The bad text.
    text: String,
  },
  /// The tokens don't make up an expression.
  Syntax(String),
  /// A bare name that isn't a known constant.
  UnknownName(String),
  /// A call to something that isn't in the function table.
  UnknownFunction(String),
  /// Column references that match neither a special nor a label.
  Unresolved(Vec<String>),
  /// A function got the wrong number of arguments.
  Arity {
    /// The function name.
    function: &'static str,
    /// Arguments given.
    given: usize,
  },
  /// Two arrays of different lengths met in an elementwise operation.
  Shape {
    /// Length on the left.
    left: usize,
    /// Length on the right.
    right: usize,
  },
  /// A referenced field isn't a number.
  NotNumeric {
    /// The 0-based column.
    column: usize,
    /// The offending text.
    value: String,
  },
  /// A referenced column is past the end of the row.
  MissingField(usize),
}

impl Display for FormulaError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Lex { pos, text } => {
        write!(f, "unexpected \"{}\" at position {}", text, pos)
      },
      Self::Syntax(s) => write!(f, "syntax error: {}", s),
      Self::UnknownName(n) => write!(f, "unknown name {}", n),
      Self::UnknownFunction(n) => write!(f, "unknown function {}", n),
      Self::Unresolved(cols) => {
        write!(f, "column(s) {} not found", cols.join(", "))
      },
      Self::Arity { function, given } => write!(
        f,
        "{} can't take {} argument(s)",
        function,
        given
      ),
      Self::Shape { left, right } => write!(
        f,
        "can't combine arrays of lengths {} and {}",
        left,
        right
      ),
      Self::NotNumeric { column, value } => write!(
        f,
        "column {} holds \"{}\", not a number",
        column,
        value
      ),
      Self::MissingField(c) => write!(f, "row has no column {}", c),
    };
  }
}

impl Error for FormulaError {}
