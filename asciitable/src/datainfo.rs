//! This module describes the kinds of data a filter can be asked to work on,
//! and the special values formulas can refer to.

use std::fmt::Display;

use log::warn;

use crate::labels::{ColumnRange, LabelIndex, Lookup};

/// The kinds of multi-component data found in tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKind {
  /// Three components.
  Vector,
  /// Nine components, a 3x3 tensor flattened row by row.
  Tensor,
}

impl FieldKind {
  /// Number of columns a datum of this kind takes.
  pub const fn components(&self) -> usize {
    return match self {
      Self::Vector => 3,
      Self::Tensor => 9,
    };
  }

  /// Number of 3-vectors this kind stacks.
  pub const fn rows(&self) -> usize {
    return self.components() / 3;
  }

  /// Lowercase name of the kind.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Vector => "vector",
      Self::Tensor => "tensor",
    };
  }
}

impl Display for FieldKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// A requested datum: its kind and base label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
  /// What kind of data.
  pub kind: FieldKind,
  /// The base label, without component prefix.
  pub label: String,
}

/// A requested datum that was found in a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveField {
  /// What kind of data.
  pub kind: FieldKind,
  /// The base label.
  pub label: String,
  /// Where the data is.
  pub columns: ColumnRange,
}

/// All the data a filter was asked to work on, in request order.
#[derive(Clone, Debug, Default)]
pub struct DataInfo {
  /// The requests.
  requests: Vec<Request>,
}

impl DataInfo {
  /// Starts with no requests.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Adds requests for several labels of one kind.
  pub fn with<S: AsRef<str>>(mut self, kind: FieldKind, labels: &[S]) -> Self {
    self.requests.extend(labels.iter().map(|l| Request {
      kind,
      label: l.as_ref().to_owned(),
    }));
    return self;
  }

  /// Whether nothing was requested.
  pub fn is_empty(&self) -> bool {
    return self.requests.is_empty();
  }

  /// The requests, in order.
  pub fn requests(&self) -> &[Request] {
    return &self.requests;
  }

  /// Looks every request up in a table. Missing ones are reported and left
  /// out; the rest are returned in request order.
  pub fn resolve(&self, index: &LabelIndex) -> Vec<ActiveField> {
    let mut active = Vec::new();
    for req in self.requests.iter() {
      match index.locate(&req.label, req.kind.components()) {
        Lookup::Found(columns) => active.push(ActiveField {
          kind: req.kind,
          label: req.label.clone(),
          columns,
        }),
        Lookup::NotFound(key) => warn!("column {} not found...", key),
      }
    }
    return active;
  }
}

/// Special values a formula can refer to instead of a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Special {
  /// The 1-based number of the current data row.
  Row,
}

impl Special {
  /// Returns all special values.
  pub const fn all() -> &'static [Self] {
    return &[Self::Row];
  }

  /// The name used to refer to it inside `#...#`.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Row => "_row_",
    };
  }

  /// Finds the special with a given name.
  pub fn from_name(name: &str) -> Option<Self> {
    return Self::all().iter().copied().find(|s| s.name() == name);
  }

  /// Current value of the special.
  pub fn value(&self, specials: &Specials) -> f64 {
    return match self {
      Self::Row => specials.row as f64,
    };
  }
}

/// The live values of the specials.
#[derive(Copy, Clone, Debug, Default)]
pub struct Specials {
  /// Current row number; zero before the first row is counted.
  pub row: usize,
}
