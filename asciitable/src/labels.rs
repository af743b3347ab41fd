//! This module maps column labels to the columns they occupy.
//!
//! Multi-component data is stored in consecutive columns named with a numeric
//! prefix: a vector `ip` is `1_ip 2_ip 3_ip`. Older tables name coordinates
//! `ip.x ip.y ip.z` instead; both are understood.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::Range;

/// The suffixes of the legacy coordinate naming.
const AXIS_SUFFIXES: [&str; 3] = ["x", "y", "z"];

/// A run of consecutive columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColumnRange {
  /// The first column, 0-based.
  pub start: usize,
  /// How many columns.
  pub width: usize,
}

impl ColumnRange {
  /// Returns one-past-the-last column.
  pub const fn end(&self) -> usize {
    return self.start + self.width;
  }

  /// Returns this as a standard range.
  pub const fn range(&self) -> Range<usize> {
    return self.start..self.end();
  }
}

impl Display for ColumnRange {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "columns {}-{}", self.start, self.end() - 1);
  }
}

/// The result of looking up a label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
  /// The label was found at these columns.
  Found(ColumnRange),
  /// Nothing matched; holds the key that was looked for.
  NotFound(String),
}

impl Lookup {
  /// Returns the range, if found.
  pub fn found(&self) -> Option<ColumnRange> {
    return match self {
      Self::Found(r) => Some(*r),
      Self::NotFound(_) => None,
    };
  }
}

/// Maps every label of a table to its column. Built once per header.
#[derive(Clone, Debug, Default)]
pub struct LabelIndex {
  /// First column carrying each label.
  positions: BTreeMap<String, usize>,
  /// Total number of columns.
  width: usize,
}

impl LabelIndex {
  /// Indexes a list of labels. Repeated labels resolve to their first column.
  pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
    let mut positions = BTreeMap::new();
    for (i, l) in labels.iter().enumerate() {
      positions.entry(l.as_ref().to_owned()).or_insert(i);
    }
    return Self { positions, width: labels.len() };
  }

  /// Number of columns in the table.
  pub const fn width(&self) -> usize {
    return self.width;
  }

  /// Returns the column of an exact label.
  pub fn position(&self, label: &str) -> Option<usize> {
    return self.positions.get(label).copied();
  }

  /// Finds the columns of a datum with the given base name and number of
  /// components. Scalars go by their exact name, everything else by the
  /// `1_name` column followed by `2_name` and so on, in order.
  pub fn locate(&self, base: &str, width: usize) -> Lookup {
    if width <= 1 {
      return match self.position(base) {
        Some(start) => Lookup::Found(ColumnRange { start, width }),
        None => Lookup::NotFound(base.to_owned()),
      };
    }
    let key = format!("1_{}", base);
    let start = match self.position(&key) {
      Some(s) if s + width <= self.width => s,
      _ => return Lookup::NotFound(key),
    };
    let contiguous = (2..=width)
      .all(|i| self.position(&format!("{}_{}", i, base)) == Some(start + i - 1));
    if contiguous {
      return Lookup::Found(ColumnRange { start, width });
    }
    return Lookup::NotFound(key);
  }

  /// Finds three coordinate columns, by `1_name` or by `name.x`.
  pub fn locate_coordinates(&self, base: &str) -> Lookup {
    if let Lookup::Found(r) = self.locate(base, 3) {
      return Lookup::Found(r);
    }
    let key = format!("{}.{}", base, AXIS_SUFFIXES[0]);
    let start = match self.position(&key) {
      Some(s) => s,
      None => return Lookup::NotFound(format!("1_{}", base)),
    };
    let consecutive = AXIS_SUFFIXES.iter()
      .enumerate()
      .all(|(i, s)| self.position(&format!("{}.{}", base, s)) == Some(start + i));
    if consecutive {
      return Lookup::Found(ColumnRange { start, width: 3 });
    }
    return Lookup::NotFound(key);
  }
}
