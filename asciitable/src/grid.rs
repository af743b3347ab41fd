//! This module reconstructs a regular grid from the coordinate columns of a
//! table.
//!
//! Rows of gridded tables run x-fastest, then y, then z, so the row number
//! alone says where a row sits in the grid. The coordinates are only needed
//! to learn how many cells there are along each axis and how large the box is.

use std::collections::BTreeMap;

use nalgebra::Vector3;

use crate::util::parse_real;

/// A regular, cell-centered grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
  /// Number of cells along x, y and z.
  pub resolution: Vector3<usize>,
  /// Physical size of the box along x, y and z.
  pub dimension: Vector3<f64>,
}

impl Grid {
  /// Creates a grid from its resolution and dimension.
  pub fn new(resolution: Vector3<usize>, dimension: Vector3<f64>) -> Self {
    return Self { resolution, dimension };
  }

  /// Total number of cells.
  pub fn cells(&self) -> usize {
    return self.resolution.iter().product();
  }

  /// Whether this is a single layer of cells along z.
  pub fn is_flat(&self) -> bool {
    return self.resolution.z == 1;
  }

  /// Returns the (x, y, z) cell of the n-th row.
  pub fn location(&self, idx: usize) -> Vector3<usize> {
    let r = &self.resolution;
    return Vector3::new(
      idx % r.x,
      (idx / r.x) % r.y,
      (idx / r.x / r.y) % r.z,
    );
  }

  /// Returns the row number of an (x, y, z) cell.
  pub fn index(&self, loc: &Vector3<usize>) -> usize {
    let r = &self.resolution;
    return loc.x + r.x * (loc.y + r.y * loc.z);
  }
}

/// Collects the distinct coordinates along each axis, row by row.
#[derive(Clone, Debug, Default)]
pub struct GridScan {
  /// Distinct coordinate texts per axis, with their values.
  axes: [BTreeMap<String, f64>; 3],
  /// Rows seen.
  rows: usize,
}

impl GridScan {
  /// Starts an empty scan.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Takes in the three coordinates of a row. Returns the index of the first
  /// one that isn't a number, if any.
  pub fn push<S: AsRef<str>>(&mut self, coords: &[S]) -> Result<(), usize> {
    for (i, (axis, c)) in self.axes.iter_mut().zip(coords.iter()).enumerate() {
      let text = c.as_ref();
      if !axis.contains_key(text) {
        let x = parse_real(text).ok_or(i)?;
        axis.insert(text.to_owned(), x);
      }
    }
    self.rows += 1;
    return Ok(());
  }

  /// Rows seen so far.
  pub const fn rows(&self) -> usize {
    return self.rows;
  }

  /// Works out the grid. The bounding box is grown by half a cell on each
  /// side since the coordinates are cell centers; a flat grid gets the
  /// smallest in-plane cell size as its thickness. Returns nothing if no rows
  /// were seen.
  pub fn finish(&self) -> Option<Grid> {
    if self.rows == 0 {
      return None;
    }
    let count = |i: usize| self.axes[i].len();
    let extent = |i: usize| {
      let values = self.axes[i].values();
      let lo = values.clone().copied().fold(f64::INFINITY, f64::min);
      let hi = values.copied().fold(f64::NEG_INFINITY, f64::max);
      hi - lo
    };
    let resolution = Vector3::new(count(0), count(1), count(2));
    let mut dimension = Vector3::from_fn(|i, _| {
      let n = resolution[i] as f64;
      n / (n - 1.0).max(1.0) * extent(i)
    });
    if resolution.z == 1 {
      dimension.z = (dimension.x / resolution.x as f64)
        .min(dimension.y / resolution.y as f64);
    }
    return Some(Grid { resolution, dimension });
  }
}
