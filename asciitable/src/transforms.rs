//! This module implements the table transforms behind our filters. Each one
//! takes a table whose header was read, appends its columns to the header,
//! writes it, and streams the rows through with the new values.

use std::io::{BufRead, Seek, Write};

use log::{debug, warn};

use crate::curl::curl_fft;
use crate::datainfo::{DataInfo, FieldKind, Specials};
use crate::deviator::decompose;
use crate::errors::TableError;
use crate::formula::Formula;
use crate::grid::GridScan;
use crate::labels::Lookup;
use crate::table::AsciiTable;
use crate::util::fmt_real;

/// What happened to a table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
  /// The table was written with its new columns.
  Written,
  /// The table couldn't be processed and nothing was written.
  Skipped,
}

/// Labels for the components of a multi-component datum: `1_name`, ...
pub fn component_labels(name: &str, n: usize) -> impl Iterator<Item = String> + '_ {
  return (1..=n).map(move |i| format!("{}_{}", i, name));
}

/// A formula that survived compilation and sizing.
struct Derived {
  /// The new label.
  label: String,
  /// The compiled formula.
  formula: Formula,
  /// How many values it gives per row.
  width: usize,
}

/// Adds one column (or run of columns) per label, computed by its formula.
/// Formulas that don't compile, fail on the first row or give nothing are
/// reported and left out; the others still go through.
pub fn add_calculation<R, W>(
  table: &mut AsciiTable<R, W>,
  requests: &[(String, String)],
) -> Result<Outcome, TableError>
where
  R: BufRead + Seek,
  W: Write,
{
  let index = table.label_index();
  let mut compiled = Vec::new();
  for (label, source) in requests {
    match Formula::compile(source, &index) {
      Ok(f) => compiled.push((label, f)),
      Err(e) => warn!("formula for {} is broken: {}", label, e),
    }
  }
  // evaluate on the first row to learn how wide every result is
  let specials = Specials::default();
  let have_row = table.data_read()?;
  let mut derived = Vec::new();
  for (label, formula) in compiled {
    let width = if have_row {
      match formula.eval(table.data(), &specials) {
        Ok(v) => v.len(),
        Err(e) => {
          warn!("formula for {} is broken: {}", label, e);
          continue;
        },
      }
    } else {
      1
    };
    if width == 0 {
      warn!("formula for {} gives no values", label);
      continue;
    }
    derived.push(Derived { label: label.clone(), formula, width });
  }
  for d in derived.iter() {
    if d.width == 1 {
      table.labels_append([d.label.as_str()])?;
    } else {
      table.labels_append(component_labels(&d.label, d.width))?;
    }
  }
  table.head_write()?;
  // now for real
  table.data_rewind()?;
  let mut specials = Specials::default();
  while table.data_read()? {
    specials.row += 1;
    let mut values = Vec::with_capacity(derived.len());
    for d in derived.iter() {
      let v = d.formula.eval(table.data(), &specials)
        .map_err(|source| TableError::Formula {
          label: d.label.clone(),
          row: specials.row,
          source,
        })?;
      if v.len() != d.width {
        return Err(TableError::ResultWidth {
          label: d.label.clone(),
          row: specials.row,
          expected: d.width,
          found: v.len(),
        });
      }
      values.push(v);
    }
    for v in values {
      table.data_append(v.into_vec().into_iter().map(fmt_real));
    }
    table.data_write()?;
  }
  return Ok(Outcome::Written);
}

/// Adds the deviator of every requested tensor and, if asked, its
/// hydrostatic part. Tensors missing from the table are reported and left
/// out.
pub fn add_deviator<R, W>(
  table: &mut AsciiTable<R, W>,
  tensors: &[String],
  spherical: bool,
) -> Result<Outcome, TableError>
where
  R: BufRead + Seek,
  W: Write,
{
  let info = DataInfo::new().with(FieldKind::Tensor, tensors);
  let active = info.resolve(&table.label_index());
  for field in active.iter() {
    let dev = format!("dev({})", field.label);
    table.labels_append(component_labels(&dev, FieldKind::Tensor.components()))?;
    if spherical {
      table.labels_append([format!("sph({})", field.label)])?;
    }
  }
  table.head_write()?;
  while table.data_read()? {
    let mut values = Vec::new();
    for field in active.iter() {
      let mut t = [0.0; 9];
      t.copy_from_slice(&table.data_f64(field.columns)?);
      let (dev, sph) = decompose(&t);
      values.extend(dev);
      if spherical {
        values.push(sph);
      }
    }
    table.data_append(values.into_iter().map(fmt_real));
    table.data_write()?;
  }
  return Ok(Outcome::Written);
}

/// Adds the spectral curl of every requested vector and tensor field. The
/// table must be a complete periodic grid in x-fastest order; its geometry is
/// taken from the coordinate columns. Tables without coordinates are skipped.
pub fn add_curl<R, W>(
  table: &mut AsciiTable<R, W>,
  info: &DataInfo,
  coordinates: &str,
) -> Result<Outcome, TableError>
where
  R: BufRead + Seek,
  W: Write,
{
  let index = table.label_index();
  let location = match index.locate_coordinates(coordinates) {
    Lookup::Found(r) => r,
    Lookup::NotFound(key) => {
      warn!("no coordinate data found (looked for {})...", key);
      return Ok(Outcome::Skipped);
    },
  };
  // figure out resolution and dimension
  let mut scan = GridScan::new();
  while table.data_read()? {
    let coords = table.data_str(location)?;
    if let Err(axis) = scan.push(coords) {
      return Err(TableError::NotNumeric {
        row: table.row(),
        column: location.start + axis,
        value: coords[axis].clone(),
      });
    }
  }
  let grid = match scan.finish() {
    Some(g) => g,
    None => {
      warn!("table has no data rows...");
      return Ok(Outcome::Skipped);
    },
  };
  let cells = grid.cells();
  debug!(
    "Grid is {}x{}x{} ({} cells).",
    grid.resolution.x,
    grid.resolution.y,
    grid.resolution.z,
    cells
  );
  if scan.rows() != cells {
    return Err(TableError::GridMismatch { rows: scan.rows(), cells });
  }
  // figure out columns to process
  let active = info.resolve(&index);
  for field in active.iter() {
    let name = format!("curlFFT({})", field.label);
    table.labels_append(component_labels(&name, field.kind.components()))?;
  }
  table.head_write()?;
  // read the fields; rows come in cell order
  let mut values = active.iter()
    .map(|f| Vec::with_capacity(cells * f.kind.components()))
    .collect::<Vec<Vec<f64>>>();
  table.data_rewind()?;
  while table.data_read()? {
    for (field, v) in active.iter().zip(values.iter_mut()) {
      v.extend(table.data_f64(field.columns)?);
    }
  }
  let curls = active.iter()
    .zip(values.iter())
    .map(|(field, v)| curl_fft(&grid, field.kind, v))
    .collect::<Vec<_>>();
  // write them out
  table.data_rewind()?;
  let mut idx = 0;
  while table.data_read()? {
    for (field, c) in active.iter().zip(curls.iter()) {
      let n = field.kind.components();
      table.data_append(c[idx * n..(idx + 1) * n].iter().copied().map(fmt_real));
    }
    table.data_write()?;
    idx += 1;
  }
  return Ok(Outcome::Written);
}
