//! This module computes the curl of gridded vector and tensor fields in
//! Fourier space, which takes the field to be periodic.
//!
//! Each 3-vector of the field is transformed, the curl becomes the cross
//! product `i ξ × f̂` with the wave vector `ξ = 2π (k/L)`, and the result is
//! transformed back. Tensors are treated as three row vectors curled one by
//! one.
//!
//! Fields are flat slices in row order (x-fastest), with the components of
//! each cell stored together.

use std::f64::consts::PI;
use std::sync::Arc;

use log::debug;
use nalgebra::Vector3;
use num::complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};

use crate::datainfo::FieldKind;
use crate::grid::Grid;

/// Signed frequency of the i-th of n FFT bins. The Nyquist bin of an even
/// axis has no sign to speak of and is zeroed, so derivatives stay real.
fn frequency(i: usize, n: usize) -> f64 {
  if n % 2 == 0 && i == n / 2 {
    return 0.0;
  }
  if i <= n / 2 {
    return i as f64;
  }
  return i as f64 - n as f64;
}

/// A 3-D FFT made of 1-D transforms along each axis.
struct Fft3 {
  /// Cells along each axis.
  resolution: Vector3<usize>,
  /// One plan per axis.
  plans: [Arc<dyn Fft<f64>>; 3],
}

impl Fft3 {
  /// Plans transforms for a grid in one direction.
  fn new(
    planner: &mut FftPlanner<f64>,
    resolution: Vector3<usize>,
    direction: FftDirection,
  ) -> Self {
    let plans = [
      planner.plan_fft(resolution.x, direction),
      planner.plan_fft(resolution.y, direction),
      planner.plan_fft(resolution.z, direction),
    ];
    return Self { resolution, plans };
  }

  /// Transforms in place. Unnormalised, like rustfft itself.
  fn process(&self, data: &mut [Complex64]) {
    let r = self.resolution;
    // x runs are contiguous
    if r.x > 1 {
      for run in data.chunks_exact_mut(r.x) {
        self.plans[0].process(run);
      }
    }
    // y and z runs are strided
    self.process_strided(1, r.x, data);
    self.process_strided(2, r.x * r.y, data);
  }

  /// Transforms along y or z by gathering each run into a buffer.
  fn process_strided(&self, axis: usize, stride: usize, data: &mut [Complex64]) {
    let len = self.resolution[axis];
    if len <= 1 {
      return;
    }
    let mut buf = vec![Complex64::default(); len];
    for start in 0..data.len() {
      // only start runs at the first cell along the axis
      if (start / stride) % len != 0 {
        continue;
      }
      for (k, b) in buf.iter_mut().enumerate() {
        *b = data[start + k * stride];
      }
      self.plans[axis].process(&mut buf);
      for (k, b) in buf.iter().enumerate() {
        data[start + k * stride] = *b;
      }
    }
  }
}

/// Curls a field. `field` holds `grid.cells()` samples of `kind`; the result
/// has the same layout.
pub fn curl_fft(grid: &Grid, kind: FieldKind, field: &[f64]) -> Vec<f64> {
  let n = kind.components();
  let cells = grid.cells();
  debug_assert_eq!(field.len(), cells * n);
  let mut planner = FftPlanner::new();
  let forward = Fft3::new(&mut planner, grid.resolution, FftDirection::Forward);
  let inverse = Fft3::new(&mut planner, grid.resolution, FftDirection::Inverse);
  debug!(
    "Curling a {} field on a {}x{}x{} grid of size {:.4}x{:.4}x{:.4}.",
    kind,
    grid.resolution.x,
    grid.resolution.y,
    grid.resolution.z,
    grid.dimension.x,
    grid.dimension.y,
    grid.dimension.z,
  );
  // wave vector of every cell
  let xi = (0..cells).map(|c| {
    let loc = grid.location(c);
    return Vector3::from_fn(|i, _| {
      // singleton axes have no extent, and no wave number either
      match frequency(loc[i], grid.resolution[i]) {
        f if f == 0.0 => 0.0,
        f => 2.0 * PI * f / grid.dimension[i],
      }
    });
  }).collect::<Vec<Vector3<f64>>>();
  let scale = 1.0 / cells as f64;
  let mut out = vec![0.0; field.len()];
  for row in 0..kind.rows() {
    // transform the three components of this row
    let mut spectra: [Vec<Complex64>; 3] = std::array::from_fn(|k| {
      let mut s = (0..cells)
        .map(|c| Complex64::new(field[c * n + 3 * row + k], 0.0))
        .collect::<Vec<_>>();
      forward.process(&mut s);
      s
    });
    // curl every mode
    for (c, xi) in xi.iter().enumerate() {
      let f = Vector3::new(spectra[0][c], spectra[1][c], spectra[2][c]);
      let k = xi.map(|x| Complex64::new(0.0, x));
      let curl = k.cross(&f);
      for (s, v) in spectra.iter_mut().zip(curl.iter()) {
        s[c] = *v;
      }
    }
    // and back
    for (k, s) in spectra.iter_mut().enumerate() {
      inverse.process(s);
      for (c, v) in s.iter().enumerate() {
        out[c * n + 3 * row + k] = v.re * scale;
      }
    }
  }
  return out;
}
