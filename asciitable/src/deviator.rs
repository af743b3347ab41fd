//! Splits second-order tensors into their deviatoric and hydrostatic parts.

use nalgebra::Matrix3;

/// Builds a tensor from nine components flattened row by row.
pub fn tensor(components: &[f64; 9]) -> Matrix3<f64> {
  return Matrix3::from_row_slice(components);
}

/// Flattens a tensor row by row.
pub fn flatten(t: &Matrix3<f64>) -> [f64; 9] {
  let mut out = [0.0; 9];
  for (o, x) in out.iter_mut().zip(t.transpose().iter()) {
    *o = *x;
  }
  return out;
}

/// The hydrostatic (spherical) part: the mean of the diagonal.
pub fn hydrostatic(t: &Matrix3<f64>) -> f64 {
  return t.trace() / 3.0;
}

/// The deviator: the tensor minus its hydrostatic part on the diagonal.
pub fn deviator(t: &Matrix3<f64>) -> Matrix3<f64> {
  return t - Matrix3::identity() * hydrostatic(t);
}

/// Computes both parts from flat components; the deviator comes back flat.
pub fn decompose(components: &[f64; 9]) -> ([f64; 9], f64) {
  let t = tensor(components);
  return (flatten(&deviator(&t)), hydrostatic(&t));
}
