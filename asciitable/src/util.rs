//! This module implements utility functions without much need for defining
//! context or not enough of it to warrant them having their own modules.

/// Formats a real number the way our tables always had them: shortest
/// round-trip form, always with a decimal point or an exponent.
pub fn fmt_real(x: f64) -> String {
  if x.is_nan() {
    return "nan".to_owned();
  }
  if x.is_infinite() {
    return if x > 0.0 { "inf" } else { "-inf" }.to_owned();
  }
  return format!("{:?}", x);
}

/// Parses a table field as a real number. Accepts Fortran-style exponents
/// (`1.0D+03`) since some of our solvers still write them.
pub fn parse_real(s: &str) -> Option<f64> {
  if let Ok(x) = s.parse::<f64>() {
    return Some(x);
  }
  if s.contains(['d', 'D']) {
    return s.replace(['d', 'D'], "e").parse().ok();
  }
  return None;
}

/// Reads the header length out of a header-count line such as `4\theader`.
/// Hyper-lenient, and doesn't require pulling a whole regex library.
pub(crate) fn header_count(line: &str) -> Option<usize> {
  let lower = line.to_lowercase();
  let at = lower.find("head")?;
  let before = lower[..at].trim_end();
  let ndigits = before.chars().rev().take_while(char::is_ascii_digit).count();
  if ndigits == 0 {
    return None;
  }
  return before[before.len() - ndigits..].parse().ok();
}
