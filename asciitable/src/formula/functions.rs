//! This module implements formula values and the table of functions a formula
//! may call. Nothing outside this table can be reached from a formula.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::errors::FormulaError;

/// Namespaces that are accepted in front of function and constant names, so
/// that `math.sqrt`, `np.sqrt` and `sqrt` all mean the same thing.
const NAMESPACES: [&str; 5] = [
  "np.linalg.",
  "numpy.linalg.",
  "math.",
  "np.",
  "numpy.",
];

/// Strips a known namespace from a dotted name.
pub(crate) fn strip_namespace(name: &str) -> &str {
  for ns in NAMESPACES {
    if let Some(rest) = name.strip_prefix(ns) {
      return rest;
    }
  }
  return name;
}

/// The value of a (sub)formula: one number or a flat array of them.
#[derive(Clone, Debug, PartialEq, derive_more::From)]
pub enum Value {
  /// A single number.
  Scalar(f64),
  /// Several numbers.
  Array(Vec<f64>),
}

impl Value {
  /// Number of values held.
  pub fn len(&self) -> usize {
    return match self {
      Self::Scalar(_) => 1,
      Self::Array(v) => v.len(),
    };
  }

  /// Whether this is an empty array.
  pub fn is_empty(&self) -> bool {
    return self.len() == 0;
  }

  /// Flattens into a vector.
  pub fn into_vec(self) -> Vec<f64> {
    return match self {
      Self::Scalar(x) => vec![x],
      Self::Array(v) => v,
    };
  }

  /// Returns the number inside, if this is a scalar or a single-item array.
  pub fn as_scalar(&self) -> Option<f64> {
    return match self {
      Self::Scalar(x) => Some(*x),
      Self::Array(v) if v.len() == 1 => Some(v[0]),
      Self::Array(_) => None,
    };
  }

  /// Applies a function to every number.
  pub fn map<F: Fn(f64) -> f64>(self, f: F) -> Self {
    return match self {
      Self::Scalar(x) => Self::Scalar(f(x)),
      Self::Array(v) => Self::Array(v.into_iter().map(f).collect()),
    };
  }

  /// Combines two values elementwise, broadcasting scalars over arrays.
  pub fn zip_with<F: Fn(f64, f64) -> f64>(
    self,
    other: Self,
    f: F,
  ) -> Result<Self, FormulaError> {
    return Ok(match (self, other) {
      (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(f(a, b)),
      (Self::Scalar(a), Self::Array(v)) => {
        Self::Array(v.into_iter().map(|b| f(a, b)).collect())
      },
      (Self::Array(v), Self::Scalar(b)) => {
        Self::Array(v.into_iter().map(|a| f(a, b)).collect())
      },
      (Self::Array(u), Self::Array(v)) => {
        if u.len() != v.len() {
          return Err(FormulaError::Shape { left: u.len(), right: v.len() });
        }
        Self::Array(u.into_iter().zip(v).map(|(a, b)| f(a, b)).collect())
      },
    });
  }
}

/// Concatenates the numbers of several values.
fn flatten(args: &[Value]) -> Vec<f64> {
  return args.iter().cloned().flat_map(Value::into_vec).collect();
}

/// Floored modulo, sign follows the divisor.
pub(crate) fn floor_mod(a: f64, b: f64) -> f64 {
  let r = a % b;
  if r != 0.0 && (r < 0.0) != (b < 0.0) {
    return r + b;
  }
  return r;
}

/// Rounds half away from zero to some decimal places.
fn round_to(x: f64, places: f64) -> f64 {
  let scale = 10.0_f64.powf(places.trunc());
  return (x * scale).round() / scale;
}

/// Generates the table of elementwise one-argument functions.
macro_rules! gen_elementwise {
  (
    $(
      {
        $name:literal,
        $var:ident,
        $f:expr
      },
    )*
  ) => {
    /// Functions of one number, applied to every element of their argument.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum Elementwise {
      $(
        #[doc = $name]
        $var,
      )*
    }

    impl Elementwise {
      /// Returns all elementwise functions.
      pub const fn all() -> &'static [Self] {
        return &[ $(Self::$var,)* ];
      }

      /// Returns the name formulas call it by.
      pub const fn name(&self) -> &'static str {
        return match self {
          $(Self::$var => $name,)*
        };
      }

      /// Applies it to a number.
      pub fn apply(&self, x: f64) -> f64 {
        let f: fn(f64) -> f64 = match self {
          $(Self::$var => $f,)*
        };
        return f(x);
      }
    }
  }
}

gen_elementwise!(
  { "sqrt", Sqrt, f64::sqrt },
  { "exp", Exp, f64::exp },
  { "log10", Log10, f64::log10 },
  { "log2", Log2, f64::log2 },
  { "sin", Sin, f64::sin },
  { "cos", Cos, f64::cos },
  { "tan", Tan, f64::tan },
  { "asin", Asin, f64::asin },
  { "acos", Acos, f64::acos },
  { "atan", Atan, f64::atan },
  { "arcsin", ArcSin, f64::asin },
  { "arccos", ArcCos, f64::acos },
  { "arctan", ArcTan, f64::atan },
  { "sinh", Sinh, f64::sinh },
  { "cosh", Cosh, f64::cosh },
  { "tanh", Tanh, f64::tanh },
  { "fabs", Fabs, f64::abs },
  { "abs", Abs, f64::abs },
  { "floor", Floor, f64::floor },
  { "ceil", Ceil, f64::ceil },
  { "degrees", Degrees, f64::to_degrees },
  { "radians", Radians, f64::to_radians },
);

/// Everything a formula can call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Function {
  /// One of the elementwise functions.
  Elementwise(Elementwise),
  /// `log(x)` or `log(x, base)`.
  Log,
  /// `round(x)` or `round(x, places)`.
  Round,
  /// `atan2(y, x)`, also as `arctan2`.
  Atan2,
  /// `hypot(x, y)`.
  Hypot,
  /// `pow(x, y)`, also as `power`.
  Pow,
  /// Smallest of all given numbers.
  Min,
  /// Largest of all given numbers.
  Max,
  /// Sum of all given numbers.
  Sum,
  /// Mean of all given numbers.
  Mean,
  /// Product of all given numbers.
  Prod,
  /// Euclidean norm of all given numbers.
  Norm,
  /// Dot product of two equal-length arrays.
  Dot,
  /// Cross product of two 3-arrays.
  Cross,
  /// Concatenates its arguments into an array.
  Array,
}

impl Function {
  /// Looks a function up by name, namespace and all.
  pub fn lookup(name: &str) -> Option<Self> {
    let bare = strip_namespace(name);
    if let Some(e) = Elementwise::all().iter().find(|e| e.name() == bare) {
      return Some(Self::Elementwise(*e));
    }
    return Some(match bare {
      "log" => Self::Log,
      "round" | "around" => Self::Round,
      "atan2" | "arctan2" => Self::Atan2,
      "hypot" => Self::Hypot,
      "pow" | "power" => Self::Pow,
      "min" | "amin" => Self::Min,
      "max" | "amax" => Self::Max,
      "sum" => Self::Sum,
      "mean" | "average" => Self::Mean,
      "prod" => Self::Prod,
      "norm" => Self::Norm,
      "dot" => Self::Dot,
      "cross" => Self::Cross,
      "array" => Self::Array,
      _ => return None,
    });
  }

  /// Name for error messages.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Elementwise(e) => e.name(),
      Self::Log => "log",
      Self::Round => "round",
      Self::Atan2 => "atan2",
      Self::Hypot => "hypot",
      Self::Pow => "pow",
      Self::Min => "min",
      Self::Max => "max",
      Self::Sum => "sum",
      Self::Mean => "mean",
      Self::Prod => "prod",
      Self::Norm => "norm",
      Self::Dot => "dot",
      Self::Cross => "cross",
      Self::Array => "array",
    };
  }

  /// Calls the function.
  pub fn apply(&self, mut args: Vec<Value>) -> Result<Value, FormulaError> {
    let given = args.len();
    let arity = |ok: bool| if ok {
      Ok(())
    } else {
      Err(FormulaError::Arity { function: self.name(), given })
    };
    match self {
      Self::Elementwise(e) => {
        arity(args.len() == 1)?;
        return Ok(args.remove(0).map(|x| e.apply(x)));
      },
      Self::Log => {
        arity(args.len() == 1 || args.len() == 2)?;
        let x = args.remove(0);
        return match args.pop() {
          Some(base) => x.zip_with(base, |a, b| a.ln() / b.ln()),
          None => Ok(x.map(f64::ln)),
        };
      },
      Self::Round => {
        arity(args.len() == 1 || args.len() == 2)?;
        let x = args.remove(0);
        return match args.pop() {
          Some(places) => x.zip_with(places, round_to),
          None => Ok(x.map(f64::round)),
        };
      },
      Self::Atan2 | Self::Hypot | Self::Pow => {
        arity(args.len() == 2)?;
        let b = args.remove(1);
        let a = args.remove(0);
        let f: fn(f64, f64) -> f64 = match self {
          Self::Atan2 => f64::atan2,
          Self::Hypot => f64::hypot,
          _ => f64::powf,
        };
        return a.zip_with(b, f);
      },
      _ => {},
    }
    // the rest work on everything they're given, flattened
    return Ok(match self {
      Self::Min => {
        arity(!args.is_empty())?;
        Value::Scalar(flatten(&args).into_iter().fold(f64::INFINITY, f64::min))
      },
      Self::Max => {
        arity(!args.is_empty())?;
        Value::Scalar(flatten(&args).into_iter().fold(f64::NEG_INFINITY, f64::max))
      },
      Self::Sum => Value::Scalar(flatten(&args).into_iter().sum()),
      Self::Prod => Value::Scalar(flatten(&args).into_iter().product()),
      Self::Mean => {
        let v = flatten(&args);
        arity(!v.is_empty())?;
        Value::Scalar(v.iter().sum::<f64>() / v.len() as f64)
      },
      Self::Norm => {
        Value::Scalar(flatten(&args).into_iter().map(|x| x * x).sum::<f64>().sqrt())
      },
      Self::Dot => {
        arity(args.len() == 2)?;
        let b = args.remove(1).into_vec();
        let a = args.remove(0).into_vec();
        if a.len() != b.len() {
          return Err(FormulaError::Shape { left: a.len(), right: b.len() });
        }
        Value::Scalar(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
      },
      Self::Cross => {
        arity(args.len() == 2)?;
        let b = args.remove(1).into_vec();
        let a = args.remove(0).into_vec();
        if a.len() != 3 || b.len() != 3 {
          return Err(FormulaError::Shape { left: a.len(), right: b.len() });
        }
        let c = Vector3::from_column_slice(&a).cross(&Vector3::from_column_slice(&b));
        Value::Array(c.iter().copied().collect())
      },
      Self::Array => Value::Array(flatten(&args)),
      _ => unreachable!("handled above"),
    });
  }
}

/// Looks up a named constant.
pub fn constant(name: &str) -> Option<f64> {
  return match strip_namespace(name) {
    "pi" => Some(PI),
    "e" => Some(std::f64::consts::E),
    "inf" => Some(f64::INFINITY),
    "nan" => Some(f64::NAN),
    "True" => Some(1.0),
    "False" => Some(0.0),
    _ => None,
  };
}
