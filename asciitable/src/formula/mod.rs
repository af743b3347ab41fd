//! This module implements the formula language used to compute new columns.
//!
//! A formula is an arithmetic expression in which `#label#` stands for the
//! value of a column in the current row. References are bound to columns once
//! per table, then the formula is evaluated for every row. Formulas are
//! parsed into a tree and evaluated against an allow-listed function table;
//! no part of them is ever handed to a general-purpose interpreter.
//!
//! A reference can be:
//!   - a special value, such as `#_row_#` for the row counter;
//!   - a 0-based column number, such as `#3#`;
//!   - an exact column label, such as `#1_ip#`.

pub mod functions;
pub mod lexer;
pub mod parser;

use log::debug;

use crate::datainfo::{Special, Specials};
use crate::errors::FormulaError;
use crate::labels::LabelIndex;

pub use functions::Value;
pub use parser::{Binding, Expr};

/// A formula bound to the columns of a table, ready to evaluate.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
  /// The text it came from.
  source: String,
  /// The bound expression.
  expr: Expr,
}

impl Formula {
  /// Parses a formula without binding its references.
  pub fn parse(source: &str) -> Result<Expr, FormulaError> {
    // ';' stands in for ',' since commas split list options on the CLI
    let text = source.replace(';', ",");
    return parser::parse(lexer::tokenize(&text)?);
  }

  /// Parses a formula and binds its references to the columns of a table.
  pub fn compile(source: &str, index: &LabelIndex) -> Result<Self, FormulaError> {
    let expr = Self::parse(source)?;
    let resolve = |name: &str| -> Option<Binding> {
      if let Some(s) = Special::from_name(name) {
        return Some(Binding::Special(s));
      }
      if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
        return name.parse::<usize>()
          .ok()
          .filter(|i| *i < index.width())
          .map(Binding::Field);
      }
      return index.position(name).map(Binding::Field);
    };
    let expr = expr.bind(&resolve)?;
    debug!("Compiled formula \"{}\" into {:?}.", source, expr);
    return Ok(Self { source: source.to_owned(), expr });
  }

  /// The text the formula came from.
  pub fn source(&self) -> &str {
    return &self.source;
  }

  /// Evaluates the formula against a row.
  pub fn eval(
    &self,
    row: &[String],
    specials: &Specials,
  ) -> Result<Value, FormulaError> {
    return self.expr.eval(row, specials);
  }
}
