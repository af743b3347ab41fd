//! Parses formula tokens into an expression tree, by precedence climbing.

use std::ops::Range;

use crate::datainfo::{Special, Specials};
use crate::errors::FormulaError;
use crate::formula::functions::{constant, floor_mod, Function, Value};
use crate::formula::lexer::Token;
use crate::util::parse_real;

/// Operators with two operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
  /// `+`
  Add,
  /// `-`
  Sub,
  /// `*`
  Mul,
  /// `/`
  Div,
  /// `//`
  FloorDiv,
  /// `%`
  Mod,
  /// `**`
  Pow,
  /// `<`
  Lt,
  /// `<=`
  Le,
  /// `>`
  Gt,
  /// `>=`
  Ge,
  /// `==`
  Eq,
  /// `!=`
  Ne,
}

impl BinaryOp {
  /// Applies the operator to two numbers. Comparisons give 1 or 0.
  pub fn apply(&self, a: f64, b: f64) -> f64 {
    let truth = |t: bool| if t { 1.0 } else { 0.0 };
    return match self {
      Self::Add => a + b,
      Self::Sub => a - b,
      Self::Mul => a * b,
      Self::Div => a / b,
      Self::FloorDiv => (a / b).floor(),
      Self::Mod => floor_mod(a, b),
      Self::Pow => a.powf(b),
      Self::Lt => truth(a < b),
      Self::Le => truth(a <= b),
      Self::Gt => truth(a > b),
      Self::Ge => truth(a >= b),
      Self::Eq => truth(a == b),
      Self::Ne => truth(a != b),
    };
  }
}

/// Binding power of prefix `-` and `+`. Only `**` binds tighter.
const UNARY_PREC: u8 = 40;

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
  /// Groups to the left.
  Left,
  /// Groups to the right.
  Right,
}

/// Returns (precedence, associativity, operator) for binary operator tokens.
fn binary_op_info(token: &Token) -> Option<(u8, Assoc, BinaryOp)> {
  return match token {
    Token::Lt => Some((10, Assoc::Left, BinaryOp::Lt)),
    Token::LtEq => Some((10, Assoc::Left, BinaryOp::Le)),
    Token::Gt => Some((10, Assoc::Left, BinaryOp::Gt)),
    Token::GtEq => Some((10, Assoc::Left, BinaryOp::Ge)),
    Token::EqEq => Some((10, Assoc::Left, BinaryOp::Eq)),
    Token::BangEq => Some((10, Assoc::Left, BinaryOp::Ne)),
    Token::Plus => Some((20, Assoc::Left, BinaryOp::Add)),
    Token::Minus => Some((20, Assoc::Left, BinaryOp::Sub)),
    Token::Star => Some((30, Assoc::Left, BinaryOp::Mul)),
    Token::Slash => Some((30, Assoc::Left, BinaryOp::Div)),
    Token::SlashSlash => Some((30, Assoc::Left, BinaryOp::FloorDiv)),
    Token::Percent => Some((30, Assoc::Left, BinaryOp::Mod)),
    Token::StarStar => Some((50, Assoc::Right, BinaryOp::Pow)),
    _ => None,
  };
}

/// A formula expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
  /// A literal or constant.
  Number(f64),
  /// A column reference that hasn't been bound to the table yet.
  Column(String),
  /// A bound reference to a column, 0-based.
  Field(usize),
  /// A bound reference to a special value.
  Special(Special),
  /// A list literal; nested values are flattened.
  List(Vec<Expr>),
  /// Negation.
  Neg(Box<Expr>),
  /// A binary operation.
  Binary(BinaryOp, Box<Expr>, Box<Expr>),
  /// A call to a function from the function table.
  Call(Function, Vec<Expr>),
}

/// What a column reference can be bound to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Binding {
  /// A column of the table.
  Field(usize),
  /// A special value.
  Special(Special),
}

impl Expr {
  /// Returns every column reference not yet bound, in order of appearance.
  pub fn columns(&self) -> Vec<&str> {
    let mut out = Vec::new();
    self.visit_columns(&mut out);
    return out;
  }

  /// Helper for [`Expr::columns`].
  fn visit_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
    match self {
      Self::Column(c) => out.push(c),
      Self::List(items) | Self::Call(_, items) => {
        items.iter().for_each(|e| e.visit_columns(out));
      },
      Self::Neg(e) => e.visit_columns(out),
      Self::Binary(_, a, b) => {
        a.visit_columns(out);
        b.visit_columns(out);
      },
      Self::Number(_) | Self::Field(_) | Self::Special(_) => {},
    }
  }

  /// Binds every column reference through a resolver. References it can't
  /// resolve are all reported together.
  pub fn bind<F>(self, resolve: &F) -> Result<Expr, FormulaError>
  where
    F: Fn(&str) -> Option<Binding>,
  {
    let missing = self.columns()
      .into_iter()
      .filter(|c| resolve(*c).is_none())
      .map(String::from)
      .collect::<Vec<_>>();
    if !missing.is_empty() {
      return Err(FormulaError::Unresolved(missing));
    }
    return Ok(self.bind_resolved(resolve));
  }

  /// Helper for [`Expr::bind`], once all references are known to resolve.
  fn bind_resolved<F>(self, resolve: &F) -> Expr
  where
    F: Fn(&str) -> Option<Binding>,
  {
    let each = |items: Vec<Expr>| -> Vec<Expr> {
      items.into_iter().map(|e| e.bind_resolved(resolve)).collect()
    };
    return match self {
      Self::Column(c) => match resolve(c.as_str()) {
        Some(Binding::Field(i)) => Self::Field(i),
        Some(Binding::Special(s)) => Self::Special(s),
        None => Self::Column(c),
      },
      Self::List(items) => Self::List(each(items)),
      Self::Call(f, items) => Self::Call(f, each(items)),
      Self::Neg(e) => Self::Neg(Box::new(e.bind_resolved(resolve))),
      Self::Binary(op, a, b) => Self::Binary(
        op,
        Box::new(a.bind_resolved(resolve)),
        Box::new(b.bind_resolved(resolve)),
      ),
      other => other,
    };
  }

  /// Evaluates against a row of fields.
  pub fn eval(
    &self,
    row: &[String],
    specials: &Specials,
  ) -> Result<Value, FormulaError> {
    return Ok(match self {
      Self::Number(x) => Value::Scalar(*x),
      Self::Column(c) => {
        return Err(FormulaError::Unresolved(vec![c.clone()]));
      },
      Self::Field(i) => {
        let s = row.get(*i).ok_or(FormulaError::MissingField(*i))?;
        let x = parse_real(s).ok_or_else(|| FormulaError::NotNumeric {
          column: *i,
          value: s.clone(),
        })?;
        Value::Scalar(x)
      },
      Self::Special(s) => Value::Scalar(s.value(specials)),
      Self::List(items) => {
        let mut flat = Vec::new();
        for e in items {
          flat.extend(e.eval(row, specials)?.into_vec());
        }
        Value::Array(flat)
      },
      Self::Neg(e) => e.eval(row, specials)?.map(|x| -x),
      Self::Binary(op, a, b) => {
        let a = a.eval(row, specials)?;
        let b = b.eval(row, specials)?;
        a.zip_with(b, |x, y| op.apply(x, y))?
      },
      Self::Call(f, args) => {
        let args = args.iter()
          .map(|e| e.eval(row, specials))
          .collect::<Result<Vec<_>, _>>()?;
        f.apply(args)?
      },
    });
  }
}

/// Walks over a token list.
struct TokenStream {
  /// The tokens and their spans.
  tokens: Vec<(Token, Range<usize>)>,
  /// Index of the next token.
  pos: usize,
}

impl TokenStream {
  /// Looks at the next token without consuming it.
  fn peek(&self) -> Option<&Token> {
    return self.tokens.get(self.pos).map(|(t, _)| t);
  }

  /// Consumes the next token.
  fn advance(&mut self) -> Option<Token> {
    let t = self.tokens.get(self.pos).map(|(t, _)| t.clone());
    self.pos += 1;
    return t;
  }

  /// Describes where the stream is, for error messages.
  fn here(&self) -> String {
    return match self.tokens.get(self.pos) {
      Some((t, span)) => format!("{:?} at position {}", t, span.start),
      None => "end of formula".to_owned(),
    };
  }

  /// Consumes the expected token or fails.
  fn expect(&mut self, want: Token) -> Result<(), FormulaError> {
    if self.peek() == Some(&want) {
      self.pos += 1;
      return Ok(());
    }
    return Err(FormulaError::Syntax(
      format!("expected {:?}, found {}", want, self.here())
    ));
  }
}

/// Parses a whole token list into one expression.
pub fn parse(tokens: Vec<(Token, Range<usize>)>) -> Result<Expr, FormulaError> {
  let mut stream = TokenStream { tokens, pos: 0 };
  let expr = parse_pratt(&mut stream, 0)?;
  if stream.peek().is_some() {
    return Err(FormulaError::Syntax(
      format!("unexpected {}", stream.here())
    ));
  }
  return Ok(expr);
}

/// Handles binary operators with precedence climbing.
fn parse_pratt(stream: &mut TokenStream, min_prec: u8) -> Result<Expr, FormulaError> {
  let mut left = parse_prefix(stream)?;
  while let Some((prec, assoc, op)) = stream.peek().and_then(binary_op_info) {
    if prec < min_prec {
      break;
    }
    stream.advance();
    let next_prec = if assoc == Assoc::Left { prec + 1 } else { prec };
    let right = parse_pratt(stream, next_prec)?;
    left = Expr::Binary(op, Box::new(left), Box::new(right));
  }
  return Ok(left);
}

/// Parses prefix operators and atoms.
fn parse_prefix(stream: &mut TokenStream) -> Result<Expr, FormulaError> {
  return match stream.peek() {
    Some(Token::Minus) => {
      stream.advance();
      Ok(Expr::Neg(Box::new(parse_pratt(stream, UNARY_PREC)?)))
    },
    Some(Token::Plus) => {
      stream.advance();
      parse_pratt(stream, UNARY_PREC)
    },
    _ => parse_atom(stream),
  };
}

/// Parses a comma-separated list up to a closing token.
fn parse_list(
  stream: &mut TokenStream,
  close: Token,
) -> Result<Vec<Expr>, FormulaError> {
  let mut items = Vec::new();
  while stream.peek() != Some(&close) {
    items.push(parse_pratt(stream, 0)?);
    if stream.peek() != Some(&close) {
      stream.expect(Token::Comma)?;
    }
  }
  stream.expect(close)?;
  return Ok(items);
}

/// Parses numbers, references, names, calls, lists and parentheses.
fn parse_atom(stream: &mut TokenStream) -> Result<Expr, FormulaError> {
  let here = stream.here();
  return match stream.advance() {
    Some(Token::Number(x)) => Ok(Expr::Number(x)),
    Some(Token::Column(c)) => Ok(Expr::Column(c)),
    Some(Token::LParen) => {
      let inner = parse_pratt(stream, 0)?;
      stream.expect(Token::RParen)?;
      Ok(inner)
    },
    Some(Token::LBracket) => Ok(Expr::List(parse_list(stream, Token::RBracket)?)),
    Some(Token::Ident(name)) => {
      if stream.peek() == Some(&Token::LParen) {
        stream.advance();
        let f = Function::lookup(&name)
          .ok_or_else(|| FormulaError::UnknownFunction(name.clone()))?;
        Ok(Expr::Call(f, parse_list(stream, Token::RParen)?))
      } else {
        constant(&name)
          .map(Expr::Number)
          .ok_or(FormulaError::UnknownName(name))
      }
    },
    _ => Err(FormulaError::Syntax(format!("unexpected {}", here))),
  };
}
