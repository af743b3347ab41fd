//! Tokenization of formulas, done with logos.

use std::ops::Range;

use logos::Logos;

use crate::errors::FormulaError;

/// A formula token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
  /// A column reference, `#label#`, holding the text between the hashes.
  #[regex(r"#[^#]+#", |lex| {
    let s = lex.slice();
    s[1..s.len() - 1].trim().to_owned()
  })]
  Column(String),
  /// A numeric literal.
  #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
  #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
  Number(f64),
  /// A possibly dotted name, like `pi` or `np.linalg.norm`.
  #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*", |lex| lex.slice().to_owned())]
  Ident(String),
  /// `+`
  #[token("+")]
  Plus,
  /// `-`
  #[token("-")]
  Minus,
  /// `*`
  #[token("*")]
  Star,
  /// `**`
  #[token("**")]
  StarStar,
  /// `/`
  #[token("/")]
  Slash,
  /// `//`
  #[token("//")]
  SlashSlash,
  /// `%`
  #[token("%")]
  Percent,
  /// `<`
  #[token("<")]
  Lt,
  /// `<=`
  #[token("<=")]
  LtEq,
  /// `>`
  #[token(">")]
  Gt,
  /// `>=`
  #[token(">=")]
  GtEq,
  /// `==`
  #[token("==")]
  EqEq,
  /// `!=`
  #[token("!=")]
  BangEq,
  /// `(`
  #[token("(")]
  LParen,
  /// `)`
  #[token(")")]
  RParen,
  /// `[`
  #[token("[")]
  LBracket,
  /// `]`
  #[token("]")]
  RBracket,
  /// `,`
  #[token(",")]
  Comma,
}

/// Splits a formula into tokens with their byte spans.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, FormulaError> {
  let mut lex = Token::lexer(source);
  let mut tokens = Vec::new();
  while let Some(tok) = lex.next() {
    match tok {
      Ok(t) => tokens.push((t, lex.span())),
      Err(()) => {
        return Err(FormulaError::Lex {
          pos: lex.span().start,
          text: lex.slice().to_owned(),
        });
      },
    }
  }
  return Ok(tokens);
}
