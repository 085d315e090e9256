////////////////////////////////////////////////////////////////////////////////
// File: src/tests/tokenizer.rs
// Description: Tokenizer tests
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 15.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use crate::internal::tokenize::{Keyword, Symbol, Token, Tokenizer};

use super::util::file_info;

use shared::error::{CoreError, ErrorKind};

////////////////////////////////////////////////////////////////////////////////
// Test Helper Functions
////////////////////////////////////////////////////////////////////////////////

fn tokenize(source: &str) -> Vec<Token> {
  let file_info = file_info(source);
  let mut stream = Tokenizer::tokenize(&file_info).unwrap();
  let mut tokens = Vec::new();

  while let Some(token) = stream.next() {
    tokens.push(token);
  }

  return tokens;
}

fn tokenize_err(source: &str) -> CoreError {
  let file_info = file_info(source);

  return Tokenizer::tokenize(&file_info).unwrap_err();
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Classification
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Reserved words become keywords, everything else an identifier."]
fn keywords_and_identifiers() {
  let tokens = tokenize("class classes _if if x1 let letter");

  assert_eq!(
    tokens,
    vec![
      Token::Keyword(Keyword::Class, 0),
      Token::Identifier("classes".to_string(), 0),
      Token::Identifier("_if".to_string(), 0),
      Token::Keyword(Keyword::If, 0),
      Token::Identifier("x1".to_string(), 0),
      Token::Keyword(Keyword::Let, 0),
      Token::Identifier("letter".to_string(), 0),
    ]
  );
}

#[test]
#[doc = "All nineteen punctuation characters tokenize as symbols."]
fn symbols() {
  let tokens = tokenize("{ } ( ) [ ] . , ; + - * / & | < > = ~");
  let expected = [
    Symbol::LeftCurlyBrace,
    Symbol::RightCurlyBrace,
    Symbol::LeftParen,
    Symbol::RightParen,
    Symbol::LeftSquareBracket,
    Symbol::RightSquareBracket,
    Symbol::Dot,
    Symbol::Comma,
    Symbol::Semicolon,
    Symbol::Plus,
    Symbol::Minus,
    Symbol::Asterisk,
    Symbol::Slash,
    Symbol::Amp,
    Symbol::VBar,
    Symbol::Lt,
    Symbol::Gt,
    Symbol::Eq,
    Symbol::Tilde,
  ];

  assert_eq!(tokens.len(), expected.len());

  for (token, symbol) in tokens.iter().zip(expected) {
    assert_eq!(token, &Token::Symbol(symbol, 0));
  }
}

#[test]
#[doc = "Symbols split adjacent tokens without whitespace."]
fn symbols_separate_tokens() {
  let tokens = tokenize("let x=a[3];");

  assert_eq!(
    tokens,
    vec![
      Token::Keyword(Keyword::Let, 0),
      Token::Identifier("x".to_string(), 0),
      Token::Symbol(Symbol::Eq, 0),
      Token::Identifier("a".to_string(), 0),
      Token::Symbol(Symbol::LeftSquareBracket, 0),
      Token::IntegerConstant(3, 0),
      Token::Symbol(Symbol::RightSquareBracket, 0),
      Token::Symbol(Symbol::Semicolon, 0),
    ]
  );
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Literals
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Integer constants cover 0..32767."]
fn integer_bounds() {
  assert_eq!(tokenize("0"), vec![Token::IntegerConstant(0, 0)]);
  assert_eq!(tokenize("32767"), vec![Token::IntegerConstant(32767, 0)]);

  let error = tokenize_err("32768");

  assert_eq!(error.kind(), ErrorKind::Lex);
}

#[test]
#[doc = "String constants hold the text between the quotes."]
fn string_constants() {
  assert_eq!(
    tokenize("\"hello world\""),
    vec![Token::StringConstant("hello world".to_string(), 0)]
  );
  assert_eq!(
    tokenize("\"\""),
    vec![Token::StringConstant(String::new(), 0)]
  );
}

#[test]
#[doc = "A string constant must close before the line ends."]
fn unterminated_string() {
  assert_eq!(tokenize_err("\"abc").kind(), ErrorKind::Lex);
  assert_eq!(tokenize_err("\"abc\ndef\"").kind(), ErrorKind::Lex);
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Comments & Whitespace
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Line, block and doc comments disappear from the stream."]
fn comments_are_skipped() {
  let source = "\
// line comment
let /* inline */ x /** doc
spanning lines */ = 1;
";
  let tokens = tokenize(source);

  assert_eq!(
    tokens,
    vec![
      Token::Keyword(Keyword::Let, 0),
      Token::Identifier("x".to_string(), 0),
      Token::Symbol(Symbol::Eq, 0),
      Token::IntegerConstant(1, 0),
      Token::Symbol(Symbol::Semicolon, 0),
    ]
  );
}

#[test]
#[doc = "Block comments terminate at the first closing marker, no nesting."]
fn block_comments_do_not_nest() {
  let tokens = tokenize("/* outer /* inner */ x");

  assert_eq!(tokens, vec![Token::Identifier("x".to_string(), 0)]);
}

#[test]
#[doc = "A block comment without closing marker is a lex error."]
fn unterminated_block_comment() {
  assert_eq!(tokenize_err("let /* oops").kind(), ErrorKind::Lex);
}

#[test]
#[doc = "Characters outside the language are lex errors with a position."]
fn stray_characters() {
  let error = tokenize_err("let x = 1;\nlet y = $;\n");

  assert_eq!(error.kind(), ErrorKind::Lex);
  assert_eq!(error.line(), Some(2));
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Positions
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Tokens carry their byte offset into the source."]
fn token_positions() {
  let tokens = tokenize("let x;");

  assert_eq!(tokens[0].get_pos(), 0);
  assert_eq!(tokens[1].get_pos(), 4);
  assert_eq!(tokens[2].get_pos(), 5);
}
