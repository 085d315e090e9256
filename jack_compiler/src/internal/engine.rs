////////////////////////////////////////////////////////////////////////////////
// File: src/internal/engine.rs
// Description: Recursive-descent compilation engine
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 15.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use super::{
  jack::{VMSegment, VmCommand},
  symbols::{SymbolKind, SymbolTable, Variable},
  tokenize::{Keyword, Symbol, Token, TokenStream, Tokenizer, KEYWORD_THIS},
};

use anyhow::Result;
use shared::{
  error::{CoreError, ErrorKind},
  error_unreachable, info_print,
  io::os::FileInfo,
  util::settings::Setting,
};

////////////////////////////////////////////////////////////////////////////////
// Constants
////////////////////////////////////////////////////////////////////////////////

const OS_ALLOC: &str = "Memory.alloc";
const OS_STRING_NEW: &str = "String.new";
const OS_STRING_APPEND: &str = "String.appendChar";
const OS_MULTIPLY: &str = "Math.multiply";
const OS_DIVIDE: &str = "Math.divide";

////////////////////////////////////////////////////////////////////////////////
// Program
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub(crate) struct Program {
  pub(crate) commands: Vec<VmCommand>,
}

////////////////////////////////////////////////////////////////////////////////
// Compilation Engine
////////////////////////////////////////////////////////////////////////////////

// Single-pass parser and code generator: VM commands are emitted while the
// class is recognised, no syntax tree is retained.
pub(crate) struct CompilationEngine<'a> {
  stream: TokenStream<'a>,
  symbols: SymbolTable,
  class_name: String,
  label_id: u16,
  code: Vec<VmCommand>,
}

impl<'a> CompilationEngine<'a> {
  pub(crate) fn compile(file_info: &'a FileInfo) -> Result<Program> {
    info_print!("Compiling file: `{}`", file_info.name);

    let mut engine = Self {
      stream: Tokenizer::tokenize(file_info)?,
      symbols: SymbolTable::default(),
      class_name: String::new(),
      label_id: 0,
      code: Vec::new(),
    };

    engine.compile_class()?;

    let program = Program {
      commands: engine.code,
    };

    if Setting::PrintAll.is_set().is_ok()
      || Setting::PrintProgram.is_set().is_ok()
    {
      info_print!("Program");
      println!("{:#?}", program);
    }

    return Ok(program);
  }

  fn emit(&mut self, command: VmCommand) {
    self.code.push(command);
  }

  // Labels are unique per subroutine, the counter resets with each one.
  fn new_label(&mut self) -> String {
    let label = format!("L{}", self.label_id);

    self.label_id += 1;

    return label;
  }

  fn peek_keyword(&self) -> Option<Keyword> {
    if let Some(Token::Keyword(keyword, _)) = self.stream.peek() {
      return Some(*keyword);
    }

    return None;
  }

  fn peek_symbol(&self) -> Option<Symbol> {
    if let Some(Token::Symbol(symbol, _)) = self.stream.peek() {
      return Some(*symbol);
    }

    return None;
  }

  fn resolve_variable(
    &self,
    name: &str,
    pos: usize,
  ) -> Result<Variable, CoreError> {
    let Some(variable) = self.symbols.resolve(name) else {
      return Err(self.stream.error(
        ErrorKind::Semantic,
        pos,
        format!("Undeclared variable: `{}`", name),
      ));
    };

    return Ok(variable.clone());
  }

  ////////////////////////////////////////////////////////////////////////////
  // Declarations
  ////////////////////////////////////////////////////////////////////////////

  // class := "class" ident "{" classVarDec* subroutineDec* "}"
  fn compile_class(&mut self) -> Result<(), CoreError> {
    self.stream.expect(Token::Keyword(Keyword::Class, 0))?;

    let (class_name, _) = self.stream.expect_identifier()?;

    self.class_name = class_name;
    self
      .stream
      .expect(Token::Symbol(Symbol::LeftCurlyBrace, 0))?;

    while matches!(
      self.peek_keyword(),
      Some(Keyword::Static | Keyword::Field)
    ) {
      self.compile_class_var_dec()?;
    }

    while matches!(
      self.peek_keyword(),
      Some(Keyword::Constructor | Keyword::Function | Keyword::Method)
    ) {
      self.compile_subroutine()?;
    }

    self
      .stream
      .expect(Token::Symbol(Symbol::RightCurlyBrace, 0))?;

    if let Some(trailing) = self.stream.next() {
      return Err(self.stream.error(
        ErrorKind::Parse,
        trailing.get_pos(),
        format!("Trailing input after class declaration: ({})", trailing),
      ));
    }

    return Ok(());
  }

  // classVarDec := ("static"|"field") type ident ("," ident)* ";"
  fn compile_class_var_dec(&mut self) -> Result<(), CoreError> {
    let kind = match self.stream.next() {
      Some(Token::Keyword(Keyword::Static, _)) => SymbolKind::Static,
      _ => SymbolKind::Field,
    };
    let type_name = self.parse_type()?;

    loop {
      let (name, pos) = self.stream.expect_identifier()?;

      self.define_variable(&name, &type_name, kind, pos)?;

      if self.peek_symbol() == Some(Symbol::Comma) {
        self.stream.next();
        continue;
      }

      break;
    }

    self.stream.expect(Token::Symbol(Symbol::Semicolon, 0))?;

    return Ok(());
  }

  // type := "int"|"char"|"boolean"|ident
  fn parse_type(&mut self) -> Result<String, CoreError> {
    return match self.stream.next() {
      Some(Token::Keyword(
        keyword @ (Keyword::Int | Keyword::Char | Keyword::Boolean),
        _,
      )) => Ok(keyword.to_string()),
      Some(Token::Identifier(name, _)) => Ok(name),
      Some(token) => Err(self.stream.error(
        ErrorKind::Parse,
        token.get_pos(),
        format!("Expected (type). Found: ({}).", token),
      )),
      None => Err(self.stream.error(
        ErrorKind::Parse,
        0,
        "Expected (type). Found: (EOF).".to_string(),
      )),
    };
  }

  fn define_variable(
    &mut self,
    name: &str,
    type_name: &str,
    kind: SymbolKind,
    pos: usize,
  ) -> Result<u16, CoreError> {
    return self.symbols.define(name, type_name, kind).map_err(|_| {
      return self.stream.error(
        ErrorKind::Semantic,
        pos,
        format!("Variable declared more than once: `{}`", name),
      );
    });
  }

  // subroutineDec := ("constructor"|"function"|"method") ("void"|type)
  //                  ident "(" paramList ")" subroutineBody
  fn compile_subroutine(&mut self) -> Result<(), CoreError> {
    let subroutine_kind = match self.stream.next() {
      Some(Token::Keyword(Keyword::Constructor, _)) => Keyword::Constructor,
      Some(Token::Keyword(Keyword::Method, _)) => Keyword::Method,
      _ => Keyword::Function,
    };

    // The return type has no code generation impact: void callers discard
    // via the do-statement and void bodies return constant 0.
    if self.peek_keyword() == Some(Keyword::Void) {
      self.stream.next();
    } else {
      self.parse_type()?;
    }

    let (name, _) = self.stream.expect_identifier()?;

    self.symbols.start_subroutine();
    self.label_id = 0;

    // A method receives the object it acts on as implicit argument 0. The
    // subroutine scope was just reset, so the define cannot collide.
    if subroutine_kind == Keyword::Method {
      let class_name = self.class_name.clone();

      if self
        .symbols
        .define(KEYWORD_THIS, &class_name, SymbolKind::Argument)
        .is_err()
      {
        error_unreachable!("`this` already defined in a fresh scope");
      }
    }

    self.stream.expect(Token::Symbol(Symbol::LeftParen, 0))?;
    self.compile_parameter_list()?;
    self.stream.expect(Token::Symbol(Symbol::RightParen, 0))?;
    self
      .stream
      .expect(Token::Symbol(Symbol::LeftCurlyBrace, 0))?;

    while self.peek_keyword() == Some(Keyword::Var) {
      self.compile_var_dec()?;
    }

    let qualified_name = format!("{}.{}", self.class_name, name);
    let n_locals = self.symbols.count(SymbolKind::Var);

    self.emit(VmCommand::function(qualified_name, n_locals));

    match subroutine_kind {
      Keyword::Constructor => {
        // Allocate the object and aim `this` at it
        let field_count = self.symbols.count(SymbolKind::Field);

        self.emit(VmCommand::push(VMSegment::Constant, field_count));
        self.emit(VmCommand::call(OS_ALLOC.to_string(), 1));
        self.emit(VmCommand::pop(VMSegment::Pointer, 0));
      }
      Keyword::Method => {
        // Aim `this` at the receiver
        self.emit(VmCommand::push(VMSegment::Argument, 0));
        self.emit(VmCommand::pop(VMSegment::Pointer, 0));
      }
      _ => {}
    }

    self.compile_statements()?;
    self
      .stream
      .expect(Token::Symbol(Symbol::RightCurlyBrace, 0))?;

    return Ok(());
  }

  // paramList := ( type ident ("," type ident)* )?
  fn compile_parameter_list(&mut self) -> Result<(), CoreError> {
    if self.peek_symbol() == Some(Symbol::RightParen) {
      return Ok(());
    }

    loop {
      let type_name = self.parse_type()?;
      let (name, pos) = self.stream.expect_identifier()?;

      self.define_variable(&name, &type_name, SymbolKind::Argument, pos)?;

      if self.peek_symbol() == Some(Symbol::Comma) {
        self.stream.next();
        continue;
      }

      return Ok(());
    }
  }

  // varDec := "var" type ident ("," ident)* ";"
  fn compile_var_dec(&mut self) -> Result<(), CoreError> {
    self.stream.expect(Token::Keyword(Keyword::Var, 0))?;

    let type_name = self.parse_type()?;

    loop {
      let (name, pos) = self.stream.expect_identifier()?;

      self.define_variable(&name, &type_name, SymbolKind::Var, pos)?;

      if self.peek_symbol() == Some(Symbol::Comma) {
        self.stream.next();
        continue;
      }

      break;
    }

    self.stream.expect(Token::Symbol(Symbol::Semicolon, 0))?;

    return Ok(());
  }

  ////////////////////////////////////////////////////////////////////////////
  // Statements
  ////////////////////////////////////////////////////////////////////////////

  fn compile_statements(&mut self) -> Result<(), CoreError> {
    loop {
      match self.peek_keyword() {
        Some(Keyword::Let) => self.compile_let()?,
        Some(Keyword::If) => self.compile_if()?,
        Some(Keyword::While) => self.compile_while()?,
        Some(Keyword::Do) => self.compile_do()?,
        Some(Keyword::Return) => self.compile_return()?,
        _ => return Ok(()),
      }
    }
  }

  // letStmt := "let" ident ("[" expression "]")? "=" expression ";"
  fn compile_let(&mut self) -> Result<(), CoreError> {
    self.stream.expect(Token::Keyword(Keyword::Let, 0))?;

    let (name, pos) = self.stream.expect_identifier()?;
    let variable = self.resolve_variable(&name, pos)?;
    let segment = VMSegment::from(variable.kind);

    if self.peek_symbol() == Some(Symbol::LeftSquareBracket) {
      self.stream.next();

      // Target address = base + index
      self.emit(VmCommand::push(segment, variable.index));
      self.compile_expression()?;
      self
        .stream
        .expect(Token::Symbol(Symbol::RightSquareBracket, 0))?;
      self.emit(VmCommand::add);

      self.stream.expect(Token::Symbol(Symbol::Eq, 0))?;
      self.compile_expression()?;
      self.stream.expect(Token::Symbol(Symbol::Semicolon, 0))?;

      // The RHS value survives in temp 0 while pointer 1 is redirected,
      // the RHS itself may have clobbered pointer 1 with an array read.
      self.emit(VmCommand::pop(VMSegment::Temp, 0));
      self.emit(VmCommand::pop(VMSegment::Pointer, 1));
      self.emit(VmCommand::push(VMSegment::Temp, 0));
      self.emit(VmCommand::pop(VMSegment::That, 0));

      return Ok(());
    }

    self.stream.expect(Token::Symbol(Symbol::Eq, 0))?;
    self.compile_expression()?;
    self.stream.expect(Token::Symbol(Symbol::Semicolon, 0))?;
    self.emit(VmCommand::pop(segment, variable.index));

    return Ok(());
  }

  // ifStmt := "if" "(" expression ")" "{" statements "}"
  //           ("else" "{" statements "}")?
  fn compile_if(&mut self) -> Result<(), CoreError> {
    self.stream.expect(Token::Keyword(Keyword::If, 0))?;

    let false_label = self.new_label();
    let end_label = self.new_label();

    self.stream.expect(Token::Symbol(Symbol::LeftParen, 0))?;
    self.compile_expression()?;
    self.stream.expect(Token::Symbol(Symbol::RightParen, 0))?;
    self.emit(VmCommand::not);
    self.emit(VmCommand::if_goto(false_label.clone()));

    self
      .stream
      .expect(Token::Symbol(Symbol::LeftCurlyBrace, 0))?;
    self.compile_statements()?;
    self
      .stream
      .expect(Token::Symbol(Symbol::RightCurlyBrace, 0))?;
    self.emit(VmCommand::goto(end_label.clone()));
    self.emit(VmCommand::label(false_label));

    if self.peek_keyword() == Some(Keyword::Else) {
      self.stream.next();
      self
        .stream
        .expect(Token::Symbol(Symbol::LeftCurlyBrace, 0))?;
      self.compile_statements()?;
      self
        .stream
        .expect(Token::Symbol(Symbol::RightCurlyBrace, 0))?;
    }

    self.emit(VmCommand::label(end_label));

    return Ok(());
  }

  // whileStmt := "while" "(" expression ")" "{" statements "}"
  fn compile_while(&mut self) -> Result<(), CoreError> {
    self.stream.expect(Token::Keyword(Keyword::While, 0))?;

    let top_label = self.new_label();
    let end_label = self.new_label();

    self.emit(VmCommand::label(top_label.clone()));
    self.stream.expect(Token::Symbol(Symbol::LeftParen, 0))?;
    self.compile_expression()?;
    self.stream.expect(Token::Symbol(Symbol::RightParen, 0))?;
    self.emit(VmCommand::not);
    self.emit(VmCommand::if_goto(end_label.clone()));

    self
      .stream
      .expect(Token::Symbol(Symbol::LeftCurlyBrace, 0))?;
    self.compile_statements()?;
    self
      .stream
      .expect(Token::Symbol(Symbol::RightCurlyBrace, 0))?;
    self.emit(VmCommand::goto(top_label));
    self.emit(VmCommand::label(end_label));

    return Ok(());
  }

  // doStmt := "do" subroutineCall ";"
  fn compile_do(&mut self) -> Result<(), CoreError> {
    self.stream.expect(Token::Keyword(Keyword::Do, 0))?;

    let (name, _) = self.stream.expect_identifier()?;

    self.compile_subroutine_call(name)?;
    self.stream.expect(Token::Symbol(Symbol::Semicolon, 0))?;

    // The discarded return value must not linger on the stack
    self.emit(VmCommand::pop(VMSegment::Temp, 0));

    return Ok(());
  }

  // returnStmt := "return" expression? ";"
  fn compile_return(&mut self) -> Result<(), CoreError> {
    self.stream.expect(Token::Keyword(Keyword::Return, 0))?;

    if self.peek_symbol() == Some(Symbol::Semicolon) {
      // Void subroutines still deliver a value to the caller
      self.emit(VmCommand::push(VMSegment::Constant, 0));
    } else {
      self.compile_expression()?;
    }

    self.stream.expect(Token::Symbol(Symbol::Semicolon, 0))?;
    self.emit(VmCommand::r#return);

    return Ok(());
  }

  ////////////////////////////////////////////////////////////////////////////
  // Expressions
  ////////////////////////////////////////////////////////////////////////////

  // expression := term (op term)*
  fn compile_expression(&mut self) -> Result<(), CoreError> {
    self.compile_term()?;

    while let Some(symbol) = self.peek_symbol() {
      if !symbol.is_operator() {
        break;
      }

      self.stream.next();
      self.compile_term()?;

      match symbol {
        Symbol::Plus => self.emit(VmCommand::add),
        Symbol::Minus => self.emit(VmCommand::sub),
        Symbol::Amp => self.emit(VmCommand::and),
        Symbol::VBar => self.emit(VmCommand::or),
        Symbol::Lt => self.emit(VmCommand::lt),
        Symbol::Gt => self.emit(VmCommand::gt),
        Symbol::Eq => self.emit(VmCommand::eq),
        Symbol::Asterisk => {
          self.emit(VmCommand::call(OS_MULTIPLY.to_string(), 2))
        }
        _ => self.emit(VmCommand::call(OS_DIVIDE.to_string(), 2)),
      }
    }

    return Ok(());
  }

  // term := intConst | strConst | keywordConst | varRef | arrayRef
  //       | subroutineCall | "(" expression ")" | unaryOp term
  fn compile_term(&mut self) -> Result<(), CoreError> {
    let Some(token) = self.stream.next() else {
      return Err(self.stream.error(
        ErrorKind::Parse,
        0,
        "Expected (term). Found: (EOF).".to_string(),
      ));
    };

    match token {
      Token::IntegerConstant(value, _) => {
        self.emit(VmCommand::push(VMSegment::Constant, value));
      }
      Token::StringConstant(string, _) => {
        self.compile_string_constant(&string);
      }
      Token::Keyword(Keyword::True, _) => {
        self.emit(VmCommand::push(VMSegment::Constant, 0));
        self.emit(VmCommand::not);
      }
      Token::Keyword(Keyword::False | Keyword::Null, _) => {
        self.emit(VmCommand::push(VMSegment::Constant, 0));
      }
      Token::Keyword(Keyword::This, _) => {
        self.emit(VmCommand::push(VMSegment::Pointer, 0));
      }
      Token::Symbol(Symbol::LeftParen, _) => {
        self.compile_expression()?;
        self.stream.expect(Token::Symbol(Symbol::RightParen, 0))?;
      }
      Token::Symbol(Symbol::Minus, _) => {
        self.compile_term()?;
        self.emit(VmCommand::neg);
      }
      Token::Symbol(Symbol::Tilde, _) => {
        self.compile_term()?;
        self.emit(VmCommand::not);
      }
      Token::Identifier(name, pos) => match self.peek_symbol() {
        Some(Symbol::LeftParen | Symbol::Dot) => {
          self.compile_subroutine_call(name)?;
        }
        Some(Symbol::LeftSquareBracket) => {
          // arrayRef rvalue: *(base + index) via pointer 1
          let variable = self.resolve_variable(&name, pos)?;

          self.emit(VmCommand::push(
            VMSegment::from(variable.kind),
            variable.index,
          ));
          self.stream.next();
          self.compile_expression()?;
          self
            .stream
            .expect(Token::Symbol(Symbol::RightSquareBracket, 0))?;
          self.emit(VmCommand::add);
          self.emit(VmCommand::pop(VMSegment::Pointer, 1));
          self.emit(VmCommand::push(VMSegment::That, 0));
        }
        _ => {
          let variable = self.resolve_variable(&name, pos)?;

          self.emit(VmCommand::push(
            VMSegment::from(variable.kind),
            variable.index,
          ));
        }
      },
      _ => {
        return Err(self.stream.error(
          ErrorKind::Parse,
          token.get_pos(),
          format!("Expected (term). Found: ({}).", token),
        ));
      }
    }

    return Ok(());
  }

  // "s" becomes a String object built one character at a time.
  fn compile_string_constant(&mut self, string: &str) {
    self.emit(VmCommand::push(
      VMSegment::Constant,
      string.chars().count() as u16,
    ));
    self.emit(VmCommand::call(OS_STRING_NEW.to_string(), 1));

    for c in string.chars() {
      self.emit(VmCommand::push(VMSegment::Constant, c as u16));
      self.emit(VmCommand::call(OS_STRING_APPEND.to_string(), 2));
    }
  }

  // subroutineCall := ident "(" exprList ")"
  //                 | (ident|thisClass) "." ident "(" exprList ")"
  fn compile_subroutine_call(
    &mut self,
    receiver: String,
  ) -> Result<(), CoreError> {
    if self.peek_symbol() == Some(Symbol::Dot) {
      self.stream.next();

      let (subroutine, _) = self.stream.expect_identifier()?;

      // A variable receiver makes this a method call with the object as
      // implicit first argument. An unknown identifier names a class,
      // making it a static call.
      if let Some(variable) = self.symbols.resolve(&receiver).cloned() {
        self.emit(VmCommand::push(
          VMSegment::from(variable.kind),
          variable.index,
        ));

        let n_args = self.compile_expression_list()?;

        self.emit(VmCommand::call(
          format!("{}.{}", variable.type_name, subroutine),
          n_args + 1,
        ));
      } else {
        let n_args = self.compile_expression_list()?;

        self.emit(VmCommand::call(
          format!("{}.{}", receiver, subroutine),
          n_args,
        ));
      }

      return Ok(());
    }

    // Unqualified call: a method on the current object
    self.emit(VmCommand::push(VMSegment::Pointer, 0));

    let n_args = self.compile_expression_list()?;

    self.emit(VmCommand::call(
      format!("{}.{}", self.class_name, receiver),
      n_args + 1,
    ));

    return Ok(());
  }

  // exprList := (expression ("," expression)*)?
  fn compile_expression_list(&mut self) -> Result<u16, CoreError> {
    self.stream.expect(Token::Symbol(Symbol::LeftParen, 0))?;

    let mut n_args = 0;

    if self.peek_symbol() != Some(Symbol::RightParen) {
      loop {
        self.compile_expression()?;
        n_args += 1;

        if self.peek_symbol() == Some(Symbol::Comma) {
          self.stream.next();
          continue;
        }

        break;
      }
    }

    self.stream.expect(Token::Symbol(Symbol::RightParen, 0))?;

    return Ok(n_args);
  }
}
