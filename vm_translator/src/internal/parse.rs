////////////////////////////////////////////////////////////////////////////////
// File: src/internal/parse.rs
// Description: Parser module
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 06.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use std::str::SplitWhitespace;

use super::vm::*;

use anyhow::Result;
use shared::{
  error::{CoreError, ErrorKind, SourcePos},
  info_print,
  io::os::FileInfo,
  util::{helpers::FindIgnoringWhitespace, settings::Setting},
};

////////////////////////////////////////////////////////////////////////////////
// Constants
////////////////////////////////////////////////////////////////////////////////

const MAX_CONSTANT: u16 = 0x7FFF;
const TEMP_SEGMENT_SIZE: u16 = 8;

////////////////////////////////////////////////////////////////////////////////
// VM Instruction Parser
////////////////////////////////////////////////////////////////////////////////

pub(crate) struct VmParser<'a> {
  line: usize,
  file_info: &'a FileInfo,
}

impl<'a> VmParser<'a> {
  // Segment names
  const SEGMENT_ARG: &'static str = "argument";
  const SEGMENT_CONST: &'static str = "constant";
  const SEGMENT_LOCAL: &'static str = "local";
  const SEGMENT_TEMP: &'static str = "temp";
  const SEGMENT_THAT: &'static str = "that";
  const SEGMENT_THIS: &'static str = "this";
  const SEGMENT_STATIC: &'static str = "static";
  const SEGMENT_PTR: &'static str = "pointer";

  // Instruction names
  const INSTR_PUSH: &'static str = "push";
  const INSTR_POP: &'static str = "pop";
  const INSTR_GOTO: &'static str = "goto";
  const INSTR_IF_GOTO: &'static str = "if-goto";
  const INSTR_LABEL: &'static str = "label";
  const INSTR_FUNCTION: &'static str = "function";
  const INSTR_CALL: &'static str = "call";
  const INSTR_ADD: &'static str = "add";
  const INSTR_SUB: &'static str = "sub";
  const INSTR_NEG: &'static str = "neg";
  const INSTR_EQ: &'static str = "eq";
  const INSTR_GT: &'static str = "gt";
  const INSTR_LT: &'static str = "lt";
  const INSTR_AND: &'static str = "and";
  const INSTR_OR: &'static str = "or";
  const INSTR_NOT: &'static str = "not";
  const INSTR_RETURN: &'static str = "return";

  pub(crate) fn parse(file_info: &'a FileInfo) -> Result<Vec<Token>> {
    info_print!("Parsing file: `{}`", file_info.name);

    let mut parser = Self { line: 0, file_info };
    let mut tokens = Vec::new();

    for (index, raw_line) in file_info.content.lines().enumerate() {
      parser.line = index + 1;

      let line = raw_line.split("//").next().unwrap_or_default().trim();

      if line.is_empty() {
        continue;
      }

      tokens.push(parser.parse_instruction(line, raw_line)?);
    }

    if Setting::PrintAll.is_set().is_ok()
      || Setting::PrintProgram.is_set().is_ok()
    {
      info_print!("Program");
      println!("{:#?}", tokens);
    }

    return Ok(tokens);
  }

  fn err(
    &self,
    raw_line: &str,
    lexeme: &str,
    message: String,
  ) -> CoreError {
    let column = raw_line.find_ignoring_whitespaces(lexeme).unwrap_or(0);

    return CoreError::new(ErrorKind::Parse, message)
      .in_file(&self.file_info.name)
      .at(SourcePos::from_line(self.line, column, raw_line));
  }

  fn parse_instruction(
    &mut self,
    line: &str,
    raw_line: &str,
  ) -> Result<Token, CoreError> {
    let mut line_parts = line.split_whitespace();

    let Some(instr_str) = line_parts.next() else {
      return Err(self.err(
        raw_line,
        line,
        "No instruction found in line".to_string(),
      ));
    };

    let token = match instr_str {
      Self::INSTR_PUSH => {
        let (segment, value) =
          self.parse_segment_params(&mut line_parts, instr_str, raw_line)?;

        if segment == Segment::Constant && value > MAX_CONSTANT {
          return Err(self.err(
            raw_line,
            instr_str,
            format!("Constant out of 15-bit range: `{}`", value),
          ));
        }

        Token::Push(Push(segment, value))
      }
      Self::INSTR_POP => {
        let (segment, value) =
          self.parse_segment_params(&mut line_parts, instr_str, raw_line)?;

        if segment == Segment::Constant {
          return Err(self.err(
            raw_line,
            instr_str,
            "Cannot pop into the constant segment".to_string(),
          ));
        }

        Token::Pop(Pop(segment, value))
      }
      Self::INSTR_GOTO => {
        Token::Goto(Goto(self.parse_name(&mut line_parts, instr_str, raw_line)?))
      }
      Self::INSTR_IF_GOTO => Token::IfGoto(IfGoto(self.parse_name(
        &mut line_parts,
        instr_str,
        raw_line,
      )?)),
      Self::INSTR_LABEL => Token::Label(Label(self.parse_name(
        &mut line_parts,
        instr_str,
        raw_line,
      )?)),
      Self::INSTR_FUNCTION => {
        let (name, value) =
          self.parse_function_params(&mut line_parts, instr_str, raw_line)?;

        Token::FunctionDecl(FunctionDecl(name, value))
      }
      Self::INSTR_CALL => {
        let (name, value) =
          self.parse_function_params(&mut line_parts, instr_str, raw_line)?;

        Token::FunctionCall(FunctionCall(name, value))
      }
      Self::INSTR_ADD => Token::Add(Add),
      Self::INSTR_SUB => Token::Sub(Sub),
      Self::INSTR_NEG => Token::Neg(Neg),
      Self::INSTR_EQ => Token::Eq(Eq),
      Self::INSTR_GT => Token::Gt(Gt),
      Self::INSTR_LT => Token::Lt(Lt),
      Self::INSTR_AND => Token::And(And),
      Self::INSTR_OR => Token::Or(Or),
      Self::INSTR_NOT => Token::Not(Not),
      Self::INSTR_RETURN => Token::Return(Return),
      _ => {
        return Err(self.err(
          raw_line,
          instr_str,
          format!("Unknown instruction: `{}`", instr_str),
        ));
      }
    };

    if let Some(excess) = line_parts.next() {
      return Err(self.err(
        raw_line,
        excess,
        format!("Unexpected trailing token: `{}`", excess),
      ));
    }

    return Ok(token);
  }

  fn match_segment(&self, segment: &str) -> Option<Segment> {
    match segment {
      Self::SEGMENT_ARG => return Some(Segment::Argument),
      Self::SEGMENT_CONST => return Some(Segment::Constant),
      Self::SEGMENT_LOCAL => return Some(Segment::Local),
      Self::SEGMENT_TEMP => return Some(Segment::Temp),
      Self::SEGMENT_THAT => return Some(Segment::That),
      Self::SEGMENT_THIS => return Some(Segment::This),
      Self::SEGMENT_STATIC => return Some(Segment::Static),
      Self::SEGMENT_PTR => return Some(Segment::Pointer),
      _ => return None,
    }
  }

  fn parse_index(
    &self,
    parts: &mut SplitWhitespace<'_>,
    instr_name: &str,
    raw_line: &str,
  ) -> Result<u16, CoreError> {
    let Some(value_str) = parts.next() else {
      return Err(self.err(
        raw_line,
        instr_name,
        format!("Index missing in {} instruction", instr_name),
      ));
    };

    return value_str.parse::<u16>().map_err(|_| {
      return self.err(
        raw_line,
        value_str,
        format!("Invalid index in {} instruction: `{}`", instr_name, value_str),
      );
    });
  }

  fn parse_segment_params(
    &self,
    parts: &mut SplitWhitespace<'_>,
    instr_name: &str,
    raw_line: &str,
  ) -> Result<(Segment, u16), CoreError> {
    let Some(seg_str) = parts.next() else {
      return Err(self.err(
        raw_line,
        instr_name,
        format!("Segment missing in {} instruction", instr_name),
      ));
    };

    let Some(segment) = self.match_segment(seg_str) else {
      return Err(self.err(
        raw_line,
        seg_str,
        format!("Unknown segment: `{}`", seg_str),
      ));
    };

    let value = self.parse_index(parts, instr_name, raw_line)?;

    match segment {
      Segment::Pointer if value > 1 => {
        return Err(self.err(
          raw_line,
          seg_str,
          format!("Invalid pointer offset value `{}`", value),
        ));
      }
      Segment::Temp if value >= TEMP_SEGMENT_SIZE => {
        return Err(self.err(
          raw_line,
          seg_str,
          format!("Temp segment has eight cells, index `{}` is out", value),
        ));
      }
      _ => {}
    }

    return Ok((segment, value));
  }

  fn parse_function_params(
    &self,
    parts: &mut SplitWhitespace<'_>,
    instr_name: &str,
    raw_line: &str,
  ) -> Result<(String, u16), CoreError> {
    let Some(name) = parts.next() else {
      return Err(self.err(
        raw_line,
        instr_name,
        format!("Function name missing in {} instruction", instr_name),
      ));
    };

    let value = self.parse_index(parts, instr_name, raw_line)?;

    return Ok((name.to_string(), value));
  }

  fn parse_name(
    &self,
    parts: &mut SplitWhitespace<'_>,
    instr_name: &str,
    raw_line: &str,
  ) -> Result<String, CoreError> {
    let Some(label) = parts.next() else {
      return Err(self.err(
        raw_line,
        instr_name,
        format!("Label missing in {} instruction", instr_name),
      ));
    };

    return Ok(label.to_string());
  }
}
