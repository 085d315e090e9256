////////////////////////////////////////////////////////////////////////////////
// File: src/internal/parse.rs
// Description: Parser module (label collection pass)
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 01.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use crate::internal::{
  asm::{AToken, CCompToken, CDestinationToken, CJumpToken, CToken, Token},
  symbols::SymbolTable,
};

use anyhow::Result;
use shared::{
  error::{CoreError, ErrorKind, SourcePos},
  info_print,
  io::os::FileInfo,
  util::{
    helpers::{FindIgnoringWhitespace, StrManipulation},
    settings::Setting,
  },
};

////////////////////////////////////////////////////////////////////////////////
// Constants
////////////////////////////////////////////////////////////////////////////////

const MAX_LITERAL: u32 = 0x7FFF;
const MAX_ROM_ADDRESS: u16 = 0x7FFF;

////////////////////////////////////////////////////////////////////////////////
// Program
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub(crate) struct Program {
  pub(crate) tokens: Vec<Token>,
  pub(crate) symbols: SymbolTable,
}

impl Program {
  // Resolution pass: walk the token stream left to right and replace every
  // symbolic A-command with its address, allocating RAM cells for symbols
  // the label pass did not define.
  pub(crate) fn link(&mut self) -> Result<(), CoreError> {
    for token in self.tokens.iter_mut() {
      let Token::A(a_token) = token else {
        continue;
      };

      let AToken::Symbol(name) = &*a_token else {
        continue;
      };

      let address = match self.symbols.resolve(name) {
        Some(address) => address,
        None => self.symbols.allocate(name)?,
      };

      *a_token = AToken::Literal(address);
    }

    return Ok(());
  }
}

////////////////////////////////////////////////////////////////////////////////
// Assembly Parser
////////////////////////////////////////////////////////////////////////////////

pub(crate) struct AsmParser<'a> {
  rom: u16,
  line: usize,
  file_info: &'a FileInfo,
}

impl<'a> AsmParser<'a> {
  pub(crate) fn parse(file_info: &'a FileInfo) -> Result<Program> {
    info_print!("Assembling file: `{}`", file_info.name);

    let mut parser = Self {
      rom: 0,
      line: 0,
      file_info,
    };

    let mut tokens = Vec::new();
    let mut symbols = SymbolTable::predefined();

    for (index, raw_line) in file_info.content.lines().enumerate() {
      parser.line = index + 1;

      let line = raw_line
        .split("//")
        .next()
        .unwrap_or_default()
        .remove_whitespaces();

      if line.is_empty() {
        continue;
      }

      tokens.push(parser.parse_line(&line, raw_line, &mut symbols)?);
    }

    let mut program = Program { tokens, symbols };

    program
      .link()
      .map_err(|e| return e.in_file(&file_info.name))?;

    if Setting::PrintAll.is_set().is_ok()
      || Setting::PrintProgram.is_set().is_ok()
    {
      info_print!("Program");
      println!("{:#?}", program.tokens);
    }

    if Setting::PrintAll.is_set().is_ok()
      || Setting::PrintSymbols.is_set().is_ok()
    {
      info_print!("Symbol Table");
      println!("{:#?}", program.symbols);
    }

    return Ok(program);
  }

  fn err(
    &self,
    kind: ErrorKind,
    raw_line: &str,
    lexeme: &str,
    message: String,
  ) -> CoreError {
    let column = raw_line.find_ignoring_whitespaces(lexeme).unwrap_or(0);

    return CoreError::new(kind, message)
      .in_file(&self.file_info.name)
      .at(SourcePos::from_line(self.line, column, raw_line));
  }

  fn bump_rom(&mut self, raw_line: &str) -> Result<(), CoreError> {
    if self.rom > MAX_ROM_ADDRESS {
      return Err(self.err(
        ErrorKind::Encoding,
        raw_line,
        raw_line,
        "Program exceeds the 32K instruction memory".to_string(),
      ));
    }

    self.rom += 1;

    return Ok(());
  }

  fn parse_line(
    &mut self,
    line: &str,
    raw_line: &str,
    symbols: &mut SymbolTable,
  ) -> Result<Token, CoreError> {
    if line.starts_with('(') {
      return self.parse_label(line, raw_line, symbols);
    }

    if line.starts_with('@') {
      let token = self.parse_a_token(line, raw_line)?;
      self.bump_rom(raw_line)?;

      return Ok(token);
    }

    let token = self.parse_c_token(line, raw_line)?;
    self.bump_rom(raw_line)?;

    return Ok(token);
  }

  fn parse_label(
    &mut self,
    line: &str,
    raw_line: &str,
    symbols: &mut SymbolTable,
  ) -> Result<Token, CoreError> {
    let Some(label) = line
      .strip_prefix('(')
      .and_then(|rest| return rest.strip_suffix(')'))
    else {
      return Err(self.err(
        ErrorKind::Parse,
        raw_line,
        line,
        format!("Unterminated label: `{}`", line),
      ));
    };

    if label.is_empty() {
      return Err(self.err(
        ErrorKind::Parse,
        raw_line,
        line,
        "Empty label".to_string(),
      ));
    }

    // Labels name the ROM address of the following instruction and do not
    // occupy one themselves.
    symbols
      .define_label(label, self.rom)
      .map_err(|e| {
        return e.in_file(&self.file_info.name).at(SourcePos::from_line(
          self.line,
          raw_line.find_ignoring_whitespaces(label).unwrap_or(0),
          raw_line,
        ));
      })?;

    return Ok(Token::Label);
  }

  fn parse_a_token(
    &mut self,
    line: &str,
    raw_line: &str,
  ) -> Result<Token, CoreError> {
    let mnemonic = line.strip_prefix('@').unwrap_or_default();

    if mnemonic.is_empty() {
      return Err(self.err(
        ErrorKind::Parse,
        raw_line,
        line,
        "A-command without address or symbol".to_string(),
      ));
    }

    if mnemonic.chars().all(|c| return c.is_ascii_digit()) {
      let value = mnemonic.parse::<u32>().unwrap_or(u32::MAX);

      if value > MAX_LITERAL {
        return Err(self.err(
          ErrorKind::Encoding,
          raw_line,
          mnemonic,
          format!("Address literal out of 15-bit range: `{}`", mnemonic),
        ));
      }

      return Ok(Token::A(AToken::Literal(value as u16)));
    }

    return Ok(Token::A(AToken::Symbol(mnemonic.to_string())));
  }

  fn parse_c_token(
    &mut self,
    line: &str,
    raw_line: &str,
  ) -> Result<Token, CoreError> {
    let mut cmp_token: Option<&str> = None;

    let dst = if let Some((dst, cmp)) = line.split_once('=') {
      if dst.is_empty() {
        return Err(self.err(
          ErrorKind::Parse,
          raw_line,
          line,
          "No destination found".to_string(),
        ));
      } else if cmp.is_empty() {
        return Err(self.err(
          ErrorKind::Parse,
          raw_line,
          line,
          "No assignment instruction found".to_string(),
        ));
      }

      cmp_token = Some(cmp);

      self.match_dest_token(dst, raw_line)?
    } else {
      CDestinationToken {
        a_reg: false,
        d_reg: false,
        ram: false,
      }
    };

    let rest = cmp_token.unwrap_or(line);

    let jmp = if let Some((cmp, jmp)) = rest.split_once(';') {
      if cmp.is_empty() {
        return Err(self.err(
          ErrorKind::Parse,
          raw_line,
          line,
          "No value found".to_string(),
        ));
      } else if jmp.is_empty() {
        return Err(self.err(
          ErrorKind::Parse,
          raw_line,
          line,
          "No jump instruction found".to_string(),
        ));
      }

      cmp_token = Some(cmp);

      self.match_jump_token(jmp, raw_line)?
    } else {
      cmp_token = Some(rest);

      CJumpToken {
        eq: false,
        gt: false,
        lt: false,
      }
    };

    let cmp = self.match_comp_token(cmp_token.unwrap_or(line), raw_line)?;

    return Ok(Token::C(CToken { cmp, dst, jmp }));
  }

  fn match_dest_token(
    &self,
    token: &str,
    raw_line: &str,
  ) -> Result<CDestinationToken, CoreError> {
    if !token.chars().all(|c| return matches!(c, 'A' | 'D' | 'M')) {
      return Err(self.err(
        ErrorKind::Encoding,
        raw_line,
        token,
        format!("Unknown destination mnemonic: `{}`", token),
      ));
    }

    return Ok(CDestinationToken {
      a_reg: token.contains('A'),
      d_reg: token.contains('D'),
      ram: token.contains('M'),
    });
  }

  fn match_jump_token(
    &self,
    token: &str,
    raw_line: &str,
  ) -> Result<CJumpToken, CoreError> {
    return match token {
      "JGT" => Ok(CJumpToken {
        eq: false,
        gt: true,
        lt: false,
      }),
      "JEQ" => Ok(CJumpToken {
        eq: true,
        gt: false,
        lt: false,
      }),
      "JGE" => Ok(CJumpToken {
        eq: true,
        gt: true,
        lt: false,
      }),
      "JLT" => Ok(CJumpToken {
        eq: false,
        gt: false,
        lt: true,
      }),
      "JNE" => Ok(CJumpToken {
        eq: false,
        gt: true,
        lt: true,
      }),
      "JLE" => Ok(CJumpToken {
        eq: true,
        gt: false,
        lt: true,
      }),
      "JMP" => Ok(CJumpToken {
        eq: true,
        gt: true,
        lt: true,
      }),
      _ => Err(self.err(
        ErrorKind::Encoding,
        raw_line,
        token,
        format!("Unknown jump mnemonic: `{}`", token),
      )),
    };
  }

  fn match_comp_token(
    &self,
    token: &str,
    raw_line: &str,
  ) -> Result<CCompToken, CoreError> {
    return match token {
      "0" => Ok(CCompToken::Zero),
      "1" => Ok(CCompToken::One),
      "-1" => Ok(CCompToken::MinusOne),
      "D" => Ok(CCompToken::DRegister),
      "A" => Ok(CCompToken::ARegister),
      "M" => Ok(CCompToken::RAM),
      "!D" => Ok(CCompToken::NotDRegister),
      "!A" => Ok(CCompToken::NotARegister),
      "!M" => Ok(CCompToken::NotRAM),
      "-D" => Ok(CCompToken::MinusDRegister),
      "-A" => Ok(CCompToken::MinusARegister),
      "-M" => Ok(CCompToken::MinusRAM),
      "D+1" => Ok(CCompToken::DRegisterPlusOne),
      "A+1" => Ok(CCompToken::ARegisterPlusOne),
      "M+1" => Ok(CCompToken::RAMPlusOne),
      "D-1" => Ok(CCompToken::DRegisterMinusOne),
      "A-1" => Ok(CCompToken::ARegisterMinusOne),
      "M-1" => Ok(CCompToken::RAMMinusOne),
      "D+A" => Ok(CCompToken::DRegisterPlusARegister),
      "D+M" => Ok(CCompToken::DRegisterPlusRAM),
      "D-A" => Ok(CCompToken::DRegisterMinusARegister),
      "D-M" => Ok(CCompToken::DRegisterMinusRAM),
      "A-D" => Ok(CCompToken::ARegisterMinusDRegister),
      "M-D" => Ok(CCompToken::RAMMinusDRegister),
      "D&A" => Ok(CCompToken::DRegisterAndARegister),
      "D&M" => Ok(CCompToken::DRegisterAndRAM),
      "D|A" => Ok(CCompToken::DRegisterOrARegister),
      "D|M" => Ok(CCompToken::DRegisterOrRAM),
      _ => Err(self.err(
        ErrorKind::Encoding,
        raw_line,
        token,
        format!("Unknown computation mnemonic: `{}`", token),
      )),
    };
  }
}
