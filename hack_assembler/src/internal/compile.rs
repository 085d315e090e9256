////////////////////////////////////////////////////////////////////////////////
// File: src/internal/compile.rs
// Description: Compilation module
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 01.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use crate::internal::parse::AsmParser;

use anyhow::Result;
use shared::{
  error::{CoreError, ErrorKind},
  green, info_print,
  io::{
    cli::{CommandLineParser, Token},
    os::{generate_output, out_dir_check, read_file_list},
  },
  util::parse::parse_programs,
};

////////////////////////////////////////////////////////////////////////////////
// Constants
////////////////////////////////////////////////////////////////////////////////

const ASM_EXTENSION: &str = "asm";
const HACK_EXTENSION: &str = "hack";

////////////////////////////////////////////////////////////////////////////////
// Compilation Step
////////////////////////////////////////////////////////////////////////////////

pub(crate) fn compile(
  _c: &mut CommandLineParser,
  t: &mut Token,
) -> Result<()> {
  let Some(parameters) = t.parameters.clone() else {
    return Err(
      CoreError::new(ErrorKind::Argument, "No input path provided!").into(),
    );
  };

  let files = read_file_list(&parameters, ASM_EXTENSION)?;
  let programs = parse_programs(&files, AsmParser::parse)?;
  let output_dir = out_dir_check()?;

  generate_output(&programs, &files, output_dir.as_deref(), HACK_EXTENSION)?;

  info_print!("{}", green!("Assembly successful!", true, false));

  return Ok(());
}
