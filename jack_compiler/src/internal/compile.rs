////////////////////////////////////////////////////////////////////////////////
// File: src/internal/compile.rs
// Description: Compilation module
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 15.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use crate::internal::engine::CompilationEngine;

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

const JACK_EXTENSION: &str = "jack";
const VM_EXTENSION: &str = "vm";

////////////////////////////////////////////////////////////////////////////////
// Compilation Step
////////////////////////////////////////////////////////////////////////////////

// Every class file compiles to its own .vm file, next to the source or into
// the output directory when one is set.
pub(crate) fn compile(
  _c: &mut CommandLineParser,
  t: &mut Token,
) -> Result<()> {
  let Some(parameters) = t.parameters.clone() else {
    return Err(
      CoreError::new(ErrorKind::Argument, "No input path provided!").into(),
    );
  };

  let files = read_file_list(&parameters, JACK_EXTENSION)?;
  let programs = parse_programs(&files, CompilationEngine::compile)?;
  let output_dir = out_dir_check()?;

  generate_output(&programs, &files, output_dir.as_deref(), VM_EXTENSION)?;

  info_print!("{}", green!("Compilation successful!", true, false));

  return Ok(());
}
