////////////////////////////////////////////////////////////////////////////////
// File: src/internal/compile.rs
// Description: Compilation module
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 06.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use std::path::{Path, PathBuf};

use crate::internal::{intermediate::CodeWriter, parse::VmParser};

use anyhow::Result;
use shared::{
  error::{CoreError, ErrorKind},
  green, info_print,
  io::{
    cli::{CommandLineParser, Token},
    os::{generate_output, out_dir_check, read_file_list, FileInfo},
  },
};

////////////////////////////////////////////////////////////////////////////////
// Constants
////////////////////////////////////////////////////////////////////////////////

const VM_EXTENSION: &str = "vm";
const ASM_EXTENSION: &str = "asm";

////////////////////////////////////////////////////////////////////////////////
// Compilation Step
////////////////////////////////////////////////////////////////////////////////

// A directory translates into one <dir>/<dir>.asm with the bootstrap code in
// front, a single file into a sibling .asm without it.
pub(crate) fn compile(
  _c: &mut CommandLineParser,
  t: &mut Token,
) -> Result<()> {
  let Some(first) = t
    .parameters
    .clone()
    .unwrap_or_default()
    .into_iter()
    .next()
  else {
    return Err(
      CoreError::new(ErrorKind::Argument, "No input path provided!").into(),
    );
  };

  let files = read_file_list(&[first.clone()], VM_EXTENSION)?;
  let input_path = PathBuf::from(&first);

  let mut writer = CodeWriter::default();
  let out_file: FileInfo;

  if input_path.is_dir() {
    out_file = directory_output_file(&input_path)?;
    writer.insert_bootstrap();
  } else {
    out_file = files[0].clone();
  }

  for file in files.iter() {
    let tokens = VmParser::parse(file)?;

    writer.set_file(&file.stem);
    writer.translate(&tokens);
  }

  let output_dir = out_dir_check()?;

  generate_output(
    &[writer.into_program()],
    &[out_file],
    output_dir.as_deref(),
    ASM_EXTENSION,
  )?;

  info_print!("{}", green!("Translation successful!", true, false));

  return Ok(());
}

fn directory_output_file(input_path: &Path) -> Result<FileInfo> {
  let Some(dir_name) = input_path
    .file_name()
    .and_then(|name| return name.to_str())
  else {
    return Err(
      CoreError::new(
        ErrorKind::Argument,
        format!(
          "Cannot derive an output name from `{}`",
          input_path.to_string_lossy()
        ),
      )
      .into(),
    );
  };

  let out_path = input_path.join(format!("{}.{}", dir_name, ASM_EXTENSION));

  return Ok(FileInfo::new(
    out_path.to_string_lossy().to_string(),
    out_path,
    String::new(),
  ));
}
