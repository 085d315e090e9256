////////////////////////////////////////////////////////////////////////////////
// File: src/tests/util.rs
// Description: Test utility functions
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 15.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use std::path::PathBuf;

use crate::internal::engine::CompilationEngine;

use shared::{
  error::{CoreError, ErrorKind},
  io::os::FileInfo,
  util::traits::Serializable,
};

////////////////////////////////////////////////////////////////////////////////
// Test Helper Functions
////////////////////////////////////////////////////////////////////////////////

pub(super) fn file_info(source: &str) -> FileInfo {
  return FileInfo::new(
    "Main.jack".to_string(),
    PathBuf::from("Main.jack"),
    source.to_string(),
  );
}

pub(super) fn compile_source(source: &str) -> String {
  let file_info = file_info(source);
  let program = CompilationEngine::compile(&file_info).unwrap();

  return program.serialize();
}

pub(super) fn compile_err(source: &str) -> ErrorKind {
  let file_info = file_info(source);
  let error = CompilationEngine::compile(&file_info).unwrap_err();

  return error.downcast_ref::<CoreError>().unwrap().kind();
}
