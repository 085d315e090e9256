////////////////////////////////////////////////////////////////////////////////
// File: src/util/parse.rs
// Description: Shared translation driver loop
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 01.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use crate::io::os::FileInfo;

use super::traits::Serializable;

use anyhow::Result;

// Translate the file list in order, stopping at the first error. Input after
// a failed file is not consumed.
pub fn parse_programs<'a, F, P>(files: &'a [FileInfo], parse: F) -> Result<Vec<P>>
where
  F: Fn(&'a FileInfo) -> Result<P>,
  P: Serializable,
{
  return files.iter().map(parse).collect();
}
