////////////////////////////////////////////////////////////////////////////////
// File: src/io/os.rs
// Description: OS interaction module
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 01.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use std::ffi::OsStr;
use std::path::Path;
use std::{fs, path::PathBuf};

use crate::error::{CoreError, ErrorKind};
use crate::util::traits::Serializable;
use crate::{info_print, util::settings::Setting};

use anyhow::Result;

////////////////////////////////////////////////////////////////////////////////
// Filesystem Interactions
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct FileInfo {
  pub name: String,
  pub stem: String,
  pub path: PathBuf,
  pub content: String,
}

impl FileInfo {
  pub fn new(name: String, path: PathBuf, content: String) -> Self {
    let stem = path
      .file_stem()
      .and_then(|stem| return stem.to_str())
      .unwrap_or_default()
      .to_string();

    return Self {
      name,
      stem,
      path,
      content,
    };
  }

  pub fn from_path(path: PathBuf, file_extension: Option<&str>) -> Result<Self> {
    let path_str = path.to_string_lossy().to_string();

    if let Some(file_extension) = file_extension {
      if path.extension() != Some(OsStr::new(file_extension)) {
        return Err(
          CoreError::new(
            ErrorKind::Argument,
            format!(
              "Invalid file extension on file: `{}`. Expected extension `.{}`",
              path_str, file_extension
            ),
          )
          .into(),
        );
      }
    }

    let content = fs::read_to_string(&path).map_err(|e| {
      return CoreError::new(
        ErrorKind::Io,
        format!("[{}] {}", &path_str, e),
      );
    })?;

    return Ok(Self::new(
      path_str,
      path,
      content.replace('\t', "    ").replace("\r\n", "\n"), // INFO: This might have performance implications
    ));
  }
}

pub fn read_file_list(
  paths: &[String],
  file_extension: &str,
) -> Result<Vec<FileInfo>> {
  let mut file_info_list = Vec::new();

  for x in paths.iter() {
    let path = PathBuf::from(x);

    if path.is_dir() {
      let dir_entries = fs::read_dir(&path).map_err(|e| {
        return CoreError::new(
          ErrorKind::Io,
          format!("[{}] {}", path.to_string_lossy(), e),
        );
      })?;

      let mut matched: Vec<PathBuf> = Vec::new();

      for entry in dir_entries {
        let entry = entry.map_err(|e| {
          return CoreError::new(
            ErrorKind::Io,
            format!("Failed to read directory entry: {}", e),
          );
        })?;
        let entry_path = entry.path();

        if entry_path.is_file()
          && entry_path.extension() == Some(OsStr::new(file_extension))
        {
          matched.push(entry_path);
        }
      }

      if matched.is_empty() {
        return Err(
          CoreError::new(
            ErrorKind::Argument,
            format!(
              "Directory `{}` contains no `.{}` files",
              path.to_string_lossy(),
              file_extension
            ),
          )
          .into(),
        );
      }

      // The OS iteration order is unspecified. Sort by file name so the
      // translation output is reproducible.
      matched.sort();

      for entry_path in matched {
        file_info_list.push(FileInfo::from_path(entry_path, None)?);
      }
    } else {
      file_info_list.push(FileInfo::from_path(path, Some(file_extension))?);
    }
  }

  return Ok(file_info_list);
}

pub fn dir_check(path: Option<&Path>) -> Result<Option<&Path>> {
  let Some(path) = path else {
    return Ok(None);
  };

  if !path.is_dir() {
    fs::create_dir_all(path).map_err(|e| {
      return CoreError::new(
        ErrorKind::Io,
        format!("Failed to create output directory: {}", e),
      );
    })?;
    info_print!(
      "Created output directory: `{}`",
      path.to_string_lossy()
    );
  }

  return Ok(Some(path));
}

pub fn out_dir_check() -> Result<Option<PathBuf>> {
  let Ok(Some(values)) = Setting::Output.is_set() else {
    return Ok(None);
  };

  let Some(first) = values.first() else {
    return Err(
      CoreError::new(ErrorKind::Argument, "No output directory provided!")
        .into(),
    );
  };

  let output_dir = PathBuf::from(first);

  dir_check(Some(output_dir.as_path()))?;

  return Ok(Some(output_dir));
}

pub fn write_file(
  file_path: PathBuf,
  content: String,
) -> Result<(PathBuf, String)> {
  fs::write(&file_path, &content).map_err(|e| {
    return CoreError::new(
      ErrorKind::Io,
      format!(
        "Failed to write to file `{}`: {}",
        file_path.to_string_lossy(),
        e
      ),
    );
  })?;

  return Ok((file_path, content));
}

pub fn generate_output(
  programs: &[impl Serializable<Output = String>],
  files: &[FileInfo],
  output_dir: Option<&Path>,
  output_file_ext: &str,
) -> Result<Vec<(PathBuf, String)>> {
  let mut outputs = Vec::new();

  for (index, program) in programs.iter().enumerate() {
    let output = program.serialize();
    let mut file_path = files[index].path.clone();
    file_path.set_extension(output_file_ext);

    if let Some(output_dir) = output_dir {
      let mut output_dir = output_dir.to_path_buf();

      if let Some(file_name) = file_path.file_name() {
        output_dir.push(file_name);
      }

      file_path = output_dir;
    }

    outputs.push(write_file(file_path, output)?);
  }

  return Ok(outputs);
}
