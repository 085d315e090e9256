////////////////////////////////////////////////////////////////////////////////
// File: src/util/settings.rs
// Description: Program settings
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 01.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use std::{
  collections::{hash_map::Entry, HashMap},
  sync::RwLock,
};

use crate::{
  error::{CoreError, ErrorKind},
  io::cli::{ArgType, CommandLineParser, DefaultArgType, Token},
};

use anyhow::Result;

////////////////////////////////////////////////////////////////////////////////
// Global Settings
////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Default)]
pub(crate) struct SettingContent {
  flag_val: u64,
  values: Option<Vec<String>>,
}

impl SettingContent {
  pub(crate) fn new(flag_val: u64, values: Option<Vec<String>>) -> Self {
    return Self { flag_val, values };
  }
}

lazy_static::lazy_static! {
  pub(crate) static ref GLOBAL_SETTINGS: RwLock<HashMap<ArgType, SettingContent>> = {
    let mut map = HashMap::new();
    map.insert(ArgType::Debug, SettingContent::default());
    map.insert(ArgType::Output, SettingContent::default());
    return RwLock::new(map);
  };
}

#[derive(Clone, Copy)]
pub enum Setting {
  PrintAll = 1 << 1_i64,
  PrintSymbols = 1 << 2_i64,
  PrintProgram = 1 << 3_i64,
  Output = 1 << 4_i64,
}

impl Setting {
  fn arg_type(&self) -> ArgType {
    return match self {
      Setting::Output => ArgType::Output,
      _ => ArgType::Debug,
    };
  }

  pub fn from_vec(v: Vec<String>, default: (u64, bool)) -> (u64, bool) {
    let (default_setting, set_value) = default;
    let mut value = 0;

    for s in v {
      match s.as_str() {
        "all" => {
          value |= Setting::PrintAll as u64;
        }
        "symbols" => {
          value |= Setting::PrintSymbols as u64;
        }
        "program" => {
          value |= Setting::PrintProgram as u64;
        }
        _ => {}
      }
    }

    if value == 0 {
      value = default_setting;
    }

    return (value, set_value);
  }

  pub fn is_set(&self) -> Result<Option<Vec<String>>> {
    if let Ok(g) = GLOBAL_SETTINGS.read() {
      let content = g.get(&self.arg_type()).cloned().unwrap_or_default();

      if content.flag_val & *self as u64 != 0 {
        return Ok(content.values);
      }
    }

    return Err(CoreError::new(ErrorKind::Argument, "Not set").into());
  }
}

pub fn set_global_setting(
  _c: &mut CommandLineParser,
  t: &mut Token,
) -> Result<()> {
  if let Ok(mut g) = GLOBAL_SETTINGS.write() {
    if let Entry::Occupied(mut e) = g.entry(t.arg_type) {
      let (flag, set_value) = Setting::from_vec(
        t.parameters.clone().unwrap_or_default(),
        t.arg_type.default(),
      );

      if !set_value {
        e.insert(SettingContent::new(flag, None));
        return Ok(());
      }

      if let Some(p) = &t.parameters {
        e.insert(SettingContent::new(flag, Some(p.clone())));
      }

      return Ok(());
    }
  }

  return Err(
    CoreError::new(
      ErrorKind::Argument,
      format!("Could not set global setting key: {:?}", t.arg_type),
    )
    .into(),
  );
}
