////////////////////////////////////////////////////////////////////////////////
// File: src/main.rs
// Description: Main entry point
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 06.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::single_match)]

use std::process::ExitCode;

use anyhow::Result;
use shared::{
  error_println,
  io::cli::{ArgType, CommandLineParser, ParseRuleType},
};

mod internal;

#[cfg(test)]
mod tests;

////////////////////////////////////////////////////////////////////////////////
// Initialize Package Info
////////////////////////////////////////////////////////////////////////////////

static PACKAGE_INFO: [&str; 5] = [
  env!("CARGO_PKG_NAME"),
  env!("CARGO_PKG_VERSION"),
  env!("CARGO_PKG_AUTHORS"),
  env!("CARGO_PKG_LICENSE"),
  env!("CARGO_PKG_DESCRIPTION"),
];

////////////////////////////////////////////////////////////////////////////////
// Main Entry Point
////////////////////////////////////////////////////////////////////////////////

fn run() -> Result<()> {
  return CommandLineParser::default()
    .create_parse_rule(
      'h',
      "help",
      "-",
      "Print help",
      ArgType::Help(PACKAGE_INFO),
      0,
      0,
      ParseRuleType::Executable,
      shared::io::info::print_help,
    )
    .create_parse_rule(
      'v',
      "version",
      "-",
      "Print version",
      ArgType::Version(PACKAGE_INFO),
      0,
      0,
      ParseRuleType::Executable,
      shared::io::info::print_version,
    )
    .create_parse_rule(
      'd',
      "debug",
      "[(all|program)*]",
      "Debug print settings (default: all)",
      ArgType::Debug,
      0,
      usize::MAX,
      ParseRuleType::Setting,
      shared::util::settings::set_global_setting,
    )
    .create_parse_rule(
      'o',
      "out-dir",
      "<path>",
      "Set the output directory for the translated files",
      ArgType::Output,
      1,
      1,
      ParseRuleType::Setting,
      shared::util::settings::set_global_setting,
    )
    .default_parse_rule(
      'c',
      "compile",
      "(<file>.vm|<dir>)",
      "Translate the provided vm file or a whole program directory",
      ArgType::Compile,
      1,
      1,
      internal::compile::compile,
    )
    .parse()?
    .evaluate();
}

fn main() -> ExitCode {
  if let Err(error) = run() {
    error_println!("{}", error);
    return ExitCode::FAILURE;
  }

  return ExitCode::SUCCESS;
}
