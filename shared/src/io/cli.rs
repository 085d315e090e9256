////////////////////////////////////////////////////////////////////////////////
// File: src/io/cli.rs
// Description: CLI parser
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 01.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use std::env;

use crate::{
  error::{CoreError, ErrorKind},
  util::settings::Setting,
};

use anyhow::Result;

////////////////////////////////////////////////////////////////////////////////
// Commandline Parser Definitions
////////////////////////////////////////////////////////////////////////////////

pub trait DefaultArgType {
  fn default(&self) -> (u64, bool);
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum ArgType {
  Compile,
  Version([&'static str; 5]),
  Help([&'static str; 5]),
  Debug,
  Output,
}

impl DefaultArgType for ArgType {
  fn default(&self) -> (u64, bool) {
    return match self {
      ArgType::Debug => (Setting::PrintAll as u64, true),
      ArgType::Output => (Setting::Output as u64, true),
      _ => (0, false),
    };
  }
}

#[derive(Debug, Copy, Clone, Ord, Eq, PartialOrd, PartialEq)]
pub enum ParseRuleType {
  Setting,
  Executable,
}

pub type RuleCallback = fn(&mut CommandLineParser, &mut Token) -> Result<()>;

pub struct ParseRule {
  pub flag: char,
  pub long_flag: String,
  pub usage: String,
  pub description: String,
  pub arg_type: ArgType,
  pub parameters_min: usize,
  pub parameters_max: usize,
  pub rule_type: ParseRuleType,
  pub callback: RuleCallback,
}

#[derive(Clone, Debug)]
pub struct Token {
  pub parse_rule_type: ParseRuleType,
  pub arg_type: ArgType,
  pub parameters: Option<Vec<String>>,
}

impl Token {
  pub fn new(
    parse_rule_type: ParseRuleType,
    arg_type: ArgType,
    parameters: Option<Vec<String>>,
  ) -> Self {
    return Self {
      parse_rule_type,
      arg_type,
      parameters,
    };
  }
}

////////////////////////////////////////////////////////////////////////////////
// Commandline Parser Implementation
////////////////////////////////////////////////////////////////////////////////

pub struct CommandLineParser {
  pub default_parse_rule: Option<usize>,
  pub tokens: Vec<Token>,
  pub parse_rules: Vec<ParseRule>,
}

impl Default for CommandLineParser {
  fn default() -> Self {
    return Self {
      parse_rules: Vec::new(),
      default_parse_rule: None,
      tokens: Vec::new(),
    };
  }
}

impl CommandLineParser {
  const FLAG_PREFIX: char = '-';
  const LONG_FLAG_PREFIX: &'static str = "--";

  // The default rule receives the bare positional arguments, i.e. the input
  // path of the translation.
  pub fn default_parse_rule(
    &mut self,
    flag: char,
    long_flag: &str,
    usage: &str,
    description: &str,
    arg_type: ArgType,
    parameters_min: usize,
    parameters_max: usize,
    callback: RuleCallback,
  ) -> &mut Self {
    assert!(parameters_min <= parameters_max);

    self.create_parse_rule(
      flag,
      long_flag,
      usage,
      description,
      arg_type,
      parameters_min,
      parameters_max,
      ParseRuleType::Executable,
      callback,
    );

    self.default_parse_rule = Some(self.parse_rules.len() - 1);

    return self;
  }

  pub fn create_parse_rule(
    &mut self,
    flag: char,
    long_flag: &str,
    usage: &str,
    description: &str,
    arg_type: ArgType,
    parameters_min: usize,
    parameters_max: usize,
    rule_type: ParseRuleType,
    callback: RuleCallback,
  ) -> &mut Self {
    assert!(parameters_min <= parameters_max);

    self.parse_rules.push(ParseRule {
      flag,
      long_flag: long_flag.to_string(),
      usage: usage.to_string(),
      description: description.to_string(),
      arg_type,
      parameters_min,
      parameters_max,
      rule_type,
      callback,
    });

    return self;
  }

  fn find_parse_rules(&self, str: &str) -> Result<Option<Vec<&ParseRule>>> {
    let mut parse_rules = Vec::new();

    if str.starts_with(Self::LONG_FLAG_PREFIX) {
      let str = str.trim_start_matches(Self::LONG_FLAG_PREFIX);

      if let Some(parse_rule) = self
        .parse_rules
        .iter()
        .find(|rule| return rule.long_flag == str)
      {
        parse_rules.push(parse_rule);
        return Ok(Some(parse_rules));
      }

      return Err(
        CoreError::new(
          ErrorKind::Argument,
          format!(
            "Invalid flag: `--{}`. Use `--help` for more information.",
            str
          ),
        )
        .into(),
      );
    } else if str.starts_with(Self::FLAG_PREFIX) {
      let str = str.trim_start_matches(Self::FLAG_PREFIX);

      for c in str.chars() {
        if let Some(parse_rule) =
          self.parse_rules.iter().find(|rule| return rule.flag == c)
        {
          parse_rules.push(parse_rule);
        } else {
          return Err(
            CoreError::new(
              ErrorKind::Argument,
              format!(
                "Invalid flag: `-{}`. Use `--help` for more information.",
                c
              ),
            )
            .into(),
          );
        }
      }

      if !parse_rules.is_empty() {
        return Ok(Some(parse_rules));
      }
    }

    return Ok(None);
  }

  fn check_parameter_count(
    rule: &ParseRule,
    count: usize,
    what: &str,
  ) -> Result<()> {
    if count < rule.parameters_min {
      return Err(
        CoreError::new(
          ErrorKind::Argument,
          format!(
            "Not enough parameters for {}. Use `--help` for more information.",
            what
          ),
        )
        .into(),
      );
    } else if count > rule.parameters_max {
      return Err(
        CoreError::new(
          ErrorKind::Argument,
          format!(
            "Too many parameters for {}. Use `--help` for more information.",
            what
          ),
        )
        .into(),
      );
    }

    return Ok(());
  }

  pub fn parse(&mut self) -> Result<&mut Self> {
    return self.parse_args(env::args().skip(1));
  }

  pub fn parse_args(
    &mut self,
    args: impl Iterator<Item = String>,
  ) -> Result<&mut Self> {
    let mut args = args.peekable();
    let mut tokens = Vec::new();
    let mut positionals: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
      if !arg.starts_with(Self::FLAG_PREFIX) {
        positionals.push(arg);
        continue;
      }

      if let Some(parse_rules) = self.find_parse_rules(&arg)? {
        for parse_rule in parse_rules {
          let mut parameters: Vec<String> = Vec::new();

          while parameters.len() < parse_rule.parameters_max {
            match args.peek() {
              Some(parameter)
                if !parameter.starts_with(Self::FLAG_PREFIX) =>
              {
                parameters.push(args.next().unwrap_or_default());
              }
              _ => break,
            }
          }

          Self::check_parameter_count(
            parse_rule,
            parameters.len(),
            &format!("flag `{}`", arg),
          )?;

          tokens.push(Token::new(
            parse_rule.rule_type,
            parse_rule.arg_type,
            Some(parameters),
          ));
        }
      };
    }

    // Bare arguments feed the default executable rule.
    if !positionals.is_empty() {
      let Some(default_parse_rule) = self.default_parse_rule else {
        return Err(
          CoreError::new(
            ErrorKind::Argument,
            "This tool takes no positional arguments.",
          )
          .into(),
        );
      };

      let rule = &self.parse_rules[default_parse_rule];

      Self::check_parameter_count(rule, positionals.len(), "the input path")?;

      tokens.push(Token::new(
        rule.rule_type,
        rule.arg_type,
        Some(positionals),
      ));
    }

    self.tokens = tokens;

    return Ok(self);
  }

  pub fn evaluate(&mut self) -> Result<()> {
    // Settings are applied before any executable rule runs.
    self.tokens.sort_by_key(|a| return a.parse_rule_type);

    let has_executable = self
      .tokens
      .iter()
      .any(|token| return token.parse_rule_type == ParseRuleType::Executable);

    // Nothing runnable on the command line falls back to the default rule,
    // which rejects the invocation when it requires an input path.
    if !has_executable {
      if let Some(default_parse_rule) = self.default_parse_rule {
        let rule = &self.parse_rules[default_parse_rule];

        Self::check_parameter_count(rule, 0, "the input path")?;

        self
          .tokens
          .push(Token::new(rule.rule_type, rule.arg_type, None));
      }
    }

    for token in &mut self.tokens.clone() {
      let token_type = token.arg_type;
      if let Some(rule) = self
        .parse_rules
        .iter()
        .find(|rule| return rule.arg_type == token_type)
      {
        (rule.callback)(self, token)?;
      }
    }

    return Ok(());
  }
}
