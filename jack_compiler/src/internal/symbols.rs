////////////////////////////////////////////////////////////////////////////////
// File: src/internal/symbols.rs
// Description: Class and subroutine symbol tables
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 15.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use core::fmt;
use std::{
  collections::HashMap,
  fmt::{Display, Formatter},
};

use shared::error::{CoreError, ErrorKind};

////////////////////////////////////////////////////////////////////////////////
// Symbol Kinds
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SymbolKind {
  Static,
  Field,
  Argument,
  Var,
}

impl SymbolKind {
  fn is_class_scope(&self) -> bool {
    return matches!(self, SymbolKind::Static | SymbolKind::Field);
  }
}

impl Display for SymbolKind {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      SymbolKind::Static => return write!(f, "static"),
      SymbolKind::Field => return write!(f, "field"),
      SymbolKind::Argument => return write!(f, "argument"),
      SymbolKind::Var => return write!(f, "var"),
    }
  }
}

////////////////////////////////////////////////////////////////////////////////
// Symbol Table
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub(crate) struct Variable {
  pub(crate) type_name: String,
  pub(crate) kind: SymbolKind,
  pub(crate) index: u16,
}

// Two scopes per class compilation: Static/Field live as long as the class,
// Argument/Var are reset for every subroutine. Indices are dense and 0-based
// within each (scope, kind) group.
#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
  class_map: HashMap<String, Variable>,
  subroutine_map: HashMap<String, Variable>,
  counters: [u16; 4],
}

impl SymbolTable {
  pub(crate) fn define(
    &mut self,
    name: &str,
    type_name: &str,
    kind: SymbolKind,
  ) -> Result<u16, CoreError> {
    let map = if kind.is_class_scope() {
      &mut self.class_map
    } else {
      &mut self.subroutine_map
    };

    if map.contains_key(name) {
      return Err(CoreError::new(
        ErrorKind::Semantic,
        format!("Variable declared more than once: `{}`", name),
      ));
    }

    let index = self.counters[kind as usize];

    self.counters[kind as usize] += 1;
    map.insert(
      name.to_string(),
      Variable {
        type_name: type_name.to_string(),
        kind,
        index,
      },
    );

    return Ok(index);
  }

  // Subroutine scope shadows class scope.
  pub(crate) fn resolve(&self, name: &str) -> Option<&Variable> {
    return self
      .subroutine_map
      .get(name)
      .or_else(|| return self.class_map.get(name));
  }

  pub(crate) fn count(&self, kind: SymbolKind) -> u16 {
    return self.counters[kind as usize];
  }

  pub(crate) fn start_subroutine(&mut self) {
    self.subroutine_map.clear();
    self.counters[SymbolKind::Argument as usize] = 0;
    self.counters[SymbolKind::Var as usize] = 0;
  }
}
