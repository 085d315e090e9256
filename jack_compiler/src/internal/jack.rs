////////////////////////////////////////////////////////////////////////////////
// File: src/internal/jack.rs
// Description: VM command vocabulary
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 15.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use core::fmt;
use std::fmt::{Display, Formatter};

use super::symbols::SymbolKind;

////////////////////////////////////////////////////////////////////////////////
// VM Commands
////////////////////////////////////////////////////////////////////////////////

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum VmCommand {
  call(String, u16),
  function(String, u16),
  goto(String),
  if_goto(String),
  label(String),
  pop(VMSegment, u16),
  push(VMSegment, u16),
  r#return,
  add,
  and,
  eq,
  gt,
  lt,
  neg,
  not,
  or,
  sub,
}

impl Display for VmCommand {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      VmCommand::call(name, n_args) => {
        return write!(f, "call {} {}", name, n_args)
      }
      VmCommand::function(name, n_locals) => {
        return write!(f, "function {} {}", name, n_locals)
      }
      VmCommand::goto(label) => return write!(f, "goto {}", label),
      VmCommand::if_goto(label) => return write!(f, "if-goto {}", label),
      VmCommand::label(label) => return write!(f, "label {}", label),
      VmCommand::pop(segment, index) => {
        return write!(f, "pop {} {}", segment, index)
      }
      VmCommand::push(segment, index) => {
        return write!(f, "push {} {}", segment, index)
      }
      VmCommand::r#return => return write!(f, "return"),
      VmCommand::add => return write!(f, "add"),
      VmCommand::and => return write!(f, "and"),
      VmCommand::eq => return write!(f, "eq"),
      VmCommand::gt => return write!(f, "gt"),
      VmCommand::lt => return write!(f, "lt"),
      VmCommand::neg => return write!(f, "neg"),
      VmCommand::not => return write!(f, "not"),
      VmCommand::or => return write!(f, "or"),
      VmCommand::sub => return write!(f, "sub"),
    }
  }
}

////////////////////////////////////////////////////////////////////////////////
// VM Segments
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum VMSegment {
  Argument,
  Constant,
  Local,
  Pointer,
  Static,
  Temp,
  That,
  This,
}

impl Display for VMSegment {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      VMSegment::Argument => return write!(f, "argument"),
      VMSegment::Constant => return write!(f, "constant"),
      VMSegment::Local => return write!(f, "local"),
      VMSegment::Pointer => return write!(f, "pointer"),
      VMSegment::Static => return write!(f, "static"),
      VMSegment::Temp => return write!(f, "temp"),
      VMSegment::That => return write!(f, "that"),
      VMSegment::This => return write!(f, "this"),
    }
  }
}

// Where a declared variable lives at runtime.
impl From<SymbolKind> for VMSegment {
  fn from(kind: SymbolKind) -> Self {
    match kind {
      SymbolKind::Static => return VMSegment::Static,
      SymbolKind::Field => return VMSegment::This,
      SymbolKind::Argument => return VMSegment::Argument,
      SymbolKind::Var => return VMSegment::Local,
    }
  }
}
