////////////////////////////////////////////////////////////////////////////////
// File: src/internal/symbols.rs
// Description: Assembler symbol table
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 01.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use indexmap::IndexMap;
use shared::error::{CoreError, ErrorKind};

////////////////////////////////////////////////////////////////////////////////
// Constants
////////////////////////////////////////////////////////////////////////////////

// First RAM cell available for variable allocation. Cells 0..15 belong to the
// virtual registers, the region above 16383 to the memory-mapped devices.
const VARIABLE_BASE_ADDRESS: u16 = 16;
const MAX_ADDRESS: u16 = 0x7FFF;

lazy_static::lazy_static! {
  static ref PREDEFINED: IndexMap<String, u16> = {
    let mut map = IndexMap::new();

    map.insert("SP".to_string(), 0);
    map.insert("LCL".to_string(), 1);
    map.insert("ARG".to_string(), 2);
    map.insert("THIS".to_string(), 3);
    map.insert("THAT".to_string(), 4);

    for i in 0..16 {
      map.insert(format!("R{}", i), i);
    }

    map.insert("SCREEN".to_string(), 16384);
    map.insert("KBD".to_string(), 24576);

    return map;
  };
}

////////////////////////////////////////////////////////////////////////////////
// Symbol Table
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub(crate) struct SymbolTable {
  map: IndexMap<String, u16>,
  next_ram: u16,
}

impl SymbolTable {
  pub(crate) fn predefined() -> Self {
    return Self {
      map: PREDEFINED.clone(),
      next_ram: VARIABLE_BASE_ADDRESS,
    };
  }

  pub(crate) fn resolve(&self, name: &str) -> Option<u16> {
    return self.map.get(name).copied();
  }

  // Record a label at a ROM address. Predefined symbols and already placed
  // labels must not be rebound.
  pub(crate) fn define_label(
    &mut self,
    name: &str,
    address: u16,
  ) -> Result<(), CoreError> {
    if PREDEFINED.contains_key(name) {
      return Err(CoreError::new(
        ErrorKind::Parse,
        format!("Predefined symbol cannot be redefined: `{}`", name),
      ));
    }

    if self.map.contains_key(name) {
      return Err(CoreError::new(
        ErrorKind::Parse,
        format!("Label defined more than once: `{}`", name),
      ));
    }

    self.map.insert(name.to_string(), address);

    return Ok(());
  }

  // Assign the next free RAM cell to a previously unseen variable symbol.
  pub(crate) fn allocate(&mut self, name: &str) -> Result<u16, CoreError> {
    if self.next_ram > MAX_ADDRESS {
      return Err(CoreError::new(
        ErrorKind::Encoding,
        format!(
          "Variable `{}` does not fit the 15-bit address space",
          name
        ),
      ));
    }

    let address = self.next_ram;

    self.map.insert(name.to_string(), address);
    self.next_ram += 1;

    return Ok(address);
  }
}
