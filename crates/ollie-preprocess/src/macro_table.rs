//! The macro record and macro table of spec.md section 3 ("Macro record")
//! and section 4.3 ("Macro table"). Grounded on the flat-namespace
//! `FunctionTable` pattern in `ollie_core::types::symbol` — macros, like
//! functions, occupy a single flat scope with no nesting.

use std::collections::HashMap;

use ollie_lex::LexItem;

#[derive(Debug, Clone)]
pub struct MacroRecord {
  pub name: String,
  pub line_number: u32,
  /// Identifier tokens remembered solely for name comparison during
  /// parameter substitution.
  pub parameters: Vec<LexItem>,
  /// Copies of the tokens between `$macro` and `$endmacro`, with
  /// parameter-matching identifiers rewritten to `MACRO_PARAM`.
  pub body_tokens: Vec<LexItem>,
  pub total_token_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MacroTable {
  macros: HashMap<String, MacroRecord>,
}

impl MacroTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a macro. Returns the pre-existing record on duplicate
  /// definition (spec.md section 4.2: "Reject if already defined").
  pub fn insert(&mut self, record: MacroRecord) -> Result<(), MacroRecord> {
    if let Some(existing) = self.macros.get(&record.name) {
      return Err(existing.clone());
    }
    self.macros.insert(record.name.clone(), record);
    Ok(())
  }

  pub fn lookup(&self, name: &str) -> Option<&MacroRecord> {
    self.macros.get(name)
  }
}
