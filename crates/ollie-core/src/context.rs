//! The single ambient parse context threaded by exclusive reference
//! through every grammar function (spec.md section 5: "Global mutable
//! state"; section 9's design note: "Global mutable parser state ->
//! explicit context"). Grounded on `Journal` in
//! `examples/acweathersby-radlr/source/lib/sherpa-core/journal/mod.rs`,
//! which plays the analogous role of bundling configuration, error
//! tracking, and scratch state for one compilation run.

use ollie_lex::{GroupingStack, TokenStream};

use crate::diagnostics::Diagnostics;
use crate::types::ast::AstArena;
use crate::types::cfg::Cfg;
use crate::types::symbol::{FunctionTable, VariableTable};
use crate::types::type_system::TypeTable;

pub struct ParseContext {
  pub tokens: TokenStream,
  pub line: u32,
  pub variables: VariableTable,
  pub functions: FunctionTable,
  pub types: TypeTable,
  pub grouping: GroupingStack,
  pub diagnostics: Diagnostics,
  pub cfg: Cfg,
  pub ast: AstArena,
}

impl ParseContext {
  pub fn new(tokens: TokenStream) -> Self {
    Self {
      tokens,
      line: 1,
      variables: VariableTable::new(),
      functions: FunctionTable::new(),
      types: TypeTable::new(),
      grouping: GroupingStack::new(),
      diagnostics: Diagnostics::new(),
      cfg: Cfg::new(),
      ast: AstArena::new(),
    }
  }

  /// Opens a new variable and type scope together, as every
  /// scope-opening point in the grammar does (compound statement,
  /// for-header, parameter list, switch body — spec.md section 5).
  pub fn open_scope(&mut self) {
    self.variables.initialize_scope();
    self.types.initialize_scope();
  }

  /// Closes the innermost variable and type scope together. Every
  /// `open_scope` call is paired with exactly one of these on every exit
  /// path, including error paths (spec.md section 5's scoped-acquisition
  /// rule and section 8's scope-conservation property).
  pub fn close_scope(&mut self) {
    self.variables.finalize_scope();
    self.types.finalize_scope();
  }
}
