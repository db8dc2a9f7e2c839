//! Variable, function, and label symbol records plus the scoped-table
//! discipline of spec.md section 3 ("Scope discipline") and section 4.3.
//! Grounded on the scope-stack-of-`HashMap` shape used by
//! `radlr-core/types/parser_db.rs`'s `OrderedMap`-backed lookup tables,
//! generalized here to support push/pop of lexical scopes.

use std::collections::HashMap;

use crate::types::type_system::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
  Normal,
  Static,
  Register,
  External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
  Declare,
  Let,
}

#[derive(Debug, Clone)]
pub struct VariableRecord {
  pub name: String,
  pub storage_class: StorageClass,
  pub ty: TypeRef,
  pub is_constant: bool,
  pub is_function_parameter: bool,
  pub is_struct_member: bool,
  pub initialized: bool,
  pub declare_or_let: DeclKind,
  /// Name of the owning function, set for parameters only.
  pub owning_function: Option<String>,
  pub line: u32,
}

impl VariableRecord {
  pub fn new(name: String, storage_class: StorageClass, ty: TypeRef, declare_or_let: DeclKind, line: u32) -> Self {
    Self {
      name,
      storage_class,
      ty,
      is_constant: false,
      is_function_parameter: false,
      is_struct_member: false,
      initialized: declare_or_let == DeclKind::Let,
      declare_or_let,
      owning_function: None,
      line,
    }
  }
}

/// Maximum number of parameters a function or function-typed signature may
/// declare. spec.md section 9's Open Questions resolves the ambiguity
/// between 6-enforced and silently-unbounded call sites in favor of a hard
/// cap of 6 everywhere.
pub const MAX_PARAMETERS: usize = 6;

#[derive(Debug, Clone)]
pub struct FunctionRecord {
  pub name: String,
  pub storage_class: StorageClass,
  pub return_type: TypeRef,
  pub parameters: Vec<VariableRecord>,
  pub defined: bool,
  pub line: u32,
  /// Set once the function's compound-statement body has been parsed.
  pub entrance_block: Option<crate::types::cfg::BlockId>,
}

impl FunctionRecord {
  pub fn new(name: String, storage_class: StorageClass, return_type: TypeRef, line: u32) -> Self {
    Self { name, storage_class, return_type, parameters: Vec::new(), defined: false, line, entrance_block: None }
  }
}

/// A stack of hash scopes, supporting push/pop of lexical scopes and both
/// local-only and any-scope lookup. Used identically for the variable
/// table and (by `TypeTable`, see `type_system.rs`) the type table, per
/// spec.md section 3's "Scope discipline".
#[derive(Debug, Clone)]
pub struct ScopeStack<T> {
  scopes: Vec<HashMap<String, T>>,
}

impl<T> Default for ScopeStack<T> {
  fn default() -> Self {
    Self { scopes: vec![HashMap::new()] }
  }
}

impl<T> ScopeStack<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Pushes a new, empty lexical scope.
  pub fn initialize_scope(&mut self) {
    self.scopes.push(HashMap::new());
  }

  /// Pops the innermost lexical scope. Panics if called more times than
  /// `initialize_scope` (an invariant violation per spec.md section 5,
  /// never reachable through normal parsing since every scope-opening
  /// point is paired with exactly one finalization).
  pub fn finalize_scope(&mut self) {
    if self.scopes.len() <= 1 {
      panic!("finalize_scope called without a matching initialize_scope");
    }
    self.scopes.pop();
  }

  pub fn depth(&self) -> usize {
    self.scopes.len()
  }

  /// Inserts at the current (innermost) scope. Returns `Err` with the
  /// colliding record if the name already exists at that scope (spec.md
  /// section 3 Invariant 3 / section 4.3's uniqueness rule); shadowing an
  /// outer scope is permitted.
  pub fn insert(&mut self, name: String, record: T) -> Result<(), &T> {
    let top = self.scopes.last_mut().expect("scope stack is never empty");
    if top.contains_key(&name) {
      return Err(self.scopes.last().unwrap().get(&name).unwrap());
    }
    top.insert(name, record);
    Ok(())
  }

  /// Walks the scope stack from innermost to outermost.
  pub fn lookup(&self, name: &str) -> Option<&T> {
    for scope in self.scopes.iter().rev() {
      if let Some(r) = scope.get(name) {
        return Some(r);
      }
    }
    None
  }

  pub fn lookup_mut(&mut self, name: &str) -> Option<&mut T> {
    for scope in self.scopes.iter_mut().rev() {
      if let Some(r) = scope.get_mut(name) {
        return Some(r);
      }
    }
    None
  }

  /// Consults only the innermost scope.
  pub fn lookup_local_scope(&self, name: &str) -> Option<&T> {
    self.scopes.last().and_then(|s| s.get(name))
  }
}

/// The function table is a single flat namespace (spec.md section 3:
/// "Functions occupy a single flat scope (no nesting)."), so it is a plain
/// map rather than a `ScopeStack`.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
  functions: HashMap<String, FunctionRecord>,
}

impl FunctionTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a function record. Returns `Err` with the existing record on
  /// duplicate insertion.
  pub fn insert(&mut self, record: FunctionRecord) -> Result<(), FunctionRecord> {
    if let Some(existing) = self.functions.get(&record.name) {
      return Err(existing.clone());
    }
    self.functions.insert(record.name.clone(), record);
    Ok(())
  }

  pub fn lookup(&self, name: &str) -> Option<&FunctionRecord> {
    self.functions.get(name)
  }

  pub fn lookup_mut(&mut self, name: &str) -> Option<&mut FunctionRecord> {
    self.functions.get_mut(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.functions.contains_key(name)
  }

  pub fn values(&self) -> impl Iterator<Item = &FunctionRecord> {
    self.functions.values()
  }
}

pub type VariableTable = ScopeStack<VariableRecord>;
