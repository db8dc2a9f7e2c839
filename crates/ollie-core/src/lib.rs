//! Symbol tables, type system, AST arena, CFG, diagnostics, and the
//! ambient parse context: the data model of spec.md section 3, shared by
//! the preprocessor and parser crates.

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use context::ParseContext;
pub use error::{OllieError, OllieResult};

#[cfg(test)]
mod test {
  use super::*;
  use ollie_lex::TokenStream;
  use types::symbol::{DeclKind, StorageClass, VariableRecord};
  use types::type_system::BinOpClass;

  #[test]
  fn primitive_types_resolve_at_startup() {
    let types = types::type_system::TypeTable::new();
    assert!(types.lookup_any_scope("s_int32").is_some());
    assert!(types.lookup_any_scope("f64").is_some());
  }

  #[test]
  fn pointer_construction_is_canonical() {
    let mut types = types::type_system::TypeTable::new();
    let int_ty = types.lookup_any_scope("s_int32").unwrap();
    let p1 = types.create_pointer(int_ty);
    let p2 = types.create_pointer(int_ty);
    assert_eq!(p1, p2, "pointer-to-T must dedup to the same TypeRef");
  }

  #[test]
  fn array_construction_is_canonical() {
    let mut types = types::type_system::TypeTable::new();
    let int_ty = types.lookup_any_scope("s_int32").unwrap();
    let a1 = types.create_array(int_ty, 10);
    let a2 = types.create_array(int_ty, 10);
    assert_eq!(a1, a2);
    let a3 = types.create_array(int_ty, 11);
    assert_ne!(a1, a3);
  }

  #[test]
  fn dealias_strips_alias_chain() {
    let mut types = types::type_system::TypeTable::new();
    let int_ty = types.lookup_any_scope("s_int32").unwrap();
    let alias1 = types.create_alias("MyInt".into(), int_ty).unwrap();
    let alias2 = types.create_alias("MyInt2".into(), alias1).unwrap();
    assert_eq!(types.dealias(alias2), int_ty);
  }

  #[test]
  fn struct_registration_exposes_ordinals() {
    let mut types = types::type_system::TypeTable::new();
    let int_ty = types.lookup_any_scope("s_int32").unwrap();
    let mut builder = types.create_struct("Foo".into());
    types.add_struct_member(&mut builder, "a".into(), int_ty);
    types.add_struct_member(&mut builder, "b".into(), int_ty);
    let struct_ty = types.finish_struct(builder).unwrap();
    match types.descriptor(struct_ty) {
      types::type_system::TypeDescriptor::Struct { members, .. } => {
        assert_eq!(members[0].ordinal, 0);
        assert_eq!(members[1].ordinal, 1);
      }
      _ => panic!("expected struct descriptor"),
    }
  }

  #[test]
  fn struct_redefinition_is_rejected() {
    let mut types = types::type_system::TypeTable::new();
    let builder1 = types.create_struct("Foo".into());
    types.finish_struct(builder1).unwrap();
    let builder2 = types.create_struct("Foo".into());
    assert!(types.finish_struct(builder2).is_err());
  }

  #[test]
  fn variable_scope_insert_rejects_local_collision_but_allows_shadowing() {
    let mut vars = types::symbol::ScopeStack::<VariableRecord>::new();
    let mut types = types::type_system::TypeTable::new();
    let int_ty = types.lookup_any_scope("s_int32").unwrap();
    vars.insert("x".into(), VariableRecord::new("x".into(), StorageClass::Normal, int_ty, DeclKind::Declare, 1)).unwrap();
    assert!(vars.insert("x".into(), VariableRecord::new("x".into(), StorageClass::Normal, int_ty, DeclKind::Declare, 2)).is_err());

    vars.initialize_scope();
    assert!(vars.insert("x".into(), VariableRecord::new("x".into(), StorageClass::Normal, int_ty, DeclKind::Declare, 3)).is_ok());
    vars.finalize_scope();
  }

  #[test]
  fn determine_compatibility_promotes_wider_operand() {
    let types = types::type_system::TypeTable::new();
    let i16_ty = types.lookup_any_scope("s_int16").unwrap();
    let i32_ty = types.lookup_any_scope("s_int32").unwrap();
    let result = types.determine_compatibility_and_coerce(i16_ty, i32_ty, BinOpClass::Arithmetic).unwrap();
    assert_eq!(result, i32_ty);
  }

  #[test]
  fn cfg_merge_concatenates_statements_and_adopts_successors() {
    let mut cfg = types::cfg::Cfg::new();
    let a = cfg.allocate_block();
    let b = cfg.allocate_block();
    let c = cfg.allocate_block();
    let dummy_stmt = types::cfg::TopLevelStmt { root: types::ast::AstArena::new().error_node(1) };
    cfg.add_statement(a, dummy_stmt);
    cfg.add_statement(b, dummy_stmt);
    cfg.add_successor(b, c, types::cfg::EdgeDirection::Unidirectional);
    let merged = cfg.merge_blocks(a, b);
    assert_eq!(merged, a);
    assert_eq!(cfg.block(a).statements.len(), 2);
    assert_eq!(cfg.block(a).successors, vec![c]);
  }

  #[test]
  fn context_open_close_scope_are_paired() {
    let mut ctx = ParseContext::new(TokenStream::new(vec![]));
    let depth_before = ctx.variables.depth();
    ctx.open_scope();
    assert_eq!(ctx.variables.depth(), depth_before + 1);
    ctx.close_scope();
    assert_eq!(ctx.variables.depth(), depth_before);
  }
}
