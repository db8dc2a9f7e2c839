//! Declarations: `declare`/`let` variable statements and `define struct`
//! (`construct` synonym) / `define union` / `define enum` / `alias` type
//! definitions. Spec.md section 4.5's declaration grammar and section
//! 4.4's struct/union/enum registration.

use ollie_core::types::ast::{AstKind, NodeId};
use ollie_core::types::symbol::{DeclKind, StorageClass, VariableRecord};
use ollie_core::types::type_system::TypeRef;
use ollie_core::ParseContext;
use ollie_lex::TokenKind;

use crate::{advance, check, expect, peek, recover_to_statement_boundary, report_semantic_error, report_syntax_error};

fn parse_storage_modifiers(ctx: &mut ParseContext) -> (StorageClass, bool) {
  let mut storage = StorageClass::Normal;
  let mut is_constant = false;
  loop {
    match peek(ctx).kind {
      TokenKind::Const => {
        advance(ctx);
        is_constant = true;
      }
      TokenKind::Static => {
        advance(ctx);
        storage = StorageClass::Static;
      }
      TokenKind::Register => {
        advance(ctx);
        storage = StorageClass::Register;
      }
      TokenKind::External => {
        advance(ctx);
        storage = StorageClass::External;
      }
      _ => break,
    }
  }
  (storage, is_constant)
}

pub fn parse_declare_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  let (storage, is_constant) = parse_storage_modifiers(ctx);
  if expect(ctx, TokenKind::Declare, "'declare'").is_err() {
    recover_to_statement_boundary(ctx);
    return ctx.ast.error_node(line);
  }
  build_var_decl(ctx, storage, is_constant, DeclKind::Declare, line)
}

pub fn parse_let_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  let (storage, is_constant) = parse_storage_modifiers(ctx);
  if expect(ctx, TokenKind::Let, "'let'").is_err() {
    recover_to_statement_boundary(ctx);
    return ctx.ast.error_node(line);
  }
  build_var_decl(ctx, storage, is_constant, DeclKind::Let, line)
}

/// `declare [const] [storage-class] <type> <ident>;` / `let ... <type>
/// <ident> := <expr>;` (spec.md section 4.5) — the type specifier comes
/// first, then the bare identifier being declared.
fn build_var_decl(ctx: &mut ParseContext, storage: StorageClass, is_constant: bool, kind: DeclKind, line: u32) -> NodeId {
  let (_ty_node, ty_ref) = crate::types::parse_type_specifier(ctx);

  let name_tok = match expect(ctx, TokenKind::Ident, "a variable name") {
    Ok(t) => t,
    Err(()) => {
      recover_to_statement_boundary(ctx);
      return ctx.ast.error_node(line);
    }
  };

  let mut record = VariableRecord::new(name_tok.lexeme.clone(), storage, ty_ref, kind, line);
  record.is_constant = is_constant;

  let ast_kind = match kind {
    DeclKind::Declare => AstKind::DeclStmt { name: name_tok.lexeme.clone(), storage_class: storage },
    DeclKind::Let => AstKind::LetStmt { name: name_tok.lexeme.clone(), storage_class: storage },
  };
  let node = ctx.ast.alloc(ast_kind, line);
  ctx.ast.get_mut(node).ty = Some(ty_ref);

  if check(ctx, TokenKind::Assign) {
    advance(ctx);
    let init = crate::expr::parse_expression(ctx);
    ctx.ast.add_child(node, init);
    if let Some(init_ty) = ctx.ast.get(init).ty {
      if ctx.types.types_assignable(ty_ref, init_ty).is_none() {
        let (dest_name, src_name) = (ctx.types.canonical_name(ty_ref), ctx.types.canonical_name(init_ty));
        report_semantic_error(
          ctx,
          &format!("cannot initialize '{}' of type '{dest_name}' with a value of type '{src_name}'", name_tok.lexeme),
          None,
        );
      }
    }
    record.initialized = true;
  }

  let collision_line = match ctx.variables.insert(name_tok.lexeme.clone(), record) {
    Ok(()) => None,
    Err(existing) => Some(existing.line),
  };
  if let Some(existing_line) = collision_line {
    report_semantic_error(
      ctx,
      &format!("redeclaration of '{}'; already declared at line {existing_line}", name_tok.lexeme),
      Some(existing_line),
    );
  }

  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  node
}

pub fn parse_define_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  advance(ctx); // 'define'
  match peek(ctx).kind {
    TokenKind::Struct | TokenKind::Construct => parse_struct_def(ctx, line),
    TokenKind::Union => parse_union_def(ctx, line),
    TokenKind::Enum => parse_enum_def(ctx, line),
    _ => {
      report_syntax_error(ctx, "expected 'struct', 'construct', 'union', or 'enum' after 'define'");
      recover_to_statement_boundary(ctx);
      ctx.ast.error_node(line)
    }
  }
}

/// Parses the `[as <alias-ident>]` trailing clause spec.md section 4.5
/// allows on `define struct`/`define enum` (and, by the same pattern,
/// `define union`), aliasing `of` under the new name in one statement.
fn parse_trailing_alias(ctx: &mut ParseContext, of: TypeRef) {
  if !check(ctx, TokenKind::As) {
    return;
  }
  advance(ctx); // 'as'
  let alias_tok = match expect(ctx, TokenKind::Ident, "an alias name") {
    Ok(t) => t,
    Err(()) => {
      recover_to_statement_boundary(ctx);
      return;
    }
  };
  if let Err(_existing) = ctx.types.create_alias(alias_tok.lexeme.clone(), of) {
    report_semantic_error(ctx, &format!("type '{}' is already defined", alias_tok.lexeme), None);
  }
}

fn parse_struct_def(ctx: &mut ParseContext, line: u32) -> NodeId {
  advance(ctx); // 'struct' or 'construct' — both register under the same canonical key
  let name_tok = match expect(ctx, TokenKind::Ident, "a struct name") {
    Ok(t) => t,
    Err(()) => {
      recover_to_statement_boundary(ctx);
      return ctx.ast.error_node(line);
    }
  };
  if expect(ctx, TokenKind::LBrace, "'{'").is_err() {
    recover_to_statement_boundary(ctx);
    return ctx.ast.error_node(line);
  }

  let list_node = ctx.ast.alloc(AstKind::StructMemberList, line);
  let mut builder = ctx.types.create_struct(name_tok.lexeme.clone());

  while !check(ctx, TokenKind::RBrace) && !check(ctx, TokenKind::Done) {
    let member_line = ctx.line;
    let (_spec, member_ty) = crate::types::parse_type_specifier(ctx);
    let member_tok = match expect(ctx, TokenKind::Ident, "a member name") {
      Ok(t) => t,
      Err(()) => {
        recover_to_statement_boundary(ctx);
        continue;
      }
    };
    ctx.types.add_struct_member(&mut builder, member_tok.lexeme.clone(), member_ty);
    let member_node = ctx.ast.alloc(AstKind::StructMember { name: member_tok.lexeme }, member_line);
    ctx.ast.get_mut(member_node).ty = Some(member_ty);
    ctx.ast.add_child(list_node, member_node);
    if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
      recover_to_statement_boundary(ctx);
    }
  }
  let _ = expect(ctx, TokenKind::RBrace, "'}'");

  match ctx.types.finish_struct(builder) {
    Ok(ty) => parse_trailing_alias(ctx, ty),
    Err(existing) => {
      let existing_name = ctx.types.canonical_name(existing);
      report_semantic_error(ctx, &format!("type '{existing_name}' is already defined"), None);
    }
  }

  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  list_node
}

fn parse_union_def(ctx: &mut ParseContext, line: u32) -> NodeId {
  advance(ctx); // 'union'
  let name_tok = match expect(ctx, TokenKind::Ident, "a union name") {
    Ok(t) => t,
    Err(()) => {
      recover_to_statement_boundary(ctx);
      return ctx.ast.error_node(line);
    }
  };
  if expect(ctx, TokenKind::LBrace, "'{'").is_err() {
    recover_to_statement_boundary(ctx);
    return ctx.ast.error_node(line);
  }

  let list_node = ctx.ast.alloc(AstKind::StructMemberList, line);
  let mut builder = ctx.types.create_union(name_tok.lexeme.clone());

  while !check(ctx, TokenKind::RBrace) && !check(ctx, TokenKind::Done) {
    let member_line = ctx.line;
    let (_spec, member_ty) = crate::types::parse_type_specifier(ctx);
    let member_tok = match expect(ctx, TokenKind::Ident, "a member name") {
      Ok(t) => t,
      Err(()) => {
        recover_to_statement_boundary(ctx);
        continue;
      }
    };
    ctx.types.add_union_member(&mut builder, member_tok.lexeme.clone(), member_ty);
    let member_node = ctx.ast.alloc(AstKind::StructMember { name: member_tok.lexeme }, member_line);
    ctx.ast.get_mut(member_node).ty = Some(member_ty);
    ctx.ast.add_child(list_node, member_node);
    if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
      recover_to_statement_boundary(ctx);
    }
  }
  let _ = expect(ctx, TokenKind::RBrace, "'}'");

  match ctx.types.finish_union(builder) {
    Ok(ty) => parse_trailing_alias(ctx, ty),
    Err(existing) => {
      let existing_name = ctx.types.canonical_name(existing);
      report_semantic_error(ctx, &format!("type '{existing_name}' is already defined"), None);
    }
  }

  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  list_node
}

fn parse_enum_def(ctx: &mut ParseContext, line: u32) -> NodeId {
  advance(ctx); // 'enum'
  let name_tok = match expect(ctx, TokenKind::Ident, "an enum name") {
    Ok(t) => t,
    Err(()) => {
      recover_to_statement_boundary(ctx);
      return ctx.ast.error_node(line);
    }
  };
  if expect(ctx, TokenKind::LBrace, "'{'").is_err() {
    recover_to_statement_boundary(ctx);
    return ctx.ast.error_node(line);
  }

  let list_node = ctx.ast.alloc(AstKind::EnumMemberList, line);
  let mut builder = ctx.types.create_enum(name_tok.lexeme.clone());

  while !check(ctx, TokenKind::RBrace) && !check(ctx, TokenKind::Done) {
    let member_line = ctx.line;
    let member_tok = match expect(ctx, TokenKind::Ident, "an enum member name") {
      Ok(t) => t,
      Err(()) => {
        recover_to_statement_boundary(ctx);
        continue;
      }
    };
    ctx.types.add_enum_member(&mut builder, member_tok.lexeme.clone());
    let member_node = ctx.ast.alloc(AstKind::EnumMember { name: member_tok.lexeme }, member_line);
    ctx.ast.add_child(list_node, member_node);
    if check(ctx, TokenKind::Comma) {
      advance(ctx);
    }
  }
  let _ = expect(ctx, TokenKind::RBrace, "'}'");

  match ctx.types.finish_enum(builder) {
    Ok(ty) => parse_trailing_alias(ctx, ty),
    Err(existing) => {
      let existing_name = ctx.types.canonical_name(existing);
      report_semantic_error(ctx, &format!("type '{existing_name}' is already defined"), None);
    }
  }

  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  list_node
}

/// `alias <type-specifier> as <ident>;` (spec.md section 4.5) — a pure
/// type-table mutation aliasing an existing type specifier under a new
/// name.
pub fn parse_alias_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  advance(ctx); // 'alias'
  let (_spec, target_ty) = crate::types::parse_type_specifier(ctx);

  if expect(ctx, TokenKind::As, "'as'").is_err() {
    recover_to_statement_boundary(ctx);
    return ctx.ast.error_node(line);
  }
  let name_tok = match expect(ctx, TokenKind::Ident, "an alias name") {
    Ok(t) => t,
    Err(()) => {
      recover_to_statement_boundary(ctx);
      return ctx.ast.error_node(line);
    }
  };

  if let Err(_existing) = ctx.types.create_alias(name_tok.lexeme.clone(), target_ty) {
    report_semantic_error(ctx, &format!("type '{}' is already defined", name_tok.lexeme), None);
  }

  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  ctx.ast.alloc(AstKind::TypeName { name: name_tok.lexeme }, line)
}
