//! Type specifier grammar: a base type name followed by zero or more
//! trailing address specifiers (spec.md section 4.5, realized against
//! the size-class model of section 4.4). Each trailing `*` constructs
//! (or deduplicates) a pointer-to type; an optional `[count]` suffix
//! constructs an array-of type.

use ollie_core::types::ast::{AstKind, NodeId};
use ollie_core::types::type_system::TypeRef;
use ollie_core::ParseContext;
use ollie_lex::TokenKind;

use crate::{advance, check, expect, report_semantic_error, report_syntax_error};

/// Resolves a bare type name, trying it first as a primitive/alias/pointer
/// name and falling back to the `struct`/`union`/`enum` canonical keys
/// those definitions register under (`decl.rs`'s `parse_struct_def` and
/// friends) — so `declare p : Point;` finds a struct defined as
/// `define struct Point { ... }` without requiring the elaborated
/// `struct Point` spelling at every use site.
fn resolve_type_name(ctx: &ParseContext, name: &str) -> Option<TypeRef> {
  ctx
    .types
    .lookup_any_scope(name)
    .or_else(|| ctx.types.lookup_any_scope(&format!("struct {name}")))
    .or_else(|| ctx.types.lookup_any_scope(&format!("union {name}")))
    .or_else(|| ctx.types.lookup_any_scope(&format!("enum {name}")))
}

/// Parses a type specifier, resolving it against `ctx.types` as it goes.
/// Returns the resulting AST node (a `TypeSpecifier` wrapping zero or
/// more `TypeAddressSpecifier` decorators around a `TypeName` leaf)
/// together with the resolved `TypeRef`. Unknown base names resolve to
/// `void` after a semantic diagnostic (spec.md's type-existence check).
pub fn parse_type_specifier(ctx: &mut ParseContext) -> (NodeId, TypeRef) {
  let line = ctx.line;

  let name_tok = match expect(ctx, TokenKind::Ident, "a type name") {
    Ok(t) => t,
    Err(()) => return (ctx.ast.error_node(line), ctx.types.void_type),
  };

  let name_node = ctx.ast.alloc(AstKind::TypeName { name: name_tok.lexeme.clone() }, line);
  let base_ty = match resolve_type_name(ctx, &name_tok.lexeme) {
    Some(t) => t,
    None => {
      report_semantic_error(ctx, &format!("unknown type '{}'", name_tok.lexeme), None);
      ctx.types.void_type
    }
  };

  let mut resolved = base_ty;
  let mut wrapped = name_node;
  while check(ctx, TokenKind::Star) {
    advance(ctx);
    resolved = ctx.types.create_pointer(resolved);
    let addr_node = ctx.ast.alloc(AstKind::TypeAddressSpecifier, line);
    ctx.ast.add_child(addr_node, wrapped);
    wrapped = addr_node;
  }

  if check(ctx, TokenKind::LBracket) {
    advance(ctx);
    let count = match expect(ctx, TokenKind::IntConst, "an array length") {
      Ok(tok) => tok.lexeme.parse::<u64>().unwrap_or(0),
      Err(()) => 0,
    };
    if expect(ctx, TokenKind::RBracket, "']'").is_err() {
      report_syntax_error(ctx, "malformed array type suffix");
    }
    resolved = ctx.types.create_array(resolved, count);
    let addr_node = ctx.ast.alloc(AstKind::TypeAddressSpecifier, line);
    ctx.ast.add_child(addr_node, wrapped);
    wrapped = addr_node;
  }

  let spec_node = ctx.ast.alloc(AstKind::TypeSpecifier { resolved }, line);
  ctx.ast.add_child(spec_node, wrapped);
  (spec_node, resolved)
}
