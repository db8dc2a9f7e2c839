//! Function definitions and the top-level program driver (spec.md
//! section 4.5's function grammar and section 4.6's "the CFG root is the
//! program's entry"). The top-level dispatch loop and the free functions
//! threading `&mut ParseContext` through every production follow the
//! same shape as `build_graph/graph/mod.rs`'s functions taking
//! `&mut ConcurrentGraphBuilder`/`&mut GraphNode`.

use ollie_core::types::ast::{AstKind, NodeId};
use ollie_core::types::cfg::{BlockId, TopLevelStmt};
use ollie_core::types::symbol::{FunctionRecord, StorageClass, VariableRecord, MAX_PARAMETERS};
use ollie_core::ParseContext;
use ollie_lex::TokenKind;

use crate::{advance, check, expect, peek, recover_to_statement_boundary, report_semantic_error, report_syntax_error};

/// Runs the whole front end over `ctx`'s token stream: allocates the CFG
/// root block, then dispatches every top-level production until `Done`.
/// Top-level declarations and type definitions append to the root block
/// directly; function bodies get their own entrance block.
pub fn parse_program(ctx: &mut ParseContext) {
  let root = ctx.cfg.allocate_block();
  ctx.cfg.root = Some(root);

  while !check(ctx, TokenKind::Done) {
    match peek(ctx).kind {
      TokenKind::Func => {
        parse_function_def(ctx);
      }
      TokenKind::Declare => {
        let n = crate::decl::parse_declare_stmt(ctx);
        ctx.cfg.add_statement(root, TopLevelStmt { root: n });
      }
      TokenKind::Let => {
        let n = crate::decl::parse_let_stmt(ctx);
        ctx.cfg.add_statement(root, TopLevelStmt { root: n });
      }
      TokenKind::Define => {
        crate::decl::parse_define_stmt(ctx);
      }
      TokenKind::Alias => {
        crate::decl::parse_alias_stmt(ctx);
      }
      TokenKind::Semicolon => {
        advance(ctx);
      }
      _ => {
        report_syntax_error(ctx, "expected a function, declaration, or type definition at the top level");
        recover_to_statement_boundary(ctx);
      }
    }
  }
}

fn parse_function_def(ctx: &mut ParseContext) {
  let line = ctx.line;
  advance(ctx); // 'func'

  let storage = if check(ctx, TokenKind::Colon) {
    advance(ctx);
    if expect(ctx, TokenKind::Static, "'static'").is_err() {
      recover_to_statement_boundary(ctx);
      return;
    }
    StorageClass::Static
  } else {
    StorageClass::Normal
  };

  let name_tok = match expect(ctx, TokenKind::Ident, "a function name") {
    Ok(t) => t,
    Err(()) => {
      recover_to_statement_boundary(ctx);
      return;
    }
  };
  if name_tok.lexeme == "main" {
    ctx.diagnostics.found_main_function = true;
  }

  if expect(ctx, TokenKind::LParen, "'('").is_err() {
    recover_to_statement_boundary(ctx);
    return;
  }

  let mut params: Vec<VariableRecord> = Vec::new();
  let param_list_node = ctx.ast.alloc(AstKind::ParameterList, line);

  if !check(ctx, TokenKind::RParen) {
    loop {
      let param_line = ctx.line;
      let (_spec, param_ty) = crate::types::parse_type_specifier(ctx);
      let param_tok = match expect(ctx, TokenKind::Ident, "a parameter name") {
        Ok(t) => t,
        Err(()) => {
          recover_to_statement_boundary(ctx);
          break;
        }
      };

      if params.len() >= MAX_PARAMETERS {
        report_semantic_error(
          ctx,
          &format!("function '{}' declares more than {MAX_PARAMETERS} parameters", name_tok.lexeme),
          None,
        );
      } else {
        let mut record = VariableRecord::new(param_tok.lexeme.clone(), StorageClass::Normal, param_ty, ollie_core::types::symbol::DeclKind::Let, param_line);
        record.is_function_parameter = true;
        record.owning_function = Some(name_tok.lexeme.clone());
        params.push(record);

        let param_node = ctx.ast.alloc(AstKind::ParameterDecl { name: param_tok.lexeme }, param_line);
        ctx.ast.get_mut(param_node).ty = Some(param_ty);
        ctx.ast.add_child(param_list_node, param_node);
      }

      if check(ctx, TokenKind::Comma) {
        advance(ctx);
        continue;
      }
      break;
    }
  }

  if expect(ctx, TokenKind::RParen, "')'").is_err() {
    recover_to_statement_boundary(ctx);
    return;
  }

  let return_ty = if check(ctx, TokenKind::Arrow) {
    advance(ctx);
    let (_spec, ty) = crate::types::parse_type_specifier(ctx);
    ty
  } else {
    ctx.types.void_type
  };

  let mut record = FunctionRecord::new(name_tok.lexeme.clone(), storage, return_ty, line);
  record.parameters = params.clone();
  record.defined = true;

  let collision_line = match ctx.functions.insert(record) {
    Ok(()) => None,
    Err(existing) => Some(existing.line),
  };
  if let Some(existing_line) = collision_line {
    report_semantic_error(
      ctx,
      &format!("redefinition of function '{}'; already defined at line {existing_line}", name_tok.lexeme),
      Some(existing_line),
    );
    recover_to_statement_boundary(ctx);
    return;
  }

  let entrance_block = ctx.cfg.allocate_block();
  if let Some(func_rec) = ctx.functions.lookup_mut(&name_tok.lexeme) {
    func_rec.entrance_block = Some(entrance_block);
  }

  ctx.open_scope();
  for param in &params {
    let _ = ctx.variables.insert(param.name.clone(), param.clone());
  }
  let _body_exit: BlockId = crate::stmt::parse_block(ctx, entrance_block);
  ctx.close_scope();

  let _ = param_list_node;
}
