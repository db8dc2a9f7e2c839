//! Statement multiplexer and CFG builder. Every statement parsed here
//! either appends to the current basic block or, for a control-flow
//! statement, allocates new blocks and wires the edges between them —
//! spec.md section 4.6's one-pass "parse a statement, extend the CFG"
//! design, grounded on the staged-block-commit shape of
//! `radlr-core/compile/states/build_graph/graph/mod.rs` (simplified here
//! to a flat block/edge model, see `ollie_core::types::cfg`).

use ollie_core::types::ast::{AstKind, NodeId};
use ollie_core::types::cfg::{BlockId, EdgeDirection, TopLevelStmt};
use ollie_core::ParseContext;
use ollie_lex::{LexItem, TokenKind};

use crate::{advance, check, expect, peek, recover_to_statement_boundary, report_syntax_error};

/// Parses a brace-delimited statement list into `entry`, opening and
/// closing one variable/type scope for the block's lifetime (spec.md
/// section 5's scoped-acquisition rule, paired on every path including
/// the early-return recovery path). Returns the block execution
/// continues in once the closing brace is consumed.
pub fn parse_block(ctx: &mut ParseContext, entry: BlockId) -> BlockId {
  if expect(ctx, TokenKind::LBrace, "'{'").is_err() {
    recover_to_statement_boundary(ctx);
    return entry;
  }
  ctx.open_scope();
  let mut current = entry;
  while !check(ctx, TokenKind::RBrace) && !check(ctx, TokenKind::Done) {
    current = parse_statement(ctx, current);
  }
  ctx.close_scope();
  let _ = expect(ctx, TokenKind::RBrace, "'}'");
  current
}

/// Appends one statement's effect starting from `block`, returning the
/// block execution continues in afterward. Simple statements return
/// `block` unchanged; control-flow statements return a join block.
pub fn parse_statement(ctx: &mut ParseContext, block: BlockId) -> BlockId {
  match peek(ctx).kind {
    TokenKind::LBrace => parse_block(ctx, block),
    TokenKind::Declare => add_simple(ctx, block, crate::decl::parse_declare_stmt),
    TokenKind::Let => add_simple(ctx, block, crate::decl::parse_let_stmt),
    TokenKind::Define => add_simple(ctx, block, crate::decl::parse_define_stmt),
    TokenKind::Alias => add_simple(ctx, block, crate::decl::parse_alias_stmt),
    TokenKind::Ret => add_simple(ctx, block, parse_return_stmt),
    TokenKind::Break => add_simple(ctx, block, parse_break_stmt),
    TokenKind::Continue => add_simple(ctx, block, parse_continue_stmt),
    TokenKind::Jump => add_simple(ctx, block, parse_jump_stmt),
    TokenKind::LabelIdent => add_simple(ctx, block, parse_label_stmt),
    TokenKind::If => parse_if_stmt(ctx, block),
    TokenKind::While => parse_while_stmt(ctx, block),
    TokenKind::Do => parse_do_while_stmt(ctx, block),
    TokenKind::For => parse_for_stmt(ctx, block),
    TokenKind::Switch => parse_switch_stmt(ctx, block),
    TokenKind::Semicolon => {
      advance(ctx);
      block
    }
    TokenKind::Done | TokenKind::RBrace => block,
    _ => add_simple(ctx, block, parse_expr_stmt),
  }
}

fn add_simple(ctx: &mut ParseContext, block: BlockId, parse_fn: fn(&mut ParseContext) -> NodeId) -> BlockId {
  let root = parse_fn(ctx);
  ctx.cfg.add_statement(block, TopLevelStmt { root });
  block
}

fn parse_expr_stmt(ctx: &mut ParseContext) -> NodeId {
  let node = crate::expr::parse_expression(ctx);
  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  node
}

fn parse_return_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  advance(ctx); // 'ret'
  let node = ctx.ast.alloc(AstKind::ReturnStmt, line);
  if !check(ctx, TokenKind::Semicolon) {
    let value = crate::expr::parse_expression(ctx);
    ctx.ast.add_child(node, value);
    ctx.ast.get_mut(node).ty = ctx.ast.get(value).ty;
  }
  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  node
}

fn parse_break_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  advance(ctx);
  let node = ctx.ast.alloc(AstKind::BreakStmt, line);
  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  node
}

fn parse_continue_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  advance(ctx);
  let node = ctx.ast.alloc(AstKind::ContinueStmt, line);
  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  node
}

fn parse_jump_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  advance(ctx); // 'jump'
  let label = match expect(ctx, TokenKind::LabelIdent, "a label") {
    Ok(t) => t.lexeme,
    Err(()) => String::new(),
  };
  let node = ctx.ast.alloc(AstKind::JumpStmt { label }, line);
  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }
  node
}

fn parse_label_stmt(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  let tok = advance(ctx); // the label identifier, e.g. `$loop`
  let _ = expect(ctx, TokenKind::Colon, "':' after a label");
  ctx.ast.alloc(AstKind::LabelStmt { name: tok.lexeme }, line)
}

fn parse_if_stmt(ctx: &mut ParseContext, block: BlockId) -> BlockId {
  let line = ctx.line;
  advance(ctx); // 'if'
  let cond = crate::expr::parse_expression(ctx);
  let if_root = ctx.ast.alloc(AstKind::IfStmt, line);
  ctx.ast.add_child(if_root, cond);
  ctx.cfg.add_statement(block, TopLevelStmt { root: if_root });
  ctx.cfg.mark_leader(block);

  if expect(ctx, TokenKind::Then, "'then'").is_err() {
    recover_to_statement_boundary(ctx);
    return block;
  }

  let then_entry = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(block, then_entry, EdgeDirection::Unidirectional);
  let then_exit = parse_block(ctx, then_entry);

  let join = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(then_exit, join, EdgeDirection::Unidirectional);

  if check(ctx, TokenKind::Else) {
    advance(ctx);
    let else_entry = ctx.cfg.allocate_block();
    ctx.cfg.add_successor(block, else_entry, EdgeDirection::Unidirectional);
    let else_exit = parse_block(ctx, else_entry);
    ctx.cfg.add_successor(else_exit, join, EdgeDirection::Unidirectional);
  } else {
    ctx.cfg.add_successor(block, join, EdgeDirection::Unidirectional);
  }

  join
}

fn parse_while_stmt(ctx: &mut ParseContext, block: BlockId) -> BlockId {
  let line = ctx.line;
  advance(ctx); // 'while'

  let header = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(block, header, EdgeDirection::Unidirectional);

  let cond = crate::expr::parse_expression(ctx);
  let while_root = ctx.ast.alloc(AstKind::WhileStmt, line);
  ctx.ast.add_child(while_root, cond);
  ctx.cfg.add_statement(header, TopLevelStmt { root: while_root });
  ctx.cfg.mark_leader(header);

  let body_entry = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(header, body_entry, EdgeDirection::Unidirectional);
  let body_exit = parse_block(ctx, body_entry);
  ctx.cfg.add_successor(body_exit, header, EdgeDirection::Bidirectional);

  let join = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(header, join, EdgeDirection::Unidirectional);
  join
}

fn parse_do_while_stmt(ctx: &mut ParseContext, block: BlockId) -> BlockId {
  let line = ctx.line;
  advance(ctx); // 'do'

  let body_entry = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(block, body_entry, EdgeDirection::Unidirectional);
  let body_exit = parse_block(ctx, body_entry);

  if expect(ctx, TokenKind::While, "'while'").is_err() {
    recover_to_statement_boundary(ctx);
    return body_exit;
  }
  let cond = crate::expr::parse_expression(ctx);
  let do_while_root = ctx.ast.alloc(AstKind::DoWhileStmt, line);
  ctx.ast.add_child(do_while_root, cond);
  ctx.cfg.add_statement(body_exit, TopLevelStmt { root: do_while_root });
  ctx.cfg.mark_leader(body_exit);

  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }

  ctx.cfg.add_successor(body_exit, body_entry, EdgeDirection::Bidirectional);
  let join = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(body_exit, join, EdgeDirection::Unidirectional);
  join
}

fn parse_for_stmt(ctx: &mut ParseContext, block: BlockId) -> BlockId {
  let line = ctx.line;
  advance(ctx); // 'for'
  if expect(ctx, TokenKind::LParen, "'('").is_err() {
    recover_to_statement_boundary(ctx);
    return block;
  }
  ctx.grouping.push(LexItem::new(TokenKind::LParen, "(", line));
  ctx.open_scope(); // the loop variable lives only for the header + body

  match peek(ctx).kind {
    TokenKind::Declare => {
      let n = crate::decl::parse_declare_stmt(ctx);
      ctx.cfg.add_statement(block, TopLevelStmt { root: n });
    }
    TokenKind::Let => {
      let n = crate::decl::parse_let_stmt(ctx);
      ctx.cfg.add_statement(block, TopLevelStmt { root: n });
    }
    TokenKind::Semicolon => {
      advance(ctx);
    }
    _ => {
      let n = crate::expr::parse_expression(ctx);
      ctx.cfg.add_statement(block, TopLevelStmt { root: n });
      if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
        recover_to_statement_boundary(ctx);
      }
    }
  }

  let header = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(block, header, EdgeDirection::Unidirectional);

  let for_root = ctx.ast.alloc(AstKind::ForStmt, line);
  if !check(ctx, TokenKind::Semicolon) {
    let cond = crate::expr::parse_expression(ctx);
    ctx.ast.add_child(for_root, cond);
  }
  ctx.cfg.add_statement(header, TopLevelStmt { root: for_root });
  ctx.cfg.mark_leader(header);
  if expect(ctx, TokenKind::Semicolon, "';'").is_err() {
    recover_to_statement_boundary(ctx);
  }

  let post_node = if !check(ctx, TokenKind::RParen) { Some(crate::expr::parse_expression(ctx)) } else { None };

  if expect(ctx, TokenKind::RParen, "')'").is_ok() {
    let _ = ctx.grouping.pop_matching(TokenKind::LParen);
  }

  let body_entry = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(header, body_entry, EdgeDirection::Unidirectional);
  let body_exit = parse_block(ctx, body_entry);

  if let Some(post) = post_node {
    ctx.cfg.add_statement(body_exit, TopLevelStmt { root: post });
  }
  ctx.cfg.add_successor(body_exit, header, EdgeDirection::Bidirectional);

  ctx.close_scope();

  let join = ctx.cfg.allocate_block();
  ctx.cfg.add_successor(header, join, EdgeDirection::Unidirectional);
  join
}

fn parse_switch_stmt(ctx: &mut ParseContext, block: BlockId) -> BlockId {
  let line = ctx.line;
  advance(ctx); // 'switch'
  if expect(ctx, TokenKind::On, "'on'").is_err() {
    recover_to_statement_boundary(ctx);
    return block;
  }
  if expect(ctx, TokenKind::LParen, "'('").is_err() {
    recover_to_statement_boundary(ctx);
    return block;
  }
  ctx.grouping.push(LexItem::new(TokenKind::LParen, "(", line));
  let disc = crate::expr::parse_expression(ctx);
  if expect(ctx, TokenKind::RParen, "')'").is_ok() {
    let _ = ctx.grouping.pop_matching(TokenKind::LParen);
  }
  let switch_root = ctx.ast.alloc(AstKind::SwitchStmt, line);
  ctx.ast.add_child(switch_root, disc);
  ctx.cfg.add_statement(block, TopLevelStmt { root: switch_root });
  ctx.cfg.mark_leader(block);

  if expect(ctx, TokenKind::LBrace, "'{'").is_err() {
    recover_to_statement_boundary(ctx);
    return block;
  }

  let join = ctx.cfg.allocate_block();
  ctx.open_scope();

  while !check(ctx, TokenKind::RBrace) && !check(ctx, TokenKind::Done) {
    match peek(ctx).kind {
      TokenKind::Case => {
        let case_line = ctx.line;
        advance(ctx);
        let case_expr = crate::expr::parse_case_constant(ctx);
        let _ = expect(ctx, TokenKind::Colon, "':'");
        let case_node = ctx.ast.alloc(AstKind::CaseStmt, case_line);
        ctx.ast.add_child(case_node, case_expr);

        let case_block = ctx.cfg.allocate_block();
        ctx.cfg.add_successor(block, case_block, EdgeDirection::Unidirectional);
        ctx.cfg.add_statement(case_block, TopLevelStmt { root: case_node });

        let mut current = case_block;
        while !matches!(peek(ctx).kind, TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Done) {
          current = parse_statement(ctx, current);
        }
        ctx.cfg.add_successor(current, join, EdgeDirection::Unidirectional);
      }
      TokenKind::Default => {
        let default_line = ctx.line;
        advance(ctx);
        let _ = expect(ctx, TokenKind::Colon, "':'");
        let default_node = ctx.ast.alloc(AstKind::DefaultStmt, default_line);

        let default_block = ctx.cfg.allocate_block();
        ctx.cfg.add_successor(block, default_block, EdgeDirection::Unidirectional);
        ctx.cfg.add_statement(default_block, TopLevelStmt { root: default_node });

        let mut current = default_block;
        while !matches!(peek(ctx).kind, TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Done) {
          current = parse_statement(ctx, current);
        }
        ctx.cfg.add_successor(current, join, EdgeDirection::Unidirectional);
      }
      _ => {
        report_syntax_error(ctx, "expected 'case' or 'default' inside a switch body");
        recover_to_statement_boundary(ctx);
      }
    }
  }
  ctx.close_scope();
  let _ = expect(ctx, TokenKind::RBrace, "'}'");

  join
}
