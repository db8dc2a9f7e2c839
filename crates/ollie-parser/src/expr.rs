//! The 14-level expression precedence ladder of spec.md section 4.5:
//! assignment, logical-or, logical-and, bitwise-or, bitwise-xor,
//! bitwise-and, equality (chainable), relational (non-chainable), shift,
//! additive, multiplicative, unary, postfix, primary. Each level is a
//! `parse_*` function that calls the next-tighter level for its operands,
//! standard recursive-descent precedence climbing with the shared state
//! threaded by `&mut ParseContext` the same way `build_graph/graph/mod.rs`
//! threads `&mut ConcurrentGraphBuilder` through its free functions.

use ollie_core::types::ast::{AstKind, BinOp, NodeId, PostfixOp, UnOp};
use ollie_core::types::type_system::{BinOpClass, TypeDescriptor};
use ollie_core::ParseContext;
use ollie_lex::{LexItem, TokenKind};

use crate::{advance, check, expect, peek, report_syntax_error};

pub fn parse_expression(ctx: &mut ParseContext) -> NodeId {
  parse_assignment(ctx)
}

fn parse_assignment(ctx: &mut ParseContext) -> NodeId {
  let left = parse_logical_or(ctx);
  if check(ctx, TokenKind::Assign) {
    let line = ctx.line;
    advance(ctx);
    let right = parse_assignment(ctx);

    if let (Some(lt), Some(rt)) = (ctx.ast.get(left).ty, ctx.ast.get(right).ty) {
      if ctx.types.types_assignable(lt, rt).is_none() {
        let (lhs_name, rhs_name) = (ctx.types.canonical_name(lt), ctx.types.canonical_name(rt));
        crate::report_semantic_error(ctx, &format!("cannot assign a value of type '{rhs_name}' to '{lhs_name}'"), None);
      }
    }

    let node = ctx.ast.alloc(AstKind::AssignmentExpr, line);
    ctx.ast.add_child(node, left);
    ctx.ast.add_child(node, right);
    ctx.ast.get_mut(node).ty = ctx.ast.get(left).ty;
    return node;
  }
  left
}

fn make_binary(ctx: &mut ParseContext, op: BinOp, class: BinOpClass, left: NodeId, right: NodeId, line: u32) -> NodeId {
  let node = ctx.ast.alloc(AstKind::BinaryExpr { op }, line);
  ctx.ast.add_child(node, left);
  ctx.ast.add_child(node, right);

  let result_ty = match (ctx.ast.get(left).ty, ctx.ast.get(right).ty) {
    (Some(lt), Some(rt)) => match ctx.types.determine_compatibility_and_coerce(lt, rt, class) {
      Some(t) => Some(t),
      None => {
        let (ln, rn) = (ctx.types.canonical_name(lt), ctx.types.canonical_name(rt));
        crate::report_semantic_error(ctx, &format!("operator has no overload for operand types '{ln}' and '{rn}'"), None);
        None
      }
    },
    _ => None,
  };
  ctx.ast.get_mut(node).ty = result_ty;
  node
}

macro_rules! left_assoc_level {
  ($name:ident, $next:path, $( $tok:pat => ($op:expr, $class:expr) ),+ $(,)?) => {
    fn $name(ctx: &mut ParseContext) -> NodeId {
      let mut left = $next(ctx);
      loop {
        let line = ctx.line;
        let op_and_class = match peek(ctx).kind {
          $( $tok => Some(($op, $class)), )+
          _ => None,
        };
        match op_and_class {
          Some((op, class)) => {
            advance(ctx);
            let right = $next(ctx);
            left = make_binary(ctx, op, class, left, right, line);
          }
          None => break,
        }
      }
      left
    }
  };
}

left_assoc_level!(parse_logical_or, parse_logical_and, TokenKind::PipePipe => (BinOp::Or, BinOpClass::Logical));
left_assoc_level!(parse_logical_and, parse_bit_or, TokenKind::AmpAmp => (BinOp::And, BinOpClass::Logical));
left_assoc_level!(parse_bit_or, parse_bit_xor, TokenKind::Pipe => (BinOp::BitOr, BinOpClass::Bitwise));
left_assoc_level!(parse_bit_xor, parse_bit_and, TokenKind::Caret => (BinOp::BitXor, BinOpClass::Bitwise));
left_assoc_level!(parse_bit_and, parse_equality, TokenKind::Amp => (BinOp::BitAnd, BinOpClass::Bitwise));
left_assoc_level!(parse_equality, parse_relational,
  TokenKind::EqEq => (BinOp::Eq, BinOpClass::Equality),
  TokenKind::BangEq => (BinOp::Ne, BinOpClass::Equality),
);
left_assoc_level!(parse_shift, parse_additive,
  TokenKind::LtLt => (BinOp::Shl, BinOpClass::Shift),
  TokenKind::GtGt => (BinOp::Shr, BinOpClass::Shift),
);
left_assoc_level!(parse_additive, parse_multiplicative,
  TokenKind::Plus => (BinOp::Add, BinOpClass::Arithmetic),
  TokenKind::Minus => (BinOp::Sub, BinOpClass::Arithmetic),
);
left_assoc_level!(parse_multiplicative, parse_unary,
  TokenKind::Star => (BinOp::Mul, BinOpClass::Arithmetic),
  TokenKind::Slash => (BinOp::Div, BinOpClass::Arithmetic),
  TokenKind::Percent => (BinOp::Rem, BinOpClass::Arithmetic),
);

/// Non-chainable: at most one relational comparison per expression
/// without explicit parenthesization (spec.md section 8's chaining
/// property — equality chains, relational does not).
fn parse_relational(ctx: &mut ParseContext) -> NodeId {
  let left = parse_shift(ctx);
  let rel = |k: TokenKind| match k {
    TokenKind::Lt => Some(BinOp::Lt),
    TokenKind::LtEq => Some(BinOp::Le),
    TokenKind::Gt => Some(BinOp::Gt),
    TokenKind::GtEq => Some(BinOp::Ge),
    _ => None,
  };

  let Some(op) = rel(peek(ctx).kind) else { return left };
  let line = ctx.line;
  advance(ctx);
  let right = parse_shift(ctx);
  let result = make_binary(ctx, op, BinOpClass::Relational, left, right, line);

  if rel(peek(ctx).kind).is_some() {
    report_syntax_error(ctx, "relational comparisons cannot be chained; use parentheses to disambiguate");
  }
  result
}

fn parse_unary(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  let op = match peek(ctx).kind {
    TokenKind::Amp => Some(UnOp::AddressOf),
    TokenKind::Star => Some(UnOp::Deref),
    TokenKind::Plus => Some(UnOp::Plus),
    TokenKind::Minus => Some(UnOp::Neg),
    TokenKind::Tilde => Some(UnOp::BitNot),
    TokenKind::Bang => Some(UnOp::Not),
    TokenKind::PlusPlus => Some(UnOp::PreIncrement),
    TokenKind::MinusMinus => Some(UnOp::PreDecrement),
    _ => None,
  };

  let Some(op) = op else { return parse_postfix(ctx) };
  advance(ctx);
  let operand = parse_unary(ctx);
  let node = ctx.ast.alloc(AstKind::UnaryExpr { op }, line);
  ctx.ast.add_child(node, operand);

  let ty = match op {
    UnOp::AddressOf => ctx.ast.get(operand).ty.map(|t| ctx.types.create_pointer(t)),
    UnOp::Deref => ctx.ast.get(operand).ty.and_then(|t| {
      let dealiased = ctx.types.dealias(t);
      match ctx.types.descriptor(dealiased) {
        TypeDescriptor::Pointer { to, .. } => Some(*to),
        _ => None,
      }
    }),
    UnOp::Not => Some(ctx.types.bool_type),
    _ => ctx.ast.get(operand).ty,
  };
  ctx.ast.get_mut(node).ty = ty;
  node
}

fn parse_postfix(ctx: &mut ParseContext) -> NodeId {
  let mut node = parse_primary(ctx);

  loop {
    let line = ctx.line;
    match peek(ctx).kind {
      TokenKind::PlusPlus => {
        advance(ctx);
        let n = ctx.ast.alloc(AstKind::PostfixUnaryExpr { op: PostfixOp::PostIncrement }, line);
        ctx.ast.add_child(n, node);
        ctx.ast.get_mut(n).ty = ctx.ast.get(node).ty;
        node = n;
      }
      TokenKind::MinusMinus => {
        advance(ctx);
        let n = ctx.ast.alloc(AstKind::PostfixUnaryExpr { op: PostfixOp::PostDecrement }, line);
        ctx.ast.add_child(n, node);
        ctx.ast.get_mut(n).ty = ctx.ast.get(node).ty;
        node = n;
      }
      TokenKind::LBracket => {
        advance(ctx);
        ctx.grouping.push(LexItem::new(TokenKind::LBracket, "[", line));
        let index = parse_expression(ctx);
        if expect(ctx, TokenKind::RBracket, "']'").is_ok() {
          let _ = ctx.grouping.pop_matching(TokenKind::LBracket);
        }
        let n = ctx.ast.alloc(AstKind::ArrayAccessor, line);
        ctx.ast.add_child(n, node);
        ctx.ast.add_child(n, index);
        let elem_ty = ctx.ast.get(node).ty.and_then(|t| {
          let dealiased = ctx.types.dealias(t);
          match ctx.types.descriptor(dealiased) {
            TypeDescriptor::Array { element, .. } => Some(*element),
            TypeDescriptor::Pointer { to, .. } => Some(*to),
            _ => None,
          }
        });
        ctx.ast.get_mut(n).ty = elem_ty;
        node = n;
      }
      TokenKind::As => {
        advance(ctx);
        let (_spec, target_ty) = crate::types::parse_type_specifier(ctx);
        let n = ctx.ast.alloc(AstKind::CastExpr { target: target_ty }, line);
        ctx.ast.add_child(n, node);
        ctx.ast.get_mut(n).ty = Some(target_ty);
        node = n;
      }
      TokenKind::Colon => {
        advance(ctx);
        let member_name = match expect(ctx, TokenKind::Ident, "a member name after ':'") {
          Ok(tok) => tok.lexeme,
          Err(()) => {
            node = ctx.ast.error_node(line);
            continue;
          }
        };

        let aggregate_ty = ctx.ast.get(node).ty.map(|t| ctx.types.dealias(t));
        let n = ctx.ast.alloc(AstKind::StructAccessor { member: member_name.clone() }, line);
        ctx.ast.add_child(n, node);

        let field_ty = aggregate_ty.and_then(|t| match ctx.types.descriptor(t) {
          TypeDescriptor::Struct { members, .. } | TypeDescriptor::Union { members, .. } => {
            match members.iter().find(|m| m.name == member_name) {
              Some(m) => Some(m.ty),
              None => {
                crate::report_semantic_error(ctx, &format!("no member named '{member_name}'"), None);
                None
              }
            }
          }
          _ => {
            crate::report_semantic_error(ctx, "':' used on a non-aggregate type", None);
            None
          }
        });
        ctx.ast.get_mut(n).ty = field_ty;
        node = n;
      }
      TokenKind::FatArrow => {
        advance(ctx);
        let member_name = match expect(ctx, TokenKind::Ident, "a member name after '=>'") {
          Ok(tok) => tok.lexeme,
          Err(()) => {
            node = ctx.ast.error_node(line);
            continue;
          }
        };

        let dealiased_base = ctx.ast.get(node).ty.map(|t| ctx.types.dealias(t));
        let aggregate_ty = match dealiased_base.map(|t| ctx.types.descriptor(t)) {
          Some(TypeDescriptor::Pointer { to, .. }) => Some(ctx.types.dealias(*to)),
          _ => {
            crate::report_semantic_error(ctx, "'=>' used on a non-pointer type", None);
            None
          }
        };

        let n = ctx.ast.alloc(AstKind::PointerMemberAccessor { member: member_name.clone() }, line);
        ctx.ast.add_child(n, node);

        let field_ty = aggregate_ty.and_then(|t| match ctx.types.descriptor(t) {
          TypeDescriptor::Struct { members, .. } | TypeDescriptor::Union { members, .. } => {
            match members.iter().find(|m| m.name == member_name) {
              Some(m) => Some(m.ty),
              None => {
                crate::report_semantic_error(ctx, &format!("no member named '{member_name}'"), None);
                None
              }
            }
          }
          _ => None,
        });
        ctx.ast.get_mut(n).ty = field_ty;
        node = n;
      }
      _ => break,
    }
  }

  node
}

fn parse_call(ctx: &mut ParseContext, callee: String, line: u32) -> NodeId {
  advance(ctx); // the '(' the caller peeked
  ctx.grouping.push(LexItem::new(TokenKind::LParen, "(", line));
  let node = ctx.ast.alloc(AstKind::FunctionCall { callee: callee.clone() }, line);

  let mut arg_count = 0usize;
  if !check(ctx, TokenKind::RParen) {
    loop {
      let arg = parse_assignment(ctx);
      ctx.ast.add_child(node, arg);
      arg_count += 1;
      if check(ctx, TokenKind::Comma) {
        advance(ctx);
        continue;
      }
      break;
    }
  }
  if expect(ctx, TokenKind::RParen, "')'").is_ok() {
    let _ = ctx.grouping.pop_matching(TokenKind::LParen);
  }

  match ctx.functions.lookup(&callee) {
    Some(f) => {
      let expected = f.parameters.len();
      ctx.ast.get_mut(node).ty = Some(f.return_type);
      if arg_count != expected {
        crate::report_semantic_error(
          ctx,
          &format!("function '{callee}' expects {expected} argument(s), found {arg_count}"),
          None,
        );
      }
    }
    None => crate::report_semantic_error(ctx, &format!("call to undefined function '{callee}'"), None),
  }
  node
}

fn parse_typesize(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  advance(ctx); // 'typesize'
  let opened = expect(ctx, TokenKind::LParen, "'(' after 'typesize'").is_ok();
  if opened {
    ctx.grouping.push(LexItem::new(TokenKind::LParen, "(", line));
  }
  let (_spec_node, ty_ref) = crate::types::parse_type_specifier(ctx);
  if opened && expect(ctx, TokenKind::RParen, "')'").is_ok() {
    let _ = ctx.grouping.pop_matching(TokenKind::LParen);
  }

  let size = ctx.types.get_type_size(ty_ref).map(|s| s.byte_len()).unwrap_or(0);
  let node = ctx.ast.alloc(AstKind::Constant { token_kind: TokenKind::IntConst, raw: size.to_string() }, line);
  ctx.ast.get_mut(node).ty = Some(ctx.types.default_int_type);
  node
}

/// Parses the `<constant>` a `case` label holds (spec.md section 4.5).
/// Kept separate from `parse_expression` because a case label is
/// terminated by `:`, the same token postfix level 13 uses for struct
/// member access — routing a case label through the full expression
/// grammar would have the postfix loop try to read the label's
/// terminating `:` as a member accessor.
pub(crate) fn parse_case_constant(ctx: &mut ParseContext) -> NodeId {
  let line = ctx.line;
  let negate = check(ctx, TokenKind::Minus);
  if negate {
    advance(ctx);
  }

  let tok = peek(ctx);
  let node = match tok.kind {
    TokenKind::IntConst | TokenKind::FloatConst | TokenKind::CharConst | TokenKind::StrConst => {
      advance(ctx);
      let raw = if negate { format!("-{}", tok.lexeme) } else { tok.lexeme.clone() };
      let n = ctx.ast.alloc(AstKind::Constant { token_kind: tok.kind, raw }, line);
      let ty = match tok.kind {
        TokenKind::FloatConst => ctx.types.lookup_any_scope("f64"),
        TokenKind::CharConst => ctx.types.lookup_any_scope("char"),
        TokenKind::StrConst => ctx.types.lookup_any_scope("char").map(|c| ctx.types.create_pointer(c)),
        _ => Some(ctx.types.default_int_type),
      };
      ctx.ast.get_mut(n).ty = ty;
      n
    }
    _ => {
      report_syntax_error(ctx, &format!("expected a constant in 'case', found '{}'", tok.lexeme));
      ctx.ast.error_node(line)
    }
  };
  node
}

fn parse_primary(ctx: &mut ParseContext) -> NodeId {
  let tok = peek(ctx);
  let line = ctx.line;

  match tok.kind {
    TokenKind::At => {
      advance(ctx);
      let name_tok = match expect(ctx, TokenKind::Ident, "a function name after '@'") {
        Ok(t) => t,
        Err(()) => return ctx.ast.error_node(line),
      };
      if !check(ctx, TokenKind::LParen) {
        report_syntax_error(ctx, "expected '(' after '@ident'");
        return ctx.ast.error_node(line);
      }
      parse_call(ctx, name_tok.lexeme, line)
    }
    TokenKind::Ident => {
      advance(ctx);
      let node = ctx.ast.alloc(AstKind::Identifier { name: tok.lexeme.clone() }, line);
      let ty = ctx.variables.lookup(&tok.lexeme).map(|v| v.ty);
      ctx.ast.get_mut(node).ty = ty;
      node
    }
    TokenKind::IntConst => {
      advance(ctx);
      let node = ctx.ast.alloc(AstKind::Constant { token_kind: tok.kind, raw: tok.lexeme }, line);
      ctx.ast.get_mut(node).ty = Some(ctx.types.default_int_type);
      node
    }
    TokenKind::FloatConst => {
      advance(ctx);
      let node = ctx.ast.alloc(AstKind::Constant { token_kind: tok.kind, raw: tok.lexeme }, line);
      ctx.ast.get_mut(node).ty = ctx.types.lookup_any_scope("f64");
      node
    }
    TokenKind::CharConst => {
      advance(ctx);
      let node = ctx.ast.alloc(AstKind::Constant { token_kind: tok.kind, raw: tok.lexeme }, line);
      ctx.ast.get_mut(node).ty = ctx.types.lookup_any_scope("char");
      node
    }
    TokenKind::StrConst => {
      advance(ctx);
      let node = ctx.ast.alloc(AstKind::Constant { token_kind: tok.kind, raw: tok.lexeme }, line);
      let char_ty = ctx.types.lookup_any_scope("char").expect("char is a primitive");
      ctx.ast.get_mut(node).ty = Some(ctx.types.create_pointer(char_ty));
      node
    }
    TokenKind::LParen => {
      advance(ctx);
      ctx.grouping.push(LexItem::new(TokenKind::LParen, "(", line));
      let inner = parse_expression(ctx);
      if expect(ctx, TokenKind::RParen, "')'").is_ok() {
        let _ = ctx.grouping.pop_matching(TokenKind::LParen);
      }
      inner
    }
    TokenKind::Typesize => parse_typesize(ctx),
    _ => {
      report_syntax_error(ctx, &format!("unexpected token '{}' in expression", tok.lexeme));
      if tok.kind != TokenKind::Done {
        advance(ctx);
      }
      ctx.ast.error_node(line)
    }
  }
}
