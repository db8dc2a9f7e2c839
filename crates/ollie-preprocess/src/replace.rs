//! Pass 2 of the macro preprocessor: replaces macro calls with their
//! (recursively expanded) bodies. Spec.md section 4.2, pass 2.

use ollie_core::OllieError;
use ollie_lex::{Constant, LexItem, TokenKind};

use crate::macro_table::MacroTable;

/// Upper bound on macro expansion nesting. A macro whose body calls
/// itself, directly or through another macro, would otherwise recurse
/// forever; this (plus the `stack` self-reference check below) is the
/// cycle guard spec.md section 4.2 calls for.
const MAX_EXPANSION_DEPTH: usize = 64;

/// Produces a fresh token sequence with every macro call expanded.
/// `tokens` is the post-pass-1 stream: definition regions are still
/// present but marked `ignore`, so they are dropped here rather than
/// re-registered.
pub fn replace_macros(tokens: &[LexItem], macros: &MacroTable) -> (Vec<LexItem>, Vec<OllieError>) {
  let mut errors = Vec::new();
  let live: Vec<LexItem> = tokens.iter().filter(|t| !t.ignore).cloned().collect();
  let mut stack: Vec<String> = Vec::new();
  let out = expand_sequence(&live, macros, &mut stack, &mut errors);
  (out, errors)
}

fn expand_sequence(
  tokens: &[LexItem],
  macros: &MacroTable,
  stack: &mut Vec<String>,
  errors: &mut Vec<OllieError>,
) -> Vec<LexItem> {
  let mut out = Vec::with_capacity(tokens.len());
  let mut i = 0;

  while i < tokens.len() {
    let tok = &tokens[i];
    let Some(record) = (if tok.kind == TokenKind::Ident { macros.lookup(&tok.lexeme) } else { None }) else {
      out.push(tok.clone());
      i += 1;
      continue;
    };

    if stack.len() >= MAX_EXPANSION_DEPTH || stack.iter().any(|n| n == &tok.lexeme) {
      errors.push(OllieError::Preprocessor {
        line: tok.line_num,
        msg: format!("macro '{}' expands itself; expansion aborted", tok.lexeme),
      });
      out.push(tok.clone());
      i += 1;
      continue;
    }

    let has_call_parens = matches!(tokens.get(i + 1), Some(t) if t.kind == TokenKind::LParen);
    if record.parameters.is_empty() && !has_call_parens {
      // Parameterless macro referenced bare, e.g. `TEN` rather than `TEN()`.
      stack.push(tok.lexeme.clone());
      let expanded_body = expand_sequence(&record.body_tokens, macros, stack, errors);
      stack.pop();
      out.extend(expanded_body);
      i += 1;
      continue;
    }

    if !has_call_parens {
      errors.push(OllieError::Preprocessor {
        line: tok.line_num,
        msg: format!("macro '{}' expects {} argument(s)", tok.lexeme, record.parameters.len()),
      });
      out.push(tok.clone());
      i += 1;
      continue;
    }

    let (args, after) = split_call_arguments(tokens, i + 1);
    if args.len() != record.parameters.len() {
      errors.push(OllieError::Preprocessor {
        line: tok.line_num,
        msg: format!(
          "macro '{}' called with {} argument(s), expected {}",
          tok.lexeme,
          args.len(),
          record.parameters.len()
        ),
      });
      out.push(tok.clone());
      i += 1;
      continue;
    }

    stack.push(tok.lexeme.clone());
    let expanded_args: Vec<Vec<LexItem>> =
      args.into_iter().map(|arg| expand_sequence(&arg, macros, stack, errors)).collect();

    let mut substituted = Vec::with_capacity(record.body_tokens.len());
    for body_tok in &record.body_tokens {
      if body_tok.kind == TokenKind::MacroParam {
        let ordinal = match &body_tok.constants {
          Some(Constant::MacroParamOrdinal(n)) => *n,
          _ => 0,
        };
        if let Some(replacement) = expanded_args.get(ordinal) {
          out.extend(replacement.iter().cloned());
          continue;
        }
      }
      substituted.push(body_tok.clone());
    }
    // Re-run expansion over the substituted body so a macro call inside
    // another macro's body (but not a self-call, caught above) still
    // expands.
    let expanded_body = expand_sequence(&substituted, macros, stack, errors);
    stack.pop();
    out.extend(expanded_body);

    i = after;
  }

  out
}

/// Splits the argument list of a call starting at `open_idx` (the index
/// of the call's opening `(`) on top-level commas, honoring nested
/// parens/brackets/braces so `FOO(bar(1, 2), 3)` yields two arguments.
/// Returns the parsed arguments and the index just past the matching
/// close.
fn split_call_arguments(tokens: &[LexItem], open_idx: usize) -> (Vec<Vec<LexItem>>, usize) {
  let mut depth = 0i32;
  let mut i = open_idx;
  let mut args: Vec<Vec<LexItem>> = Vec::new();
  let mut current: Vec<LexItem> = Vec::new();

  while i < tokens.len() {
    let tok = &tokens[i];
    match tok.kind {
      TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
        depth += 1;
        if depth > 1 {
          current.push(tok.clone());
        }
      }
      TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
        depth -= 1;
        if depth == 0 {
          i += 1;
          break;
        }
        current.push(tok.clone());
      }
      TokenKind::Comma if depth == 1 => {
        args.push(std::mem::take(&mut current));
        i += 1;
        continue;
      }
      _ => current.push(tok.clone()),
    }
    i += 1;
  }

  if !current.is_empty() || !args.is_empty() {
    args.push(current);
  }

  (args, i)
}
