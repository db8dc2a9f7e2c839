//! Pass 1 of the macro preprocessor: consumes `$macro ... $endmacro`
//! regions, registering each into a `MacroTable` and marking every token
//! in the region `ignore = true` so pass 2 (and the parser, if a caller
//! skips straight past preprocessing) never sees them. Spec.md section
//! 4.2, pass 1.

use ollie_core::OllieError;
use ollie_lex::{LexItem, TokenKind};

use crate::macro_table::{MacroRecord, MacroTable};

/// Runs pass 1 over `tokens` in place, marking consumed regions
/// `ignore = true` and collecting macro definitions into a fresh
/// `MacroTable`. The first error of any kind aborts the pass outright
/// (spec.md section 4.2's failure semantics): no definition appearing
/// after a malformed one is ever registered.
pub fn consume_macros(tokens: &mut [LexItem]) -> (MacroTable, Vec<OllieError>) {
  let mut table = MacroTable::new();
  let mut errors = Vec::new();
  let mut i = 0;

  while i < tokens.len() {
    match tokens[i].kind {
      TokenKind::Macro => match consume_one_macro(tokens, i) {
        Ok((record, end_idx)) => {
          let name = record.name.clone();
          let line = record.line_number;
          if let Err(existing) = table.insert(record) {
            errors.push(OllieError::Preprocessor {
              line,
              msg: format!("macro '{name}' is already defined at line {}", existing.line_number),
            });
            break;
          }
          i = end_idx + 1;
        }
        Err(err) => {
          errors.push(err);
          break;
        }
      },
      TokenKind::EndMacro => {
        errors.push(OllieError::Preprocessor {
          line: tokens[i].line_num,
          msg: "'$endmacro' has no matching '$macro'".into(),
        });
        break;
      }
      _ => i += 1,
    }
  }

  (table, errors)
}

/// Consumes a single `$macro ... $endmacro` region starting at `start`
/// (the index of the `$macro` token itself). On success, returns the
/// built record and the index of the terminating `$endmacro`.
fn consume_one_macro(tokens: &mut [LexItem], start: usize) -> Result<(MacroRecord, usize), OllieError> {
  let line = tokens[start].line_num;
  tokens[start].ignore = true;
  let mut i = start + 1;

  let name = match tokens.get(i) {
    Some(tok) if tok.kind == TokenKind::Ident => tok.lexeme.clone(),
    _ => return Err(OllieError::Preprocessor { line, msg: "expected a macro name after '$macro'".into() }),
  };
  tokens[i].ignore = true;
  i += 1;

  let mut parameters: Vec<LexItem> = Vec::new();
  if matches!(tokens.get(i), Some(tok) if tok.kind == TokenKind::LParen) {
    tokens[i].ignore = true;
    i += 1;
    loop {
      match tokens.get(i).cloned() {
        Some(tok) if tok.kind == TokenKind::Ident => {
          if parameters.iter().any(|p| p.lexeme == tok.lexeme) {
            return Err(OllieError::Preprocessor {
              line,
              msg: format!("duplicate parameter name '{}' in macro '{name}'", tok.lexeme),
            });
          }
          parameters.push(tok.clone());
          tokens[i].ignore = true;
          i += 1;
          match tokens.get(i).map(|t| t.kind) {
            Some(TokenKind::Comma) => {
              tokens[i].ignore = true;
              i += 1;
            }
            Some(TokenKind::RParen) => {
              tokens[i].ignore = true;
              i += 1;
              break;
            }
            _ => {
              return Err(OllieError::Preprocessor {
                line,
                msg: format!("expected ',' or ')' in parameter list of macro '{name}'"),
              })
            }
          }
        }
        Some(tok) if tok.kind == TokenKind::RParen => {
          tokens[i].ignore = true;
          i += 1;
          break;
        }
        _ => return Err(OllieError::Preprocessor { line, msg: format!("malformed parameter list for macro '{name}'") }),
      }
    }
  }

  let body_start = i;
  while i < tokens.len() && tokens[i].kind != TokenKind::EndMacro {
    if tokens[i].kind == TokenKind::Macro {
      return Err(OllieError::Preprocessor {
        line: tokens[i].line_num,
        msg: "nested '$macro' definitions are not allowed".into(),
      });
    }
    i += 1;
  }

  if i >= tokens.len() {
    return Err(OllieError::Preprocessor { line, msg: format!("macro '{name}' is missing a terminating '$endmacro'") });
  }

  if i == body_start {
    return Err(OllieError::Preprocessor { line, msg: format!("macro '{name}' has an empty body") });
  }

  let mut body_tokens: Vec<LexItem> = tokens[body_start..i].to_vec();
  for tok in body_tokens.iter_mut() {
    if tok.kind == TokenKind::Ident {
      if let Some(ordinal) = parameters.iter().position(|p| p.lexeme == tok.lexeme) {
        *tok = tok.clone().into_macro_param(ordinal);
      }
    }
  }
  for tok in tokens[body_start..i].iter_mut() {
    tok.ignore = true;
  }
  tokens[i].ignore = true; // the $endmacro token itself

  let total_token_count = body_tokens.len();
  Ok((MacroRecord { name, line_number: line, parameters, body_tokens, total_token_count }, i))
}
