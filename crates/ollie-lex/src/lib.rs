//! Token stream, grouping stack, and lexer for the Ollie front end.
//!
//! This crate covers spec.md section 4.1 plus the lexer contract of
//! section 6. It has no dependency on the parser or preprocessor crates —
//! it is the leaf of the dependency graph (see spec.md section 2's
//! dependency table), mirroring how `radlr_rust_runtime` sits underneath
//! `radlr_core` in the teacher workspace.

mod grouping;
mod lexer;
mod stream;
mod token;

pub use grouping::{GroupingError, GroupingStack};
pub use lexer::Lexer;
pub use stream::TokenStream;
pub use token::{Constant, LexItem, TokenKind};

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn tokenizes_simple_function() {
    let stream = Lexer::tokenize("func main() -> s_int32 { ret 0; }").unwrap();
    let kinds: Vec<_> = stream.as_slice().iter().map(|t| t.kind).collect();
    use TokenKind::*;
    assert_eq!(
      kinds,
      vec![Func, Ident, LParen, RParen, Arrow, Ident, LBrace, Ret, IntConst, Semicolon, RBrace, Done]
    );
  }

  #[test]
  fn decodes_integer_literal() {
    let stream = Lexer::tokenize("42").unwrap();
    let tok = stream.get(0).unwrap();
    assert_eq!(tok.constants, Some(Constant::I32(42)));
  }

  #[test]
  fn recognizes_macro_keywords_and_label_idents() {
    let stream = Lexer::tokenize("$macro INC(x) x+1 $endmacro $loop:").unwrap();
    let kinds: Vec<_> = stream.as_slice().iter().map(|t| t.kind).collect();
    use TokenKind::*;
    assert_eq!(kinds[0], Macro);
    assert!(kinds.contains(&EndMacro));
    assert!(kinds.contains(&LabelIdent));
  }

  #[test]
  fn grouping_stack_detects_mismatch() {
    let mut gs = GroupingStack::new();
    gs.push(LexItem::new(TokenKind::LParen, "(", 1));
    let err = gs.pop_matching(TokenKind::LBracket).unwrap_err();
    assert!(matches!(err, GroupingError::Mismatched { .. }));
  }

  #[test]
  fn token_stream_skips_ignored_tokens() {
    let mut stream = TokenStream::new(vec![
      LexItem { ignore: true, ..LexItem::new(TokenKind::Ident, "hidden", 1) },
      LexItem::new(TokenKind::Ident, "visible", 2),
    ]);
    let mut line = 0;
    let tok = stream.next(&mut line);
    assert_eq!(tok.lexeme, "visible");
    assert_eq!(line, 2);
  }

  #[test]
  fn token_stream_push_back_is_replayed() {
    let mut stream = TokenStream::new(vec![LexItem::new(TokenKind::Ident, "a", 1)]);
    let mut line = 0;
    let first = stream.next(&mut line);
    stream.push_back(first.clone());
    let replayed = stream.next(&mut line);
    assert_eq!(first, replayed);
  }
}
