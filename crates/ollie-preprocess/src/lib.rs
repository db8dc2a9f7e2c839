//! The two-pass macro preprocessor: consumption (`consume_macros`) then
//! replacement (`replace_macros`), composed by `preprocess`. Spec.md
//! section 4.2.

mod consume;
mod macro_table;
mod replace;

pub use consume::consume_macros;
pub use macro_table::{MacroRecord, MacroTable};
pub use replace::replace_macros;

use ollie_core::OllieError;
use ollie_lex::TokenStream;

/// Runs both preprocessor passes over `stream`, returning a fresh
/// `TokenStream` with every macro call expanded, the macro table built
/// along the way (useful to a caller that wants to report unused macros
/// or similar), and every diagnostic either pass raised.
pub fn preprocess(stream: TokenStream) -> (TokenStream, MacroTable, Vec<OllieError>) {
  let mut tokens = stream.into_vec();
  let (table, mut errors) = consume_macros(&mut tokens);
  let (expanded, replace_errors) = replace_macros(&tokens, &table);
  errors.extend(replace_errors);
  (TokenStream::new(expanded), table, errors)
}

#[cfg(test)]
mod test {
  use super::*;
  use ollie_lex::{Lexer, TokenKind};

  fn lexemes(stream: &TokenStream) -> Vec<String> {
    stream.as_slice().iter().map(|t| t.lexeme.clone()).collect()
  }

  #[test]
  fn parameterless_macro_expands_at_call_site() {
    let src = "$macro TEN 10 $endmacro func main() -> s_int32 { ret TEN; }";
    let tokens = Lexer::tokenize(src).unwrap();
    let (expanded, _table, errors) = preprocess(tokens);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    let kinds: Vec<_> = expanded.as_slice().iter().map(|t| t.kind).collect();
    assert!(!kinds.contains(&TokenKind::Macro));
    assert!(!kinds.contains(&TokenKind::EndMacro));
    assert!(lexemes(&expanded).iter().any(|l| l == "10"));
    assert!(!lexemes(&expanded).iter().any(|l| l == "TEN"));
  }

  #[test]
  fn parameterized_macro_substitutes_arguments() {
    let src = "$macro ADD(a, b) a + b $endmacro func main() -> s_int32 { ret ADD(1, 2); }";
    let tokens = Lexer::tokenize(src).unwrap();
    let (expanded, _table, errors) = preprocess(tokens);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    let lex = lexemes(&expanded);
    // The call site is replaced by the substituted body `1 + 2`.
    assert!(lex.windows(3).any(|w| w == ["1", "+", "2"]));
    assert!(!lex.iter().any(|l| l == "ADD"));
  }

  #[test]
  fn macro_argument_containing_a_macro_call_is_expanded_recursively() {
    let src = "$macro TWO 2 $endmacro $macro SQ(x) x * x $endmacro func main() -> s_int32 { ret SQ(TWO); }";
    let tokens = Lexer::tokenize(src).unwrap();
    let (expanded, _table, errors) = preprocess(tokens);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    let lex = lexemes(&expanded);
    assert!(lex.windows(3).any(|w| w == ["2", "*", "2"]));
  }

  #[test]
  fn duplicate_macro_definition_is_rejected() {
    let src = "$macro ONE 1 $endmacro $macro ONE 2 $endmacro";
    let tokens = Lexer::tokenize(src).unwrap();
    let (_expanded, _table, errors) = preprocess(tokens);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], OllieError::Preprocessor { .. }));
  }

  #[test]
  fn unterminated_macro_is_reported() {
    let src = "$macro ONE 1 func main() -> s_int32 { ret 0; }";
    let tokens = Lexer::tokenize(src).unwrap();
    let (_expanded, table, errors) = preprocess(tokens);
    assert_eq!(errors.len(), 1);
    assert!(table.lookup("ONE").is_none());
  }

  #[test]
  fn empty_macro_body_is_rejected() {
    let src = "$macro ONE $endmacro";
    let tokens = Lexer::tokenize(src).unwrap();
    let (_expanded, _table, errors) = preprocess(tokens);
    assert_eq!(errors.len(), 1);
  }

  #[test]
  fn duplicate_parameter_name_is_rejected() {
    let src = "$macro ADD(a, a) a + a $endmacro";
    let tokens = Lexer::tokenize(src).unwrap();
    let (_expanded, _table, errors) = preprocess(tokens);
    assert_eq!(errors.len(), 1);
  }

  #[test]
  fn nested_macro_definition_is_rejected() {
    let src = "$macro OUTER $macro INNER 1 $endmacro $endmacro";
    let tokens = Lexer::tokenize(src).unwrap();
    let (_expanded, _table, errors) = preprocess(tokens);
    assert!(!errors.is_empty());
  }

  #[test]
  fn floating_endmacro_is_rejected() {
    let src = "func main() -> s_int32 { ret 0; } $endmacro";
    let tokens = Lexer::tokenize(src).unwrap();
    let (_expanded, _table, errors) = preprocess(tokens);
    assert_eq!(errors.len(), 1);
  }

  #[test]
  fn self_referencing_macro_is_caught_by_the_cycle_guard() {
    let src = "$macro LOOP LOOP $endmacro func main() -> s_int32 { ret LOOP; }";
    let tokens = Lexer::tokenize(src).unwrap();
    let (_expanded, _table, errors) = preprocess(tokens);
    assert!(errors.iter().any(|e| e.message().contains("expands itself")));
  }

  #[test]
  fn preprocessing_an_already_expanded_stream_is_a_no_op() {
    let src = "$macro TEN 10 $endmacro func main() -> s_int32 { ret TEN; }";
    let tokens = Lexer::tokenize(src).unwrap();
    let (expanded_once, _table, errors1) = preprocess(tokens);
    assert!(errors1.is_empty());
    let (expanded_twice, _table2, errors2) = preprocess(expanded_once.clone());
    assert!(errors2.is_empty());
    assert_eq!(lexemes(&expanded_once), lexemes(&expanded_twice));
  }
}
