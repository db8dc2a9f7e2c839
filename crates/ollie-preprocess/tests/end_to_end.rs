//! Black-box scenarios exercising only `ollie_preprocess::preprocess`'s
//! public surface, independent of the unit tests in `src/lib.rs` that
//! reach into the two passes separately.

use ollie_lex::Lexer;
use ollie_preprocess::preprocess;

fn lexemes(stream: &ollie_lex::TokenStream) -> Vec<String> {
  stream.as_slice().iter().map(|t| t.lexeme.clone()).collect()
}

#[test]
fn macro_defined_and_called_across_several_statements_expands_every_call_site() {
  let src = "\
    $macro SQUARE(x) x * x $endmacro \
    func main() -> s_int32 { \
      declare s_int32 a := SQUARE(3); \
      declare s_int32 b := SQUARE(4); \
      ret a + b; \
    }";
  let tokens = Lexer::tokenize(src).unwrap();
  let (expanded, table, errors) = preprocess(tokens);
  assert!(errors.is_empty(), "unexpected errors: {errors:?}");
  assert!(table.lookup("SQUARE").is_some());
  let lex = lexemes(&expanded);
  assert_eq!(lex.iter().filter(|l| l.as_str() == "SQUARE").count(), 0);
  assert_eq!(lex.windows(3).filter(|w| *w == ["3", "*", "3"]).count(), 1);
  assert_eq!(lex.windows(3).filter(|w| *w == ["4", "*", "4"]).count(), 1);
}

#[test]
fn macro_call_nested_two_levels_deep_is_fully_expanded() {
  let src = "\
    $macro ONE 1 $endmacro \
    $macro DOUBLE(x) x + x $endmacro \
    $macro QUAD(x) DOUBLE(DOUBLE(x)) $endmacro \
    func main() -> s_int32 { ret QUAD(ONE); }";
  let tokens = Lexer::tokenize(src).unwrap();
  let (expanded, _table, errors) = preprocess(tokens);
  assert!(errors.is_empty(), "unexpected errors: {errors:?}");
  let lex = lexemes(&expanded);
  assert!(!lex.iter().any(|l| l == "QUAD" || l == "DOUBLE" || l == "ONE"));
  assert_eq!(lex.iter().filter(|l| l.as_str() == "1").count(), 4);
}

#[test]
fn a_stream_with_no_macro_definitions_passes_through_unchanged() {
  let src = "func main() -> s_int32 { ret 0; }";
  let tokens = Lexer::tokenize(src).unwrap();
  let before = lexemes(&tokens);
  let (expanded, table, errors) = preprocess(tokens);
  assert!(errors.is_empty());
  assert!(table.lookup("main").is_none());
  assert_eq!(before, lexemes(&expanded));
}

#[test]
fn undefined_macro_call_is_left_untouched_and_reported_by_the_parser_as_an_unknown_identifier() {
  // The preprocessor only expands names it finds in the macro table; an
  // unrecognized call-like identifier is not its concern and is passed
  // through for the parser to reject.
  let src = "func main() -> s_int32 { ret MISSING(1); }";
  let tokens = Lexer::tokenize(src).unwrap();
  let (expanded, _table, errors) = preprocess(tokens);
  assert!(errors.is_empty());
  assert!(lexemes(&expanded).iter().any(|l| l == "MISSING"));
}
