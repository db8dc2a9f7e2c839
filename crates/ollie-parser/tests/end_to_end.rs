//! Black-box pipeline scenarios exercising the parser's public surface
//! only (`parse_program` over a fresh `ParseContext`), one per concrete
//! scenario named in spec.md section 8.

use ollie_core::ParseContext;
use ollie_lex::Lexer;
use ollie_parser::parse_program;

fn run(src: &str) -> ParseContext {
  let stream = Lexer::tokenize(src).expect("lexing should not fail for these fixtures");
  let mut ctx = ParseContext::new(stream);
  parse_program(&mut ctx);
  ctx
}

#[test]
fn main_function_is_recorded_with_its_return_type_and_body() {
  let ctx = run("func main() -> s_int32 { ret 0; }");
  assert!(!ctx.diagnostics.has_errors());
  assert!(ctx.diagnostics.found_main_function);

  let main_fn = ctx.functions.lookup("main").expect("main should be registered");
  assert_eq!(ctx.types.canonical_name(main_fn.return_type), "s_int32");
  let entry = main_fn.entrance_block.expect("main should have an entrance block");
  assert_eq!(ctx.cfg.block(entry).statements.len(), 1);
}

#[test]
fn top_level_redeclaration_is_rejected() {
  let ctx = run("declare s_int32 x; declare s_int32 x;");
  assert!(ctx.diagnostics.num_errors >= 1);
}

#[test]
fn alias_of_a_struct_dealiases_to_the_struct() {
  let ctx = run("define construct Foo { s_int32 a; s_int32 b; } as Bar; declare Bar b;");
  assert!(!ctx.diagnostics.has_errors(), "{:?}", ctx.diagnostics);

  let foo = ctx.types.lookup_any_scope("struct Foo").expect("struct Foo should be registered");
  let bar = ctx.types.lookup_any_scope("Bar").expect("Bar should resolve without the elaborated 'struct' keyword");
  assert_eq!(ctx.types.dealias(bar), foo);
}

#[test]
fn macro_expansion_feeds_the_parser_an_initialized_variable() {
  let source = "$macro INC(x) x+1 $endmacro let s_int32 y := INC(5);";
  let tokens = Lexer::tokenize(source).unwrap();
  let (expanded, _macros, preprocess_errors) = ollie_preprocess::preprocess(tokens);
  assert!(preprocess_errors.is_empty());

  let mut ctx = ParseContext::new(expanded);
  parse_program(&mut ctx);
  assert!(!ctx.diagnostics.has_errors(), "{:?}", ctx.diagnostics);
}

#[test]
fn call_with_wrong_argument_count_is_an_arity_error() {
  let ctx = run("func f(s_int32 a) -> s_int32 { ret a; } func main() -> s_int32 { ret @f(1, 2); }");
  assert!(ctx.diagnostics.has_errors());
}

#[test]
fn alias_redefinition_is_rejected() {
  let ctx = run("alias s_int32 as MyInt; alias s_int32 as MyInt;");
  assert!(ctx.diagnostics.num_errors >= 1);
}

#[test]
fn switch_on_a_parenthesized_expression_wires_one_block_per_arm() {
  let ctx = run("func f(s_int32 a) -> s_int32 { switch on (a) { case 1: ret 1; default: ret 0; } }");
  assert!(!ctx.diagnostics.has_errors(), "{:?}", ctx.diagnostics);
  assert!(ctx.grouping.is_empty());
}

#[test]
fn for_loop_with_a_body_produces_a_back_edge_to_its_header() {
  let ctx = run("func f() -> s_int32 { for (declare s_int32 i; i; i) { ret i; } ret 0; }");
  assert!(!ctx.diagnostics.has_errors(), "{:?}", ctx.diagnostics);
  let f = ctx.functions.lookup("f").unwrap();
  let entry = f.entrance_block.unwrap();
  let reachable = ctx.cfg.reachable_from(entry);
  assert!(reachable.len() >= 3, "expected at least entry, header, and body blocks");
}
