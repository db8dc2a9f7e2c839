//! Driver binary: lexer -> preprocessor -> parser -> diagnostic summary
//! (spec.md section 6). Grounded on the pipeline wiring in
//! `examples/acweathersby-radlr/crates/cli/bin.rs`'s `main`, which reads
//! a source file, runs it through the compiler, and maps the result to
//! a process exit code.

mod options;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use ollie_core::ParseContext;
use options::{Cli, CompilerOptions};

fn main() -> ExitCode {
  let cli = Cli::parse();
  let opts = CompilerOptions::from(cli);
  run(opts)
}

fn run(opts: CompilerOptions) -> ExitCode {
  if opts.go_to_assembly {
    eprintln!("olliec: --go-to-assembly is not supported; this build only runs the front end");
    return ExitCode::FAILURE;
  }

  let source = match std::fs::read_to_string(&opts.input_file) {
    Ok(s) => s,
    Err(e) => {
      eprintln!("olliec: could not read {}: {e}", opts.input_file.display());
      return ExitCode::FAILURE;
    }
  };

  let started = Instant::now();

  let tokens = match ollie_lex::Lexer::tokenize(&source) {
    Ok(stream) => stream,
    Err(msg) => {
      eprintln!("[LINE 0: PARSER ERROR]: {msg}");
      return ExitCode::FAILURE;
    }
  };

  let (expanded, _macros, preprocess_errors) = ollie_preprocess::preprocess(tokens);
  let had_preprocess_errors = !preprocess_errors.is_empty();
  for err in &preprocess_errors {
    println!("{err}");
  }

  let mut ctx = ParseContext::new(expanded);
  ollie_parser::parse_program(&mut ctx);

  if opts.print_irs {
    println!("--- {} basic block(s) in final CFG ---", ctx.cfg.len());
  }
  if opts.time_execution {
    println!("--- compiled in {:.3}ms ---", started.elapsed().as_secs_f64() * 1000.0);
  }
  if opts.show_summary {
    ctx.diagnostics.print_summary();
  }
  if opts.enable_debug_printing {
    println!("--- {ctx:?} ---", ctx = DebugCtx(&ctx));
  }

  if had_preprocess_errors || ctx.diagnostics.has_errors() {
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}

/// Narrow debug view so `--enable-debug-printing` doesn't require every
/// field of `ParseContext` (notably `TokenStream`) to implement `Debug`.
struct DebugCtx<'a>(&'a ParseContext);

impl std::fmt::Debug for DebugCtx<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ParseContext")
      .field("line", &self.0.line)
      .field("cfg_blocks", &self.0.cfg.len())
      .field("diagnostics", &self.0.diagnostics)
      .finish()
  }
}
