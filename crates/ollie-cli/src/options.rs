//! Compiler options surface (spec.md section 6). Grounded on the
//! builder-style flags struct in
//! `examples/acweathersby-radlr/crates/radlr-core/types/parser_config.rs`,
//! populated here from a `clap`-derived CLI struct instead of the
//! teacher's fluent builder methods, since the whole surface is a flat
//! set of flags with no dependent defaults to chain.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "olliec")]
#[command(about = "The Ollie front-end driver", long_about = None)]
pub struct Cli {
  /// Source file to compile.
  pub input_file: PathBuf,

  /// Destination for generated output. Defaults to the input file's stem
  /// with a `.out` extension.
  #[arg(short = 'o', long)]
  pub output_file: Option<PathBuf>,

  /// Print the AST/CFG intermediate representations as they are built.
  #[arg(long)]
  pub print_irs: bool,

  /// Report wall-clock time spent in each pipeline stage.
  #[arg(long)]
  pub time_execution: bool,

  /// Emit verbose per-token/per-node debug tracing.
  #[arg(long)]
  pub enable_debug_printing: bool,

  /// Continue past parsing into assembly generation. Out of scope for
  /// this front end (spec.md section 1's Non-goals); accepted so the
  /// option surface matches section 6 but rejected at runtime.
  #[arg(long)]
  pub go_to_assembly: bool,

  /// Print the diagnostic summary line after the run.
  #[arg(long, default_value_t = true)]
  pub show_summary: bool,
}

/// The resolved options struct passed to the driver, independent of how
/// it was populated (spec.md section 6: "The driver passes a struct
/// containing...").
#[derive(Debug, Clone)]
pub struct CompilerOptions {
  pub input_file: PathBuf,
  pub output_file: PathBuf,
  pub print_irs: bool,
  pub time_execution: bool,
  pub enable_debug_printing: bool,
  pub go_to_assembly: bool,
  pub show_summary: bool,
}

impl From<Cli> for CompilerOptions {
  fn from(cli: Cli) -> Self {
    let output_file = cli.output_file.unwrap_or_else(|| cli.input_file.with_extension("out"));
    Self {
      input_file: cli.input_file,
      output_file,
      print_irs: cli.print_irs,
      time_execution: cli.time_execution,
      enable_debug_printing: cli.enable_debug_printing,
      go_to_assembly: cli.go_to_assembly,
      show_summary: cli.show_summary,
    }
  }
}
