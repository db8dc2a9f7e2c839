//! Diagnostic counters and stdout reporting, per spec.md section 3
//! ("Diagnostic counters") and section 6 ("Diagnostics"). Grounded on the
//! `Journal`/`Report` aggregator in
//! `examples/acweathersby-radlr/source/lib/sherpa-core/journal/mod.rs`,
//! trimmed to what the front end actually needs: no report-type registry,
//! just running counters and a `println!` sink, matching the teacher's own
//! `print_tokens`-style direct-to-stdout reporting rather than a logging
//! crate.

use crate::error::OllieError;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
  pub num_errors: u32,
  pub num_warnings: u32,
  pub lines_processed: u32,
  pub found_main_function: bool,
  /// The authoritative current source line, updated by every token fetch
  /// (spec.md section 3).
  pub parser_line_num: u32,
}

impl Diagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn report_error(&mut self, err: &OllieError) {
    self.num_errors += 1;
    println!("{err}");
  }

  pub fn report_warning(&mut self, line: u32, msg: &str) {
    self.num_warnings += 1;
    println!("[LINE {line}: PARSER WARNING]: {msg}");
  }

  pub fn report_info(&mut self, line: u32, msg: &str) {
    println!("[LINE {line}: PARSER INFO]: {msg}");
  }

  pub fn report_preprocessor_error(&mut self, file: &str, line: u32, msg: &str) {
    self.num_errors += 1;
    println!("[FILE {file}] --> [LINE {line} | OLLIE PREPROCESSOR ERROR]: {msg}");
  }

  pub fn has_errors(&self) -> bool {
    self.num_errors > 0
  }

  pub fn print_summary(&self) {
    println!(
      "--- summary: {} line(s) processed, {} error(s), {} warning(s), main {} ---",
      self.lines_processed,
      self.num_errors,
      self.num_warnings,
      if self.found_main_function { "found" } else { "not found" }
    );
  }
}
