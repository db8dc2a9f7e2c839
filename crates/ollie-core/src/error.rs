//! Hand-rolled error enum and result alias, grounded on `SherpaError`/
//! `RadlrResult` in `examples/acweathersby-radlr/source/lib/sherpa-core/types/error_types.rs`
//! and the `(category, code, slug)` id scheme used there. No `thiserror`/
//! `anyhow` — the teacher carries neither, and nothing about the front end
//! needs more than a flat enum with a `Display` impl.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum OllieError {
  /// Malformed token, unterminated literal, or similar scanning failure.
  Lexical { line: u32, msg: String },
  /// Macro definition or macro-call-site failure (spec.md section 4.2).
  Preprocessor { line: u32, msg: String },
  /// Grammar-level failure: unexpected token, missing terminator, unmatched
  /// delimiter.
  Syntax { line: u32, msg: String },
  /// Redefinition, undefined identifier/type/function, arity mismatch, or
  /// other checks spec.md section 7 classifies as semantic.
  Semantic { line: u32, msg: String, original_line: Option<u32> },
  /// Invariant violation; the front end cannot continue.
  Fatal { msg: String },
}

pub type OllieResult<T> = Result<T, OllieError>;

impl OllieError {
  pub fn line(&self) -> Option<u32> {
    match self {
      OllieError::Lexical { line, .. }
      | OllieError::Preprocessor { line, .. }
      | OllieError::Syntax { line, .. }
      | OllieError::Semantic { line, .. } => Some(*line),
      OllieError::Fatal { .. } => None,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      OllieError::Lexical { msg, .. }
      | OllieError::Preprocessor { msg, .. }
      | OllieError::Syntax { msg, .. }
      | OllieError::Semantic { msg, .. }
      | OllieError::Fatal { msg, .. } => msg,
    }
  }
}

impl fmt::Display for OllieError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OllieError::Lexical { line, msg } => write!(f, "[LINE {line}: PARSER ERROR]: {msg}"),
      OllieError::Preprocessor { line, msg } => {
        write!(f, "[FILE <input>] --> [LINE {line} | OLLIE PREPROCESSOR ERROR]: {msg}")
      }
      OllieError::Syntax { line, msg } => write!(f, "[LINE {line}: PARSER ERROR]: {msg}"),
      OllieError::Semantic { line, msg, original_line: Some(orig) } => {
        write!(f, "[LINE {line}: PARSER ERROR]: {msg} (originally defined at line {orig})")
      }
      OllieError::Semantic { line, msg, original_line: None } => write!(f, "[LINE {line}: PARSER ERROR]: {msg}"),
      OllieError::Fatal { msg } => write!(f, "[FATAL]: {msg}"),
    }
  }
}
