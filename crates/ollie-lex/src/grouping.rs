//! LIFO of open delimiters for balance checking (spec.md section 4.1).

use crate::token::{LexItem, TokenKind};

/// Result of a mismatched or unmatched grouping-stack operation: the
/// caller turns this into a parser-reportable diagnostic rather than
/// panicking (spec.md section 4.1).
#[derive(Debug, Clone, PartialEq)]
pub enum GroupingError {
  /// Popped a closer that didn't match the opener on top of the stack.
  Mismatched { expected: TokenKind, opener: LexItem },
  /// Popped with nothing on the stack.
  Unmatched { closer_kind: TokenKind },
}

#[derive(Debug, Clone, Default)]
pub struct GroupingStack {
  stack: Vec<LexItem>,
}

impl GroupingStack {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, opener: LexItem) {
    self.stack.push(opener);
  }

  /// Pops the top opener unconditionally. `None` if the stack is empty.
  pub fn pop(&mut self) -> Option<LexItem> {
    self.stack.pop()
  }

  /// Pops the top opener and checks it matches `expected_opener_kind`
  /// (the `(`/`[`/`{` that should have produced the closer the caller
  /// just consumed). Used at every delimiter-consuming call site so a
  /// mismatch is reported instead of silently desyncing the stack.
  pub fn pop_matching(&mut self, expected_opener_kind: TokenKind) -> Result<LexItem, GroupingError> {
    match self.stack.pop() {
      Some(opener) if opener.kind == expected_opener_kind => Ok(opener),
      Some(opener) => Err(GroupingError::Mismatched { expected: expected_opener_kind, opener }),
      None => Err(GroupingError::Unmatched { closer_kind: expected_opener_kind }),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.stack.is_empty()
  }

  pub fn depth(&self) -> usize {
    self.stack.len()
  }
}
