//! Token kinds and the `LexItem` the lexer hands to the preprocessor and
//! parser. Grounded on the `DBTokenData`/`SymbolId` newtype-and-tag style in
//! `radlr-core/types/parser_db.rs`: a flat enum tag plus a side payload,
//! rather than per-kind structs.

use std::fmt;

/// The lexical kind of a token. Spec names ~120 concrete kinds (keywords,
/// operators, literals); we enumerate the ones the parser and preprocessor
/// actually discriminate on, keeping one variant per distinct grammar
/// symbol rather than collapsing operators into a generic `Punct(String)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  /// Synthetic token marking the start of a stream.
  Start,
  /// Synthetic token terminating every stream.
  Done,

  Ident,
  LabelIdent,
  IntConst,
  FloatConst,
  CharConst,
  StrConst,

  // Macro preprocessor tokens.
  Macro,
  EndMacro,
  MacroParam,

  // Keywords.
  Declare,
  Let,
  Const,
  Static,
  Register,
  External,
  Define,
  Struct,
  Construct,
  Union,
  Enum,
  As,
  Alias,
  Func,
  Ret,
  If,
  Then,
  Else,
  While,
  Do,
  For,
  Switch,
  On,
  Case,
  Default,
  Jump,
  Break,
  Continue,
  When,
  Typesize,

  // Delimiters.
  LParen,
  RParen,
  LBracket,
  RBracket,
  LBrace,
  RBrace,

  // Punctuation.
  Comma,
  Semicolon,
  Colon,
  Arrow,
  FatArrow,
  Assign,
  At,

  // Operators, ordered roughly by precedence level (low to high), matching
  // the ladder in spec.md section 4.5.
  PipePipe,
  AmpAmp,
  Pipe,
  Caret,
  Amp,
  EqEq,
  BangEq,
  Lt,
  LtEq,
  Gt,
  GtEq,
  LtLt,
  GtGt,
  Plus,
  Minus,
  Star,
  Slash,
  Percent,
  Tilde,
  Bang,
  PlusPlus,
  MinusMinus,

  /// Emitted by a grammar function on malformed input; never produced by
  /// the lexer itself.
  Error,
}

impl TokenKind {
  pub fn is_keyword(self) -> bool {
    use TokenKind::*;
    matches!(
      self,
      Declare
        | Let
        | Const
        | Static
        | Register
        | External
        | Define
        | Struct
        | Construct
        | Union
        | Enum
        | As
        | Alias
        | Func
        | Ret
        | If
        | Then
        | Else
        | While
        | Do
        | For
        | Switch
        | On
        | Case
        | Default
        | Jump
        | Break
        | Continue
        | When
        | Typesize
    )
  }
}

/// The decoded payload of a literal token, or the ordinal of a macro
/// parameter reference. Spec section 3 calls this `constants`.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
  I8(i8),
  I16(i16),
  I32(i32),
  I64(i64),
  U8(u8),
  U16(u16),
  U32(u32),
  U64(u64),
  F32(f32),
  F64(f64),
  Char(char),
  Str(String),
  /// Set only on tokens rewritten to `MACRO_PARAM` kind during macro
  /// consumption (spec.md section 4.2); the value is the parameter's
  /// ordinal position in the macro's parameter list.
  MacroParamOrdinal(usize),
}

/// A single lexical item. `ignore` is mutated in place by the preprocessor
/// (spec.md section 4.2, pass 1) and never by the lexer or parser.
#[derive(Debug, Clone, PartialEq)]
pub struct LexItem {
  pub kind: TokenKind,
  pub lexeme: String,
  pub line_num: u32,
  pub ignore: bool,
  pub constants: Option<Constant>,
}

impl LexItem {
  pub fn new(kind: TokenKind, lexeme: impl Into<String>, line_num: u32) -> Self {
    Self { kind, lexeme: lexeme.into(), line_num, ignore: false, constants: None }
  }

  pub fn with_constant(mut self, c: Constant) -> Self {
    self.constants = Some(c);
    self
  }

  pub fn done(line_num: u32) -> Self {
    Self::new(TokenKind::Done, "", line_num)
  }

  pub fn start() -> Self {
    Self::new(TokenKind::Start, "", 0)
  }

  /// Rewrites this token in place into a `MACRO_PARAM` reference, as
  /// required by spec.md section 4.2 when a macro body's identifier
  /// matches a declared parameter name.
  pub fn into_macro_param(mut self, ordinal: usize) -> Self {
    self.kind = TokenKind::MacroParam;
    self.constants = Some(Constant::MacroParamOrdinal(ordinal));
    self
  }
}

impl fmt::Display for LexItem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}({:?})@{}", self.kind, self.lexeme, self.line_num)
  }
}
