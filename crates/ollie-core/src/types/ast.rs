//! Arena-owned AST nodes with first-child/next-sibling links, per spec.md
//! section 9's design note: "Raw child/sibling pointers -> arena + index."
//! Grounded on the newtype-index pattern in
//! `radlr-core/types/parser_db.rs` (`DBRuleKey`/`DBNonTermKey` indexing
//! `Array<T>`), and on the tag-dispatched-payload-to-sum-type design note
//! ("every AST node class -> switch on class -> cast to payload struct"
//! maps to an exhaustive sum type").

use crate::types::symbol::StorageClass;
use crate::types::type_system::TypeRef;
use ollie_lex::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
  fn from_index(i: usize) -> Self {
    Self(i as u32)
  }
  fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
  Or,
  And,
  BitOr,
  BitXor,
  BitAnd,
  Eq,
  Ne,
  Lt,
  Le,
  Gt,
  Ge,
  Shl,
  Shr,
  Add,
  Sub,
  Mul,
  Div,
  Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
  AddressOf,
  Deref,
  Plus,
  Neg,
  BitNot,
  Not,
  PreIncrement,
  PreDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
  PostIncrement,
  PostDecrement,
}

/// Per-class AST payload. One variant per grammar production named in
/// spec.md section 3; an exhaustive sum type replaces the source's
/// tag-and-cast pattern (spec.md section 9).
#[derive(Debug, Clone)]
pub enum AstKind {
  Identifier { name: String },
  Constant { token_kind: TokenKind, raw: String },
  BinaryExpr { op: BinOp },
  UnaryExpr { op: UnOp },
  PostfixUnaryExpr { op: PostfixOp },
  CastExpr { target: TypeRef },
  FunctionCall { callee: String },
  StructAccessor { member: String },
  ArrayAccessor,
  PointerMemberAccessor { member: String },
  AssignmentExpr,
  DeclStmt { name: String, storage_class: StorageClass },
  LetStmt { name: String, storage_class: StorageClass },
  LabelStmt { name: String },
  CaseStmt,
  DefaultStmt,
  ReturnStmt,
  BreakStmt,
  ContinueStmt,
  JumpStmt { label: String },
  IfStmt,
  WhileStmt,
  DoWhileStmt,
  ForStmt,
  SwitchStmt,
  TypeSpecifier { resolved: TypeRef },
  TypeName { name: String },
  TypeAddressSpecifier,
  ParameterList,
  ParameterDecl { name: String },
  StructMemberList,
  StructMember { name: String },
  EnumMemberList,
  EnumMember { name: String },
  /// Distinguished error marker. Every grammar function returns either a
  /// well-formed node or this, and a caller that receives it propagates
  /// it without emitting a further diagnostic (spec.md section 4.5's
  /// "Error node discipline").
  Error,
}

#[derive(Debug, Clone)]
pub struct AstNode {
  pub kind: AstKind,
  pub line: u32,
  pub ty: Option<TypeRef>,
  first_child: Option<NodeId>,
  next_sibling: Option<NodeId>,
}

/// Arena owning every AST node created during a front-end run. Nodes are
/// addressed by `NodeId` and never individually freed; the whole arena is
/// dropped at the end of the run (spec.md section 5's resource model).
#[derive(Debug, Clone, Default)]
pub struct AstArena {
  nodes: Vec<AstNode>,
}

impl AstArena {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn alloc(&mut self, kind: AstKind, line: u32) -> NodeId {
    self.nodes.push(AstNode { kind, line, ty: None, first_child: None, next_sibling: None });
    NodeId::from_index(self.nodes.len() - 1)
  }

  pub fn error_node(&mut self, line: u32) -> NodeId {
    self.alloc(AstKind::Error, line)
  }

  pub fn is_error(&self, id: NodeId) -> bool {
    matches!(self.get(id).kind, AstKind::Error)
  }

  pub fn get(&self, id: NodeId) -> &AstNode {
    &self.nodes[id.index()]
  }

  pub fn get_mut(&mut self, id: NodeId) -> &mut AstNode {
    &mut self.nodes[id.index()]
  }

  /// Appends `child` as the last child of `parent` in O(n) over the
  /// existing sibling chain, preserving grammar production order.
  pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
    match self.nodes[parent.index()].first_child {
      None => self.nodes[parent.index()].first_child = Some(child),
      Some(first) => {
        let mut last = first;
        while let Some(next) = self.nodes[last.index()].next_sibling {
          last = next;
        }
        self.nodes[last.index()].next_sibling = Some(child);
      }
    }
  }

  pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
    ChildIter { arena: self, next: self.nodes[parent.index()].first_child }
  }

  pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.index()].first_child
  }

  pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.index()].next_sibling
  }
}

pub struct ChildIter<'a> {
  arena: &'a AstArena,
  next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let current = self.next?;
    self.next = self.arena.next_sibling(current);
    Some(current)
  }
}
