//! Control-flow graph of basic blocks, per spec.md section 3 and section
//! 4.6. Grounded on the graph-of-nodes-with-successor-edges shape in
//! `radlr-core/compile/states/build_graph/graph/mod.rs` (there, parser
//! states form a graph via `StagedNode`/`commit`; here, basic blocks form
//! a graph via `allocate_block`/`add_successor`), simplified to the
//! spec's flat block-and-edge model since the front end does not need the
//! teacher's staged-commit builder.

use crate::types::ast::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

impl BlockId {
  fn from_index(i: usize) -> Self {
    Self(i as u32)
  }
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
  Unidirectional,
  Bidirectional,
}

/// A top-level statement: a basic block's unit of linear work, wrapping
/// the root of an expression or declaration AST (spec.md section 3).
#[derive(Debug, Clone, Copy)]
pub struct TopLevelStmt {
  pub root: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct BasicBlock {
  pub id_raw: u32,
  pub statements: Vec<TopLevelStmt>,
  pub successors: Vec<BlockId>,
  pub predecessors: Vec<BlockId>,
  pub is_leader: bool,
  pub is_merged: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Cfg {
  blocks: Vec<BasicBlock>,
  pub root: Option<BlockId>,
}

impl Cfg {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty block with a fresh id.
  pub fn allocate_block(&mut self) -> BlockId {
    let id = BlockId::from_index(self.blocks.len());
    self.blocks.push(BasicBlock { id_raw: id.0, ..Default::default() });
    id
  }

  pub fn block(&self, id: BlockId) -> &BasicBlock {
    &self.blocks[id.index()]
  }

  pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
    &mut self.blocks[id.index()]
  }

  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  /// Appends a statement to `block`. Once a block has been linked as a
  /// predecessor of a complex-statement's entry block (i.e. it has become
  /// a leader), no further statements may be appended to it — the
  /// compound-statement driver allocates a fresh successor block instead
  /// (spec.md section 4.6).
  pub fn add_statement(&mut self, block: BlockId, stmt: TopLevelStmt) {
    debug_assert!(!self.blocks[block.index()].is_leader, "cannot append a statement to a leader block");
    self.blocks[block.index()].statements.push(stmt);
  }

  /// Records an edge from `from` to `to`. `Bidirectional` also records the
  /// back-reference on `to`'s predecessor list.
  pub fn add_successor(&mut self, from: BlockId, to: BlockId, direction: EdgeDirection) {
    self.blocks[from.index()].successors.push(to);
    if direction == EdgeDirection::Bidirectional {
      self.blocks[to.index()].predecessors.push(from);
    }
  }

  pub fn mark_leader(&mut self, id: BlockId) {
    self.blocks[id.index()].is_leader = true;
  }

  /// Returns a block equivalent to executing `a`'s statements then `b`'s.
  /// If either is empty, the non-empty one wins; otherwise `a`'s
  /// statements are extended with `b`'s and `a` takes on `b`'s successors
  /// (spec.md section 4.6).
  pub fn merge_blocks(&mut self, a: BlockId, b: BlockId) -> BlockId {
    if self.blocks[a.index()].statements.is_empty() {
      return b;
    }
    if self.blocks[b.index()].statements.is_empty() && self.blocks[b.index()].successors.is_empty() {
      return a;
    }
    let b_statements = std::mem::take(&mut self.blocks[b.index()].statements);
    let b_successors = std::mem::take(&mut self.blocks[b.index()].successors);
    self.blocks[a.index()].statements.extend(b_statements);
    self.blocks[a.index()].successors = b_successors;
    self.blocks[a.index()].is_merged = true;
    a
  }

  /// Returns the set of block ids reachable from `root`, for the
  /// "every block is reachable from the CFG root" invariant (spec.md
  /// section 3).
  pub fn reachable_from(&self, root: BlockId) -> std::collections::HashSet<BlockId> {
    let mut seen = std::collections::HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
      if seen.insert(id) {
        for succ in &self.blocks[id.index()].successors {
          stack.push(*succ);
        }
      }
    }
    seen
  }
}
