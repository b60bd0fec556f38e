//! Lightweight test-case representation for the post-processing and
//! coverage consumers.
//!
//! Statements live in an arena and keep stable ids for their whole lifetime;
//! removal only tombstones an id. The post-processing passes walk the live
//! sequence backward while tombstoning, then [`TestCase::compact`] rebuilds
//! the arena once at the end, so no indices are invalidated mid-walk.

use fixedbitset::FixedBitSet;

/// Stable identifier of a statement within its test case's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementId(pub usize);

/// Kind of an executable test-case statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Literal value binding (int, float, string, bool, none, enum).
    Primitive,
    /// Collection literal (list, set, tuple, dict).
    Collection,
    /// Object construction.
    Constructor,
    /// Method call on a prior statement's value.
    MethodCall,
    /// Free function call.
    FunctionCall,
    /// Write to an object field. Not supported by post-processing yet.
    FieldWrite,
    /// Bare assignment between references. Not supported yet.
    Assignment,
}

/// One executable statement.
#[derive(Debug, Clone)]
pub struct Statement {
    /// Variable binding produced by the statement.
    pub ret_val: String,
    /// Variable bindings the statement reads (receiver first for calls).
    pub reads: Vec<String>,
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(kind: StatementKind, ret_val: impl Into<String>, reads: Vec<String>) -> Self {
        Self {
            ret_val: ret_val.into(),
            reads,
            kind,
        }
    }
}

/// Ordered sequence of statements with tombstoned removal.
#[derive(Debug, Clone, Default)]
pub struct TestCase {
    arena: Vec<Statement>,
    tombstones: FixedBitSet,
}

impl TestCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement, returning its stable id.
    pub fn push(&mut self, statement: Statement) -> StatementId {
        let id = StatementId(self.arena.len());
        self.arena.push(statement);
        self.tombstones.grow(self.arena.len());
        id
    }

    /// Access a statement by id. Tombstoned statements stay accessible
    /// until compaction.
    pub fn statement(&self, id: StatementId) -> &Statement {
        &self.arena[id.0]
    }

    /// Whether the statement is still live.
    pub fn is_live(&self, id: StatementId) -> bool {
        !self.tombstones.contains(id.0)
    }

    /// Ids of live statements in order.
    pub fn live_ids(&self) -> Vec<StatementId> {
        (0..self.arena.len())
            .filter(|&index| !self.tombstones.contains(index))
            .map(StatementId)
            .collect()
    }

    /// Live statements in order.
    pub fn statements(&self) -> impl Iterator<Item = (StatementId, &Statement)> {
        self.arena
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.tombstones.contains(*index))
            .map(|(index, statement)| (StatementId(index), statement))
    }

    /// Number of live statements.
    pub fn size(&self) -> usize {
        self.arena.len() - self.tombstones.count_ones(..)
    }

    /// Tombstone a statement.
    pub fn remove(&mut self, id: StatementId) {
        self.tombstones.insert(id.0);
    }

    /// Tombstone every live statement after arena position `position`.
    pub fn chop(&mut self, position: usize) {
        for index in (position + 1)..self.arena.len() {
            self.tombstones.insert(index);
        }
    }

    /// Drop tombstoned statements and rebuild the live sequence.
    ///
    /// Invalidates previously handed out ids; call once after a
    /// post-processing walk completes.
    pub fn compact(&mut self) {
        let mut live = Vec::with_capacity(self.size());
        for (index, statement) in self.arena.drain(..).enumerate() {
            if !self.tombstones.contains(index) {
                live.push(statement);
            }
        }
        self.arena = live;
        self.tombstones = FixedBitSet::with_capacity(self.arena.len());
    }
}
