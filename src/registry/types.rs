//! Static metadata describing instrumented code.

use serde::{Deserialize, Serialize};

use crate::cdg::{ControlDependenceGraph, NodeId};

/// Unique identifier of an analyzed unit (function, method, module body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeObjectId(pub usize);

/// Unique identifier of a branch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredicateId(pub usize);

/// Unique identifier of a registered (unit, line) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(pub usize);

/// Static description of one analyzed unit.
///
/// `parent` points at the lexically enclosing unit. A unit's parent is
/// entered in a trace at or before any entry of the unit itself, which makes
/// the parent chain the anchor for approach-level computation.
#[derive(Debug, Clone)]
pub struct CodeObjectMeta {
    /// Human-readable name (function or module path).
    pub name: String,
    /// Lexically enclosing unit, `None` for module roots.
    pub parent: Option<CodeObjectId>,
    /// Control-dependence graph of the unit body.
    pub cdg: ControlDependenceGraph,
}

/// Static description of one branch point.
#[derive(Debug, Clone)]
pub struct PredicateMeta {
    /// Unit the predicate belongs to.
    pub code_object: CodeObjectId,
    /// CDG node of the predicate within the owning unit.
    pub node: NodeId,
    /// Source line of the branch condition.
    pub line: u32,
}

/// Static identity of a known source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMeta {
    /// Unit the line belongs to.
    pub code_object: CodeObjectId,
    /// 1-indexed source line.
    pub line: u32,
}
