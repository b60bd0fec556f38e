//! Control-dependence graph type definitions.
//!
//! Each analyzed unit (function, method, or module body) carries one
//! [`ControlDependenceGraph`]: a directed graph over basic-block nodes where
//! an edge `P --branch--> N` means "N executes only if the predicate at P
//! evaluates to `branch`". The graph is produced by the static analysis
//! collaborator and consumed read-only by the distance and slicing engines.

use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node within one unit's CDG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Role of a node in the control-dependence graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Artificial entry node; every unconditional top-level block hangs off it.
    Entry,
    /// Branch point. Outgoing edges carry `True`/`False` branch values.
    Predicate,
    /// Regular code block.
    #[default]
    Block,
    /// Artificial exit node.
    Exit,
}

/// Outcome of a predicate that an edge is conditioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchValue {
    /// Dependent executes when the predicate evaluates to true.
    True,
    /// Dependent executes when the predicate evaluates to false.
    False,
    /// Dependent executes whenever the source does (entry edges).
    Unconditional,
}

impl BranchValue {
    /// The branch value corresponding to a boolean predicate outcome.
    #[inline]
    pub fn from_outcome(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

/// A node in the control-dependence graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdgNode {
    /// Unique node identifier within the owning unit.
    pub id: NodeId,
    /// Role of the node.
    pub kind: NodeKind,
    /// Source lines covered by the node's block.
    pub lines: Vec<u32>,
}

/// A control-dependence edge: `to` executes only if the node at `from`
/// takes the `branch` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdgEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub branch: BranchValue,
}

/// Cached adjacency lists for O(1) dependent/controller lookups.
///
/// Built lazily on first access. Public only because it appears in
/// `ControlDependenceGraph`; an internal implementation detail.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyCache {
    /// NodeId -> nodes control-dependent on it (outgoing edges)
    pub(crate) dependents: FxHashMap<NodeId, Vec<NodeId>>,
    /// NodeId -> nodes it is control-dependent on (incoming edges)
    pub(crate) controllers: FxHashMap<NodeId, Vec<NodeId>>,
}

/// Per-unit control-dependence graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlDependenceGraph {
    /// All nodes, keyed by id.
    pub nodes: FxHashMap<NodeId, CdgNode>,
    /// Control-dependence edges.
    pub edges: Vec<CdgEdge>,
    /// Artificial entry node.
    pub entry: NodeId,
    /// Lazily built adjacency lists.
    #[serde(skip)]
    pub(crate) adjacency_cache: OnceCell<AdjacencyCache>,
}
