//! Control-dependence graph queries.
//!
//! The distance engine uses [`ControlDependenceGraph::dependence_distance`]
//! to count approach-level steps between predicates, and the slicing engine
//! uses the direct and transitive dependence queries to resolve control
//! dependencies of executed instructions.

pub mod types;

pub use types::{
    AdjacencyCache, BranchValue, CdgEdge, CdgNode, ControlDependenceGraph, NodeId, NodeKind,
};

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use rustc_hash::FxHashMap;

impl ControlDependenceGraph {
    /// Create a graph from nodes, edges and an entry node.
    pub fn new(nodes: Vec<CdgNode>, edges: Vec<CdgEdge>, entry: NodeId) -> Self {
        let nodes: FxHashMap<NodeId, CdgNode> =
            nodes.into_iter().map(|node| (node.id, node)).collect();
        Self {
            nodes,
            edges,
            entry,
            adjacency_cache: Default::default(),
        }
    }

    /// Look up a node by id.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&CdgNode> {
        self.nodes.get(&id)
    }

    fn adjacency(&self) -> &AdjacencyCache {
        self.adjacency_cache.get_or_init(|| {
            let mut cache = AdjacencyCache::default();
            for edge in &self.edges {
                cache.dependents.entry(edge.from).or_default().push(edge.to);
                cache.controllers.entry(edge.to).or_default().push(edge.from);
            }
            cache
        })
    }

    /// Nodes control-dependent on `id`.
    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        self.adjacency()
            .dependents
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nodes that `id` is control-dependent on.
    pub fn controllers(&self, id: NodeId) -> &[NodeId] {
        self.adjacency()
            .controllers
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The node reached when the predicate at `predicate` takes `branch`.
    pub fn successor(&self, predicate: NodeId, branch: BranchValue) -> Option<NodeId> {
        self.edges
            .iter()
            .find(|edge| edge.from == predicate && edge.branch == branch)
            .map(|edge| edge.to)
    }

    /// Whether `node` is directly control-dependent on `on`.
    pub fn is_control_dependent(&self, node: NodeId, on: NodeId) -> bool {
        self.controllers(node).contains(&on)
    }

    /// Whether `node` is control-dependent on `on` through any chain of
    /// control-dependence edges.
    pub fn is_transitively_control_dependent(&self, node: NodeId, on: NodeId) -> bool {
        self.walk_controllers(node, |controller| controller == on)
    }

    /// Walk the controller chain upward from `start` (excluding `start`
    /// itself), stopping when `found` returns true.
    fn walk_controllers(&self, start: NodeId, found: impl Fn(NodeId) -> bool) -> bool {
        let capacity = self.capacity();
        let mut visited = FixedBitSet::with_capacity(capacity);
        let mut frontier: Vec<NodeId> = self.controllers(start).to_vec();

        while let Some(current) = frontier.pop() {
            if visited.contains(current.0) {
                continue;
            }
            visited.insert(current.0);
            if found(current) {
                return true;
            }
            frontier.extend_from_slice(self.controllers(current));
        }
        false
    }

    /// Number of control-dependence edges between `from` and `to`, following
    /// dependence edges forward. `Some(0)` iff `from == to`, `None` if `to`
    /// is not reachable from `from`.
    pub fn dependence_distance(&self, from: NodeId, to: NodeId) -> Option<usize> {
        if from == to {
            return Some(0);
        }
        let capacity = self.capacity();
        let mut visited = FixedBitSet::with_capacity(capacity);
        let mut frontier = VecDeque::new();
        frontier.push_back((from, 0usize));
        visited.insert(from.0);

        while let Some((current, steps)) = frontier.pop_front() {
            for &next in self.dependents(current) {
                if next == to {
                    return Some(steps + 1);
                }
                if !visited.contains(next.0) {
                    visited.insert(next.0);
                    frontier.push_back((next, steps + 1));
                }
            }
        }
        None
    }

    /// Control-dependence depth of a node below the entry node.
    ///
    /// Nodes not reachable from the entry (malformed static data) report the
    /// full node count, which dominates any well-formed depth.
    pub fn depth(&self, node: NodeId) -> usize {
        self.dependence_distance(self.entry, node)
            .unwrap_or_else(|| self.nodes.len())
    }

    fn capacity(&self) -> usize {
        self.nodes
            .keys()
            .map(|id| id.0 + 1)
            .max()
            .unwrap_or_default()
    }
}
