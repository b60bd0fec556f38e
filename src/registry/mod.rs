//! Static analysis registry.
//!
//! The instrumentation collaborator registers one [`CodeObjectMeta`] per
//! analyzed unit (function, method, or module body), one [`PredicateMeta`]
//! per branch point, and the known source lines of each unit. The distance
//! and slicing engines query this registry by id; lookups for unregistered
//! ids fail with explicit errors instead of defaulting.

pub mod types;

pub use types::{CodeObjectId, CodeObjectMeta, LineId, LineMeta, PredicateId, PredicateMeta};

use rustc_hash::FxHashMap;

use crate::error::{Result, TraceLensError};
use crate::trace::Instruction;

/// Registry of static metadata for all instrumented units.
///
/// Populated once by the instrumentation layer before any execution, then
/// treated as an immutable snapshot by the analysis engines.
#[derive(Debug, Default)]
pub struct SubjectRegistry {
    code_objects: FxHashMap<CodeObjectId, CodeObjectMeta>,
    predicates: FxHashMap<PredicateId, PredicateMeta>,
    lines: FxHashMap<LineId, LineMeta>,
    /// (unit, line) -> LineId reverse index for instruction lookups.
    line_index: FxHashMap<(CodeObjectId, u32), LineId>,
    /// (unit, CDG node) -> PredicateId reverse index for distance queries.
    predicate_index: FxHashMap<(CodeObjectId, crate::cdg::NodeId), PredicateId>,
    next_code_object: usize,
    next_predicate: usize,
    next_line: usize,
}

impl SubjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit and return its assigned id.
    pub fn register_code_object(&mut self, meta: CodeObjectMeta) -> CodeObjectId {
        let id = CodeObjectId(self.next_code_object);
        self.next_code_object += 1;
        self.code_objects.insert(id, meta);
        id
    }

    /// Register a predicate and return its assigned id.
    pub fn register_predicate(&mut self, meta: PredicateMeta) -> PredicateId {
        let id = PredicateId(self.next_predicate);
        self.next_predicate += 1;
        self.predicate_index.insert((meta.code_object, meta.node), id);
        self.predicates.insert(id, meta);
        id
    }

    /// The predicate registered at a unit's CDG node, if any.
    pub fn predicate_at(
        &self,
        code_object: CodeObjectId,
        node: crate::cdg::NodeId,
    ) -> Option<PredicateId> {
        self.predicate_index.get(&(code_object, node)).copied()
    }

    /// Register a known source line of a unit and return its assigned id.
    /// Re-registering the same (unit, line) pair returns the existing id.
    pub fn register_line(&mut self, code_object: CodeObjectId, line: u32) -> LineId {
        if let Some(&id) = self.line_index.get(&(code_object, line)) {
            return id;
        }
        let id = LineId(self.next_line);
        self.next_line += 1;
        self.lines.insert(id, LineMeta { code_object, line });
        self.line_index.insert((code_object, line), id);
        id
    }

    /// Look up unit metadata, failing for unregistered ids.
    pub fn code_object(&self, id: CodeObjectId) -> Result<&CodeObjectMeta> {
        self.code_objects
            .get(&id)
            .ok_or(TraceLensError::UnknownCodeObject(id))
    }

    /// Look up predicate metadata, failing for unregistered ids.
    pub fn predicate(&self, id: PredicateId) -> Result<&PredicateMeta> {
        self.predicates
            .get(&id)
            .ok_or(TraceLensError::UnknownPredicate(id))
    }

    /// Map an executed instruction back to its static line identity.
    ///
    /// Fails with [`TraceLensError::LineNotFound`] when the instruction's
    /// (unit, line) pair was never registered. A wrong line id would
    /// silently corrupt coverage reporting, so no default is returned.
    pub fn line_id_by_instruction(&self, instruction: &Instruction) -> Result<LineId> {
        self.line_index
            .get(&(instruction.code_object, instruction.line))
            .copied()
            .ok_or(TraceLensError::LineNotFound {
                code_object: instruction.code_object,
                line: instruction.line,
            })
    }

    /// Number of registered code objects.
    pub fn code_object_count(&self) -> usize {
        self.code_objects.len()
    }

    /// Number of registered predicates.
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Number of registered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
