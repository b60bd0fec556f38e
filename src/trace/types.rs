//! Execution trace type definitions.
//!
//! One [`ExecutionTrace`] is produced per test-case execution by the
//! instrumentation collaborator and handed to the analysis engines as an
//! immutable snapshot.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::cdg::NodeId;
use crate::registry::{CodeObjectId, PredicateId};

/// Identifier of a runtime value observed by the tracer.
///
/// The tracer assigns stable names across frames: a callee's receiver is
/// recorded under the same identifier as the caller's object variable, so a
/// mutation inside a method is visible to slices over the caller's variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueRef {
    /// A named variable binding.
    Variable(String),
    /// An attribute of an object, identified by the object's variable name.
    Attribute { object: String, attribute: String },
}

impl ValueRef {
    /// Shorthand for a variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Shorthand for an attribute reference.
    pub fn attribute(object: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::Attribute {
            object: object.into(),
            attribute: attribute.into(),
        }
    }
}

/// Operation category of an executed instruction.
///
/// Closed variant: the slicing engine matches every arm explicitly, so a new
/// category added here fails to compile until it gets a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Read of a value. Never extends a slice on its own; loads feeding a
    /// definition are recorded as that definition's `uses`.
    Load { source: ValueRef },
    /// Definition of `target` from the values in `uses`.
    Store { target: ValueRef, uses: Vec<ValueRef> },
    /// Read of an object attribute.
    AttributeLoad { object: String, attribute: String },
    /// Mutation of an object attribute. Defines both the attribute and the
    /// object's identity: later uses of the object observe the mutation.
    AttributeStore {
        object: String,
        attribute: String,
        uses: Vec<ValueRef>,
    },
    /// Completed call. Recorded when the callee frame returns, so in trace
    /// order the callee's instructions precede the call record.
    Call {
        /// Instrumented callee unit, if the call target was traced.
        callee: Option<CodeObjectId>,
        /// Binding of the produced value, `None` for discarded results.
        result: Option<ValueRef>,
        /// Argument bindings, receiver first for method calls.
        arguments: Vec<ValueRef>,
    },
    /// Return from the current unit. `value: None` marks the implicit
    /// "return none" synthesized for unit bodies without an explicit return.
    Return { value: Option<ValueRef> },
    /// Evaluation of a branch predicate.
    Branch {
        predicate: PredicateId,
        uses: Vec<ValueRef>,
    },
    /// Unconditional jump; carries no dependencies.
    Jump,
    /// Exception raise.
    Raise { value: Option<ValueRef> },
}

/// One executed operation. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Global trace position (monotonic sequence number).
    pub position: usize,
    /// Unit the instruction belongs to.
    pub code_object: CodeObjectId,
    /// CDG node of the instruction's basic block within the owning unit.
    pub node: NodeId,
    /// 1-indexed source line.
    pub line: u32,
    /// Operation category and operands.
    pub kind: InstructionKind,
}

/// Branch distances observed at one evaluation of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistancePair {
    /// How far the evaluation was from taking the true branch; 0.0 iff taken.
    pub true_distance: f64,
    /// How far the evaluation was from taking the false branch; 0.0 iff taken.
    pub false_distance: f64,
}

/// Ordered record of one execution.
///
/// Append-only while the tracer records; read-only once handed to the
/// analysis engines, and then safely shareable across concurrent queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionTrace {
    /// Executed instructions in execution order.
    pub instructions: Vec<Instruction>,
    /// Units entered, in entry order (first entry only).
    pub executed_code_objects: Vec<CodeObjectId>,
    /// Branch-distance observations per evaluated predicate.
    pub predicate_distances: FxHashMap<PredicateId, Vec<DistancePair>>,
}

/// Result of executing one test case.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// The recorded trace.
    pub execution_trace: ExecutionTrace,
    /// Per test-case statement, the trace position one past the statement's
    /// last recorded instruction. Recorded by the executor's observer; used
    /// as slicing criterion positions.
    pub statement_positions: Vec<usize>,
    /// Index of the last test-case statement that completed, `None` when the
    /// very first statement raised. Only set for failing executions.
    pub last_executed_statement: Option<usize>,
    /// Whether the execution ended with an uncaught error.
    pub raised: bool,
}

impl ExecutionTrace {
    /// Record an instruction, assigning the next trace position.
    pub fn record(&mut self, mut instruction: Instruction) -> usize {
        let position = self.instructions.len();
        instruction.position = position;
        if !self.executed_code_objects.contains(&instruction.code_object) {
            self.executed_code_objects.push(instruction.code_object);
        }
        self.instructions.push(instruction);
        position
    }

    /// Record one evaluation of a predicate.
    pub fn record_predicate(&mut self, predicate: PredicateId, distances: DistancePair) {
        self.predicate_distances
            .entry(predicate)
            .or_default()
            .push(distances);
    }

    /// Whether the unit was entered during this execution.
    #[inline]
    pub fn entered(&self, code_object: CodeObjectId) -> bool {
        self.executed_code_objects.contains(&code_object)
    }

    /// Whether the predicate was evaluated at least once.
    #[inline]
    pub fn evaluated(&self, predicate: PredicateId) -> bool {
        self.predicate_distances.contains_key(&predicate)
    }

    /// Distinct units entered.
    pub fn entered_set(&self) -> FxHashSet<CodeObjectId> {
        self.executed_code_objects.iter().copied().collect()
    }

    /// Number of recorded instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the trace recorded nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
