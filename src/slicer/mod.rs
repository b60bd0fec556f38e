//! Dynamic backward slicing.
//!
//! Given a criterion (trace position + values of interest), the slicer walks
//! the executed instruction trace backward and grows the set of relevant
//! instructions to fixpoint, following:
//!
//! - **Data dependencies**: an instruction defining a value currently in the
//!   working set joins the slice; its operand reads join the working set.
//! - **Control dependencies**: a branch instruction joins the slice when an
//!   instruction already in the slice is control-dependent on it per the
//!   owning unit's CDG.
//! - **Call/return bindings**: a call producing a needed value defines it
//!   and consumes its arguments; the callee's explicit return joins the
//!   slice through a pending-return entry keyed by the callee unit.
//!   Synthesized "return none" instructions consume the pending entry
//!   without ever joining the slice, so void calls cannot inflate
//!   checked-coverage with phantom instructions.
//!
//! The walk is strictly backward over a fixed trace, so the output is
//! deterministic for a fixed trace and criterion.

pub mod types;

pub use types::{DynamicSlice, SliceMetrics, SlicingCriterion};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::error::{Result, TraceLensError};
use crate::registry::{CodeObjectId, SubjectRegistry};
use crate::trace::{ExecutionTrace, Instruction, InstructionKind, ValueRef};

/// Backward slicer over one execution trace.
///
/// Borrows the trace and registry immutably; every [`compute_slice`] call
/// owns its working state, so one slicer may serve concurrent queries.
///
/// [`compute_slice`]: DynamicSlicer::compute_slice
pub struct DynamicSlicer<'a> {
    trace: &'a ExecutionTrace,
    registry: &'a SubjectRegistry,
}

/// Mutable state of one backward walk.
struct SliceState {
    /// Values whose origin is still unexplained.
    needed: FxHashSet<ValueRef>,
    /// Callee units whose return binding is awaited, with multiplicity.
    pending_returns: FxHashMap<CodeObjectId, usize>,
    /// Relevant trace positions.
    result: FxHashSet<usize>,
    /// Call records already passed by the walk, newest first, per callee.
    visited_calls: FxHashMap<CodeObjectId, Vec<usize>>,
    metrics: SliceMetrics,
}

impl SliceState {
    fn new(criterion: &SlicingCriterion) -> Self {
        Self {
            needed: criterion.values.clone(),
            pending_returns: FxHashMap::default(),
            result: FxHashSet::default(),
            visited_calls: FxHashMap::default(),
            metrics: SliceMetrics::default(),
        }
    }
}

impl<'a> DynamicSlicer<'a> {
    pub fn new(trace: &'a ExecutionTrace, registry: &'a SubjectRegistry) -> Self {
        Self { trace, registry }
    }

    /// Compute the backward slice for a criterion.
    ///
    /// Fails with `InvalidArgument` when the criterion position lies past
    /// the end of the trace, and propagates registry lookup failures for
    /// predicates or units referenced by executed instructions.
    pub fn compute_slice(&self, criterion: &SlicingCriterion) -> Result<DynamicSlice> {
        if criterion.position > self.trace.len() {
            return Err(TraceLensError::InvalidArgument(format!(
                "criterion position {} past end of trace ({} instructions)",
                criterion.position,
                self.trace.len()
            )));
        }

        let mut state = SliceState::new(criterion);
        for index in (0..criterion.position).rev() {
            let instruction = &self.trace.instructions[index];
            state.metrics.instructions_visited += 1;
            self.visit(index, instruction, &mut state)?;
        }

        let mut positions: Vec<usize> = state.result.into_iter().collect();
        positions.sort_unstable();
        debug!(
            criterion = criterion.position,
            slice_size = positions.len(),
            unresolved = state.needed.len(),
            "computed dynamic slice"
        );
        Ok(DynamicSlice {
            criterion_position: criterion.position,
            positions,
            unresolved: state.needed,
            metrics: state.metrics,
        })
    }

    /// One handler per instruction category. No default arm: a new category
    /// must be given explicit semantics here before the crate compiles.
    fn visit(&self, index: usize, instruction: &Instruction, state: &mut SliceState) -> Result<()> {
        match &instruction.kind {
            InstructionKind::Store { target, uses } => {
                if state.needed.remove(target) {
                    state.metrics.data_dependencies += 1;
                    state.needed.extend(uses.iter().cloned());
                    self.add_to_result(index, instruction, state);
                }
            }
            InstructionKind::AttributeStore {
                object,
                attribute,
                uses,
            } => {
                let attribute_ref = ValueRef::attribute(object.clone(), attribute.clone());
                let object_ref = ValueRef::variable(object.clone());
                let defines_attribute = state.needed.remove(&attribute_ref);
                // A mutation is a definition of the object's identity:
                // later uses of the object observe it.
                let mutates_needed_object = state.needed.contains(&object_ref);
                if defines_attribute || mutates_needed_object {
                    state.metrics.data_dependencies += 1;
                    state.needed.insert(object_ref);
                    state.needed.extend(uses.iter().cloned());
                    self.add_to_result(index, instruction, state);
                }
            }
            InstructionKind::Call {
                callee,
                result,
                arguments,
            } => {
                let produced_needed = result
                    .as_ref()
                    .is_some_and(|value| state.needed.remove(value));
                if produced_needed {
                    state.metrics.data_dependencies += 1;
                    state.needed.extend(arguments.iter().cloned());
                    if let Some(callee) = callee {
                        *state.pending_returns.entry(*callee).or_default() += 1;
                    }
                    self.add_to_result(index, instruction, state);
                }
                if let Some(callee) = callee {
                    state.visited_calls.entry(*callee).or_default().push(index);
                }
            }
            InstructionKind::Return { value } => {
                let pending = state
                    .pending_returns
                    .get_mut(&instruction.code_object)
                    .filter(|count| **count > 0);
                if let Some(count) = pending {
                    *count -= 1;
                    match value {
                        Some(value) => {
                            state.needed.insert(value.clone());
                            self.add_to_result(index, instruction, state);
                        }
                        // Implicit "return none": consumed, never relevant.
                        None => trace!(position = index, "filtered implicit return"),
                    }
                }
            }
            InstructionKind::Branch { uses, .. } => {
                if self.controls_relevant_instruction(index, instruction, state)? {
                    state.metrics.control_dependencies += 1;
                    state.needed.extend(uses.iter().cloned());
                    self.add_to_result(index, instruction, state);
                }
            }
            // Pure reads never extend a slice on their own; reads feeding a
            // definition travel as that definition's uses.
            InstructionKind::Load { .. } | InstructionKind::AttributeLoad { .. } => {}
            InstructionKind::Jump => {}
            // Raise terminates the traced region; truncation of failing
            // test cases is handled by the post-processing consumer.
            InstructionKind::Raise { .. } => {}
        }
        Ok(())
    }

    /// Whether any instruction already in the slice is control-dependent on
    /// this branch, per the CDG of the branch's owning unit.
    ///
    /// Control dependence is dynamic, not just structural: the unit may run
    /// several times in one trace, and a branch instance only governs the
    /// instructions of its own invocation. A candidate counts only when this
    /// branch is the nearest preceding execution of its predicate node; any
    /// re-evaluation in between means the candidate ran under a later
    /// instance.
    fn controls_relevant_instruction(
        &self,
        index: usize,
        branch: &Instruction,
        state: &SliceState,
    ) -> Result<bool> {
        if state.result.is_empty() {
            return Ok(false);
        }
        let cdg = &self.registry.code_object(branch.code_object)?.cdg;
        for &position in &state.result {
            if position <= index {
                continue;
            }
            let candidate = &self.trace.instructions[position];
            if candidate.code_object != branch.code_object {
                continue;
            }
            if !cdg.is_transitively_control_dependent(candidate.node, branch.node) {
                continue;
            }
            if self.governs_dynamically(index, position, branch) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the branch instance at `index` is still the governing
    /// execution of its predicate node at trace position `position`.
    fn governs_dynamically(&self, index: usize, position: usize, branch: &Instruction) -> bool {
        !self.trace.instructions[index + 1..position]
            .iter()
            .any(|other| {
                other.code_object == branch.code_object && other.node == branch.node
            })
    }

    /// Insert an instruction into the slice and attribute the call records
    /// that entered its unit.
    ///
    /// When a callee instruction becomes relevant, the already-passed call
    /// into that unit joins the slice too (the call is how the relevant
    /// instruction came to execute). Operand plumbing is not repeated here:
    /// argument and receiver bindings are shared identifiers between caller
    /// and callee frames.
    fn add_to_result(&self, index: usize, instruction: &Instruction, state: &mut SliceState) {
        if !state.result.insert(index) {
            return;
        }
        let mut unit = instruction.code_object;
        let mut position = index;
        loop {
            let Some(enclosing_call) = self.nearest_visited_call(unit, position, state) else {
                break;
            };
            if !state.result.insert(enclosing_call) {
                break;
            }
            trace!(
                position = enclosing_call,
                callee = unit.0,
                "attributed call record to slice"
            );
            let call = &self.trace.instructions[enclosing_call];
            unit = call.code_object;
            position = enclosing_call;
        }
    }

    /// Nearest call record into `unit` that the walk has already passed,
    /// i.e. the smallest visited call position greater than `position`.
    fn nearest_visited_call(
        &self,
        unit: CodeObjectId,
        position: usize,
        state: &SliceState,
    ) -> Option<usize> {
        state
            .visited_calls
            .get(&unit)?
            .iter()
            .copied()
            .filter(|&call_position| call_position > position)
            .min()
    }
}
