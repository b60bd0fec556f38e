//! Execution traces and the instructions they record.
//!
//! The instrumentation layer appends [`Instruction`]s while the target runs
//! on its worker thread; once execution completes the trace is frozen inside
//! an [`ExecutionResult`] and consumed read-only by the
//! [distance](crate::distance), [slicing](crate::slicer) and
//! [coverage](crate::coverage) engines.

pub mod types;

pub use types::{
    DistancePair, ExecutionResult, ExecutionTrace, Instruction, InstructionKind, ValueRef,
};

impl Instruction {
    /// Values this instruction reads.
    pub fn reads(&self) -> Vec<ValueRef> {
        match &self.kind {
            InstructionKind::Load { source } => vec![source.clone()],
            InstructionKind::Store { uses, .. } => uses.clone(),
            InstructionKind::AttributeLoad { object, attribute } => vec![
                ValueRef::variable(object.clone()),
                ValueRef::attribute(object.clone(), attribute.clone()),
            ],
            InstructionKind::AttributeStore { object, uses, .. } => {
                let mut reads = uses.clone();
                // The mutated object itself must exist.
                reads.push(ValueRef::variable(object.clone()));
                reads
            }
            InstructionKind::Call { arguments, .. } => arguments.clone(),
            InstructionKind::Return { value } => value.iter().cloned().collect(),
            InstructionKind::Branch { uses, .. } => uses.clone(),
            InstructionKind::Jump => Vec::new(),
            InstructionKind::Raise { value } => value.iter().cloned().collect(),
        }
    }

    /// Whether this is the synthesized "return none" of a unit body without
    /// an explicit return value.
    #[inline]
    pub fn is_implicit_return(&self) -> bool {
        matches!(self.kind, InstructionKind::Return { value: None })
    }
}
