//! tracelens — trace analysis core for search-based test generation.
//!
//! Given an immutable [`ExecutionTrace`] produced by an instrumentation
//! collaborator, plus the static registries of analyzed units and branch
//! predicates, this crate computes:
//!
//! - **Control-flow distances** ([`distance`]): a totally ordered fitness
//!   signal telling the search how close an execution came to a coverage
//!   target it missed.
//! - **Dynamic backward slices** ([`slicer`]): the subset of executed
//!   instructions that causally contributed to a set of values at a point
//!   in the trace, following data and control dependencies.
//! - **Checked coverage** ([`coverage`]): the fraction of executed lines
//!   that some checked value actually depends on.
//! - **Test-case post-processing** ([`postprocess`]): unused-statement
//!   removal and failure truncation over a tombstoned statement arena.
//!
//! All engines are pure, synchronous computations over already-collected
//! data: a frozen trace can be shared across concurrent queries without
//! synchronization, and every query owns its working state.

pub mod cdg;
pub mod coverage;
pub mod distance;
pub mod error;
pub mod postprocess;
pub mod registry;
pub mod slicer;
pub mod testcase;
pub mod trace;

pub use cdg::{BranchValue, CdgEdge, CdgNode, ControlDependenceGraph, NodeId, NodeKind};
pub use coverage::{
    compute_checked_coverage, derive_criteria, suite_checked_coverage,
    test_case_checked_coverage, CheckedCoverage,
};
pub use distance::{compute_predicate_distance, compute_root_distance, ControlFlowDistance};
pub use error::{Result, TraceLensError};
pub use registry::{
    CodeObjectId, CodeObjectMeta, LineId, LineMeta, PredicateId, PredicateMeta, SubjectRegistry,
};
pub use slicer::{DynamicSlice, DynamicSlicer, SliceMetrics, SlicingCriterion};
pub use testcase::{Statement, StatementId, StatementKind, TestCase};
pub use trace::{
    DistancePair, ExecutionResult, ExecutionTrace, Instruction, InstructionKind, ValueRef,
};
pub use postprocess::{remove_unused_statements, truncate_after_failure};
