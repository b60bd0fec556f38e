//! Checked-coverage computation.
//!
//! A statement is *checked* when a later statement reads the value it
//! produced (an assertion is just a statement reading the values it checks).
//! For every checked statement the slicer runs backward from the statement's
//! trace position over its produced value; the union of the resulting slices
//! is the set of instructions that causally contribute to something checked.
//!
//! Checked coverage = distinct lines touched by any slice, over distinct
//! lines covered by the whole trace. Statements never referenced by a later
//! statement contribute nothing to the numerator.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::registry::{LineId, SubjectRegistry};
use crate::slicer::{DynamicSlicer, SlicingCriterion};
use crate::testcase::TestCase;
use crate::trace::{ExecutionResult, ValueRef};

/// Line-level checked-coverage result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckedCoverage {
    /// Lines touched by at least one checked slice.
    pub covered_lines: FxHashSet<LineId>,
    /// Lines covered by the whole trace.
    pub executed_lines: FxHashSet<LineId>,
}

impl CheckedCoverage {
    /// Coverage ratio in `[0, 1]`. An execution that covered nothing
    /// reports full coverage, mirroring line coverage conventions.
    pub fn ratio(&self) -> f64 {
        if self.executed_lines.is_empty() {
            return 1.0;
        }
        self.covered_lines.len() as f64 / self.executed_lines.len() as f64
    }

    /// Merge another result into this one (suite aggregation).
    pub fn merge(&mut self, other: &CheckedCoverage) {
        self.covered_lines.extend(other.covered_lines.iter().copied());
        self.executed_lines.extend(other.executed_lines.iter().copied());
    }

    /// JSON summary for reporting.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "covered_lines": self.covered_lines.len(),
            "executed_lines": self.executed_lines.len(),
            "ratio": self.ratio(),
        })
    }
}

/// Derive the slicing criteria of a test case's checked statements.
///
/// Statement `i` is checked when some later statement reads `i`'s produced
/// binding. The criterion sits at the trace position one past the
/// statement's last instruction, over the produced value.
pub fn derive_criteria(test_case: &TestCase, result: &ExecutionResult) -> Vec<SlicingCriterion> {
    let statements: Vec<_> = test_case.statements().collect();
    let mut criteria = Vec::new();
    for (index, (_, statement)) in statements.iter().enumerate() {
        // Skip statements the execution never completed.
        let Some(&position) = result.statement_positions.get(index) else {
            break;
        };
        let checked = statements
            .iter()
            .skip(index + 1)
            .any(|(_, later)| later.reads.contains(&statement.ret_val));
        if checked {
            criteria.push(SlicingCriterion::at(
                position,
                ValueRef::variable(statement.ret_val.clone()),
            ));
        }
    }
    criteria
}

/// Compute checked coverage for one executed test case.
pub fn test_case_checked_coverage(
    test_case: &TestCase,
    result: &ExecutionResult,
    registry: &SubjectRegistry,
) -> Result<CheckedCoverage> {
    let criteria = derive_criteria(test_case, result);
    compute_checked_coverage(result, &criteria, registry)
}

/// Compute checked coverage from explicit criteria.
///
/// Every executed instruction must map to a registered line; an unknown
/// (unit, line) pair surfaces as `LineNotFound` instead of skewing the
/// denominator.
pub fn compute_checked_coverage(
    result: &ExecutionResult,
    criteria: &[SlicingCriterion],
    registry: &SubjectRegistry,
) -> Result<CheckedCoverage> {
    let trace = &result.execution_trace;
    let mut coverage = CheckedCoverage::default();

    for instruction in &trace.instructions {
        coverage
            .executed_lines
            .insert(registry.line_id_by_instruction(instruction)?);
    }

    let slicer = DynamicSlicer::new(trace, registry);
    for criterion in criteria {
        let slice = slicer.compute_slice(criterion)?;
        for &position in &slice.positions {
            let instruction = &trace.instructions[position];
            coverage
                .covered_lines
                .insert(registry.line_id_by_instruction(instruction)?);
        }
    }

    debug!(
        covered = coverage.covered_lines.len(),
        executed = coverage.executed_lines.len(),
        criteria = criteria.len(),
        "computed checked coverage"
    );
    Ok(coverage)
}

/// Compute suite-level checked coverage by unioning the per-test-case
/// covered and executed line sets.
pub fn suite_checked_coverage(
    executions: &[(&TestCase, &ExecutionResult)],
    registry: &SubjectRegistry,
) -> Result<CheckedCoverage> {
    let mut total = CheckedCoverage::default();
    for (test_case, result) in executions {
        let coverage = test_case_checked_coverage(test_case, result, registry)?;
        total.merge(&coverage);
    }
    Ok(total)
}
