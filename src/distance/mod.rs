//! Control-flow distance computation.
//!
//! Turns "this coverage target was not reached" into a totally ordered
//! fitness signal for the search loop. A [`ControlFlowDistance`] pairs an
//! approach level (how many control-dependence steps still separate the
//! executed path from the target) with a branch distance (how close the
//! nearest evaluated predicate came to flipping toward the target).
//!
//! [`compute_root_distance`] models reaching a unit at all; the
//! finer-grained [`compute_predicate_distance`] measures one branch outcome
//! inside a unit. Both combine through
//! [`ControlFlowDistance::resulting_branch_fitness`]: branch distance is
//! normalized into `[0, 1)` so it can never outweigh one approach level.

use std::cmp::Ordering;
use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use crate::cdg::{BranchValue, NodeId};
use crate::error::{Result, TraceLensError};
use crate::registry::{CodeObjectId, PredicateId, SubjectRegistry};
use crate::trace::ExecutionTrace;

/// Distance between an executed path and a coverage target.
///
/// Ordered lexicographically by `(approach_level, branch_distance)`; lower
/// is better and `(0, 0)` means the target was reached.
///
/// Invariant: `branch_distance` is non-negative (possibly infinite) and
/// never NaN. Violations are programmer errors and panic immediately; they
/// are never clamped.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ControlFlowDistance {
    approach_level: u32,
    branch_distance: f64,
}

impl ControlFlowDistance {
    /// Create a distance, asserting the non-negativity invariant.
    pub fn new(approach_level: u32, branch_distance: f64) -> Self {
        assert!(
            branch_distance >= 0.0,
            "branch distance must be non-negative, got {branch_distance}"
        );
        Self {
            approach_level,
            branch_distance,
        }
    }

    #[inline]
    pub fn approach_level(&self) -> u32 {
        self.approach_level
    }

    #[inline]
    pub fn branch_distance(&self) -> f64 {
        self.branch_distance
    }

    /// Replace the branch distance, asserting the invariant.
    pub fn set_branch_distance(&mut self, branch_distance: f64) {
        assert!(
            branch_distance >= 0.0,
            "branch distance must be non-negative, got {branch_distance}"
        );
        self.branch_distance = branch_distance;
    }

    /// Increment the approach level by exactly one.
    pub fn increase_approach_level(&mut self) {
        self.approach_level += 1;
    }

    /// Combine the pair into a single scalar fitness value.
    ///
    /// An infinite branch distance contributes exactly one level; a finite
    /// one is normalized into `[0, 1)` via `d / (1 + d)`.
    pub fn resulting_branch_fitness(&self) -> f64 {
        if self.branch_distance.is_infinite() {
            f64::from(self.approach_level) + 1.0
        } else {
            f64::from(self.approach_level)
                + self.branch_distance / (1.0 + self.branch_distance)
        }
    }
}

impl PartialEq for ControlFlowDistance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

// NaN is excluded by the construction invariant, so the ordering is total.
impl Eq for ControlFlowDistance {}

impl PartialOrd for ControlFlowDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ControlFlowDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.approach_level
            .cmp(&other.approach_level)
            .then_with(|| self.branch_distance.total_cmp(&other.branch_distance))
    }
}

/// Distance to reaching a unit's entry at all.
///
/// Zero iff the unit was entered. Otherwise the approach level counts the
/// enclosing-unit steps between the target and its nearest executed
/// ancestor; branch distance stays zero at the root level (predicate-level
/// refinement is [`compute_predicate_distance`]).
///
/// Fails with an unknown-target error when `target` or a parent on the walk
/// was never registered; never silently returns a zero distance.
pub fn compute_root_distance(
    trace: &ExecutionTrace,
    target: CodeObjectId,
    registry: &SubjectRegistry,
) -> Result<ControlFlowDistance> {
    // Reject unknown targets even when the trace would answer immediately.
    registry.code_object(target)?;

    let mut distance = ControlFlowDistance::default();
    let mut current = target;
    // A well-formed parent chain is no longer than the registry itself;
    // anything longer is a cycle in the static data.
    for _ in 0..=registry.code_object_count() {
        if trace.entered(current) {
            return Ok(distance);
        }
        distance.increase_approach_level();
        match registry.code_object(current)?.parent {
            Some(parent) => current = parent,
            // Orphan root never entered: one level past the last ancestor.
            None => return Ok(distance),
        }
    }
    Err(TraceLensError::InvalidArgument(format!(
        "cyclic parent chain starting at code object {}",
        target.0
    )))
}

/// Distance to a specific predicate taking a specific branch.
///
/// - Predicate evaluated: approach level 0, branch distance is the minimum
///   recorded distance to flipping it toward `branch`.
/// - Predicate not evaluated but its unit entered: approach level counts
///   control-dependence steps to the nearest evaluated controlling
///   predicate, whose flip distance toward the target becomes the branch
///   distance. With no evaluated predicate on any controller chain, the
///   approach level is the target's control-dependence depth and the branch
///   distance is infinite.
/// - Unit not entered: the root distance to the unit plus the target's
///   control-dependence depth, with infinite branch distance.
pub fn compute_predicate_distance(
    trace: &ExecutionTrace,
    predicate: PredicateId,
    branch: bool,
    registry: &SubjectRegistry,
) -> Result<ControlFlowDistance> {
    let meta = registry.predicate(predicate)?;
    let unit = registry.code_object(meta.code_object)?;

    if trace.evaluated(predicate) {
        let flip = flip_distance(trace, predicate, BranchValue::from_outcome(branch))
            .unwrap_or(f64::INFINITY);
        return Ok(ControlFlowDistance::new(0, flip));
    }

    if trace.entered(meta.code_object) {
        if let Some((steps, flip)) =
            nearest_evaluated_controller(trace, registry, meta.code_object, meta.node, &unit.cdg)
        {
            return Ok(ControlFlowDistance::new(steps, flip));
        }
        let depth = unit.cdg.depth(meta.node) as u32;
        return Ok(ControlFlowDistance::new(depth, f64::INFINITY));
    }

    let root = compute_root_distance(trace, meta.code_object, registry)?;
    let depth = unit.cdg.depth(meta.node) as u32;
    Ok(ControlFlowDistance::new(
        root.approach_level() + depth,
        f64::INFINITY,
    ))
}

/// Minimum recorded distance to the predicate taking `branch`.
fn flip_distance(
    trace: &ExecutionTrace,
    predicate: PredicateId,
    branch: BranchValue,
) -> Option<f64> {
    let observations = trace.predicate_distances.get(&predicate)?;
    observations
        .iter()
        .map(|pair| match branch {
            BranchValue::False => pair.false_distance,
            // Unconditional targets cannot occur here; treat as true.
            _ => pair.true_distance,
        })
        .min_by(f64::total_cmp)
}

/// BFS upward over control-dependence edges from `start`, looking for the
/// nearest controlling predicate that was evaluated in the trace.
///
/// Returns `(steps, flip distance toward the branch that leads to start)`.
fn nearest_evaluated_controller(
    trace: &ExecutionTrace,
    registry: &SubjectRegistry,
    code_object: CodeObjectId,
    start: NodeId,
    cdg: &crate::cdg::ControlDependenceGraph,
) -> Option<(u32, f64)> {
    let capacity = cdg
        .nodes
        .keys()
        .map(|id| id.0 + 1)
        .max()
        .unwrap_or_default();
    let mut visited = FixedBitSet::with_capacity(capacity);
    let mut frontier = VecDeque::new();
    frontier.push_back((start, 0u32));
    visited.insert(start.0);

    let mut best: Option<(u32, f64)> = None;
    while let Some((current, steps)) = frontier.pop_front() {
        if let Some((found_steps, _)) = best {
            if steps >= found_steps {
                // All remaining frontier entries are at least this far.
                break;
            }
        }
        for edge in cdg.edges.iter().filter(|edge| edge.to == current) {
            let controller = edge.from;
            if let Some(controlling_predicate) = registry.predicate_at(code_object, controller) {
                if trace.evaluated(controlling_predicate) {
                    let flip = flip_distance(trace, controlling_predicate, edge.branch)
                        .unwrap_or(f64::INFINITY);
                    let candidate = (steps + 1, flip);
                    best = Some(match best {
                        Some(current_best) if current_best <= candidate => current_best,
                        _ => candidate,
                    });
                    continue;
                }
            }
            if !visited.contains(controller.0) {
                visited.insert(controller.0);
                frontier.push_back((controller, steps + 1));
            }
        }
    }
    best
}
