//! Slicing criterion and result types.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::trace::ValueRef;

/// A point in a trace plus the values whose origin a slice must explain.
#[derive(Debug, Clone)]
pub struct SlicingCriterion {
    /// Trace position of the criterion. The backward walk starts one
    /// position before it.
    pub position: usize,
    /// Values of interest at that point.
    pub values: FxHashSet<ValueRef>,
}

impl SlicingCriterion {
    /// Criterion over a single value.
    pub fn at(position: usize, value: ValueRef) -> Self {
        let mut values = FxHashSet::default();
        values.insert(value);
        Self { position, values }
    }

    /// Criterion over several values.
    pub fn over(position: usize, values: impl IntoIterator<Item = ValueRef>) -> Self {
        Self {
            position,
            values: values.into_iter().collect(),
        }
    }
}

/// Counters describing one slice computation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SliceMetrics {
    /// Instructions visited by the backward walk.
    pub instructions_visited: usize,
    /// Definitions matched against the working set.
    pub data_dependencies: usize,
    /// Branch instructions pulled in through the CDG.
    pub control_dependencies: usize,
}

/// Set of trace positions relevant to a criterion.
///
/// Membership is what matters; positions are kept sorted for stable
/// reporting but the slice is not an ordered program listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicSlice {
    /// Trace position the slice was computed from.
    pub criterion_position: usize,
    /// Relevant trace positions, sorted ascending.
    pub positions: Vec<usize>,
    /// Values still unexplained when the walk reached the trace start.
    /// Non-empty for values defined outside the traced region; not an error.
    pub unresolved: FxHashSet<ValueRef>,
    /// Computation counters.
    pub metrics: SliceMetrics,
}

impl DynamicSlice {
    /// Whether a trace position is in the slice.
    #[inline]
    pub fn contains(&self, position: usize) -> bool {
        self.positions.binary_search(&position).is_ok()
    }

    /// Number of relevant instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the slice is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
