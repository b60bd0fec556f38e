//! Test-case post-processing.
//!
//! Two consumers of trace data over the [`TestCase`](crate::testcase)
//! representation:
//!
//! - [`remove_unused_statements`]: walks the statement sequence backward
//!   with a liveness set and tombstones value statements whose produced
//!   binding is never read afterwards.
//! - [`truncate_after_failure`]: chops every statement after the last one
//!   that actually executed in a failing run. Uses trace positions only,
//!   not the dependency walk.
//!
//! Both fail loudly on statement kinds they have not been extended to
//! handle; guessing relevance would silently break the resulting test.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{Result, TraceLensError};
use crate::testcase::{StatementKind, TestCase};
use crate::trace::ExecutionResult;

/// Remove primitive and collection statements whose produced binding is
/// never read by a later live statement. Returns the number removed.
///
/// Call/constructor statements are kept unconditionally (they may have side
/// effects) and contribute their reads to the liveness set, minus their own
/// binding. Field writes and bare assignments are not supported yet and
/// fail with `UnsupportedConstruct`.
pub fn remove_unused_statements(test_case: &mut TestCase) -> Result<usize> {
    let size_before = test_case.size();
    let mut used: FxHashSet<String> = FxHashSet::default();

    // Stable ids make backward tombstoning safe; compaction happens once
    // at the end.
    for id in test_case.live_ids().into_iter().rev() {
        let statement = test_case.statement(id);
        match statement.kind {
            StatementKind::Primitive | StatementKind::Collection => {
                if !used.contains(&statement.ret_val) {
                    test_case.remove(id);
                }
            }
            StatementKind::Constructor
            | StatementKind::MethodCall
            | StatementKind::FunctionCall => {
                let ret_val = statement.ret_val.clone();
                let reads = statement.reads.clone();
                used.extend(reads.into_iter().filter(|read| *read != ret_val));
            }
            StatementKind::FieldWrite => {
                return Err(TraceLensError::UnsupportedConstruct("field write"));
            }
            StatementKind::Assignment => {
                return Err(TraceLensError::UnsupportedConstruct("assignment"));
            }
        }
    }

    test_case.compact();
    let removed = size_before - test_case.size();
    debug!(removed, "removed unused statements from test case");
    Ok(removed)
}

/// Truncate a failing test case after its last executed statement.
///
/// No-op for passing executions. A failure before the first statement
/// completed empties the test case.
pub fn truncate_after_failure(test_case: &mut TestCase, result: &ExecutionResult) {
    if !result.raised {
        return;
    }
    match result.last_executed_statement {
        Some(position) => test_case.chop(position),
        None => {
            for id in test_case.live_ids() {
                test_case.remove(id);
            }
        }
    }
    test_case.compact();
    debug!(size = test_case.size(), "truncated failing test case");
}
