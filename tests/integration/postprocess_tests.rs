//! Post-processing over the accessor fixture's test cases.

use pretty_assertions::assert_eq;
use tracelens::{
    remove_unused_statements, truncate_after_failure, ExecutionResult, Statement, StatementKind,
};

use crate::fixtures::AccessorSubject;

#[test]
fn test_fully_wired_case_loses_nothing() {
    let subject = AccessorSubject::new();
    let (mut test_case, _) = subject.write_then_read();

    let removed = remove_unused_statements(&mut test_case).unwrap();
    assert_eq!(removed, 0);
    assert_eq!(test_case.size(), 5);
}

#[test]
fn test_dangling_primitive_is_dropped() {
    let subject = AccessorSubject::new();
    let (mut test_case, _) = subject.write_then_read();
    test_case.push(Statement::new(StatementKind::Primitive, "int_9", vec![]));

    let removed = remove_unused_statements(&mut test_case).unwrap();
    assert_eq!(removed, 1);
    assert!(test_case
        .statements()
        .all(|(_, statement)| statement.ret_val != "int_9"));
}

#[test]
fn test_truncation_then_cleanup_after_a_failing_setter() {
    let subject = AccessorSubject::new();
    let (mut test_case, _) = subject.write_then_read();
    // The setter (statement 2) raised; the getter and check never ran.
    let failing = ExecutionResult {
        raised: true,
        last_executed_statement: Some(2),
        ..Default::default()
    };

    truncate_after_failure(&mut test_case, &failing);
    assert_eq!(test_case.size(), 3);

    // The surviving setter still reads both earlier statements.
    let removed = remove_unused_statements(&mut test_case).unwrap();
    assert_eq!(removed, 0);
}

#[test]
fn test_truncation_can_strand_a_primitive() {
    let subject = AccessorSubject::new();
    let (mut test_case, _) = subject.write_then_read();
    // Failure right after the primitive: nothing reads int_0 anymore.
    let failing = ExecutionResult {
        raised: true,
        last_executed_statement: Some(1),
        ..Default::default()
    };

    truncate_after_failure(&mut test_case, &failing);
    let removed = remove_unused_statements(&mut test_case).unwrap();
    assert_eq!(removed, 1);
    let remaining: Vec<_> = test_case
        .statements()
        .map(|(_, statement)| statement.ret_val.clone())
        .collect();
    assert_eq!(remaining, vec!["obj_0"]);
}

#[test]
fn test_passing_run_is_untouched() {
    let subject = AccessorSubject::new();
    let (mut test_case, result) = subject.write_then_read();

    truncate_after_failure(&mut test_case, &result);
    assert_eq!(test_case.size(), 5);
}
