//! Checked coverage over the traced accessor fixture.

use pretty_assertions::assert_eq;
use tracelens::{suite_checked_coverage, test_case_checked_coverage};

use crate::fixtures::AccessorSubject;

#[test]
fn test_write_then_read_covers_both_accessor_bodies() {
    let subject = AccessorSubject::new();
    let (test_case, result) = subject.write_then_read();

    let coverage = test_case_checked_coverage(&test_case, &result, &subject.registry).unwrap();

    assert_eq!(coverage.executed_lines.len(), 8);
    assert_eq!(coverage.covered_lines.len(), 6);
    assert!((coverage.ratio() - 0.75).abs() < 1e-9);
    // Everything but the constructor's default init and the checking
    // statement's own line depends on something checked.
    assert!(!coverage.covered_lines.contains(&subject.line(subject.ctor, 2)));
    assert!(!coverage.covered_lines.contains(&subject.line(subject.module, 14)));
    assert!(coverage.covered_lines.contains(&subject.line(subject.setter, 4)));
    assert!(coverage.covered_lines.contains(&subject.line(subject.getter, 6)));
}

#[test]
fn test_read_then_write_excludes_the_late_setter() {
    let subject = AccessorSubject::new();
    let (test_case, result) = subject.read_then_write();

    let coverage = test_case_checked_coverage(&test_case, &result, &subject.registry).unwrap();

    assert_eq!(coverage.executed_lines.len(), 8);
    assert_eq!(coverage.covered_lines.len(), 5);
    // The checked read observed the constructor's default; the write after
    // it influences nothing checked.
    assert!(coverage.covered_lines.contains(&subject.line(subject.ctor, 2)));
    assert!(!coverage.covered_lines.contains(&subject.line(subject.setter, 4)));
}

#[test]
fn test_statement_order_changes_the_excluded_lines() {
    let subject = AccessorSubject::new();
    let (write_case, write_result) = subject.write_then_read();
    let (read_case, read_result) = subject.read_then_write();

    let write_coverage =
        test_case_checked_coverage(&write_case, &write_result, &subject.registry).unwrap();
    let read_coverage =
        test_case_checked_coverage(&read_case, &read_result, &subject.registry).unwrap();

    // Same statements, same executed lines, different data flow.
    assert_eq!(write_coverage.executed_lines, read_coverage.executed_lines);
    assert_ne!(write_coverage.covered_lines, read_coverage.covered_lines);
}

#[test]
fn test_void_setter_result_checks_nothing() {
    let subject = AccessorSubject::new();
    let (test_case, result) = subject.void_setter_only();

    let coverage = test_case_checked_coverage(&test_case, &result, &subject.registry).unwrap();

    // Only the constructor call and the primitive are checked (both read
    // by the setter statement); the setter's none binding is never read,
    // so its body line stays uncovered despite executing.
    assert_eq!(coverage.executed_lines.len(), 5);
    assert_eq!(coverage.covered_lines.len(), 2);
    assert!((coverage.ratio() - 0.4).abs() < 1e-9);
    assert!(!coverage.covered_lines.contains(&subject.line(subject.setter, 4)));
    assert!(!coverage.covered_lines.contains(&subject.line(subject.ctor, 2)));
}

#[test]
fn test_guarded_setter_covers_guard_and_body_once() {
    let subject = AccessorSubject::new();
    let (test_case, result) = subject.clamped_writes();

    let coverage = test_case_checked_coverage(&test_case, &result, &subject.registry).unwrap();

    assert_eq!(coverage.executed_lines.len(), 11);
    assert_eq!(coverage.covered_lines.len(), 8);
    assert!((coverage.ratio() - 8.0 / 11.0).abs() < 1e-9);
    // The read observes the second clamp_set: its guard and body lines are
    // covered, while the first invocation's no-op call line, the default
    // init, and the check line are not.
    assert!(coverage.covered_lines.contains(&subject.line(subject.clamp, 8)));
    assert!(coverage.covered_lines.contains(&subject.line(subject.clamp, 9)));
    assert!(!coverage.covered_lines.contains(&subject.line(subject.module, 12)));
    assert!(!coverage.covered_lines.contains(&subject.line(subject.ctor, 2)));
    assert!(!coverage.covered_lines.contains(&subject.line(subject.module, 16)));
}

#[test]
fn test_suite_coverage_unions_per_case_results() {
    let subject = AccessorSubject::new();
    let (write_case, write_result) = subject.write_then_read();
    let (read_case, read_result) = subject.read_then_write();

    let coverage = suite_checked_coverage(
        &[(&write_case, &write_result), (&read_case, &read_result)],
        &subject.registry,
    )
    .unwrap();

    // The two orderings cover complementary lines; together only the
    // checking statement's own line remains unchecked.
    assert_eq!(coverage.executed_lines.len(), 8);
    assert_eq!(coverage.covered_lines.len(), 7);
    assert!(!coverage.covered_lines.contains(&subject.line(subject.module, 14)));
}
