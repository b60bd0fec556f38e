//! End-to-end slicing over the traced accessor fixture.

use pretty_assertions::assert_eq;
use tracelens::{DynamicSlicer, SlicingCriterion, ValueRef};

use crate::fixtures::AccessorSubject;

#[test]
fn test_write_then_read_slice_spans_both_method_bodies() {
    let subject = AccessorSubject::new();
    let (_, result) = subject.write_then_read();
    let slicer = DynamicSlicer::new(&result.execution_trace, &subject.registry);

    let slice = slicer
        .compute_slice(&SlicingCriterion::at(9, ValueRef::variable("int_1")))
        .unwrap();

    // Getter return, getter call, setter body, setter call, the argument
    // primitive, and the constructor call producing the receiver.
    assert_eq!(slice.positions, vec![2, 3, 4, 6, 7, 8]);
    assert!(slice.unresolved.is_empty());
}

#[test]
fn test_write_then_read_excludes_default_init_and_implicit_returns() {
    let subject = AccessorSubject::new();
    let (_, result) = subject.write_then_read();
    let slicer = DynamicSlicer::new(&result.execution_trace, &subject.registry);

    let slice = slicer
        .compute_slice(&SlicingCriterion::at(9, ValueRef::variable("int_1")))
        .unwrap();

    // The setter overwrote the constructor's default before the read, so
    // the default init (pos 0) is not relevant; the synthesized "return
    // none" records (pos 1 and 5) never are.
    assert!(!slice.contains(0));
    assert!(!slice.contains(1));
    assert!(!slice.contains(5));
}

#[test]
fn test_read_then_write_slice_reaches_default_init() {
    let subject = AccessorSubject::new();
    let (_, result) = subject.read_then_write();
    let slicer = DynamicSlicer::new(&result.execution_trace, &subject.registry);

    let slice = slicer
        .compute_slice(&SlicingCriterion::at(6, ValueRef::variable("int_1")))
        .unwrap();

    // The read observed the constructor's default, not the later write:
    // constructor body + call, getter body + call; setter excluded.
    assert_eq!(slice.positions, vec![0, 2, 4, 5]);
    assert!(!slice.contains(6));
    assert!(!slice.contains(7));
    assert!(!slice.contains(8));
}

#[test]
fn test_guarded_write_pulls_in_its_own_guard() {
    let subject = AccessorSubject::new();
    let (_, result) = subject.clamped_writes();
    let slicer = DynamicSlicer::new(&result.execution_trace, &subject.registry);

    let slice = slicer
        .compute_slice(&SlicingCriterion::at(14, ValueRef::variable("int_2")))
        .unwrap();

    // Constructor call, the positive primitive, the second clamp_set's
    // guard + store + call, getter body + call. The first clamp_set ran the
    // same guard but stored nothing the read observes.
    assert_eq!(slice.positions, vec![2, 7, 8, 9, 11, 12, 13]);
    assert!(slice.unresolved.is_empty());
}

#[test]
fn test_guard_of_earlier_clamp_invocation_stays_out() {
    let subject = AccessorSubject::new();
    let (_, result) = subject.clamped_writes();
    let slicer = DynamicSlicer::new(&result.execution_trace, &subject.registry);

    let slice = slicer
        .compute_slice(&SlicingCriterion::at(14, ValueRef::variable("int_2")))
        .unwrap();

    // clamp_set ran twice; only the second invocation's guard (pos 8)
    // governs the relevant store. The first invocation's guard (pos 4) and
    // its argument must not leak in through the shared CDG node.
    assert!(!slice.contains(4));
    assert!(!slice.contains(3));
}

#[test]
fn test_receiver_slice_stops_at_constructor_call() {
    let subject = AccessorSubject::new();
    let (_, result) = subject.write_then_read();
    let slicer = DynamicSlicer::new(&result.execution_trace, &subject.registry);

    let slice = slicer
        .compute_slice(&SlicingCriterion::at(3, ValueRef::variable("obj_0")))
        .unwrap();

    // The call defines the binding; the constructor's body store is not
    // needed once the binding's definition is explained, and the implicit
    // return is consumed silently.
    assert_eq!(slice.positions, vec![2]);
}
