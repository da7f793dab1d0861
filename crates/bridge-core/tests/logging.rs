//! Runs in its own test binary so the global subscriber it installs does
//! not leak into other tests.

use bridge_core::init_tracing;

#[test]
fn second_init_is_a_no_op() {
    assert!(init_tracing("off"));
    assert!(!init_tracing("bridge_core=debug"));
}
