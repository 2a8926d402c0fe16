//! Compile-fail tests to verify error messages
//!
//! Targets that cannot be bound are rejected when the derive expands, so
//! no bind call can ever be made with them.

#[test]
fn ui_tests() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/*.rs");
}
