//! trybuild compile-time tests for component_macros

#[test]
fn trybuild_injectable_derive() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/injectable_ok.rs");
    t.pass("tests/trybuild/injectable_tuple_ok.rs");
}
