use component_macros::Injectable;
use di_abstractions::{Injectable as _, ServiceIdentity};
use std::sync::Arc;

#[derive(Injectable)]
struct Marker;

#[derive(Injectable)]
struct Wrapper(Arc<Marker>, u32);

fn main() {
    assert!(Marker::dependencies().is_empty());
    assert_eq!(Wrapper::dependencies(), vec![ServiceIdentity::of::<Marker>()]);
}
