use component_macros::Injectable;
use di_abstractions::{Injectable as _, ServiceIdentity, ServiceRegistry, ServiceResolver};
use di_impl::ServiceContainer;
use std::sync::Arc;

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Injectable)]
#[injectable(provides(dyn Greeter))]
struct English {
    greeting: String,
}

impl Greeter for English {
    fn greet(&self) -> String {
        format!("{}hello", self.greeting)
    }
}

#[derive(Injectable)]
struct Host {
    greeter: Arc<dyn Greeter>,
    #[injectable(default)]
    cache: Arc<Vec<String>>,
}

fn main() {
    assert_eq!(Host::dependencies(), vec![ServiceIdentity::of::<dyn Greeter>()]);

    let mut container = ServiceContainer::new();
    container.register_singleton::<dyn Greeter, English>();
    container.register_transient::<Host, Host>();

    let host = container.resolve_one::<Host>().unwrap();
    assert_eq!(host.greeter.greet(), "hello");
    assert!(host.cache.is_empty());
}
