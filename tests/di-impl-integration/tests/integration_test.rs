//! 容器端到端集成测试

use di_abstractions::{Lifetime, Resolution, ServiceRegistry, ServiceResolver};
use di_impl::ServiceContainer;
use di_impl_integration_tests::{
    select_controller, AccountController, BasicCalculator, Calculator, CalculatorView, Controller,
    HomeController,
};
use infrastructure_composition::ContainerBuilder;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

#[test]
fn test_calculator_view_example() {
    init_test_logger();
    let mut container = ServiceContainer::new();
    container.register_singleton::<dyn Calculator, BasicCalculator>();
    container.register_transient::<CalculatorView, CalculatorView>();

    let first = container.resolve_one::<CalculatorView>().unwrap();
    let second = container.resolve_one::<CalculatorView>().unwrap();

    assert_eq!(first.calculator.add(1.0, 1.0), 2.0);
    assert_ne!(first.id, second.id);
    assert!(Arc::ptr_eq(&first.calculator, &second.calculator));
    assert_eq!(
        first.calculator.instance_id(),
        second.calculator.instance_id()
    );
}

#[test]
fn test_transient_calculator_gives_distinct_ids() {
    init_test_logger();
    let mut container = ServiceContainer::new();
    container.register::<dyn Calculator, BasicCalculator>(Lifetime::Transient);

    let a = container.resolve_one::<dyn Calculator>().unwrap();
    let b = container.resolve_one::<dyn Calculator>().unwrap();
    assert_ne!(a.instance_id(), b.instance_id());
}

#[test]
fn test_controller_dispatch_by_name() {
    init_test_logger();
    let mut container = ServiceContainer::new();
    container.register_singleton::<dyn Calculator, BasicCalculator>();
    container.register_transient::<dyn Controller, HomeController>();
    container.register_transient::<dyn Controller, AccountController>();

    let controllers = match container.resolve::<dyn Controller>().unwrap() {
        Resolution::Many(controllers) => controllers,
        Resolution::Single(_) => panic!("两个控制器应当返回多个实例"),
    };
    assert_eq!(controllers.len(), 2);

    let account = select_controller(controllers.clone(), "Account").unwrap();
    assert_eq!(account.handle("login"), "account:login");

    let home = select_controller(controllers.clone(), "Home").unwrap();
    assert_eq!(home.handle("index"), "home:index:2");

    assert!(select_controller(controllers, "Missing").is_none());
}

#[test]
fn test_single_controller_is_not_wrapped() {
    init_test_logger();
    let mut container = ServiceContainer::new();
    container.register_transient::<dyn Controller, AccountController>();

    let resolution = container.resolve::<dyn Controller>().unwrap();
    assert!(!resolution.is_many());
    let controller = resolution.single().unwrap();
    assert!(controller.type_name().ends_with("AccountController"));
}

#[test]
fn test_builder_end_to_end() {
    init_test_logger();
    let container = ContainerBuilder::new()
        .register::<dyn Calculator, BasicCalculator>(Lifetime::Singleton)
        .register::<CalculatorView, CalculatorView>(Lifetime::Transient)
        .register::<dyn Controller, HomeController>(Lifetime::Singleton)
        .validate_on_build(true)
        .build()
        .unwrap();

    let view = container.resolve_one::<CalculatorView>().unwrap();
    let controller = container.resolve_one::<dyn Controller>().unwrap();
    assert_eq!(view.calculator.add(2.0, 2.0), 4.0);
    assert_eq!(controller.handle("x"), "home:x:2");
    assert_eq!(container.stats().active_singletons, 2);
}

#[test]
fn test_shared_container_across_threads() {
    init_test_logger();
    let mut container = ServiceContainer::new();
    container.register_singleton::<dyn Calculator, BasicCalculator>();
    container.register_transient::<CalculatorView, CalculatorView>();
    let container = Arc::new(container);

    let ids: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            std::thread::spawn(move || {
                container
                    .resolve_one::<CalculatorView>()
                    .unwrap()
                    .calculator
                    .instance_id()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
}
