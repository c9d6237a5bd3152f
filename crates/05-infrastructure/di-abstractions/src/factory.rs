//! 构造签名抽象
//!
//! Rust 没有运行时反射，每个实现类型需要在注册前声明自己的构造函数参数表。
//! [`Injectable`] 提供参数表与构造逻辑，[`Provides`] 负责把实现向上转换为服务接口。

use infrastructure_common::{DependencyError, ServiceIdentity};
use std::any::Any;
use std::sync::Arc;

/// 类型擦除的服务实例
///
/// 内部保存的是 `Arc<I>`，其中 `I` 是注册时使用的服务标识类型。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 可注入的实现类型
///
/// # 示例
///
/// ```rust
/// use di_abstractions::{Dependencies, DependencyError, Injectable, ServiceIdentity};
/// use std::sync::Arc;
///
/// pub trait Clock: Send + Sync {}
///
/// pub struct Scheduler {
///     clock: Arc<dyn Clock>,
/// }
///
/// impl Injectable for Scheduler {
///     fn dependencies() -> Vec<ServiceIdentity> {
///         vec![ServiceIdentity::of::<dyn Clock>()]
///     }
///
///     fn construct(dependencies: &mut Dependencies) -> Result<Self, DependencyError> {
///         Ok(Self { clock: dependencies.next::<dyn Clock>()? })
///     }
/// }
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    /// 构造函数参数的服务标识，按声明顺序排列
    fn dependencies() -> Vec<ServiceIdentity>;

    /// 使用已解析的参数构建实例
    fn construct(dependencies: &mut Dependencies) -> Result<Self, DependencyError>;
}

/// 实现类型到服务接口的向上转换
///
/// 每个类型都自动提供自身；提供 trait 对象时使用 [`provides!`](crate::provides)
/// 或 `#[injectable(provides(...))]`。
pub trait Provides<I: ?Sized + Send + Sync + 'static>: Send + Sync + 'static {
    /// 转换为服务接口
    fn provide(self: Arc<Self>) -> Arc<I>;
}

impl<T: Send + Sync + 'static> Provides<T> for T {
    fn provide(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// 声明实现类型提供的服务接口
///
/// ```rust
/// use di_abstractions::{provides, Provides};
/// use std::sync::Arc;
///
/// pub trait Calculator: Send + Sync {
///     fn add(&self, a: f64, b: f64) -> f64;
/// }
///
/// pub struct BasicCalculator;
///
/// impl Calculator for BasicCalculator {
///     fn add(&self, a: f64, b: f64) -> f64 {
///         a + b
///     }
/// }
///
/// provides!(BasicCalculator => dyn Calculator);
///
/// let calculator = <BasicCalculator as Provides<dyn Calculator>>::provide(Arc::new(BasicCalculator));
/// assert_eq!(calculator.add(1.0, 1.0), 2.0);
/// ```
#[macro_export]
macro_rules! provides {
    ($implementation:ty => $($identity:ty),+ $(,)?) => {
        $(
            impl $crate::Provides<$identity> for $implementation {
                fn provide(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$identity> {
                    self
                }
            }
        )+
    };
}

/// 已解析的构造参数
///
/// 参数按构造签名的顺序依次取出。
#[derive(Debug)]
pub struct Dependencies {
    owner: &'static str,
    arguments: std::vec::IntoIter<Instance>,
    position: usize,
}

impl Dependencies {
    /// 为指定实现类型创建参数列表
    pub fn new(owner: &'static str, arguments: Vec<Instance>) -> Self {
        Self {
            owner,
            arguments: arguments.into_iter(),
            position: 0,
        }
    }

    /// 取出下一个参数
    pub fn next<I: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<I>, DependencyError> {
        let Some(instance) = self.arguments.next() else {
            return Err(DependencyError::DependencyResolutionFailed {
                type_name: self.owner.to_string(),
                message: format!(
                    "缺少第 {} 个构造参数 ({})",
                    self.position + 1,
                    std::any::type_name::<I>()
                ),
            });
        };
        self.position += 1;
        downcast_instance::<I>(&instance)
    }

    /// 剩余参数数量
    pub fn remaining(&self) -> usize {
        self.arguments.len()
    }
}

/// 将类型擦除的实例还原为 `Arc<I>`
pub fn downcast_instance<I: ?Sized + Send + Sync + 'static>(
    instance: &Instance,
) -> Result<Arc<I>, DependencyError> {
    instance
        .downcast_ref::<Arc<I>>()
        .cloned()
        .ok_or_else(|| DependencyError::TypeMismatch {
            expected: std::any::type_name::<I>().to_string(),
        })
}

/// 将服务实例擦除为 [`Instance`]
pub fn erase<I: ?Sized + Send + Sync + 'static>(service: Arc<I>) -> Instance {
    Arc::new(service)
}
