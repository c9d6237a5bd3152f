//! # 依赖注入具体实现
//!
//! 提供具体的服务容器：注册表按插入顺序保存描述符，解析器按需递归构建对象图。
//!
//! ```rust
//! use di_abstractions::{provides, Dependencies, DependencyError, Injectable, ServiceIdentity};
//! use di_abstractions::{ServiceRegistry, ServiceResolver};
//! use di_impl::ServiceContainer;
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! pub struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! impl Injectable for English {
//!     fn dependencies() -> Vec<ServiceIdentity> {
//!         Vec::new()
//!     }
//!
//!     fn construct(_: &mut Dependencies) -> Result<Self, DependencyError> {
//!         Ok(English)
//!     }
//! }
//!
//! provides!(English => dyn Greeter);
//!
//! let mut container = ServiceContainer::new();
//! container.register_singleton::<dyn Greeter, English>();
//!
//! let greeter = container.resolve_one::<dyn Greeter>().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

use di_abstractions::{
    CircularDependencyDetector, ContainerConfig, ContainerStats, DefaultCircularDependencyDetector,
    Instance, ResolveContext, Resolved, ServiceDescriptor, ServiceRegistry, ServiceResolver,
};
use infrastructure_common::{DependencyError, ServiceIdentity};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, warn};

/// 服务容器
///
/// 注册需要 `&mut self`，解析只需要 `&self`：注册阶段结束后，容器可以放进
/// `Arc` 在线程间共享。单例缓存单元只写入一次，并发构建时先写入者胜出。
#[derive(Debug)]
pub struct ServiceContainer {
    /// 服务描述符，按注册顺序
    descriptors: Vec<ServiceDescriptor>,
    /// 容器配置
    config: ContainerConfig,
    /// 顶层解析次数
    resolutions: AtomicUsize,
    /// 解析错误次数
    resolution_errors: AtomicUsize,
}

impl ServiceContainer {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    ///
    /// 配置不做拒绝：`max_resolution_depth` 为 0 时只记录警告，之后的每次解析都会
    /// 返回 `ResolutionDepthExceeded`。需要提前拒绝时使用 [`ContainerConfig::validate`]。
    pub fn with_config(config: ContainerConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!("容器配置无效: {}", e);
        }
        Self {
            descriptors: Vec::new(),
            config,
            resolutions: AtomicUsize::new(0),
            resolution_errors: AtomicUsize::new(0),
        }
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_services: self.descriptors.len(),
            active_singletons: self
                .descriptors
                .iter()
                .filter(|descriptor| descriptor.cached_instance().is_some())
                .count(),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            resolution_errors: self.resolution_errors.load(Ordering::Relaxed),
        }
    }

    /// 验证容器状态
    ///
    /// 不构造任何实例，只检查注册表：不可实例化的实现、未注册的构造参数以及循环依赖。
    pub fn validate(&self) -> Result<(), Vec<DependencyError>> {
        info!("验证容器状态, 描述符数量: {}", self.descriptors.len());
        let mut errors = Vec::new();

        for descriptor in &self.descriptors {
            if descriptor.cached_instance().is_some() {
                continue;
            }
            let Some(constructor) = descriptor.implementation().and_then(|i| i.constructor())
            else {
                error!(
                    "服务 {} 绑定到不可实例化的类型 {}",
                    descriptor.identity(),
                    descriptor.implementation_name()
                );
                errors.push(DependencyError::not_constructible(
                    descriptor.implementation_name(),
                ));
                continue;
            };

            for parameter in constructor.parameters() {
                if !self.is_registered(parameter) {
                    error!(
                        "{} 的构造参数 {} 未注册",
                        descriptor.implementation_name(),
                        parameter
                    );
                    errors.push(DependencyError::not_registered(*parameter));
                }
            }
        }

        let detector = DefaultCircularDependencyDetector;
        let graph = detector.build_dependency_graph(&self.descriptors);
        if let Err(cycles) = detector.detect_circular_dependencies(&graph) {
            for cycle in &cycles {
                error!("{}", cycle);
            }
            errors.extend(cycles);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 解析顶层请求的标识：所有匹配的描述符按注册顺序依次激活
    fn resolve_with(
        &self,
        identity: &ServiceIdentity,
        context: &mut ResolveContext,
    ) -> Result<Resolved, DependencyError> {
        let descriptors = self.find_all(identity);
        if descriptors.is_empty() {
            return Err(DependencyError::not_registered(*identity));
        }

        context.push_identity(*identity)?;
        let instances = descriptors
            .into_iter()
            .map(|descriptor| self.activate(descriptor, context))
            .collect::<Result<Vec<_>, _>>();
        context.pop_identity();

        Ok(Resolved::from_instances(instances?))
    }

    /// 解析构造参数：只激活最先注册的描述符，后注册的描述符不参与
    fn resolve_parameter(
        &self,
        identity: &ServiceIdentity,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        let descriptor = self
            .descriptors
            .iter()
            .find(|descriptor| descriptor.identity() == identity)
            .ok_or_else(|| DependencyError::not_registered(*identity))?;

        context.push_identity(*identity)?;
        let instance = self.activate(descriptor, context);
        context.pop_identity();

        instance
    }

    /// 取得单个描述符对应的实例
    fn activate(
        &self,
        descriptor: &ServiceDescriptor,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        if let Some(instance) = descriptor.cached_instance() {
            return Ok(instance.clone());
        }

        let constructor = descriptor
            .implementation()
            .and_then(|implementation| implementation.constructor())
            .ok_or_else(|| DependencyError::not_constructible(descriptor.implementation_name()))?;

        let mut arguments = Vec::with_capacity(constructor.parameters().len());
        for parameter in constructor.parameters() {
            arguments.push(self.resolve_parameter(parameter, context)?);
        }

        debug!(
            "构造 {} ({}), 参数数量: {}",
            descriptor.implementation_name(),
            descriptor.lifetime(),
            arguments.len()
        );
        let instance = constructor.activate(arguments)?;

        Ok(descriptor.cache(instance))
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistry for ServiceContainer {
    fn add_descriptor(&mut self, descriptor: ServiceDescriptor) {
        info!(
            "注册服务: {} -> {} ({})",
            descriptor.identity(),
            descriptor.implementation_name(),
            descriptor.lifetime()
        );
        self.descriptors.push(descriptor);
    }

    fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }
}

impl ServiceResolver for ServiceContainer {
    fn resolve_identity(&self, identity: &ServiceIdentity) -> Result<Resolved, DependencyError> {
        debug!("解析服务: {}", identity);
        self.resolutions.fetch_add(1, Ordering::Relaxed);

        let mut context = ResolveContext::with_options(self.config.resolve_options());
        let result = self.resolve_with(identity, &mut context);

        if let Err(e) = &result {
            self.resolution_errors.fetch_add(1, Ordering::Relaxed);
            warn!("解析服务 {} 失败: {}", identity, e);
        }
        result
    }

    fn can_resolve(&self, identity: &ServiceIdentity) -> bool {
        self.is_registered(identity)
    }
}
