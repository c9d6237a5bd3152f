//! 容器构建器

use crate::config_sources::{load_container_config, ConfigSource};
use di_abstractions::{
    erase, ContainerConfig, ImplementationType, Injectable, Lifetime, Provides, ServiceDescriptor,
    ServiceIdentity, ServiceRegistry,
};
use di_impl::ServiceContainer;
use infrastructure_common::InfrastructureError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 容器构建器
///
/// 使用建造者模式收集配置源、日志设置和服务注册，`build` 时按顺序完成：
/// 初始化日志、加载配置、创建容器、写入注册、验证。
pub struct ContainerBuilder {
    /// 显式指定的容器配置
    config: Option<ContainerConfig>,
    /// 配置源列表，按加入顺序
    config_sources: Vec<ConfigSource>,
    /// 待写入的服务描述符，按注册顺序
    registrations: Vec<ServiceDescriptor>,
    /// 构建后是否验证容器
    validate_on_build: bool,
    /// 日志配置，`None` 表示不初始化日志
    logging_config: Option<LoggingConfig>,
}

impl ContainerBuilder {
    /// 创建新的容器构建器
    pub fn new() -> Self {
        Self {
            config: None,
            config_sources: Vec::new(),
            registrations: Vec::new(),
            validate_on_build: false,
            logging_config: None,
        }
    }

    /// 直接指定容器配置，覆盖所有配置源
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 添加配置文件（toml / json / yaml）
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加配置文件: {}", path.display());
        self.config_sources.push(ConfigSource::file(path));
        Ok(self)
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.config_sources.push(ConfigSource::environment(prefix));
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 构建后验证容器
    pub fn validate_on_build(mut self, enabled: bool) -> Self {
        self.validate_on_build = enabled;
        self
    }

    /// 将服务 `I` 绑定到实现 `T`
    pub fn register<I, T>(mut self, lifetime: Lifetime) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<I>,
    {
        debug!(
            "登记注册: {} -> {}",
            ServiceIdentity::of::<I>(),
            std::any::type_name::<T>()
        );
        self.registrations.push(ServiceDescriptor::new(
            ServiceIdentity::of::<I>(),
            ImplementationType::of::<I, T>(),
            lifetime,
        ));
        self
    }

    /// 注册已创建的实例
    pub fn register_instance<I>(mut self, instance: Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.registrations.push(ServiceDescriptor::from_instance(
            ServiceIdentity::of::<I>(),
            erase(instance),
        ));
        self
    }

    /// 待写入的注册数量
    pub fn pending_registrations(&self) -> usize {
        self.registrations.len()
    }

    /// 构建容器
    pub fn build(self) -> Result<ServiceContainer, InfrastructureError> {
        if let Some(logging_config) = &self.logging_config {
            initialize_logging(logging_config)?;
        }

        info!("开始构建容器");

        let config = match self.config {
            Some(config) => config,
            None if self.config_sources.is_empty() => ContainerConfig::default(),
            None => load_container_config(&self.config_sources)?,
        };
        config.validate()?;

        let mut container = ServiceContainer::with_config(config);
        for descriptor in self.registrations {
            container.add_descriptor(descriptor);
        }

        if self.validate_on_build {
            container.validate().map_err(|errors| {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                InfrastructureError::BootstrapFailed {
                    message: format!("容器验证失败: {}", messages.join("; ")),
                }
            })?;
        }

        info!("容器构建完成, 服务数量: {}", container.stats().registered_services);
        Ok(container)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 开发环境：DEBUG 级别，输出线程与源码位置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            ..Self::default()
        }
    }

    /// 生产环境：JSON 格式
    pub fn production() -> Self {
        Self {
            show_target: false,
            json_format: true,
            ..Self::default()
        }
    }
}

/// 初始化全局日志订阅者
///
/// 进程内只能成功一次，重复初始化返回 `BootstrapFailed`。
pub fn initialize_logging(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(config.level)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
