//! # 基础设施组合层
//!
//! 把配置源、日志和服务注册组合成一个可用的 [`ServiceContainer`]。
//!
//! ```rust
//! use di_abstractions::{Dependencies, DependencyError, Injectable, Lifetime, ServiceIdentity};
//! use di_abstractions::ServiceResolver;
//! use infrastructure_composition::ContainerBuilder;
//!
//! pub struct Clock;
//!
//! impl Injectable for Clock {
//!     fn dependencies() -> Vec<ServiceIdentity> {
//!         Vec::new()
//!     }
//!
//!     fn construct(_: &mut Dependencies) -> Result<Self, DependencyError> {
//!         Ok(Clock)
//!     }
//! }
//!
//! let container = ContainerBuilder::new()
//!     .register::<Clock, Clock>(Lifetime::Singleton)
//!     .validate_on_build(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(container.resolve_one::<Clock>().is_ok());
//! ```

pub mod builder;
pub mod config_sources;

#[cfg(test)]
mod tests;

pub use builder::{initialize_logging, ContainerBuilder, LoggingConfig};
pub use config_sources::{load_container_config, ConfigSource, CONTAINER_SECTION};
pub use di_impl::ServiceContainer;

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
