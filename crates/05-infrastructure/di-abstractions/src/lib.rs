//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceRegistry`] - 服务注册表接口（按注册顺序保存描述符）
//! - [`ServiceResolver`] - 服务解析器接口
//! - [`Injectable`] - 构造签名（参数表 + 构造逻辑）
//! - [`Provides`] - 实现类型到服务接口的转换

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;

pub use infrastructure_common::{DependencyError, DependencyResult, Lifetime, ServiceIdentity, TypeInfo};
