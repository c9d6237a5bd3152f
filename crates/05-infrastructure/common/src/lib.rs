//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn IoC 容器各层共用的基础类型。
//!
//! ## 核心类型
//!
//! - [`ServiceIdentity`] - 服务标识（注册表的查找键）
//! - [`TypeInfo`] - 类型诊断信息
//! - [`Lifetime`] - 服务生命周期
//! - [`DependencyError`] - 依赖注入错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 错误类型按关注点划分

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
