//! 错误类型定义

use crate::metadata::ServiceIdentity;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
///
/// 所有变体都只会在解析阶段产生，注册服务永远不会失败。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("服务未注册: {identity}")]
    NotRegistered { identity: ServiceIdentity },

    #[error("无法实例化类型: {type_name}（抽象类型或接口没有可用的构造函数）")]
    NotConstructible { type_name: String },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {max_depth}: {identity}")]
    ResolutionDepthExceeded {
        identity: ServiceIdentity,
        max_depth: usize,
    },

    #[error("实例类型不匹配, 期望: Arc<{expected}>")]
    TypeMismatch { expected: String },

    #[error("依赖解析失败: {type_name}, 原因: {message}")]
    DependencyResolutionFailed { type_name: String, message: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DependencyError {
    /// 创建未注册错误
    pub fn not_registered(identity: ServiceIdentity) -> Self {
        Self::NotRegistered { identity }
    }

    /// 创建不可实例化错误
    pub fn not_constructible(type_name: impl Into<String>) -> Self {
        Self::NotConstructible {
            type_name: type_name.into(),
        }
    }

    /// 创建组件创建失败错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
