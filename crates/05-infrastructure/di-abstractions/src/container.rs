//! 容器配置与统计

use crate::resolver::ResolveOptions;
use infrastructure_common::ConfigError;
use serde::Deserialize;

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 是否启用循环依赖检测
    pub enable_circular_dependency_detection: bool,
    /// 最大解析深度，必须大于 0（为 0 时任何解析都会失败）
    pub max_resolution_depth: usize,
}

impl ContainerConfig {
    /// 检查配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 转换为解析选项
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            detect_cycles: self.enable_circular_dependency_detection,
            max_depth: self.max_resolution_depth,
        }
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            enable_circular_dependency_detection: true,
            max_resolution_depth: 100,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册服务数量（描述符数量）
    pub registered_services: usize,
    /// 已缓存实例的单例数量
    pub active_singletons: usize,
    /// 顶层解析次数
    pub resolutions: usize,
    /// 解析错误次数
    pub resolution_errors: usize,
}
