//! 配置源加载
//!
//! 使用 `config` crate 合并默认值、配置文件和环境变量，读取 `container` 配置节。

use di_abstractions::ContainerConfig;
use infrastructure_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 容器配置所在的配置节
pub const CONTAINER_SECTION: &str = "container";

/// 配置源描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// 配置文件，格式由扩展名决定（toml / json / yaml）
    File(PathBuf),
    /// 环境变量，形如 `<PREFIX>_CONTAINER__MAX_RESOLUTION_DEPTH`
    Environment { prefix: String },
}

impl ConfigSource {
    /// 配置文件源
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// 环境变量源
    pub fn environment<S: Into<String>>(prefix: S) -> Self {
        Self::Environment {
            prefix: prefix.into(),
        }
    }
}

/// 按顺序加载配置源，后加入的源覆盖先加入的源
///
/// 没有 `container` 配置节时返回默认配置。
pub fn load_container_config(sources: &[ConfigSource]) -> Result<ContainerConfig, ConfigError> {
    let mut builder = config::Config::builder();

    for source in sources {
        match source {
            ConfigSource::File(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                debug!("加载配置文件: {}", path.display());
                builder = builder.add_source(config::File::from(path.as_path()));
            }
            ConfigSource::Environment { prefix } => {
                debug!("加载环境变量配置, 前缀: {}", prefix);
                builder = builder.add_source(
                    config::Environment::with_prefix(prefix)
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                );
            }
        }
    }

    let settings = builder.build().map_err(|e| ConfigError::ParseError {
        source: Box::new(e),
    })?;

    let container_config = match settings.get::<ContainerConfig>(CONTAINER_SECTION) {
        Ok(container_config) => container_config,
        Err(config::ConfigError::NotFound(_)) => ContainerConfig::default(),
        Err(e) => {
            return Err(ConfigError::ParseError {
                source: Box::new(e),
            })
        }
    };

    container_config.validate()?;

    info!(
        "容器配置加载完成: 循环依赖检测={}, 最大解析深度={}",
        container_config.enable_circular_dependency_detection,
        container_config.max_resolution_depth
    );
    Ok(container_config)
}
