//! 服务解析器抽象接口
//!
//! 提供依赖解析和服务实例化的能力

use crate::factory::{downcast_instance, Instance};
use crate::registry::format_chain;
use infrastructure_common::{DependencyError, ServiceIdentity};
use std::sync::Arc;

/// 类型擦除的解析结果
///
/// 只有一个描述符匹配时返回 `Single`，多个描述符匹配时按注册顺序返回 `Many`。
#[derive(Debug, Clone)]
pub enum Resolved {
    /// 单个实例
    Single(Instance),
    /// 多个实例，按注册顺序
    Many(Vec<Instance>),
}

impl Resolved {
    /// 由实例列表构造解析结果
    ///
    /// 调用方保证列表非空。
    pub fn from_instances(mut instances: Vec<Instance>) -> Self {
        if instances.len() == 1 {
            Self::Single(instances.remove(0))
        } else {
            Self::Many(instances)
        }
    }

    /// 取第一个（最先注册的）实例
    pub fn into_first(self) -> Option<Instance> {
        match self {
            Self::Single(instance) => Some(instance),
            Self::Many(instances) => instances.into_iter().next(),
        }
    }

    /// 还原为类型化的解析结果
    pub fn downcast<I: ?Sized + Send + Sync + 'static>(
        self,
    ) -> Result<Resolution<I>, DependencyError> {
        match self {
            Self::Single(instance) => Ok(Resolution::Single(downcast_instance::<I>(&instance)?)),
            Self::Many(instances) => instances
                .iter()
                .map(downcast_instance::<I>)
                .collect::<Result<Vec<_>, _>>()
                .map(Resolution::Many),
        }
    }
}

/// 类型化的解析结果
pub enum Resolution<I: ?Sized> {
    /// 单个实例
    Single(Arc<I>),
    /// 多个实例，按注册顺序
    Many(Vec<Arc<I>>),
}

impl<I: ?Sized> Resolution<I> {
    /// 取单个实例；多个注册时返回 `None`
    pub fn single(self) -> Option<Arc<I>> {
        match self {
            Self::Single(instance) => Some(instance),
            Self::Many(_) => None,
        }
    }

    /// 取第一个（最先注册的）实例
    pub fn into_first(self) -> Option<Arc<I>> {
        match self {
            Self::Single(instance) => Some(instance),
            Self::Many(instances) => instances.into_iter().next(),
        }
    }

    /// 转换为实例列表
    pub fn into_vec(self) -> Vec<Arc<I>> {
        match self {
            Self::Single(instance) => vec![instance],
            Self::Many(instances) => instances,
        }
    }

    /// 是否有多个注册
    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

impl<I: ?Sized> std::fmt::Debug for Resolution<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(_) => f.write_str("Resolution::Single"),
            Self::Many(instances) => write!(f, "Resolution::Many({})", instances.len()),
        }
    }
}

/// 服务解析器 trait
///
/// 负责解析服务依赖并创建服务实例
pub trait ServiceResolver {
    /// 解析指定标识的服务
    fn resolve_identity(&self, identity: &ServiceIdentity) -> Result<Resolved, DependencyError>;

    /// 检查是否可以解析指定标识（只检查是否已注册，不构造实例）
    fn can_resolve(&self, identity: &ServiceIdentity) -> bool;

    /// 解析服务 `I`
    fn resolve<I>(&self) -> Result<Resolution<I>, DependencyError>
    where
        I: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        self.resolve_identity(&ServiceIdentity::of::<I>())?
            .downcast::<I>()
    }

    /// 解析服务 `I`，多个注册时取最先注册的实例
    fn resolve_one<I>(&self) -> Result<Arc<I>, DependencyError>
    where
        I: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        let identity = ServiceIdentity::of::<I>();
        self.resolve::<I>()?
            .into_first()
            .ok_or(DependencyError::NotRegistered { identity })
    }

    /// 解析服务 `I` 的所有实现，按注册顺序
    fn resolve_all<I>(&self) -> Result<Vec<Arc<I>>, DependencyError>
    where
        I: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        Ok(self.resolve::<I>()?.into_vec())
    }
}

/// 解析上下文
///
/// 记录当前解析链，用于检测循环依赖和限制递归深度。
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链
    pub resolution_chain: Vec<ServiceIdentity>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::with_options(ResolveOptions::default())
    }

    /// 使用指定选项创建解析上下文
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加标识到解析链
    pub fn push_identity(&mut self, identity: ServiceIdentity) -> Result<(), DependencyError> {
        if self.options.detect_cycles {
            if let Some(start) = self.resolution_chain.iter().position(|i| *i == identity) {
                return Err(DependencyError::CircularDependency {
                    dependency_chain: format_chain(&self.resolution_chain[start..], identity),
                });
            }
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                identity,
                max_depth: self.options.max_depth,
            });
        }
        self.resolution_chain.push(identity);
        Ok(())
    }

    /// 从解析链中移除最后一个标识
    pub fn pop_identity(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 是否检测循环依赖
    pub detect_cycles: bool,
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::erase;

    trait First {}
    trait Second {}

    #[test]
    fn test_cycle_is_reported_with_chain() {
        let mut context = ResolveContext::new();
        context.push_identity(ServiceIdentity::of::<dyn First>()).unwrap();
        context.push_identity(ServiceIdentity::of::<dyn Second>()).unwrap();

        let error = context
            .push_identity(ServiceIdentity::of::<dyn First>())
            .unwrap_err();
        match error {
            DependencyError::CircularDependency { dependency_chain } => {
                assert_eq!(dependency_chain, "First -> Second -> First");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_depth_limit_without_cycle_detection() {
        let mut context = ResolveContext::with_options(ResolveOptions {
            detect_cycles: false,
            max_depth: 2,
        });
        context.push_identity(ServiceIdentity::of::<dyn First>()).unwrap();
        context.push_identity(ServiceIdentity::of::<dyn First>()).unwrap();
        assert!(matches!(
            context.push_identity(ServiceIdentity::of::<dyn First>()),
            Err(DependencyError::ResolutionDepthExceeded { max_depth: 2, .. })
        ));

        context.pop_identity();
        assert_eq!(context.depth(), 1);
    }

    #[test]
    fn test_resolved_shape_follows_instance_count() {
        let single = Resolved::from_instances(vec![erase(Arc::new(1_u32))]);
        assert!(matches!(single, Resolved::Single(_)));

        let many = Resolved::from_instances(vec![erase(Arc::new(1_u32)), erase(Arc::new(2_u32))]);
        let typed = many.downcast::<u32>().unwrap();
        assert!(typed.is_many());
        let values: Vec<u32> = typed.into_vec().iter().map(|v| **v).collect();
        assert_eq!(values, vec![1, 2]);
    }
}
