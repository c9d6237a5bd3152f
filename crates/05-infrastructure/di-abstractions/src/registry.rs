//! 服务注册表抽象接口
//!
//! 注册表是按插入顺序排列的 [`ServiceDescriptor`] 序列，只追加、不删除。

use crate::factory::{erase, Dependencies, Injectable, Instance, Provides};
use infrastructure_common::{DependencyError, Lifetime, ServiceIdentity, TypeInfo};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;

/// 实例激活函数类型
pub type ActivatorFn =
    Arc<dyn Fn(Vec<Instance>) -> Result<Instance, DependencyError> + Send + Sync>;

/// 构造签名
///
/// 有序的参数服务标识，加上用这些参数创建实例的激活函数。
#[derive(Clone)]
pub struct Constructor {
    parameters: Vec<ServiceIdentity>,
    activator: ActivatorFn,
}

impl Constructor {
    /// 使用手写的参数表和激活函数创建构造签名
    pub fn new<F>(parameters: Vec<ServiceIdentity>, activator: F) -> Self
    where
        F: Fn(Vec<Instance>) -> Result<Instance, DependencyError> + Send + Sync + 'static,
    {
        Self {
            parameters,
            activator: Arc::new(activator),
        }
    }

    /// 从 [`Injectable`] 实现生成构造签名，产出的实例以 `I` 的身份保存
    pub fn of<I, T>() -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<I>,
    {
        Self::new(T::dependencies(), |arguments| {
            let mut dependencies = Dependencies::new(std::any::type_name::<T>(), arguments);
            let implementation = Arc::new(T::construct(&mut dependencies)?);
            Ok(erase::<I>(<T as Provides<I>>::provide(implementation)))
        })
    }

    /// 参数服务标识，按声明顺序
    pub fn parameters(&self) -> &[ServiceIdentity] {
        &self.parameters
    }

    /// 使用已解析的参数创建实例
    pub fn activate(&self, arguments: Vec<Instance>) -> Result<Instance, DependencyError> {
        (self.activator)(arguments)
    }
}

impl std::fmt::Debug for Constructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .field("activator", &"<function>")
            .finish()
    }
}

/// 实现类型
///
/// 没有构造签名的实现类型代表抽象类型或纯接口，只能注册，不能解析。
#[derive(Debug, Clone)]
pub struct ImplementationType {
    type_info: TypeInfo,
    constructor: Option<Constructor>,
}

impl ImplementationType {
    /// 可实例化的实现类型
    pub fn of<I, T>() -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<I>,
    {
        Self {
            type_info: TypeInfo::of::<T>(),
            constructor: Some(Constructor::of::<I, T>()),
        }
    }

    /// 抽象类型或接口（没有构造函数）
    pub fn interface<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            constructor: None,
        }
    }

    /// 使用手写的构造签名
    pub fn with_constructor(type_info: TypeInfo, constructor: Constructor) -> Self {
        Self {
            type_info,
            constructor: Some(constructor),
        }
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 构造签名
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// 是否可以实例化
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }
}

/// 服务描述符
///
/// 一条注册记录。单例的实例缓存在描述符自己的缓存单元里，首次写入后不再改变。
pub struct ServiceDescriptor {
    identity: ServiceIdentity,
    implementation: Option<ImplementationType>,
    instance: OnceCell<Instance>,
    lifetime: Lifetime,
}

impl ServiceDescriptor {
    /// 创建新的服务描述符
    pub fn new(
        identity: ServiceIdentity,
        implementation: ImplementationType,
        lifetime: Lifetime,
    ) -> Self {
        Self {
            identity,
            implementation: Some(implementation),
            instance: OnceCell::new(),
            lifetime,
        }
    }

    /// 使用已存在的实例创建描述符（单例）
    pub fn from_instance(identity: ServiceIdentity, instance: Instance) -> Self {
        Self {
            identity,
            implementation: None,
            instance: OnceCell::with_value(instance),
            lifetime: Lifetime::Singleton,
        }
    }

    /// 服务标识
    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// 实现类型
    pub fn implementation(&self) -> Option<&ImplementationType> {
        self.implementation.as_ref()
    }

    /// 生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// 已缓存或预先提供的实例
    pub fn cached_instance(&self) -> Option<&Instance> {
        self.instance.get()
    }

    /// 按生命周期缓存新建的实例，返回调用方应该使用的实例
    ///
    /// 瞬时服务不缓存，原样返回。单例只写入一次：
    /// 如果其他解析已经先写入，则返回已缓存的实例。
    pub fn cache(&self, instance: Instance) -> Instance {
        if !self.lifetime.is_cached() {
            return instance;
        }
        match self.instance.try_insert(instance) {
            Ok(stored) | Err((stored, _)) => stored.clone(),
        }
    }

    /// 实现类型名称，用于诊断输出
    pub fn implementation_name(&self) -> &str {
        self.implementation
            .as_ref()
            .map_or("<instance>", |implementation| {
                implementation.type_info().module_path.as_str()
            })
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("identity", &self.identity)
            .field("implementation", &self.implementation_name())
            .field("lifetime", &self.lifetime)
            .field("cached", &self.instance.get().is_some())
            .finish()
    }
}

/// 服务注册表 trait
///
/// 注册只做追加，不验证实现类型是否可以实例化，也不检查标识是否重复。
pub trait ServiceRegistry {
    /// 追加描述符
    fn add_descriptor(&mut self, descriptor: ServiceDescriptor);

    /// 所有描述符，按注册顺序
    fn descriptors(&self) -> &[ServiceDescriptor];

    /// 查找指定标识的所有描述符，保持注册顺序；没有匹配时返回空列表
    fn find_all(&self, identity: &ServiceIdentity) -> Vec<&ServiceDescriptor> {
        self.descriptors()
            .iter()
            .filter(|descriptor| descriptor.identity() == identity)
            .collect()
    }

    /// 检查标识是否已注册
    fn is_registered(&self, identity: &ServiceIdentity) -> bool {
        self.descriptors()
            .iter()
            .any(|descriptor| descriptor.identity() == identity)
    }

    /// 检查类型是否已注册
    fn is_registered_type<I>(&self) -> bool
    where
        I: ?Sized + 'static,
        Self: Sized,
    {
        self.is_registered(&ServiceIdentity::of::<I>())
    }

    /// 注册实现类型（非泛型形式）
    fn register_type(
        &mut self,
        identity: ServiceIdentity,
        implementation: ImplementationType,
        lifetime: Lifetime,
    ) {
        self.add_descriptor(ServiceDescriptor::new(identity, implementation, lifetime));
    }

    /// 将服务 `I` 绑定到实现 `T`
    fn register<I, T>(&mut self, lifetime: Lifetime)
    where
        I: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<I>,
        Self: Sized,
    {
        self.register_type(
            ServiceIdentity::of::<I>(),
            ImplementationType::of::<I, T>(),
            lifetime,
        );
    }

    /// 注册瞬时服务
    fn register_transient<I, T>(&mut self)
    where
        I: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<I>,
        Self: Sized,
    {
        self.register::<I, T>(Lifetime::Transient);
    }

    /// 注册单例服务
    fn register_singleton<I, T>(&mut self)
    where
        I: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<I>,
        Self: Sized,
    {
        self.register::<I, T>(Lifetime::Singleton);
    }

    /// 注册已创建的实例
    fn register_instance<I>(&mut self, instance: Arc<I>)
    where
        I: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        self.add_descriptor(ServiceDescriptor::from_instance(
            ServiceIdentity::of::<I>(),
            erase(instance),
        ));
    }
}

/// 依赖图节点
#[derive(Debug, Clone)]
pub struct DependencyGraphNode {
    /// 服务标识
    pub identity: ServiceIdentity,
    /// 依赖的服务标识（同一标识的所有描述符合并，去重）
    pub dependencies: Vec<ServiceIdentity>,
}

/// 循环依赖检测器
pub trait CircularDependencyDetector: Send + Sync {
    /// 检测循环依赖，返回发现的所有循环
    fn detect_circular_dependencies(
        &self,
        graph: &[DependencyGraphNode],
    ) -> Result<(), Vec<DependencyError>>;

    /// 构建依赖图
    fn build_dependency_graph(&self, descriptors: &[ServiceDescriptor]) -> Vec<DependencyGraphNode>;
}

/// 默认循环依赖检测器
#[derive(Debug, Default)]
pub struct DefaultCircularDependencyDetector;

impl CircularDependencyDetector for DefaultCircularDependencyDetector {
    fn detect_circular_dependencies(
        &self,
        graph: &[DependencyGraphNode],
    ) -> Result<(), Vec<DependencyError>> {
        // 深度优先搜索，path 记录当前访问路径
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for node in graph {
            if !visited.contains(&node.identity) {
                Self::dfs_check(node.identity, graph, &mut visited, &mut path, &mut cycles);
            }
        }

        if cycles.is_empty() {
            Ok(())
        } else {
            Err(cycles)
        }
    }

    fn build_dependency_graph(&self, descriptors: &[ServiceDescriptor]) -> Vec<DependencyGraphNode> {
        let mut graph: Vec<DependencyGraphNode> = Vec::new();

        for descriptor in descriptors {
            // 预先提供的实例不会再构造，没有出边
            let parameters: &[ServiceIdentity] = match descriptor.implementation().and_then(|i| i.constructor()) {
                Some(constructor) if descriptor.cached_instance().is_none() => {
                    constructor.parameters()
                }
                _ => &[],
            };

            let index = match graph
                .iter()
                .position(|node| node.identity == *descriptor.identity())
            {
                Some(index) => index,
                None => {
                    graph.push(DependencyGraphNode {
                        identity: *descriptor.identity(),
                        dependencies: Vec::new(),
                    });
                    graph.len() - 1
                }
            };

            for parameter in parameters {
                if !graph[index].dependencies.contains(parameter) {
                    graph[index].dependencies.push(*parameter);
                }
            }
        }

        graph
    }
}

impl DefaultCircularDependencyDetector {
    fn dfs_check(
        current: ServiceIdentity,
        graph: &[DependencyGraphNode],
        visited: &mut HashSet<ServiceIdentity>,
        path: &mut Vec<ServiceIdentity>,
        cycles: &mut Vec<DependencyError>,
    ) {
        if let Some(start) = path.iter().position(|identity| *identity == current) {
            cycles.push(DependencyError::CircularDependency {
                dependency_chain: format_chain(&path[start..], current),
            });
            return;
        }

        if visited.contains(&current) {
            return;
        }

        path.push(current);

        if let Some(node) = graph.iter().find(|node| node.identity == current) {
            for dependency in &node.dependencies {
                Self::dfs_check(*dependency, graph, visited, path, cycles);
            }
        }

        path.pop();
        visited.insert(current);
    }
}

/// 把依赖链格式化为 `A -> B -> A`
pub fn format_chain(chain: &[ServiceIdentity], repeated: ServiceIdentity) -> String {
    chain
        .iter()
        .chain(std::iter::once(&repeated))
        .map(ServiceIdentity::short_name)
        .collect::<Vec<_>>()
        .join(" -> ")
}
