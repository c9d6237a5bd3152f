//! 集成测试共用的服务与实现

use component_macros::Injectable;
use std::sync::Arc;
use uuid::Uuid;

/// 计算服务
pub trait Calculator: Send + Sync {
    fn add(&self, a: f64, b: f64) -> f64;
    fn instance_id(&self) -> Uuid;
}

/// 实例编号，默认值随机生成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceId(pub Uuid);

impl Default for InstanceId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Injectable)]
#[injectable(provides(dyn Calculator))]
pub struct BasicCalculator {
    id: InstanceId,
}

impl Calculator for BasicCalculator {
    fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    fn instance_id(&self) -> Uuid {
        self.id.0
    }
}

/// 依赖计算服务的视图
#[derive(Injectable)]
pub struct CalculatorView {
    pub calculator: Arc<dyn Calculator>,
    pub id: InstanceId,
}

/// 控制器
pub trait Controller: Send + Sync {
    fn handle(&self, request: &str) -> String;

    /// 实现类型的完整名称
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[derive(Injectable)]
#[injectable(provides(dyn Controller))]
pub struct HomeController {
    calculator: Arc<dyn Calculator>,
}

impl Controller for HomeController {
    fn handle(&self, request: &str) -> String {
        format!("home:{request}:{}", self.calculator.add(1.0, 1.0))
    }
}

#[derive(Injectable)]
#[injectable(provides(dyn Controller))]
pub struct AccountController;

impl Controller for AccountController {
    fn handle(&self, request: &str) -> String {
        format!("account:{request}")
    }
}

/// 按控制器名称选择实现：多个注册时取第一个类型名包含该名称的实现
pub fn select_controller(
    controllers: Vec<Arc<dyn Controller>>,
    name: &str,
) -> Option<Arc<dyn Controller>> {
    controllers
        .into_iter()
        .find(|controller| controller.type_name().contains(name))
}
