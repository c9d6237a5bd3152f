//! 组合层测试


use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub(crate) fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

/// 生成不会与其他测试冲突的环境变量前缀
pub(crate) fn unique_env_prefix() -> String {
    format!("LORN{}", uuid::Uuid::new_v4().simple()).to_uppercase()
}
