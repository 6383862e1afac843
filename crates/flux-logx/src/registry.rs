use dashmap::DashMap;
use lazy_static::lazy_static;
use std::sync::Arc;
use tracing::debug;

use crate::logger::Logx;
use crate::options::Options;

/// 未指定模块名时使用的名称
pub const DEFAULT_MODULE_NAME: &str = "default";

lazy_static! {
    static ref MODULE_LOGGERS: Registry = Registry::new();
}

fn module_name(name: &str) -> &str {
    if name.is_empty() {
        DEFAULT_MODULE_NAME
    } else {
        name
    }
}

/// 模块名到日志器的并发映射
///
/// 条目只增不删。同名首次注册生效，之后的注册忽略传入的配置并返回已有日志器。
#[derive(Clone, Default)]
pub struct Registry {
    loggers: Arc<DashMap<String, Arc<Logx>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取或创建模块日志器，`options` 为 `None` 时使用默认配置
    pub fn register(&self, name: &str, options: Option<Options>) -> Arc<Logx> {
        let name = module_name(name);
        if let Some(logger) = self.loggers.get(name) {
            return logger.value().clone();
        }

        let mut created = false;
        let logger = self
            .loggers
            .entry(name.to_string())
            .or_insert_with(|| {
                created = true;
                Arc::new(Logx::new(name.to_string(), options.unwrap_or_default()))
            })
            .value()
            .clone();

        if created {
            debug!(
                module = name,
                level = %logger.level(),
                add_source = logger.add_source(),
                "Registered module logger"
            );
        }
        logger
    }

    pub fn get_logger(&self, name: &str) -> Option<Arc<Logx>> {
        self.loggers
            .get(module_name(name))
            .map(|logger| logger.value().clone())
    }

    pub fn default_logger(&self) -> Arc<Logx> {
        match self.get_logger(DEFAULT_MODULE_NAME) {
            Some(logger) => logger,
            None => self.register("", None),
        }
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    /// 已注册的模块名（排序后）
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("modules", &self.module_names())
            .finish()
    }
}

/// 全局注册表
pub fn global() -> &'static Registry {
    &MODULE_LOGGERS
}

/// 在全局注册表中获取或创建模块日志器
pub fn register(name: &str, options: Option<Options>) -> Arc<Logx> {
    global().register(name, options)
}

/// 在全局注册表中查找模块日志器，不会创建
pub fn get_logger(name: &str) -> Option<Arc<Logx>> {
    global().get_logger(name)
}

/// 全局默认日志器，首次调用时以默认配置创建
pub fn default_logger() -> Arc<Logx> {
    global().default_logger()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{with_level, with_output};
    use crate::sink::SharedBuffer;
    use crate::structured::LogLevel;
    use crate::Context;
    use std::thread;

    #[test]
    fn test_register_normalizes_empty_name() {
        let registry = Registry::new();

        let empty = registry.register("", None);
        let named = registry.register("default", None);

        assert_eq!(empty.module_name(), DEFAULT_MODULE_NAME);
        assert!(Arc::ptr_eq(&empty, &named));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = Registry::new();
        let first = SharedBuffer::new();
        let second = SharedBuffer::new();

        let a = registry.register(
            "billing",
            Some(Options::new([with_output(Some(first.sink()))])),
        );
        let b = registry.register(
            "billing",
            Some(Options::new([
                with_output(Some(second.sink())),
                with_level(LogLevel::Error),
            ])),
        );

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.level(), LogLevel::Info);

        b.info_context(&Context::background(), "charged", &[]);
        assert_eq!(first.lines().len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_get_logger() {
        let registry = Registry::new();
        assert!(registry.get_logger("orders").is_none());
        assert!(registry.is_empty());

        let registered = registry.register("orders", None);
        let found = registry.get_logger("orders").unwrap();
        assert!(Arc::ptr_eq(&registered, &found));
    }

    #[test]
    fn test_get_logger_empty_name() {
        let registry = Registry::new();
        assert!(registry.get_logger("").is_none());

        let logger = registry.default_logger();
        assert!(Arc::ptr_eq(&logger, &registry.get_logger("").unwrap()));
    }

    #[test]
    fn test_default_logger_is_singleton() {
        let registry = Registry::new();

        let a = registry.default_logger();
        let b = registry.default_logger();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.module_name(), DEFAULT_MODULE_NAME);
        assert_eq!(a.level(), LogLevel::Info);
        assert!(a.add_source());
    }

    #[test]
    fn test_concurrent_register_single_winner() {
        let registry = Registry::new();

        let loggers: Vec<Arc<Logx>> = thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| registry.register("race", None)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for logger in &loggers {
            assert!(Arc::ptr_eq(logger, &loggers[0]));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_module_names_sorted() {
        let registry = Registry::new();
        registry.register("video", None);
        registry.register("auth", None);
        registry.register("", None);

        assert_eq!(registry.module_names(), vec!["auth", "default", "video"]);
    }

    #[test]
    fn test_global_registry() {
        let logger = register("registry-global-test", None);
        let found = get_logger("registry-global-test").unwrap();
        assert!(Arc::ptr_eq(&logger, &found));
        assert!(Arc::ptr_eq(&default_logger(), &default_logger()));
    }
}
