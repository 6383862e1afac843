use std::collections::HashMap;
use std::sync::Arc;

use crate::context::{Context, ContextExtractor};
use crate::sink::Sink;
use crate::structured::LogLevel;

/// 日志器配置
///
/// 注册时按值移交给注册表，之后无法再修改。
#[derive(Clone)]
pub struct Options {
    pub(crate) level: LogLevel,
    pub(crate) add_source: bool,
    pub(crate) output: Sink,
    pub(crate) context_extractors: HashMap<String, ContextExtractor>,
}

/// 修改 `Options` 的函数
pub type OptionsFn = Box<dyn FnOnce(&mut Options)>;

impl Options {
    /// 从默认值出发，按顺序应用每个修改函数
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = OptionsFn>,
    {
        let mut opts = Self::default();
        for option in options {
            option(&mut opts);
        }
        opts
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn add_source(&self) -> bool {
        self.add_source
    }

    pub fn output(&self) -> &Sink {
        &self.output
    }

    /// 已注册的提取器键，无固定顺序
    pub fn extractor_keys(&self) -> Vec<&str> {
        self.context_extractors.keys().map(String::as_str).collect()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            add_source: true,
            output: Sink::stdout(),
            context_extractors: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys = self.extractor_keys();
        keys.sort_unstable();
        f.debug_struct("Options")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("output", &self.output)
            .field("context_extractors", &keys)
            .finish()
    }
}

/// 设置最低输出级别
pub fn with_level(level: LogLevel) -> OptionsFn {
    Box::new(move |o: &mut Options| o.level = level)
}

/// 是否在记录中附带调用点文件与行号
pub fn with_add_source(add_source: bool) -> OptionsFn {
    Box::new(move |o: &mut Options| o.add_source = add_source)
}

/// 设置输出目标，`None` 时使用标准输出
pub fn with_output(output: Option<Sink>) -> OptionsFn {
    Box::new(move |o: &mut Options| o.output = output.unwrap_or_default())
}

/// 为 `key` 注册上下文提取器，只覆盖同名键
pub fn with_context_extractor<F>(key: impl Into<String>, extractor: F) -> OptionsFn
where
    F: Fn(&Context) -> String + Send + Sync + 'static,
{
    let key = key.into();
    let extractor: ContextExtractor = Arc::new(extractor);
    Box::new(move |o: &mut Options| {
        o.context_extractors.insert(key, extractor);
    })
}
