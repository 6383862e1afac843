use serde_json::Value;
use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;
use tracing::warn;

use crate::context::{Context, ContextExtractor};
use crate::options::Options;
use crate::sink::Sink;
use crate::structured::{LogLevel, LogRecord, Source};

/// 模块日志器
///
/// 构造后配置不再变化，通过 `Arc<Logx>` 在线程间共享。每条记录都带 `module` 字段。
pub struct Logx {
    module_name: String,
    level: LogLevel,
    add_source: bool,
    output: Sink,
    context_extractors: Arc<HashMap<String, ContextExtractor>>,
}

impl Logx {
    pub(crate) fn new(module_name: String, options: Options) -> Self {
        Self {
            module_name,
            level: options.level,
            add_source: options.add_source,
            output: options.output,
            context_extractors: Arc::new(options.context_extractors),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn add_source(&self) -> bool {
        self.add_source
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    #[track_caller]
    pub fn debug_context(&self, ctx: &Context, msg: &str, fields: &[(&str, Value)]) {
        self.log_context(LogLevel::Debug, ctx, msg, fields);
    }

    #[track_caller]
    pub fn info_context(&self, ctx: &Context, msg: &str, fields: &[(&str, Value)]) {
        self.log_context(LogLevel::Info, ctx, msg, fields);
    }

    #[track_caller]
    pub fn warn_context(&self, ctx: &Context, msg: &str, fields: &[(&str, Value)]) {
        self.log_context(LogLevel::Warn, ctx, msg, fields);
    }

    #[track_caller]
    pub fn error_context(&self, ctx: &Context, msg: &str, fields: &[(&str, Value)]) {
        self.log_context(LogLevel::Error, ctx, msg, fields);
    }

    /// 运行全部提取器，把结果作为字符串字段追加在调用方字段之后，再按级别输出
    #[track_caller]
    pub fn log_context(&self, level: LogLevel, ctx: &Context, msg: &str, fields: &[(&str, Value)]) {
        let extracted = self.extract(ctx);
        let location = Location::caller();
        if !self.enabled(level) {
            return;
        }
        let mut record = self.record(level, msg, location, fields);
        for (key, value) in extracted {
            record.insert_field(key, Value::String(value));
        }
        self.write(&record);
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Debug, msg, fields);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Info, msg, fields);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Warn, msg, fields);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Error, msg, fields);
    }

    /// 不经过上下文提取器直接输出
    #[track_caller]
    pub fn log(&self, level: LogLevel, msg: &str, fields: &[(&str, Value)]) {
        if !self.enabled(level) {
            return;
        }
        let record = self.record(level, msg, Location::caller(), fields);
        self.write(&record);
    }

    fn extract<'a>(&'a self, ctx: &Context) -> Vec<(&'a str, String)> {
        self.context_extractors
            .iter()
            .map(|(key, extractor)| (key.as_str(), extractor(ctx)))
            .collect()
    }

    fn record(
        &self,
        level: LogLevel,
        msg: &str,
        location: &Location<'_>,
        fields: &[(&str, Value)],
    ) -> LogRecord {
        let mut record = LogRecord::new(level, msg, self.module_name.as_str());
        if self.add_source {
            record = record.with_source(Source::from(location));
        }
        for (key, value) in fields {
            record.insert_field(key, value.clone());
        }
        record
    }

    fn write(&self, record: &LogRecord) {
        let line = match record.to_json_line() {
            Ok(line) => line,
            Err(e) => {
                warn!(module = %self.module_name, "Failed to encode log record: {}", e);
                return;
            }
        };
        if let Err(e) = self.output.write_line(&line) {
            warn!(module = %self.module_name, "Failed to write log record: {}", e);
        }
    }
}

impl std::fmt::Debug for Logx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logx")
            .field("module_name", &self.module_name)
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("output", &self.output)
            .finish()
    }
}
