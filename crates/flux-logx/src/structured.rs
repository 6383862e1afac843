use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use crate::error::LogxError;

/// 记录自身占用的字段名，用户字段与之冲突时改写为 `fields.<key>`
pub const RESERVED_KEYS: [&str; 5] = ["time", "level", "msg", "module", "source"];

/// 日志级别
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(LogxError::InvalidLevel(s.to_string())),
        }
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

/// 调用点位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub file: String,
    pub line: u32,
}

impl From<&Location<'_>> for Source {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}

/// 结构化日志记录，每条序列化为一行 JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// 时间戳
    pub time: DateTime<Utc>,

    /// 日志级别
    pub level: LogLevel,

    /// 调用点（关闭 add_source 时省略）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<Source>,

    /// 日志消息
    pub msg: String,

    /// 模块名
    pub module: String,

    /// 自定义字段
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, msg: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            source: None,
            msg: msg.into(),
            module: module.into(),
            fields: Map::new(),
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// 同名字段后写覆盖先写
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.insert_field(key, value);
        self
    }

    pub fn insert_field(&mut self, key: &str, value: Value) {
        if RESERVED_KEYS.contains(&key) {
            self.fields.insert(format!("fields.{}", key), value);
        } else {
            self.fields.insert(key.to_string(), value);
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 序列化为以换行结尾的一行
    pub fn to_json_line(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}
