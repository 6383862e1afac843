use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LogxError;
use crate::logger::Logx;
use crate::options::Options;
use crate::registry::Registry;
use crate::sink::Sink;
use crate::structured::LogLevel;

/// 输出目标配置：`"stdout"`、`"stderr"` 或文件路径
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}

impl From<String> for OutputTarget {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" | "stdout" => OutputTarget::Stdout,
            "stderr" => OutputTarget::Stderr,
            _ => OutputTarget::File(PathBuf::from(s)),
        }
    }
}

impl OutputTarget {
    pub fn open(&self) -> Result<Sink, LogxError> {
        match self {
            OutputTarget::Stdout => Ok(Sink::stdout()),
            OutputTarget::Stderr => Ok(Sink::stderr()),
            OutputTarget::File(path) => Ok(Sink::file(path)?),
        }
    }
}

/// 单个模块的日志配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    pub level: String,
    pub add_source: bool,
    pub output: OutputTarget,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            add_source: true,
            output: OutputTarget::default(),
        }
    }
}

impl ModuleConfig {
    /// 转换为 `Options`，文件输出在此时打开
    pub fn into_options(self) -> Result<Options, LogxError> {
        let level: LogLevel = self.level.parse()?;
        let output = self.output.open()?;
        Ok(Options {
            level,
            add_source: self.add_source,
            output,
            ..Options::default()
        })
    }
}

/// 日志配置文件
///
/// ```toml
/// [modules.billing]
/// level = "debug"
/// output = "/var/log/flux/billing.log"
///
/// [modules.auth]
/// add_source = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogxConfig {
    pub modules: BTreeMap<String, ModuleConfig>,
}

impl LogxConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, LogxError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LogxError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// 注册所有配置的模块；已注册的模块保持原样
    pub fn register_all(&self, registry: &Registry) -> Result<Vec<Arc<Logx>>, LogxError> {
        let mut loggers = Vec::with_capacity(self.modules.len());
        for (name, module) in &self.modules {
            if let Some(existing) = registry.get_logger(name) {
                loggers.push(existing);
                continue;
            }
            let options = module.clone().into_options()?;
            loggers.push(registry.register(name, Some(options)));
        }
        Ok(loggers)
    }
}
