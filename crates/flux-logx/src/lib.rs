//! 按模块注册的结构化日志。
//!
//! 每个模块名对应一个进程级的 [`Logx`]，首次 [`register`] 时按 [`Options`] 构造，
//! 之后同名注册直接返回已有实例。`*_context` 系列方法会运行注册的上下文提取器，
//! 把结果作为字段追加到每条 JSON 记录中。
//!
//! ```
//! use flux_logx::{register, with_context_extractor, with_level, Context, LogLevel, Options};
//!
//! let logger = register(
//!     "billing",
//!     Some(Options::new([
//!         with_level(LogLevel::Debug),
//!         with_context_extractor("request_id", |ctx: &Context| {
//!             ctx.value::<String>("request_id").cloned().unwrap_or_default()
//!         }),
//!     ])),
//! );
//!
//! let ctx = Context::background().with_value("request_id", "req-42".to_string());
//! logger.info_context(&ctx, "invoice created", &[("amount", serde_json::json!(1200))]);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod options;
pub mod registry;
pub mod sink;
pub mod structured;

pub use config::{LogxConfig, ModuleConfig, OutputTarget};
pub use context::{string_value, Context, ContextExtractor};
pub use error::LogxError;
pub use logger::Logx;
pub use options::{
    with_add_source, with_context_extractor, with_level, with_output, Options, OptionsFn,
};
pub use registry::{default_logger, get_logger, register, Registry, DEFAULT_MODULE_NAME};
pub use sink::{SharedBuffer, Sink};
pub use structured::{LogLevel, LogRecord, Source};
