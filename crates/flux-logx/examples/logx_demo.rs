use flux_logx::{
    default_logger, register, string_value, with_add_source, with_context_extractor, with_level,
    with_output, Context, LogLevel, LogxConfig, Options, SharedBuffer,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() {
    // flux-logx 自身的诊断日志
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("flux_logx=debug"))
        .with_writer(std::io::stderr)
        .init();

    println!("=== FLUX IOT 模块日志示例 ===\n");

    // 1. 默认日志器
    println!("1. 默认日志器（stdout）");
    let logger = default_logger();
    logger.info_context(&Context::background(), "service started", &[("port", json!(8080))]);
    println!();

    // 2. 带上下文提取器的模块日志器
    println!("2. 上下文提取");
    let buffer = SharedBuffer::new();
    let device = register(
        "device",
        Some(Options::new([
            with_level(LogLevel::Debug),
            with_add_source(false),
            with_context_extractor("request_id", string_value("request_id")),
            with_context_extractor("tenant", string_value("tenant")),
            with_output(Some(buffer.sink())),
        ])),
    );

    let ctx = Context::background()
        .with_value("request_id", "req-7f3a".to_string())
        .with_value("tenant", "acme");
    device.debug_context(&ctx, "device online", &[("device_id", json!("dev-001"))]);
    device.warn_context(&ctx, "telemetry delayed", &[("lag_ms", json!(1500))]);
    for line in buffer.lines() {
        println!("  {}", line);
    }
    println!();

    // 3. 重复注册返回同一实例
    println!("3. 重复注册");
    let again = register("device", Some(Options::new([with_level(LogLevel::Error)])));
    println!("  same instance: {}", std::sync::Arc::ptr_eq(&device, &again));
    println!("  level: {}\n", again.level());

    // 4. 从配置文件注册
    println!("4. 配置文件");
    let config = LogxConfig::from_toml_str(
        r#"
[modules.rule]
level = "warn"
output = "stderr"
"#,
    );
    match config {
        Ok(config) => match config.register_all(flux_logx::registry::global()) {
            Ok(loggers) => {
                for logger in loggers {
                    println!("  {} -> {}", logger.module_name(), logger.level());
                    logger.warn("rule engine lagging", &[("pending", json!(12))]);
                }
            }
            Err(e) => eprintln!("register failed: {}", e),
        },
        Err(e) => eprintln!("invalid config: {}", e),
    }
}
