/// 日志工具模块
///
/// 提供 tracing 初始化和日志格式化的辅助函数
use crate::config::Config;
use crate::models::{LogEntry, Severity};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化 tracing，默认级别 info，可用 `RUST_LOG` 覆盖
///
/// 重复调用不会报错（测试中常见）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 自动抓取模式");
    if config.headless {
        info!("🌐 浏览器: 无头模式");
    } else {
        info!("🌐 浏览器调试端口: {}", config.browser_debug_port);
    }
    info!("💾 数据文件: {}", config.data_file.display());
    info!("{}", "=".repeat(60));
}

/// 把运行日志打印到终端
pub fn echo_entry(entry: &LogEntry) {
    match entry.severity {
        Severity::Info => info!("{} {}", entry.timestamp, entry.message),
        Severity::Success => info!("{} ✓ {}", entry.timestamp, entry.message),
        Severity::Warning => warn!("{} ⚠️ {}", entry.timestamp, entry.message),
        Severity::Error => error!("{} ❌ {}", entry.timestamp, entry.message),
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
