use std::path::PathBuf;
use std::time::Duration;

/// 程序配置
///
/// 进程级的配置，来自环境变量；用户可调的抓取参数见 `models::UserSettings`
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 目标URL（查找已打开的标签页，找不到时新开）
    pub target_url: String,
    /// 是否启动无头浏览器而不是连接已有浏览器
    pub headless: bool,
    /// 无头模式下的浏览器可执行文件
    pub chrome_executable: Option<PathBuf>,
    /// 累积题目的 JSON 文件
    pub data_file: PathBuf,
    /// 用户设置 TOML 文件
    pub settings_file: PathBuf,
    /// 取消标志轮询间隔（毫秒，最大 200）
    pub poll_interval_ms: u64,
    /// 命令行轮询状态的间隔（毫秒）
    pub status_poll_ms: u64,
    /// 页面加载超时（毫秒）
    pub page_load_timeout_ms: u64,
    /// 启动时清空上次累积的题目
    pub clear_on_startup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: "https://www.coursera.org/".to_string(),
            headless: false,
            chrome_executable: None,
            data_file: PathBuf::from("scraped_data.json"),
            settings_file: PathBuf::from("settings.toml"),
            poll_interval_ms: 100,
            status_poll_ms: 500,
            page_load_timeout_ms: 30_000,
            clear_on_startup: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            target_url: std::env::var("TARGET_URL").unwrap_or(default.target_url),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from).or(default.chrome_executable),
            data_file: std::env::var("DATA_FILE").map(PathBuf::from).unwrap_or(default.data_file),
            settings_file: std::env::var("SETTINGS_FILE").map(PathBuf::from).unwrap_or(default.settings_file),
            poll_interval_ms: std::env::var("POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_interval_ms),
            status_poll_ms: std::env::var("STATUS_POLL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.status_poll_ms),
            page_load_timeout_ms: std::env::var("PAGE_LOAD_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.page_load_timeout_ms),
            clear_on_startup: std::env::var("CLEAR_ON_STARTUP").ok().and_then(|v| v.parse().ok()).unwrap_or(default.clear_on_startup),
        }
    }

    /// 取消轮询间隔，限制在 1..=200ms
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.clamp(1, 200))
    }

    pub fn status_poll(&self) -> Duration {
        Duration::from_millis(self.status_poll_ms.max(50))
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }
}
