use crate::browser;
use crate::config::Config;
use crate::i18n::Language;
use crate::infrastructure::JsExecutor;
use crate::models::settings::parse_delay;
use crate::models::{OutputFormat, ScrapeSettings, StatusSnapshot, UserSettings};
use crate::orchestrator::Orchestrator;
use crate::services::{export, BrowserTab, JsonFileStore, QuestionStore, SettingsStore};
use crate::utils::logging::{echo_entry, log_startup};
use anyhow::{Context, Result};
use chromiumoxide::Browser;
use std::path::Path;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    // 保持浏览器连接存活
    _browser: Browser,
    orchestrator: Orchestrator,
}

impl App {
    /// 初始化应用：接入浏览器并组装编排器
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let (browser, page) = if config.headless {
            browser::launch_headless_browser(
                &config.target_url,
                config.chrome_executable.as_deref(),
            )
            .await?
        } else {
            browser::connect_to_browser_and_page(config.browser_debug_port, &config.target_url, None)
                .await?
        };

        let tab = Arc::new(BrowserTab::new(
            JsExecutor::new(page),
            config.page_load_timeout(),
        ));
        let store = Arc::new(JsonFileStore::new(&config.data_file));
        let orchestrator = Orchestrator::new(
            tab.clone(),
            tab,
            store,
            config.poll_interval(),
        );

        Ok(Self {
            config,
            _browser: browser,
            orchestrator,
        })
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// 执行一次自动抓取，直到运行结束
    ///
    /// 期间把新的运行日志打印到终端；Ctrl-C 发送取消请求
    pub async fn run_scrape(&self, settings: ScrapeSettings) -> Result<StatusSnapshot> {
        self.orchestrator
            .cold_start(self.config.clear_on_startup)
            .await?;
        self.orchestrator.start(settings).await?;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut cancel_sent = false;
        let mut printed = 0;

        let snapshot = loop {
            tokio::select! {
                result = &mut ctrl_c, if !cancel_sent => {
                    cancel_sent = true;
                    if let Err(e) = result {
                        warn!("无法监听 Ctrl-C: {}", e);
                        continue;
                    }
                    info!("收到 Ctrl-C，正在停止...");
                    if let Err(e) = self.orchestrator.cancel().await {
                        warn!("取消请求被拒绝: {}", e);
                    }
                }
                _ = sleep(self.config.status_poll()) => {
                    let snapshot = self.orchestrator.status().await;
                    for entry in snapshot.log.iter().skip(printed) {
                        echo_entry(entry);
                    }
                    printed = snapshot.log.len();
                    if snapshot.is_terminal() {
                        break snapshot;
                    }
                }
            }
        };

        self.orchestrator.wait().await;
        print_final_stats(&snapshot);
        Ok(snapshot)
    }

    /// 手动抓取当前标签页一次，返回存储中的题目总数
    pub async fn scrape_current(&self) -> Result<usize> {
        let (scraped, total) = self.orchestrator.scrape_current().await?;
        if scraped == 0 {
            warn!("⚠️ 当前页面没有题目，请先展开测验反馈");
        }
        Ok(total)
    }
}

/// 设置命令的修改项，未给出的字段保持不变
#[derive(Debug, Default, Clone)]
pub struct SettingsUpdate {
    pub navigation_delay_ms: Option<String>,
    pub feedback_delay_ms: Option<String>,
    pub language: Option<String>,
    pub default_format: Option<OutputFormat>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.navigation_delay_ms.is_none()
            && self.feedback_delay_ms.is_none()
            && self.language.is_none()
            && self.default_format.is_none()
    }

    /// 应用到已有设置，非法的延迟回退到默认值
    pub fn apply(self, settings: &mut UserSettings) {
        let defaults = ScrapeSettings::default();
        if let Some(text) = self.navigation_delay_ms {
            settings.scrape.navigation_delay_ms =
                lenient_delay("navigation_delay_ms", &text, defaults.navigation_delay_ms);
        }
        if let Some(text) = self.feedback_delay_ms {
            settings.scrape.feedback_delay_ms =
                lenient_delay("feedback_delay_ms", &text, defaults.feedback_delay_ms);
        }
        if let Some(code) = self.language {
            settings.scrape.language = Language::parse(&code).unwrap_or_else(|| {
                warn!("不支持的语言 '{}'，使用默认语言", code);
                Language::default()
            });
        }
        if let Some(format) = self.default_format {
            settings.format.default_format = format;
        }
    }
}

fn lenient_delay(field: &str, text: &str, default: u64) -> u64 {
    parse_delay(text).unwrap_or_else(|| {
        warn!("{} 的取值 '{}' 无效，使用默认值 {}ms", field, text, default);
        default
    })
}

/// 读取设置文件
pub async fn load_settings(config: &Config) -> Result<UserSettings> {
    Ok(SettingsStore::new(&config.settings_file).load().await?)
}

/// 修改并保存设置，返回保存后的设置
pub async fn update_settings(config: &Config, update: SettingsUpdate) -> Result<UserSettings> {
    let store = SettingsStore::new(&config.settings_file);
    let mut settings = store.load().await?;
    if !update.is_empty() {
        update.apply(&mut settings);
        store.save(&settings).await?;
    }
    Ok(settings)
}

/// 导出累积的题目；未指定输出文件时返回文本由调用方打印
pub async fn export_questions(
    config: &Config,
    format: Option<OutputFormat>,
    output: Option<&Path>,
) -> Result<String> {
    let settings = load_settings(config).await?;
    let questions = JsonFileStore::new(&config.data_file).load().await?;
    let format = format.unwrap_or(settings.format.default_format);
    let text = export::render(
        &questions,
        format,
        &settings.format,
        settings.scrape.language,
    )?;

    if let Some(path) = output {
        tokio::fs::write(path, &text)
            .await
            .with_context(|| format!("写入导出文件失败: {}", path.display()))?;
        info!("✓ 已导出 {} 道题目到 {}", questions.len(), path.display());
    }
    Ok(text)
}

/// 清空累积的题目
pub async fn clear_questions(config: &Config) -> Result<()> {
    JsonFileStore::new(&config.data_file).clear().await?;
    Ok(())
}

fn print_final_stats(snapshot: &StatusSnapshot) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行结束: {:?}", snapshot.status);
    info!(
        "进度: {}/{}",
        snapshot.progress.current, snapshot.progress.total
    );
    if let Some(error) = &snapshot.last_error {
        info!("❌ 错误: {}", error);
    }
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_falls_back_on_bad_values() {
        let mut settings = UserSettings::default();
        settings.scrape.navigation_delay_ms = 1000;
        SettingsUpdate {
            navigation_delay_ms: Some("soon".into()),
            feedback_delay_ms: Some("2500".into()),
            language: Some("vi".into()),
            default_format: Some(OutputFormat::Json),
        }
        .apply(&mut settings);

        assert_eq!(settings.scrape.navigation_delay_ms, 4000);
        assert_eq!(settings.scrape.feedback_delay_ms, 2500);
        assert_eq!(settings.scrape.language, Language::Vi);
        assert_eq!(settings.format.default_format, OutputFormat::Json);
    }

    #[test]
    fn empty_update_changes_nothing() {
        let mut settings = UserSettings::default();
        settings.scrape.feedback_delay_ms = 123;
        let update = SettingsUpdate::default();
        assert!(update.is_empty());
        update.apply(&mut settings);
        assert_eq!(settings.scrape.feedback_delay_ms, 123);
    }
}
