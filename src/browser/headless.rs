use anyhow::{anyhow, Context, Result};
use chromiumoxide::{Browser, BrowserConfig, Page};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// 启动无头浏览器并打开指定 URL
///
/// 未指定可执行文件时由 chromiumoxide 自动查找本机的 Chrome / Chromium
pub async fn launch_headless_browser(
    url: &str,
    executable: Option<&Path>,
) -> Result<(Browser, Page)> {
    info!("🚀 启动无头浏览器...");

    let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
        "--disable-gpu",
        "--no-sandbox",
        "--disable-dev-shm-usage",
    ]);
    if let Some(path) = executable {
        debug!("浏览器可执行文件: {}", path.display());
        builder = builder.chrome_executable(path);
    }
    let config = builder
        .build()
        .map_err(|e| anyhow!("配置无头浏览器失败: {}", e))?;

    let (browser, handler) = Browser::launch(config)
        .await
        .context("启动无头浏览器失败")?;
    super::spawn_handler(handler);

    sleep(Duration::from_millis(300)).await;

    let page = browser
        .new_page(url)
        .await
        .with_context(|| format!("创建页面失败: {}", url))?;
    info!("✅ 无头浏览器已打开: {}", url);

    Ok((browser, page))
}
