use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// 连接到浏览器并获取要驱动的标签页
///
/// 优先复用 URL 以 `target_url` 开头的标签页（用户通常已经打开了课程页），
/// 其次复用标题包含 `target_title` 的标签页，都没有时新建并跳转到 `target_url`
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: &str,
    target_title: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url)
        .await
        .with_context(|| format!("连接浏览器失败: {}", browser_url))?;
    super::spawn_handler(handler);
    debug!("浏览器连接成功");

    // 等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let pages = browser.pages().await.context("获取标签页列表失败")?;
    debug!("获取到 {} 个页面", pages.len());

    for page in &pages {
        if let Ok(Some(url)) = page.url().await {
            if url.starts_with(target_url) {
                info!("✓ 使用已打开的页面: {}", url);
                return Ok((browser, page.clone()));
            }
        }
    }

    if let Some(title) = target_title {
        for page in &pages {
            if let Ok(Some(page_title)) = page.get_title().await {
                if page_title.contains(title) {
                    info!("✓ 找到目标页面: {}", page_title);
                    return Ok((browser, page.clone()));
                }
            }
        }
    }

    debug!("未找到匹配的页面，创建新页面: {}", target_url);
    let page = browser
        .new_page(target_url)
        .await
        .with_context(|| format!("创建页面失败: {}", target_url))?;
    info!("已导航到: {}", target_url);

    Ok((browser, page))
}
