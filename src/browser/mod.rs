//! 浏览器接入
//!
//! 连接已开启远程调试的浏览器，或者启动一个无头浏览器

pub mod connection;
pub mod headless;

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;

use chromiumoxide::handler::Handler;
use futures::StreamExt;
use tracing::debug;

/// 在后台处理浏览器事件，连接断开时退出
fn spawn_handler(mut handler: Handler) {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("浏览器事件循环结束: {}", e);
                break;
            }
        }
    });
}
