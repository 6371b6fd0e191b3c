//! 可取消的导航等待

use crate::error::Result;
use crate::models::CancelFlag;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// 轮询取消标志的最大间隔
pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 标签页导航
#[async_trait]
pub trait Navigator: Send + Sync {
    /// 跳转到 `url`，页面报告加载完成后返回
    async fn navigate(&self, url: &str) -> Result<()>;
}

/// 导航等待的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Settled,
    Cancelled,
}

/// 跳转并等待稳定延迟
///
/// 加载过程本身不会被打断，取消只在稳定等待阶段被观察到。
pub async fn navigate_and_settle(
    navigator: &dyn Navigator,
    url: &str,
    settle_delay: Duration,
    poll_interval: Duration,
    cancel: &CancelFlag,
) -> Result<NavOutcome> {
    debug!("导航到: {}", url);
    navigator.navigate(url).await?;
    Ok(settle(settle_delay, poll_interval, cancel).await)
}

/// 分段等待 `delay`，每个轮询间隔检查一次取消标志
pub async fn settle(delay: Duration, poll_interval: Duration, cancel: &CancelFlag) -> NavOutcome {
    let step = poll_interval.clamp(Duration::from_millis(1), MAX_POLL_INTERVAL);
    let deadline = Instant::now() + delay;

    loop {
        if cancel.is_requested() {
            return NavOutcome::Cancelled;
        }
        let now = Instant::now();
        if now >= deadline {
            return NavOutcome::Settled;
        }
        sleep(step.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNavigator(AtomicUsize);

    #[async_trait]
    impl Navigator for CountingNavigator {
        async fn navigate(&self, _url: &str) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn settles_after_delay() {
        let cancel = CancelFlag::new();
        let started = std::time::Instant::now();
        let outcome = settle(Duration::from_millis(60), Duration::from_millis(10), &cancel).await;
        assert_eq!(outcome, NavOutcome::Settled);
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn cancel_is_seen_within_one_poll_interval() {
        let cancel = CancelFlag::new();
        let remote = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            remote.request();
        });

        let started = std::time::Instant::now();
        let outcome = settle(Duration::from_secs(10), Duration::from_millis(100), &cancel).await;
        assert_eq!(outcome, NavOutcome::Cancelled);
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn already_cancelled_still_completes_navigation() {
        let navigator = CountingNavigator(AtomicUsize::new(0));
        let cancel = CancelFlag::new();
        cancel.request();

        let outcome = navigate_and_settle(
            &navigator,
            "https://example.org",
            Duration::from_secs(5),
            Duration::from_millis(100),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(outcome, NavOutcome::Cancelled);
        assert_eq!(navigator.0.load(Ordering::SeqCst), 1);
    }
}
