//! 运行上下文
//!
//! 封装"这一次运行"需要的一切：共享状态、取消标志、页面客户端、导航、存储与设置

use crate::error::Result;
use crate::i18n::{Language, Msg};
use crate::messaging::{navigate_and_settle, NavOutcome, Navigator, PageClient};
use crate::models::{CancelFlag, LogEntry, RunState, ScrapeSettings, Severity};
use crate::services::QuestionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// 单次运行的上下文
#[derive(Clone)]
pub struct RunCtx {
    state: Arc<Mutex<RunState>>,
    cancel: CancelFlag,
    page: PageClient,
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn QuestionStore>,
    settings: ScrapeSettings,
    poll_interval: Duration,
}

impl RunCtx {
    pub fn new(
        state: Arc<Mutex<RunState>>,
        cancel: CancelFlag,
        page: PageClient,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn QuestionStore>,
        settings: ScrapeSettings,
        poll_interval: Duration,
    ) -> Self {
        Self {
            state,
            cancel,
            page,
            navigator,
            store,
            settings,
            poll_interval,
        }
    }

    pub fn lang(&self) -> Language {
        self.settings.language
    }

    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    pub fn page(&self) -> &PageClient {
        &self.page
    }

    pub fn store(&self) -> &dyn QuestionStore {
        self.store.as_ref()
    }

    /// 检查点：是否收到取消请求
    pub fn cancel_requested(&self) -> bool {
        self.cancel.is_requested()
    }

    /// 追加一条本地化日志，并同步输出到 tracing
    pub async fn log(&self, msg: Msg, severity: Severity) {
        let text = msg.render(self.lang());
        match severity {
            Severity::Info | Severity::Success => info!("{}", text),
            Severity::Warning => warn!("{}", text),
            Severity::Error => error!("{}", text),
        }
        self.state.lock().await.push_log(LogEntry::now(text, severity));
    }

    pub async fn set_total(&self, total: usize) {
        self.state.lock().await.set_total(total);
    }

    pub async fn set_current(&self, current: usize) {
        self.state.lock().await.set_current(current);
    }

    /// 修改运行状态（用于结束运行）
    pub async fn update_state(&self, f: impl FnOnce(&mut RunState)) {
        f(&mut *self.state.lock().await);
    }

    /// 跳转并等待导航延迟，等待期间响应取消
    pub async fn navigate(&self, url: &str) -> Result<NavOutcome> {
        navigate_and_settle(
            self.navigator.as_ref(),
            url,
            self.settings.navigation_delay(),
            self.poll_interval,
            &self.cancel,
        )
        .await
    }
}
