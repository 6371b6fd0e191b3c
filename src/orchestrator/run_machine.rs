//! 自动抓取状态机 - 编排层
//!
//! ## 状态
//!
//! ```text
//! Idle ──start──▶ Running ──detect──┬─ 普通页面 / 没有学习路径 / 未选择 ─▶ 单课程
//!                    │              └─ 选择了学习路径 ────────────────▶ 多课程
//!                    │cancel
//!                    ▼
//!               Cancelling ──检查点──▶ Idle
//! 单课程 / 多课程 ──▶ Completed；任何未处理的错误 ──▶ Failed
//! ```
//!
//! 同一时间只允许一个运行循环。`start` 在锁内检查并切换状态，
//! 取消是协作式的，只在检查点生效。

use crate::error::{ErrorKind, Result, ScrapeError};
use crate::i18n::Msg;
use crate::messaging::{ChoiceStrings, NavOutcome, Navigator, PageChannel, PageClient};
use crate::models::{LearningPath, RunState, RunStatus, ScrapeSettings, Severity, StatusSnapshot};
use crate::services::QuestionStore;
use crate::workflow::{scrape_course, RunCtx};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 默认取消轮询间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 一次运行的结局（错误除外）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    Completed,
    Cancelled,
}

/// 编排器
///
/// 持有运行状态，对外只暴露 start / status / cancel 以及存储访问
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    state: Arc<Mutex<RunState>>,
    page: PageClient,
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn QuestionStore>,
    poll_interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Orchestrator {
    pub fn new(
        channel: Arc<dyn PageChannel>,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn QuestionStore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Arc::new(Mutex::new(RunState::default())),
                page: PageClient::new(channel),
                navigator,
                store,
                poll_interval,
                task: Mutex::new(None),
            }),
        }
    }

    pub fn store(&self) -> Arc<dyn QuestionStore> {
        Arc::clone(&self.inner.store)
    }

    /// 进程冷启动：重置运行状态，按需清空累积的题目
    pub async fn cold_start(&self, clear_data: bool) -> Result<()> {
        {
            let mut state = self.inner.state.lock().await;
            if state.status.is_active() {
                return Err(ScrapeError::AlreadyRunning);
            }
            *state = RunState::default();
        }
        if clear_data {
            self.inner.store.clear().await?;
        }
        Ok(())
    }

    /// 开始一次运行
    ///
    /// 已有运行时直接拒绝，不改变现有运行的任何状态
    pub async fn start(&self, settings: ScrapeSettings) -> Result<()> {
        // 持有状态锁直到句柄登记完毕，`wait` 不会错过刚启动的运行
        let mut state = self.inner.state.lock().await;
        if state.status.is_active() {
            warn!("已有抓取任务在运行，拒绝新的 start 请求");
            return Err(ScrapeError::AlreadyRunning);
        }
        state.begin();

        info!(
            "🚀 开始自动抓取 (导航延迟 {}ms, 反馈延迟 {}ms, 语言 {})",
            settings.navigation_delay_ms, settings.feedback_delay_ms, settings.language
        );

        let ctx = RunCtx::new(
            Arc::clone(&self.inner.state),
            state.cancel.clone(),
            self.inner.page.clone(),
            Arc::clone(&self.inner.navigator),
            Arc::clone(&self.inner.store),
            settings,
            self.inner.poll_interval,
        );
        let handle = tokio::spawn(drive(ctx));
        *self.inner.task.lock().await = Some(handle);
        Ok(())
    }

    /// 手动抓取当前页面一次，把题目追加到存储
    ///
    /// 返回 (本次抓取数, 存储总数)。自动抓取进行中时拒绝
    pub async fn scrape_current(&self) -> Result<(usize, usize)> {
        // 抓取期间持有状态锁，避免与新的运行交错
        let state = self.inner.state.lock().await;
        if state.status.is_active() {
            return Err(ScrapeError::AlreadyRunning);
        }

        let questions = self.inner.page.scrape_current_page().await?;
        let scraped = questions.len();
        let total = if questions.is_empty() {
            warn!("当前页面没有可抓取的题目");
            self.inner.store.load().await?.len()
        } else {
            self.inner.store.append(&questions).await?
        };
        drop(state);

        info!("✓ 手动抓取 {} 道题目，共 {} 道", scraped, total);
        Ok((scraped, total))
    }

    /// 请求取消当前运行
    pub async fn cancel(&self) -> Result<()> {
        let mut state = self.inner.state.lock().await;
        if !state.status.is_active() {
            return Err(ScrapeError::NoRunActive);
        }
        state.cancel.request();
        state.status = RunStatus::Cancelling;
        info!("已请求取消，等待下一个检查点");
        Ok(())
    }

    /// 当前状态快照（只读）
    pub async fn status(&self) -> StatusSnapshot {
        self.inner.state.lock().await.snapshot()
    }

    /// 等待当前运行循环退出
    pub async fn wait(&self) {
        let handle = self.inner.task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("抓取任务异常退出: {}", e);
            }
        }
    }
}

/// 运行循环：执行并把结局写回状态
async fn drive(ctx: RunCtx) {
    match run(&ctx).await {
        Ok(RunOutcome::Completed) => {
            ctx.update_state(|s| s.finish_completed()).await;
            info!("✅ 自动抓取完成");
        }
        Ok(RunOutcome::Cancelled) => {
            ctx.log(Msg::Stopped, Severity::Warning).await;
            ctx.update_state(|s| s.finish_cancelled()).await;
        }
        Err(e) => {
            let message = e.to_string();
            match e.kind() {
                ErrorKind::Connectivity => {
                    ctx.log(Msg::ConnectionLost { message }, Severity::Error).await;
                }
                // 没有数据的情况在流程中已经记过日志
                ErrorKind::NoData => {}
                ErrorKind::Internal => ctx.log(Msg::Error { message }, Severity::Error).await,
            }
            ctx.update_state(|s| s.finish_failed(&e)).await;
        }
    }
}

async fn run(ctx: &RunCtx) -> Result<RunOutcome> {
    ctx.log(Msg::Starting, Severity::Info).await;

    ctx.log(Msg::DetectingView, Severity::Info).await;
    if !ctx.page().detect_aggregate_completed_view().await? {
        return single_course(ctx).await;
    }

    let paths = ctx.page().list_learning_paths().await?;
    if paths.is_empty() {
        ctx.log(Msg::NoLearningPaths, Severity::Warning).await;
        return single_course(ctx).await;
    }
    ctx.log(
        Msg::FoundLearningPaths { count: paths.len() },
        Severity::Success,
    )
    .await;

    ctx.log(Msg::WaitingForPathChoice, Severity::Info).await;
    let choice = ctx
        .page()
        .present_path_choice(&paths, ChoiceStrings::for_language(ctx.lang()))
        .await?;

    let selected = choice
        .selected_id
        .as_deref()
        .and_then(|id| paths.iter().find(|p| p.id == id));
    match selected {
        Some(path) => multi_course(ctx, path).await,
        None => {
            ctx.log(Msg::PathChoiceSkipped, Severity::Warning).await;
            single_course(ctx).await
        }
    }
}

/// 单课程：没有作业时整个运行失败
async fn single_course(ctx: &RunCtx) -> Result<RunOutcome> {
    let report = scrape_course(ctx).await?;
    if report.cancelled {
        return Ok(RunOutcome::Cancelled);
    }
    if report.no_assignments {
        return Err(ScrapeError::NoAssignments);
    }
    ctx.log(
        Msg::Completed {
            total: report.total_scraped,
            processed: report.assignments_processed,
        },
        Severity::Success,
    )
    .await;
    Ok(RunOutcome::Completed)
}

/// 多课程：按顺序处理学习路径中的课程，单个课程没有作业只记日志
async fn multi_course(ctx: &RunCtx, path: &LearningPath) -> Result<RunOutcome> {
    let total_courses = path.courses.len();
    ctx.log(
        Msg::ScrapingPath {
            title: path.title.clone(),
            courses: total_courses,
        },
        Severity::Info,
    )
    .await;

    let mut grand_total = 0;
    let mut courses_done = 0;

    for (index, course) in path.courses.iter().enumerate() {
        if ctx.cancel_requested() {
            return Ok(RunOutcome::Cancelled);
        }

        ctx.log(
            Msg::ProcessingCourse {
                current: index + 1,
                total: total_courses,
                name: course.name.clone(),
            },
            Severity::Info,
        )
        .await;
        ctx.log(Msg::NavigatingToCourse, Severity::Info).await;
        if ctx.navigate(&course.link).await? == NavOutcome::Cancelled {
            return Ok(RunOutcome::Cancelled);
        }

        let report = scrape_course(ctx).await?;
        grand_total += report.total_scraped;
        if report.cancelled {
            return Ok(RunOutcome::Cancelled);
        }

        courses_done += 1;
        ctx.log(
            Msg::CourseCompleted {
                name: course.name.clone(),
                total: report.total_scraped,
            },
            Severity::Success,
        )
        .await;
    }

    ctx.log(
        Msg::PathCompleted {
            total: grand_total,
            courses: courses_done,
        },
        Severity::Success,
    )
    .await;
    Ok(RunOutcome::Completed)
}
