//! 单课程抓取流程 - 流程层
//!
//! 流程顺序：
//! 1. 定位课程首个内容页并跳转（没有则认为已在模块页）
//! 2. 提取作业 / 测验列表
//! 3. 逐个作业：跳转 → 检查反馈按钮 → 展开反馈并抓取 → 追加到存储
//!
//! 单课程模式和学习路径模式共用这一流程。

use crate::error::Result;
use crate::i18n::Msg;
use crate::messaging::NavOutcome;
use crate::models::Severity;
use crate::utils::logging::truncate_text;
use crate::workflow::run_ctx::RunCtx;
use tracing::debug;

/// 作业标题在日志中的最大长度
const TITLE_PREVIEW_LEN: usize = 80;

/// 单课程抓取结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseReport {
    /// 本课程新增的题目数
    pub total_scraped: usize,
    /// 已处理完的作业数（含没有反馈按钮而跳过的）
    pub assignments_processed: usize,
    /// 在检查点观察到取消
    pub cancelled: bool,
    /// 页面上没有任何作业
    pub no_assignments: bool,
}

impl CourseReport {
    fn cancelled(self) -> Self {
        Self {
            cancelled: true,
            ..self
        }
    }
}

/// 执行一次单课程抓取
///
/// 没有作业不算错误，由调用方决定是否终止整个运行
pub async fn scrape_course(ctx: &RunCtx) -> Result<CourseReport> {
    let mut report = CourseReport::default();

    ctx.log(Msg::GettingFirstContent, Severity::Info).await;
    match ctx.page().locate_first_content().await? {
        Some(location) => {
            ctx.log(Msg::NavigatingToContent, Severity::Info).await;
            if ctx.navigate(&location.url).await? == NavOutcome::Cancelled {
                return Ok(report.cancelled());
            }
        }
        None => ctx.log(Msg::AlreadyOnModulePage, Severity::Info).await,
    }

    ctx.log(Msg::ExtractingAssignments, Severity::Info).await;
    let assignments = ctx.page().list_assignments().await?;
    let total = assignments.len();
    ctx.set_total(total).await;

    if assignments.is_empty() {
        ctx.log(Msg::NoAssignments, Severity::Error).await;
        report.no_assignments = true;
        return Ok(report);
    }
    ctx.log(Msg::FoundAssignments { count: total }, Severity::Success)
        .await;

    for (index, assignment) in assignments.iter().enumerate() {
        if ctx.cancel_requested() {
            return Ok(report.cancelled());
        }

        let current = index + 1;
        ctx.set_current(current).await;
        ctx.log(
            Msg::ProcessingAssignment {
                current,
                total,
                title: truncate_text(&assignment.title, TITLE_PREVIEW_LEN),
            },
            Severity::Info,
        )
        .await;
        debug!("作业 {}/{}: {:?} {}", current, total, assignment.kind, assignment.url);

        ctx.log(Msg::NavigatingToAssignment, Severity::Info).await;
        if ctx.navigate(&assignment.url).await? == NavOutcome::Cancelled {
            return Ok(report.cancelled());
        }

        ctx.log(Msg::CheckingFeedback, Severity::Info).await;
        if !ctx.page().has_feedback_control().await? {
            ctx.log(Msg::NoFeedbackButton, Severity::Warning).await;
            report.assignments_processed += 1;
            continue;
        }

        ctx.log(Msg::ClickingFeedback, Severity::Info).await;
        ctx.log(Msg::ScrapingQuestions, Severity::Info).await;
        let scrape = ctx
            .page()
            .reveal_feedback_and_scrape(ctx.settings().feedback_delay())
            .await?;

        if scrape.succeeded && !scrape.questions.is_empty() {
            let count = scrape.questions.len();
            ctx.log(Msg::ScrapedQuestions { count }, Severity::Success)
                .await;
            ctx.log(Msg::SavingData, Severity::Info).await;
            let stored = ctx.store().append(&scrape.questions).await?;
            debug!("存储中共有 {} 道题目", stored);
            report.total_scraped += count;
        } else {
            ctx.log(Msg::NoQuestionsFound, Severity::Warning).await;
        }
        report.assignments_processed += 1;
    }

    Ok(report)
}
