//! 浏览器标签页 - 页面抽取服务的实现
//!
//! 通过 DevTools 协议在当前标签页中执行脚本，实现 `PageChannel` 与 `Navigator`

use crate::error::{Result, ScrapeError};
use crate::infrastructure::{JsExecutor, PageReady, ReadyError};
use crate::messaging::{FeedbackScrape, Navigator, PageChannel, PageRequest, PageResponse, PathChoice};
use crate::models::{Assignment, ContentLocation, LearningPath, ScrapedQuestion};
use crate::services::page_scripts;
use anyhow::bail;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// 对话框结果的轮询间隔
const CHOICE_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 被自动化驱动的标签页
pub struct BrowserTab {
    executor: JsExecutor,
    load_timeout: Duration,
}

impl BrowserTab {
    pub fn new(executor: JsExecutor, load_timeout: Duration) -> Self {
        Self {
            executor,
            load_timeout,
        }
    }

    async fn dispatch(&self, request: PageRequest) -> anyhow::Result<PageResponse> {
        let executor = &self.executor;
        let response = match request {
            PageRequest::DetectAggregateCompletedView => PageResponse::AggregateView {
                detected: executor.eval_as(page_scripts::DETECT_AGGREGATE_VIEW).await?,
            },
            PageRequest::ListLearningPaths => PageResponse::LearningPaths {
                paths: executor
                    .eval_as::<Vec<LearningPath>>(page_scripts::LIST_LEARNING_PATHS)
                    .await?,
            },
            PageRequest::PresentPathChoice { paths, strings } => {
                let script = page_scripts::present_path_choice(&paths, &strings)?;
                executor.eval(script).await?;
                info!("已显示学习路径选择框，等待用户选择...");
                let choice = executor
                    .poll_until(
                        page_scripts::POLL_PATH_CHOICE,
                        CHOICE_POLL_INTERVAL,
                        read_choice_poll,
                    )
                    .await?;
                PageResponse::PathChoice(choice)
            }
            PageRequest::LocateFirstContent => PageResponse::FirstContent {
                location: executor
                    .eval_as::<Option<ContentLocation>>(page_scripts::LOCATE_FIRST_CONTENT)
                    .await?,
            },
            PageRequest::ListAssignments => PageResponse::Assignments {
                assignments: executor
                    .eval_as::<Vec<Assignment>>(page_scripts::LIST_ASSIGNMENTS)
                    .await?,
            },
            PageRequest::HasFeedbackControl => PageResponse::FeedbackControl {
                present: executor
                    .eval_as(page_scripts::has_feedback_control())
                    .await?,
            },
            PageRequest::RevealFeedbackAndScrape { settle_delay_ms } => {
                PageResponse::FeedbackScrape(self.reveal_and_scrape(settle_delay_ms).await?)
            }
            PageRequest::ScrapeCurrentPage => PageResponse::Questions {
                questions: self.scrape_questions().await?,
            },
        };
        Ok(response)
    }

    async fn reveal_and_scrape(&self, settle_delay_ms: u64) -> anyhow::Result<FeedbackScrape> {
        let clicked: bool = self
            .executor
            .eval_as(page_scripts::click_feedback_control())
            .await?;
        if !clicked {
            warn!("反馈按钮已消失，无法展开反馈");
            return Ok(FeedbackScrape::default());
        }

        sleep(Duration::from_millis(settle_delay_ms)).await;

        Ok(FeedbackScrape {
            succeeded: true,
            questions: self.scrape_questions().await?,
        })
    }

    async fn scrape_questions(&self) -> anyhow::Result<Vec<ScrapedQuestion>> {
        let questions: Vec<ScrapedQuestion> =
            self.executor.eval_as(page_scripts::SCRAPE_QUESTIONS).await?;
        debug!("页面上抓取到 {} 道题目", questions.len());
        Ok(questions.into_iter().map(ScrapedQuestion::normalized).collect())
    }
}

/// 对话框轮询的一次读数
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChoicePoll {
    /// 页面已刷新或跳转，对话框随之消失
    Gone { gone: bool },
    Chosen(PathChoice),
}

/// 解释对话框轮询结果：null 继续等待，标记丢失视为页面不可达
fn read_choice_poll(value: JsonValue) -> anyhow::Result<Option<PathChoice>> {
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value)? {
        ChoicePoll::Gone { gone: true } => bail!("页面已刷新或跳转，路径选择框已消失"),
        ChoicePoll::Gone { gone: false } => Ok(None),
        ChoicePoll::Chosen(choice) => Ok(Some(choice)),
    }
}

#[async_trait]
impl PageChannel for BrowserTab {
    async fn request(&self, request: PageRequest) -> Result<PageResponse> {
        let action = request.action();
        self.dispatch(request)
            .await
            .map_err(|e| ScrapeError::unreachable(action, e))
    }
}

#[async_trait]
impl Navigator for BrowserTab {
    async fn navigate(&self, url: &str) -> Result<()> {
        let page = self.executor.page();
        // 先订阅再跳转，避免漏掉加载事件
        let ready = PageReady::subscribe(page)
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;
        page.goto(url)
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;

        ready.wait(self.load_timeout).await.map_err(|e| match e {
            ReadyError::TimedOut(limit) => ScrapeError::LoadTimeout {
                url: url.to_string(),
                timeout_ms: limit.as_millis() as u64,
            },
            ReadyError::Closed => ScrapeError::navigation(url, e),
        })?;
        debug!("页面加载完成: {}", url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_choice_keeps_waiting() {
        assert_eq!(read_choice_poll(JsonValue::Null).unwrap(), None);
    }

    #[test]
    fn picked_and_dismissed_choices_resolve() {
        assert_eq!(
            read_choice_poll(json!({ "selectedId": "p1" })).unwrap(),
            Some(PathChoice {
                selected_id: Some("p1".into())
            })
        );
        assert_eq!(
            read_choice_poll(json!({ "selectedId": null })).unwrap(),
            Some(PathChoice::default())
        );
    }

    #[test]
    fn lost_marker_ends_the_wait_with_an_error() {
        let err = read_choice_poll(json!({ "gone": true })).unwrap_err();
        assert!(err.to_string().contains("路径选择框已消失"));

        // 经由 PageChannel 时归为页面不可达
        let mapped = ScrapeError::unreachable("presentPathChoice", err);
        assert!(mapped.is_connectivity());
    }
}
