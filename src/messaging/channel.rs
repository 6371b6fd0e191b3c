//! 页面请求通道

use super::protocol::{ChoiceStrings, FeedbackScrape, PageRequest, PageResponse, PathChoice};
use crate::error::{Result, ScrapeError};
use crate::models::{Assignment, ContentLocation, LearningPath, ScrapedQuestion};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 与当前页面抽取服务之间的一次往返
///
/// 页面不可达（已跳转、未加载、没有监听器）时返回 `ScrapeError::PageUnreachable`。
#[async_trait]
pub trait PageChannel: Send + Sync {
    async fn request(&self, request: PageRequest) -> Result<PageResponse>;
}

/// 类型化的页面客户端
///
/// 每个方法对应页面端的一个动作，响应类型不匹配时返回协议错误。
#[derive(Clone)]
pub struct PageClient {
    channel: Arc<dyn PageChannel>,
}

impl PageClient {
    pub fn new(channel: Arc<dyn PageChannel>) -> Self {
        Self { channel }
    }

    async fn call(&self, request: PageRequest) -> Result<(&'static str, PageResponse)> {
        let action = request.action();
        debug!("页面请求: {}", action);
        let response = self.channel.request(request).await?;
        debug!("页面响应: {} -> {}", action, response.kind());
        Ok((action, response))
    }

    pub async fn detect_aggregate_completed_view(&self) -> Result<bool> {
        match self.call(PageRequest::DetectAggregateCompletedView).await? {
            (_, PageResponse::AggregateView { detected }) => Ok(detected),
            (action, other) => Err(mismatch(action, &other)),
        }
    }

    pub async fn list_learning_paths(&self) -> Result<Vec<LearningPath>> {
        match self.call(PageRequest::ListLearningPaths).await? {
            (_, PageResponse::LearningPaths { paths }) => Ok(paths),
            (action, other) => Err(mismatch(action, &other)),
        }
    }

    pub async fn present_path_choice(
        &self,
        paths: &[LearningPath],
        strings: ChoiceStrings,
    ) -> Result<PathChoice> {
        let request = PageRequest::PresentPathChoice {
            paths: paths.to_vec(),
            strings,
        };
        match self.call(request).await? {
            (_, PageResponse::PathChoice(choice)) => Ok(choice),
            (action, other) => Err(mismatch(action, &other)),
        }
    }

    pub async fn locate_first_content(&self) -> Result<Option<ContentLocation>> {
        match self.call(PageRequest::LocateFirstContent).await? {
            (_, PageResponse::FirstContent { location }) => {
                Ok(location.filter(|l| !l.url.trim().is_empty()))
            }
            (action, other) => Err(mismatch(action, &other)),
        }
    }

    pub async fn list_assignments(&self) -> Result<Vec<Assignment>> {
        match self.call(PageRequest::ListAssignments).await? {
            (_, PageResponse::Assignments { assignments }) => Ok(assignments),
            (action, other) => Err(mismatch(action, &other)),
        }
    }

    pub async fn has_feedback_control(&self) -> Result<bool> {
        match self.call(PageRequest::HasFeedbackControl).await? {
            (_, PageResponse::FeedbackControl { present }) => Ok(present),
            (action, other) => Err(mismatch(action, &other)),
        }
    }

    /// 展开反馈、等待稳定、抓取，一次请求完成，发出后不可中断
    pub async fn reveal_feedback_and_scrape(&self, settle_delay: Duration) -> Result<FeedbackScrape> {
        let request = PageRequest::RevealFeedbackAndScrape {
            settle_delay_ms: settle_delay.as_millis() as u64,
        };
        match self.call(request).await? {
            (_, PageResponse::FeedbackScrape(scrape)) => Ok(scrape),
            (action, other) => Err(mismatch(action, &other)),
        }
    }

    /// 抓取当前页面上的题目，不点击任何按钮
    pub async fn scrape_current_page(&self) -> Result<Vec<ScrapedQuestion>> {
        match self.call(PageRequest::ScrapeCurrentPage).await? {
            (_, PageResponse::Questions { questions }) => Ok(questions),
            (action, other) => Err(mismatch(action, &other)),
        }
    }
}

fn mismatch(action: &'static str, response: &PageResponse) -> ScrapeError {
    ScrapeError::Protocol {
        action,
        detail: format!("got {}", response.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    /// 固定返回同一个响应，并记录收到的请求
    struct Canned {
        response: PageResponse,
        seen: Mutex<Vec<PageRequest>>,
    }

    #[async_trait]
    impl PageChannel for Canned {
        async fn request(&self, request: PageRequest) -> Result<PageResponse> {
            self.seen.lock().await.push(request);
            Ok(self.response.clone())
        }
    }

    fn client(response: PageResponse) -> (PageClient, Arc<Canned>) {
        let canned = Arc::new(Canned {
            response,
            seen: Mutex::new(Vec::new()),
        });
        (PageClient::new(canned.clone()), canned)
    }

    #[tokio::test]
    async fn typed_call_returns_payload() {
        let (client, canned) = client(PageResponse::FeedbackControl { present: true });
        assert!(client.has_feedback_control().await.unwrap());
        assert_eq!(
            canned.seen.lock().await.as_slice(),
            &[PageRequest::HasFeedbackControl]
        );
    }

    #[tokio::test]
    async fn mismatched_response_is_protocol_error() {
        let (client, _) = client(PageResponse::AggregateView { detected: true });
        let err = client.list_assignments().await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Protocol {
                action: "listAssignments",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn blank_first_content_url_counts_as_absent() {
        let (client, _) = client(PageResponse::FirstContent {
            location: Some(ContentLocation { url: "  ".into() }),
        });
        assert_eq!(client.locate_first_content().await.unwrap(), None);
    }

    #[tokio::test]
    async fn reveal_passes_settle_delay() {
        let (client, canned) = client(PageResponse::FeedbackScrape(FeedbackScrape::default()));
        client
            .reveal_feedback_and_scrape(Duration::from_millis(1500))
            .await
            .unwrap();
        assert_eq!(
            canned.seen.lock().await.as_slice(),
            &[PageRequest::RevealFeedbackAndScrape {
                settle_delay_ms: 1500
            }]
        );
    }

    #[tokio::test]
    async fn scrape_current_page_returns_questions() {
        let (client, canned) = client(PageResponse::Questions { questions: vec![] });
        assert!(client.scrape_current_page().await.unwrap().is_empty());
        assert_eq!(
            canned.seen.lock().await.as_slice(),
            &[PageRequest::ScrapeCurrentPage]
        );
    }
}
