//! 测试用的脚本化站点：按 URL 返回预设的页面内容

#![allow(dead_code)]

use async_trait::async_trait;
use auto_scrape::error::{Result, ScrapeError};
use auto_scrape::messaging::{FeedbackScrape, Navigator, PageChannel, PageRequest, PageResponse, PathChoice};
use auto_scrape::models::{
    Assignment, AssignmentKind, Choice, ContentLocation, Course, LearningPath, ScrapeSettings,
    ScrapedQuestion, StatusSnapshot,
};
use auto_scrape::{MemoryStore, Orchestrator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 一个 URL 对应的页面
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub aggregate_view: bool,
    pub paths: Vec<LearningPath>,
    /// 对话框中用户的选择
    pub choice: Option<String>,
    pub first_content: Option<String>,
    pub assignments: Vec<Assignment>,
    pub has_feedback: bool,
    pub questions: Vec<ScrapedQuestion>,
}

/// 脚本化站点，同时实现页面通道与导航
pub struct FakeSite {
    pages: HashMap<String, FakePage>,
    current: Mutex<String>,
    visited: Mutex<Vec<String>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl FakeSite {
    pub fn new(start_url: &str) -> Self {
        Self {
            pages: HashMap::new(),
            current: Mutex::new(start_url.to_string()),
            visited: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn current_page(&self, action: &'static str) -> Result<FakePage> {
        let url = self.current.lock().unwrap().clone();
        self.pages
            .get(&url)
            .cloned()
            .ok_or_else(|| ScrapeError::unreachable(action, format!("no listener on {url}")))
    }
}

#[async_trait]
impl PageChannel for FakeSite {
    async fn request(&self, request: PageRequest) -> Result<PageResponse> {
        let page = self.current_page(request.action())?;
        self.requests.lock().unwrap().push(request.clone());
        let response = match request {
            PageRequest::DetectAggregateCompletedView => PageResponse::AggregateView {
                detected: page.aggregate_view,
            },
            PageRequest::ListLearningPaths => PageResponse::LearningPaths { paths: page.paths },
            PageRequest::PresentPathChoice { .. } => PageResponse::PathChoice(PathChoice {
                selected_id: page.choice,
            }),
            PageRequest::LocateFirstContent => PageResponse::FirstContent {
                location: page.first_content.map(|url| ContentLocation { url }),
            },
            PageRequest::ListAssignments => PageResponse::Assignments {
                assignments: page.assignments,
            },
            PageRequest::HasFeedbackControl => PageResponse::FeedbackControl {
                present: page.has_feedback,
            },
            PageRequest::RevealFeedbackAndScrape { .. } => {
                PageResponse::FeedbackScrape(FeedbackScrape {
                    succeeded: page.has_feedback,
                    questions: page.questions,
                })
            }
            PageRequest::ScrapeCurrentPage => PageResponse::Questions {
                questions: page.questions,
            },
        };
        Ok(response)
    }
}

#[async_trait]
impl Navigator for FakeSite {
    async fn navigate(&self, url: &str) -> Result<()> {
        if !self.pages.contains_key(url) {
            return Err(ScrapeError::navigation(url, "net::ERR_NAME_NOT_RESOLVED"));
        }
        *self.current.lock().unwrap() = url.to_string();
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn question(number: usize) -> ScrapedQuestion {
    ScrapedQuestion {
        question_number: number.to_string(),
        question_text: format!("Question {number}?"),
        choices: vec![
            Choice {
                text: "Yes".into(),
                selected: true,
            },
            Choice {
                text: "No".into(),
                selected: false,
            },
        ],
        answered_correctly: number % 2 == 1,
    }
}

pub fn questions(range: std::ops::RangeInclusive<usize>) -> Vec<ScrapedQuestion> {
    range.map(question).collect()
}

pub fn assignment(title: &str, url: &str) -> Assignment {
    Assignment {
        title: title.to_string(),
        module_name: "Module 1".to_string(),
        url: url.to_string(),
        kind: AssignmentKind::from_url(url),
    }
}

pub fn course(id: &str, link: &str) -> Course {
    Course {
        id: id.to_string(),
        name: format!("Course {id}"),
        link: link.to_string(),
    }
}

/// 测验页：有反馈按钮并带有给定题目
pub fn quiz_page(questions: Vec<ScrapedQuestion>) -> FakePage {
    FakePage {
        has_feedback: true,
        questions,
        ..FakePage::default()
    }
}

/// 测试用的短延迟
pub fn fast_settings() -> ScrapeSettings {
    ScrapeSettings {
        navigation_delay_ms: 5,
        feedback_delay_ms: 1,
        ..ScrapeSettings::default()
    }
}

pub const POLL_INTERVAL: Duration = Duration::from_millis(5);

pub fn orchestrator(site: Arc<FakeSite>, store: Arc<MemoryStore>) -> Orchestrator {
    Orchestrator::new(site.clone(), site, store, POLL_INTERVAL)
}

/// 轮询状态直到运行结束
pub async fn wait_terminal(orchestrator: &Orchestrator) -> StatusSnapshot {
    let polled = async {
        loop {
            let snapshot = orchestrator.status().await;
            if snapshot.is_terminal() {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    };
    let snapshot = tokio::time::timeout(Duration::from_secs(10), polled)
        .await
        .expect("run did not finish in time");
    orchestrator.wait().await;
    snapshot
}

pub fn log_messages(snapshot: &StatusSnapshot) -> Vec<String> {
    snapshot.log.iter().map(|e| e.message.clone()).collect()
}
