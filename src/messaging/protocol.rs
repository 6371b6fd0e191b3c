//! 页面抽取服务的请求 / 响应协议

use crate::i18n::{Language, Msg};
use crate::models::{Assignment, ContentLocation, LearningPath, ScrapedQuestion};
use serde::{Deserialize, Serialize};

/// 路径选择对话框上显示的本地化文案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceStrings {
    pub title: String,
    pub cancel: String,
    pub courses_label: String,
}

impl ChoiceStrings {
    pub fn for_language(lang: Language) -> Self {
        Self {
            title: Msg::ChoiceTitle.render(lang),
            cancel: Msg::ChoiceCancel.render(lang),
            courses_label: Msg::CoursesLabel.render(lang),
        }
    }
}

/// 用户在对话框中的选择，取消时为 `None`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathChoice {
    pub selected_id: Option<String>,
}

/// 展开反馈并抓取的结果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedbackScrape {
    pub succeeded: bool,
    #[serde(default)]
    pub questions: Vec<ScrapedQuestion>,
}

/// 编排层 → 页面端的请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageRequest {
    DetectAggregateCompletedView,
    ListLearningPaths,
    #[serde(rename_all = "camelCase")]
    PresentPathChoice {
        paths: Vec<LearningPath>,
        strings: ChoiceStrings,
    },
    LocateFirstContent,
    ListAssignments,
    HasFeedbackControl,
    #[serde(rename_all = "camelCase")]
    RevealFeedbackAndScrape { settle_delay_ms: u64 },
    /// 直接抓取当前页面上已展开的题目（手动抓取）
    ScrapeCurrentPage,
}

impl PageRequest {
    /// 动作名，与序列化后的 `action` 字段一致
    pub fn action(&self) -> &'static str {
        match self {
            PageRequest::DetectAggregateCompletedView => "detectAggregateCompletedView",
            PageRequest::ListLearningPaths => "listLearningPaths",
            PageRequest::PresentPathChoice { .. } => "presentPathChoice",
            PageRequest::LocateFirstContent => "locateFirstContent",
            PageRequest::ListAssignments => "listAssignments",
            PageRequest::HasFeedbackControl => "hasFeedbackControl",
            PageRequest::RevealFeedbackAndScrape { .. } => "revealFeedbackAndScrape",
            PageRequest::ScrapeCurrentPage => "scrapeCurrentPage",
        }
    }
}

/// 页面端 → 编排层的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageResponse {
    AggregateView { detected: bool },
    LearningPaths { paths: Vec<LearningPath> },
    PathChoice(PathChoice),
    FirstContent { location: Option<ContentLocation> },
    Assignments { assignments: Vec<Assignment> },
    FeedbackControl { present: bool },
    FeedbackScrape(FeedbackScrape),
    Questions { questions: Vec<ScrapedQuestion> },
}

impl PageResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            PageResponse::AggregateView { .. } => "aggregateView",
            PageResponse::LearningPaths { .. } => "learningPaths",
            PageResponse::PathChoice(_) => "pathChoice",
            PageResponse::FirstContent { .. } => "firstContent",
            PageResponse::Assignments { .. } => "assignments",
            PageResponse::FeedbackControl { .. } => "feedbackControl",
            PageResponse::FeedbackScrape(_) => "feedbackScrape",
            PageResponse::Questions { .. } => "questions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_action_matches_wire_tag() {
        let requests = [
            PageRequest::DetectAggregateCompletedView,
            PageRequest::ListLearningPaths,
            PageRequest::PresentPathChoice {
                paths: vec![],
                strings: ChoiceStrings::for_language(Language::En),
            },
            PageRequest::LocateFirstContent,
            PageRequest::ListAssignments,
            PageRequest::HasFeedbackControl,
            PageRequest::RevealFeedbackAndScrape { settle_delay_ms: 10 },
            PageRequest::ScrapeCurrentPage,
        ];
        for request in requests {
            let wire = serde_json::to_value(&request).unwrap();
            assert_eq!(wire["action"], request.action());
        }
    }

    #[test]
    fn reveal_request_carries_delay_in_camel_case() {
        let wire = serde_json::to_value(PageRequest::RevealFeedbackAndScrape {
            settle_delay_ms: 4000,
        })
        .unwrap();
        assert_eq!(
            wire,
            json!({ "action": "revealFeedbackAndScrape", "settleDelayMs": 4000 })
        );
    }

    #[test]
    fn newtype_responses_flatten_under_tag() {
        let wire = serde_json::to_value(PageResponse::PathChoice(PathChoice {
            selected_id: Some("p1".into()),
        }))
        .unwrap();
        assert_eq!(wire, json!({ "kind": "pathChoice", "selectedId": "p1" }));
    }
}
