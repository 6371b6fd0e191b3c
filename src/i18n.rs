//! 本地化文案
//!
//! 每条界面/日志文案都是 `Msg` 的一个变体，带参数的文案把参数作为字段，
//! 在 `render` 时按语言格式化。切换语言只影响渲染，不影响调用方。

use phf::phf_map;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 支持的界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Vi,
}

static LANGUAGE_CODES: phf::Map<&'static str, Language> = phf_map! {
    "en" => Language::En,
    "eng" => Language::En,
    "english" => Language::En,
    "vi" => Language::Vi,
    "vie" => Language::Vi,
    "vietnamese" => Language::Vi,
    "tiếng việt" => Language::Vi,
};

impl Language {
    /// 语言代码（小写）
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Vi => "vi",
        }
    }

    /// 解析语言代码，大小写不敏感，允许地区后缀（如 `vi-VN`、`en_US`）
    pub fn parse(code: &str) -> Option<Self> {
        let lowered = code.trim().to_lowercase();
        if let Some(lang) = LANGUAGE_CODES.get(lowered.as_str()) {
            return Some(*lang);
        }
        let primary = lowered.split(['-', '_']).next().unwrap_or_default();
        LANGUAGE_CODES.get(primary).copied()
    }

    /// 解析失败时回退到默认语言
    pub fn parse_or_default(code: &str) -> Self {
        Self::parse(code).unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    /// 未知或非字符串的取值回退到默认语言
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(|v| v.as_str())
            .map(Language::parse_or_default)
            .unwrap_or_default())
    }
}

/// 界面与日志文案
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Starting,
    DetectingView,
    NoLearningPaths,
    FoundLearningPaths { count: usize },
    WaitingForPathChoice,
    PathChoiceSkipped,
    ScrapingPath { title: String, courses: usize },
    ProcessingCourse { current: usize, total: usize, name: String },
    NavigatingToCourse,
    CourseCompleted { name: String, total: usize },
    PathCompleted { total: usize, courses: usize },
    GettingFirstContent,
    NavigatingToContent,
    AlreadyOnModulePage,
    ExtractingAssignments,
    FoundAssignments { count: usize },
    ProcessingAssignment { current: usize, total: usize, title: String },
    NavigatingToAssignment,
    CheckingFeedback,
    NoFeedbackButton,
    ClickingFeedback,
    ScrapingQuestions,
    ScrapedQuestions { count: usize },
    NoQuestionsFound,
    SavingData,
    Completed { total: usize, processed: usize },
    Error { message: String },
    ConnectionLost { message: String },
    NoAssignments,
    Stopped,
    ChoiceTitle,
    ChoiceCancel,
    CoursesLabel,
    Incorrect,
}

impl Msg {
    /// 按语言渲染文案
    pub fn render(&self, lang: Language) -> String {
        match lang {
            Language::En => self.render_en(),
            Language::Vi => self.render_vi(),
        }
    }

    fn render_en(&self) -> String {
        match self {
            Msg::Starting => "Starting auto-scrape process...".into(),
            Msg::DetectingView => "Checking the current page...".into(),
            Msg::NoLearningPaths => "No learning paths found, scraping the current course...".into(),
            Msg::FoundLearningPaths { count } => format!("Found {count} learning path(s)"),
            Msg::WaitingForPathChoice => "Waiting for a learning path to be selected...".into(),
            Msg::PathChoiceSkipped => "No learning path selected, scraping the current course...".into(),
            Msg::ScrapingPath { title, courses } => {
                format!("Scraping learning path \"{title}\" ({courses} course(s))")
            }
            Msg::ProcessingCourse { current, total, name } => {
                format!("Course {current}/{total}: {name}")
            }
            Msg::NavigatingToCourse => "Navigating to course page...".into(),
            Msg::CourseCompleted { name, total } => {
                format!("Finished course {name}: {total} question(s)")
            }
            Msg::PathCompleted { total, courses } => {
                format!("Completed! Total questions: {total}, Courses processed: {courses}")
            }
            Msg::GettingFirstContent => "Getting first course content...".into(),
            Msg::NavigatingToContent => "Navigating to first content page...".into(),
            Msg::AlreadyOnModulePage => "Already on module page, skipping navigation...".into(),
            Msg::ExtractingAssignments => "Extracting assignments and quizzes...".into(),
            Msg::FoundAssignments { count } => format!("Found {count} assignment(s)/quiz(zes)"),
            Msg::ProcessingAssignment { current, total, title } => {
                format!("Processing {current}/{total}: {title}")
            }
            Msg::NavigatingToAssignment => "Navigating to assignment page...".into(),
            Msg::CheckingFeedback => "Checking for feedback button...".into(),
            Msg::NoFeedbackButton => "No feedback button found, skipping...".into(),
            Msg::ClickingFeedback => "Clicking feedback button...".into(),
            Msg::ScrapingQuestions => "Scraping questions...".into(),
            Msg::ScrapedQuestions { count } => format!("Scraped {count} question(s)"),
            Msg::NoQuestionsFound => "No questions found".into(),
            Msg::SavingData => "Saving data...".into(),
            Msg::Completed { total, processed } => {
                format!("Completed! Total questions: {total}, Assignments processed: {processed}")
            }
            Msg::Error { message } => format!("Error: {message}"),
            Msg::ConnectionLost { message } => {
                format!("Lost connection to the page: {message}. Reload the page and try again.")
            }
            Msg::NoAssignments => "No assignments or quizzes could be found on this page".into(),
            Msg::Stopped => "Auto-scrape cancelled by user".into(),
            Msg::ChoiceTitle => "Select a learning path to scrape".into(),
            Msg::ChoiceCancel => "Cancel".into(),
            Msg::CoursesLabel => "course(s)".into(),
            Msg::Incorrect => "Incorrect".into(),
        }
    }

    fn render_vi(&self) -> String {
        match self {
            Msg::Starting => "Bắt đầu quá trình tự động quét...".into(),
            Msg::DetectingView => "Kiểm tra trang hiện tại...".into(),
            Msg::NoLearningPaths => "Không tìm thấy lộ trình học, quét khóa học hiện tại...".into(),
            Msg::FoundLearningPaths { count } => format!("Tìm thấy {count} lộ trình học"),
            Msg::WaitingForPathChoice => "Đang chờ chọn lộ trình học...".into(),
            Msg::PathChoiceSkipped => "Không chọn lộ trình học, quét khóa học hiện tại...".into(),
            Msg::ScrapingPath { title, courses } => {
                format!("Quét lộ trình học \"{title}\" ({courses} khóa học)")
            }
            Msg::ProcessingCourse { current, total, name } => {
                format!("Khóa học {current}/{total}: {name}")
            }
            Msg::NavigatingToCourse => "Điều hướng đến trang khóa học...".into(),
            Msg::CourseCompleted { name, total } => {
                format!("Hoàn tất khóa học {name}: {total} câu hỏi")
            }
            Msg::PathCompleted { total, courses } => {
                format!("Hoàn tất! Tổng số câu hỏi: {total}, Khóa học đã xử lý: {courses}")
            }
            Msg::GettingFirstContent => "Lấy nội dung khóa học đầu tiên...".into(),
            Msg::NavigatingToContent => "Điều hướng đến trang nội dung đầu tiên...".into(),
            Msg::AlreadyOnModulePage => "Đã ở trang mô-đun, bỏ qua điều hướng...".into(),
            Msg::ExtractingAssignments => "Trích xuất bài tập và bài kiểm tra...".into(),
            Msg::FoundAssignments { count } => format!("Tìm thấy {count} bài tập/bài kiểm tra"),
            Msg::ProcessingAssignment { current, total, title } => {
                format!("Xử lý {current}/{total}: {title}")
            }
            Msg::NavigatingToAssignment => "Điều hướng đến trang bài tập...".into(),
            Msg::CheckingFeedback => "Kiểm tra nút phản hồi...".into(),
            Msg::NoFeedbackButton => "Không tìm thấy nút phản hồi, bỏ qua...".into(),
            Msg::ClickingFeedback => "Nhấn nút phản hồi...".into(),
            Msg::ScrapingQuestions => "Quét câu hỏi...".into(),
            Msg::ScrapedQuestions { count } => format!("Đã quét {count} câu hỏi"),
            Msg::NoQuestionsFound => "Không tìm thấy câu hỏi".into(),
            Msg::SavingData => "Lưu dữ liệu...".into(),
            Msg::Completed { total, processed } => {
                format!("Hoàn tất! Tổng số câu hỏi: {total}, Bài tập đã xử lý: {processed}")
            }
            Msg::Error { message } => format!("Lỗi: {message}"),
            Msg::ConnectionLost { message } => {
                format!("Mất kết nối với trang: {message}. Hãy tải lại trang và thử lại.")
            }
            Msg::NoAssignments => {
                "Không tìm thấy bài tập hoặc bài kiểm tra nào trên trang này".into()
            }
            Msg::Stopped => "Tự động quét đã bị hủy bởi người dùng".into(),
            Msg::ChoiceTitle => "Chọn lộ trình học để quét".into(),
            Msg::ChoiceCancel => "Hủy".into(),
            Msg::CoursesLabel => "khóa học".into(),
            Msg::Incorrect => "Sai".into(),
        }
    }
}
