//! 抓取到的题目记录

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(default)]
    pub selected: bool,
}

/// 抓取到的题目（持久化，跨运行累积）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedQuestion {
    pub question_number: String,
    pub question_text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub answered_correctly: bool,
}

impl ScrapedQuestion {
    /// 被选中的选项文本（没有则为空字符串）
    pub fn selected_text(&self) -> &str {
        self.choices
            .iter()
            .find(|c| c.selected)
            .map(|c| c.text.as_str())
            .unwrap_or("")
    }

    /// 清理页面文本中的多余空白
    pub fn normalized(mut self) -> Self {
        self.question_number = normalize_text(&self.question_number);
        self.question_text = normalize_text(&self.question_text);
        for choice in &mut self.choices {
            choice.text = normalize_text(&choice.text);
        }
        self
    }
}

/// 合并连续空白并去掉首尾空白
pub fn normalize_text(text: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
    re.replace_all(text.trim(), " ").into_owned()
}
