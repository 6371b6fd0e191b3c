//! 课程结构相关的数据模型（页面端产出，编排层消费）

use serde::{Deserialize, Serialize};

/// 作业类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentKind {
    Assignment,
    Quiz,
}

impl AssignmentKind {
    /// 根据链接判断类型，测验页面的路径中带有 `quiz` 或 `exam`
    pub fn from_url(url: &str) -> Self {
        if url.contains("/quiz/") || url.contains("/exam/") {
            AssignmentKind::Quiz
        } else {
            AssignmentKind::Assignment
        }
    }
}

/// 单个作业 / 测验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub title: String,
    #[serde(default)]
    pub module_name: String,
    pub url: String,
    pub kind: AssignmentKind,
}

/// 课程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub link: String,
}

/// 学习路径：一组有序课程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// 课程首个内容页的位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLocation {
    pub url: String,
}
