use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 装箱的底层错误（CDP / IO / JSON 等第三方错误）
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 自动抓取错误类型
///
/// 控制类错误（`AlreadyRunning` / `NoRunActive`）只会作为请求的直接返回值出现，
/// 其余错误会让当前运行进入 `Failed`。
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// 已有运行中的抓取任务
    #[error("already running")]
    AlreadyRunning,

    /// 当前没有可取消的抓取任务
    #[error("no run active")]
    NoRunActive,

    /// 页面端服务不可达（页面已跳转、未加载、没有监听器）
    #[error("page service unreachable ({action}): {source}")]
    PageUnreachable {
        action: &'static str,
        #[source]
        source: BoxError,
    },

    /// 导航失败
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BoxError,
    },

    /// 页面加载超时
    #[error("page {url} did not finish loading within {timeout_ms}ms")]
    LoadTimeout { url: String, timeout_ms: u64 },

    /// 页面端返回了与请求不匹配的响应
    #[error("unexpected response to {action}: {detail}")]
    Protocol { action: &'static str, detail: String },

    /// 单课程模式下没有找到任何作业/测验
    #[error("No assignments found")]
    NoAssignments,

    /// 持久化存储读写失败
    #[error("store error ({path}): {source}")]
    Store {
        path: String,
        #[source]
        source: BoxError,
    },

    /// 设置文件读写失败
    #[error("settings error ({path}): {source}")]
    Settings {
        path: String,
        #[source]
        source: BoxError,
    },
}

/// 错误分类，供控制端区分提示文案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// 与页面的连接中断
    Connectivity,
    /// 没有可抓取的数据
    NoData,
    /// 其他内部错误
    Internal,
}

impl ScrapeError {
    /// 创建页面不可达错误
    pub fn unreachable(action: &'static str, source: impl Into<BoxError>) -> Self {
        ScrapeError::PageUnreachable {
            action,
            source: source.into(),
        }
    }

    /// 创建导航失败错误
    pub fn navigation(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ScrapeError::Navigation {
            url: url.into(),
            source: source.into(),
        }
    }

    /// 创建存储错误
    pub fn store(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ScrapeError::Store {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn settings(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ScrapeError::Settings {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::PageUnreachable { .. }
            | ScrapeError::Navigation { .. }
            | ScrapeError::LoadTimeout { .. } => ErrorKind::Connectivity,
            ScrapeError::NoAssignments => ErrorKind::NoData,
            _ => ErrorKind::Internal,
        }
    }

    /// 是否为连接类错误
    pub fn is_connectivity(&self) -> bool {
        self.kind() == ErrorKind::Connectivity
    }
}

/// 库内部结果类型
pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_errors_use_fixed_messages() {
        assert_eq!(ScrapeError::AlreadyRunning.to_string(), "already running");
        assert_eq!(ScrapeError::NoRunActive.to_string(), "no run active");
    }

    #[test]
    fn navigation_and_unreachable_are_connectivity() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(ScrapeError::unreachable("listAssignments", io).is_connectivity());
        let err = ScrapeError::LoadTimeout {
            url: "https://example.org".into(),
            timeout_ms: 10,
        };
        assert_eq!(err.kind(), ErrorKind::Connectivity);
        assert_eq!(ScrapeError::NoAssignments.kind(), ErrorKind::NoData);
    }
}
