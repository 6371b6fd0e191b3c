//! 单次运行的状态（只由编排层修改）

use crate::error::{ErrorKind, ScrapeError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    /// 已收到取消请求，等待运行循环在检查点响应
    Cancelling,
    Completed,
    Failed,
}

impl RunStatus {
    /// 是否有运行循环在执行
    pub fn is_active(self) -> bool {
        matches!(self, RunStatus::Running | RunStatus::Cancelling)
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// 一条运行日志
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    /// `[HH:MM:SS]`
    pub timestamp: String,
}

impl LogEntry {
    pub fn now(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: chrono::Local::now().format("[%H:%M:%S]").to_string(),
        }
    }
}

/// 进度：total 在枚举作业后设置，current 为当前作业的序号（从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// 协作式取消标志
///
/// 外部请求只负责置位，运行循环在检查点读取。克隆共享同一个标志。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 运行状态
#[derive(Debug, Default)]
pub struct RunState {
    pub status: RunStatus,
    pub cancel: CancelFlag,
    pub log: Vec<LogEntry>,
    pub progress: Progress,
    pub last_error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl RunState {
    /// 开始新一轮运行：清空日志、进度与错误
    pub fn begin(&mut self) {
        self.status = RunStatus::Running;
        self.cancel.reset();
        self.log.clear();
        self.progress = Progress::default();
        self.last_error = None;
        self.error_kind = None;
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    /// 设置作业总数，同时把 current 归零
    pub fn set_total(&mut self, total: usize) {
        self.progress = Progress { current: 0, total };
    }

    /// 设置当前作业序号，不回退、不超过 total
    pub fn set_current(&mut self, current: usize) {
        let next = current.min(self.progress.total);
        if next > self.progress.current {
            self.progress.current = next;
        }
    }

    pub fn finish_completed(&mut self) {
        self.status = RunStatus::Completed;
        self.cancel.reset();
    }

    /// 取消结束的运行回到 Idle，不记录错误
    pub fn finish_cancelled(&mut self) {
        self.status = RunStatus::Idle;
        self.cancel.reset();
    }

    pub fn finish_failed(&mut self, error: &ScrapeError) {
        self.status = RunStatus::Failed;
        self.cancel.reset();
        self.last_error = Some(error.to_string());
        self.error_kind = Some(error.kind());
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            status: self.status,
            cancel_requested: self.cancel.is_requested(),
            log: self.log.clone(),
            progress: self.progress,
            last_error: self.last_error.clone(),
            error_kind: self.error_kind,
        }
    }
}

/// 状态查询的返回值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub status: RunStatus,
    pub cancel_requested: bool,
    pub log: Vec<LogEntry>,
    pub progress: Progress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl StatusSnapshot {
    /// 运行已结束（含取消后回到 Idle）
    pub fn is_terminal(&self) -> bool {
        !self.status.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_resets_previous_run() {
        let mut state = RunState::default();
        state.push_log(LogEntry::now("old", Severity::Info));
        state.set_total(3);
        state.set_current(2);
        state.finish_failed(&ScrapeError::NoAssignments);
        state.cancel.request();

        state.begin();
        assert_eq!(state.status, RunStatus::Running);
        assert!(state.log.is_empty());
        assert_eq!(state.progress, Progress::default());
        assert!(state.last_error.is_none());
        assert!(!state.cancel.is_requested());
    }

    #[test]
    fn current_never_decreases_or_exceeds_total() {
        let mut state = RunState::default();
        state.set_total(2);
        state.set_current(2);
        state.set_current(1);
        assert_eq!(state.progress.current, 2);
        state.set_current(9);
        assert_eq!(state.progress.current, 2);

        state.set_total(0);
        assert_eq!(state.progress, Progress { current: 0, total: 0 });
    }

    #[test]
    fn failure_records_kind_and_message() {
        let mut state = RunState::default();
        state.begin();
        state.finish_failed(&ScrapeError::NoAssignments);
        let snap = state.snapshot();
        assert_eq!(snap.status, RunStatus::Failed);
        assert_eq!(snap.last_error.as_deref(), Some("No assignments found"));
        assert_eq!(snap.error_kind, Some(ErrorKind::NoData));
        assert!(snap.is_terminal());
    }

    #[test]
    fn timestamp_is_bracketed_clock() {
        let entry = LogEntry::now("x", Severity::Success);
        assert_eq!(entry.timestamp.len(), "[00:00:00]".len());
        assert!(entry.timestamp.starts_with('[') && entry.timestamp.ends_with(']'));
    }
}
