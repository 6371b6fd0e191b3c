//! 控制消息分发
//!
//! 控制端（弹窗 / 命令行）发来的请求在这里转换为编排器调用。
//! 拒绝类错误通过响应返回，不会写进运行状态。

use crate::models::{ScrapeSettings, ScrapedQuestion, StatusSnapshot};
use crate::orchestrator::Orchestrator;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// 控制端请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ControlRequest {
    Start {
        #[serde(default)]
        settings: ScrapeSettings,
    },
    Status,
    Cancel,
    GetData,
    AppendData {
        #[serde(default)]
        data: Vec<ScrapedQuestion>,
    },
    ClearData,
    SetData {
        #[serde(default)]
        data: Vec<ScrapedQuestion>,
    },
    /// 手动抓取当前页面
    #[serde(alias = "scrape")]
    ScrapeCurrent,
}

/// start / cancel 的应答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 存储写操作的应答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Stored {
    fn ok(total_count: Option<usize>) -> Self {
        Self {
            success: true,
            total_count,
            scraped_count: None,
            error: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            total_count: None,
            scraped_count: None,
            error: Some(error.to_string()),
        }
    }
}

/// 控制端响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ControlResponse {
    Ack(Ack),
    Status(StatusSnapshot),
    Data { data: Vec<ScrapedQuestion> },
    Stored(Stored),
}

/// 处理一条控制请求
pub async fn handle(orchestrator: &Orchestrator, request: ControlRequest) -> ControlResponse {
    debug!("控制请求: {:?}", std::mem::discriminant(&request));
    match request {
        ControlRequest::Start { settings } => ack(orchestrator.start(settings).await),
        ControlRequest::Cancel => ack(orchestrator.cancel().await),
        ControlRequest::Status => ControlResponse::Status(orchestrator.status().await),
        ControlRequest::GetData => match orchestrator.store().load().await {
            Ok(data) => ControlResponse::Data { data },
            Err(e) => {
                error!("读取题目数据失败: {}", e);
                ControlResponse::Stored(Stored::failed(e))
            }
        },
        ControlRequest::AppendData { data } => {
            match orchestrator.store().append(&data).await {
                Ok(total) => ControlResponse::Stored(Stored::ok(Some(total))),
                Err(e) => ControlResponse::Stored(Stored::failed(e)),
            }
        }
        ControlRequest::ClearData => match orchestrator.store().clear().await {
            Ok(()) => ControlResponse::Stored(Stored::ok(None)),
            Err(e) => ControlResponse::Stored(Stored::failed(e)),
        },
        ControlRequest::SetData { data } => {
            let count = data.len();
            match orchestrator.store().replace(data).await {
                Ok(()) => ControlResponse::Stored(Stored::ok(Some(count))),
                Err(e) => ControlResponse::Stored(Stored::failed(e)),
            }
        }
        ControlRequest::ScrapeCurrent => match orchestrator.scrape_current().await {
            Ok((scraped, total)) => ControlResponse::Stored(Stored {
                scraped_count: Some(scraped),
                ..Stored::ok(Some(total))
            }),
            Err(e) => {
                warn!("手动抓取失败: {}", e);
                ControlResponse::Stored(Stored::failed(e))
            }
        },
    }
}

fn ack(result: crate::error::Result<()>) -> ControlResponse {
    ControlResponse::Ack(match result {
        Ok(()) => Ack {
            accepted: true,
            error: None,
        },
        Err(e) => Ack {
            accepted: false,
            error: Some(e.to_string()),
        },
    })
}
