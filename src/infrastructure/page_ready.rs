//! 一次性的"页面已就绪"等待
//!
//! 订阅 → 等到第一个事件 → 丢弃订阅。订阅必须在触发导航之前建立，
//! 否则可能错过加载事件。

use chromiumoxide::cdp::browser_protocol::page::EventLoadEventFired;
use chromiumoxide::error::CdpError;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadyError {
    #[error("event stream closed before the page became ready")]
    Closed,
    #[error("page did not become ready within {0:?}")]
    TimedOut(Duration),
}

/// 等待事件流中的第一个事件，流随后被丢弃（即取消订阅）
pub async fn first_event<S>(stream: S, limit: Duration) -> Result<S::Item, ReadyError>
where
    S: Stream,
{
    tokio::pin!(stream);
    match timeout(limit, stream.next()).await {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(ReadyError::Closed),
        Err(_) => Err(ReadyError::TimedOut(limit)),
    }
}

/// 页面加载完成信号
pub struct PageReady<S> {
    events: S,
}

impl PageReady<EventStream<EventLoadEventFired>> {
    /// 订阅页面的 `Page.loadEventFired`
    pub async fn subscribe(page: &Page) -> Result<Self, CdpError> {
        let events = page.event_listener::<EventLoadEventFired>().await?;
        Ok(PageReady { events })
    }
}

impl<S: Stream> PageReady<S> {
    pub fn from_stream(events: S) -> Self {
        Self { events }
    }

    /// 等待加载完成，最多等待 `limit`
    pub async fn wait(self, limit: Duration) -> Result<(), ReadyError> {
        first_event(self.events, limit).await.map(|_| ())
    }
}
