//! 消息与导航层
//!
//! 编排层依赖的两个原语：
//! - 向当前页面的抽取服务发送请求并等待响应（`PageChannel` / `PageClient`）
//! - 让标签页跳转并等待加载完成与稳定延迟，期间可被取消（`Navigator` / `navigate_and_settle`）

pub mod channel;
pub mod navigation;
pub mod protocol;

pub use channel::{PageChannel, PageClient};
pub use navigation::{navigate_and_settle, settle, NavOutcome, Navigator, MAX_POLL_INTERVAL};
pub use protocol::{ChoiceStrings, FeedbackScrape, PageRequest, PageResponse, PathChoice};
