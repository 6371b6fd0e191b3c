//! # Auto Scrape
//!
//! 驱动浏览器标签页，自动遍历课程的测验并抓取反馈中的题目
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `PageReady` - 等待页面加载完成事件
//!
//! ### ② 消息层（Messaging）
//! - `messaging/` - 与页面抽取服务之间的请求 / 响应协议
//! - `PageClient` - 七个类型化的页面操作
//! - `navigate_and_settle` - 可取消的导航与稳定等待
//!
//! ### ③ 业务能力层（Services）
//! - `BrowserTab` - 在真实标签页里实现页面操作与导航
//! - `QuestionStore` - 累积题目的持久化
//! - `SettingsStore` - 用户设置的持久化
//! - `export` - 题目导出
//!
//! ### ④ 流程层（Workflow）
//! - `scrape_course` - 一门课程的完整抓取流程
//! - `RunCtx` - 一次运行共享的上下文
//!
//! ### ⑤ 编排层（Orchestration）
//! - `Orchestrator` - 运行状态机（start / status / cancel）
//! - `control` - 控制端消息分发
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod messaging;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ErrorKind, Result, ScrapeError};
pub use i18n::{Language, Msg};
pub use infrastructure::JsExecutor;
pub use messaging::{Navigator, PageChannel, PageClient, PageRequest, PageResponse};
pub use models::{ScrapeSettings, ScrapedQuestion, StatusSnapshot};
pub use orchestrator::{handle, ControlRequest, ControlResponse, Orchestrator};
pub use services::{JsonFileStore, MemoryStore, QuestionStore};
pub use workflow::{scrape_course, CourseReport};
