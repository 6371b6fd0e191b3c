//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层拥有自动抓取的运行状态，是控制端唯一的入口。
//!
//! ## 模块划分
//!
//! ### `run_machine` - 运行状态机
//! - start / status / cancel
//! - 判断单课程还是学习路径模式
//! - 逐课程调用 `workflow::scrape_course`
//! - 把结局（完成 / 取消 / 失败）写回状态
//!
//! ### `control` - 控制消息分发
//! - 把控制端的 JSON 请求转换为编排器调用
//! - 代理题目存储的读写
//!
//! ## 层次关系
//!
//! ```text
//! control (控制请求)
//!     ↓
//! run_machine (一次运行)
//!     ↓
//! workflow::scrape_course (一门课程)
//!     ↓
//! messaging (页面请求 / 导航)   services (存储)
//!     ↓
//! services::BrowserTab → infrastructure (JsExecutor)
//! ```

pub mod control;
pub mod run_machine;

pub use control::{handle, Ack, ControlRequest, ControlResponse, Stored};
pub use run_machine::{Orchestrator, DEFAULT_POLL_INTERVAL};
