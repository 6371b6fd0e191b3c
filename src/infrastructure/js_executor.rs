//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"在页面里执行 JS"的能力

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::sleep;
use tracing::trace;

/// JS 执行器
///
/// 职责：
/// - 持有 Page 资源
/// - 执行脚本并反序列化结果
/// - 不认识课程 / 作业，不处理流程
#[derive(Clone)]
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于导航等非脚本操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let js_code = js_code.into();
        trace!("执行脚本: {} 字节", js_code.len());
        let result = self.page.evaluate(js_code).await.context("页面脚本执行失败")?;
        let json_value = result.into_value().context("页面脚本返回值无法解析")?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value).context("页面脚本返回值类型不符")?;
        Ok(typed_value)
    }

    /// 反复执行同一段脚本，直到 `check` 给出结果或报错
    ///
    /// `check` 返回 `Ok(None)` 表示继续等待。用于等待页面上由用户触发的结果（例如对话框选择）
    pub async fn poll_until<T>(
        &self,
        js_code: &str,
        interval: Duration,
        mut check: impl FnMut(JsonValue) -> Result<Option<T>>,
    ) -> Result<T> {
        loop {
            let value = self.eval(js_code).await?;
            if let Some(result) = check(value)? {
                return Ok(result);
            }
            sleep(interval).await;
        }
    }
}
