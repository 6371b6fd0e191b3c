//! 题目存储服务 - 业务能力层
//!
//! 累积的题目列表只以存储为准，编排层只做追加 / 读取 / 清空。

use crate::error::{Result, ScrapeError};
use crate::models::ScrapedQuestion;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 持久化的题目列表
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// 读取全部题目
    async fn load(&self) -> Result<Vec<ScrapedQuestion>>;

    /// 追加题目（读取 → 拼接 → 写回），返回追加后的总数
    async fn append(&self, questions: &[ScrapedQuestion]) -> Result<usize>;

    async fn clear(&self) -> Result<()>;

    /// 用给定列表整体替换
    async fn replace(&self, questions: Vec<ScrapedQuestion>) -> Result<()>;
}

/// 单个 JSON 文件保存的题目列表
pub struct JsonFileStore {
    path: PathBuf,
    // 同一进程内串行化读改写
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_all(&self) -> Result<Vec<ScrapedQuestion>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ScrapeError::store(self.display_path(), e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| ScrapeError::store(self.display_path(), e))
    }

    /// 先写临时文件再改名，避免写到一半时留下损坏的文件
    async fn write_all(&self, questions: &[ScrapedQuestion]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ScrapeError::store(self.display_path(), e))?;
        }
        let json = serde_json::to_string_pretty(questions)
            .map_err(|e| ScrapeError::store(self.display_path(), e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| ScrapeError::store(self.display_path(), e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ScrapeError::store(self.display_path(), e))?;
        Ok(())
    }
}

#[async_trait]
impl QuestionStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<ScrapedQuestion>> {
        self.read_all().await
    }

    async fn append(&self, questions: &[ScrapedQuestion]) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read_all().await?;
        all.extend_from_slice(questions);
        self.write_all(&all).await?;
        debug!("追加 {} 道题目，共 {} 道", questions.len(), all.len());
        Ok(all.len())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_all(&[]).await?;
        info!("已清空题目数据: {}", self.display_path());
        Ok(())
    }

    async fn replace(&self, questions: Vec<ScrapedQuestion>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_all(&questions).await?;
        debug!("题目数据已替换为 {} 道", questions.len());
        Ok(())
    }
}

/// 内存中的题目列表
#[derive(Default)]
pub struct MemoryStore {
    questions: Mutex<Vec<ScrapedQuestion>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<ScrapedQuestion>) -> Self {
        Self {
            questions: Mutex::new(questions),
        }
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn load(&self) -> Result<Vec<ScrapedQuestion>> {
        Ok(self.questions.lock().await.clone())
    }

    async fn append(&self, questions: &[ScrapedQuestion]) -> Result<usize> {
        let mut guard = self.questions.lock().await;
        guard.extend_from_slice(questions);
        Ok(guard.len())
    }

    async fn clear(&self) -> Result<()> {
        self.questions.lock().await.clear();
        Ok(())
    }

    async fn replace(&self, questions: Vec<ScrapedQuestion>) -> Result<()> {
        *self.questions.lock().await = questions;
        Ok(())
    }
}
