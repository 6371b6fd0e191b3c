//! 设置存储服务 - 业务能力层
//!
//! 用户设置保存在 TOML 文件中，进程重启后仍然有效

use crate::error::{Result, ScrapeError};
use crate::models::UserSettings;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 读取设置，文件不存在时返回默认值
    ///
    /// 单个字段不合法时该字段回退到默认值，整体格式错误才报错
    pub async fn load(&self) -> Result<UserSettings> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("设置文件不存在，使用默认设置: {}", self.path.display());
                return Ok(UserSettings::default());
            }
            Err(e) => return Err(ScrapeError::settings(self.path.display().to_string(), e)),
        };
        toml::from_str(&content)
            .map_err(|e| ScrapeError::settings(self.path.display().to_string(), e))
    }

    pub async fn save(&self, settings: &UserSettings) -> Result<()> {
        let text = toml::to_string_pretty(settings)
            .map_err(|e| ScrapeError::settings(self.path.display().to_string(), e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ScrapeError::settings(self.path.display().to_string(), e))?;
        }
        fs::write(&self.path, text)
            .await
            .map_err(|e| ScrapeError::settings(self.path.display().to_string(), e))?;
        info!("设置已保存: {}", self.path.display());
        Ok(())
    }
}
