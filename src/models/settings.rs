//! 用户设置
//!
//! 抓取延迟与语言随 `start` 请求下发，也持久化在设置文件里。
//! 延迟字段宽松解析：缺失、为 0、负数或不是数字时都回退到默认值。

use crate::i18n::Language;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

/// 默认导航等待（毫秒）
pub const DEFAULT_NAVIGATION_DELAY_MS: u64 = 4000;
/// 默认反馈展开等待（毫秒）
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 4000;

/// 一次自动抓取的运行参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeSettings {
    #[serde(
        default = "default_navigation_delay",
        deserialize_with = "navigation_delay"
    )]
    pub navigation_delay_ms: u64,
    #[serde(default = "default_feedback_delay", deserialize_with = "feedback_delay")]
    pub feedback_delay_ms: u64,
    #[serde(default)]
    pub language: Language,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            navigation_delay_ms: DEFAULT_NAVIGATION_DELAY_MS,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
            language: Language::default(),
        }
    }
}

impl ScrapeSettings {
    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 简单预览
    #[default]
    Normal,
    /// 闪卡格式
    Formatted,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(OutputFormat::Normal),
            "formatted" | "flashcard" => Ok(OutputFormat::Formatted),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("未知的导出格式: {other}")),
        }
    }
}

/// 导出格式参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatSettings {
    pub question_separator: String,
    pub choice_separator: String,
    pub answer_prefix: String,
    pub answer_suffix: String,
    pub default_format: OutputFormat,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            question_separator: "\n\n".to_string(),
            choice_separator: "\n".to_string(),
            answer_prefix: "/".to_string(),
            answer_suffix: ";".to_string(),
            default_format: OutputFormat::Normal,
        }
    }
}

/// 设置文件的完整内容
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub scrape: ScrapeSettings,
    pub format: FormatSettings,
}

fn default_navigation_delay() -> u64 {
    DEFAULT_NAVIGATION_DELAY_MS
}

fn default_feedback_delay() -> u64 {
    DEFAULT_FEEDBACK_DELAY_MS
}

fn navigation_delay<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer
        .deserialize_any(LenientDelay)?
        .unwrap_or(DEFAULT_NAVIGATION_DELAY_MS))
}

fn feedback_delay<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer
        .deserialize_any(LenientDelay)?
        .unwrap_or(DEFAULT_FEEDBACK_DELAY_MS))
}

/// 解析用户输入的延迟字符串，非法值返回 `None`
pub fn parse_delay(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Ok(ms) = text.parse::<u64>() {
        return positive(ms);
    }
    text.parse::<f64>().ok().and_then(from_float)
}

fn positive(ms: u64) -> Option<u64> {
    (ms > 0).then_some(ms)
}

fn from_float(ms: f64) -> Option<u64> {
    (ms.is_finite() && ms >= 1.0).then(|| ms.round() as u64)
}

/// 接受整数、浮点、数字字符串，其余取值一律视为未设置
struct LenientDelay;

impl<'de> Visitor<'de> for LenientDelay {
    type Value = Option<u64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a delay in milliseconds")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(positive(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(u64::try_from(value).ok().and_then(positive))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(from_float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(parse_delay(value))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ScrapeSettings {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings = parse(json!({}));
        assert_eq!(settings, ScrapeSettings::default());
    }

    #[test]
    fn numeric_strings_and_floats_are_accepted() {
        let settings = parse(json!({
            "navigationDelayMs": "2500",
            "feedbackDelayMs": 1200.4,
            "language": "vi"
        }));
        assert_eq!(settings.navigation_delay_ms, 2500);
        assert_eq!(settings.feedback_delay_ms, 1200);
        assert_eq!(settings.language, Language::Vi);
    }

    #[test]
    fn junk_delays_fall_back() {
        let settings = parse(json!({
            "navigationDelayMs": "soon",
            "feedbackDelayMs": null,
        }));
        assert_eq!(settings.navigation_delay_ms, DEFAULT_NAVIGATION_DELAY_MS);
        assert_eq!(settings.feedback_delay_ms, DEFAULT_FEEDBACK_DELAY_MS);

        let settings = parse(json!({ "navigationDelayMs": 0, "feedbackDelayMs": -5 }));
        assert_eq!(settings.navigation_delay_ms, DEFAULT_NAVIGATION_DELAY_MS);
        assert_eq!(settings.feedback_delay_ms, DEFAULT_FEEDBACK_DELAY_MS);
    }

    #[test]
    fn user_settings_round_trip_through_toml() {
        let mut settings = UserSettings::default();
        settings.scrape.navigation_delay_ms = 1500;
        settings.format.default_format = OutputFormat::Json;

        let text = toml::to_string_pretty(&settings).unwrap();
        let back: UserSettings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn parse_delay_rejects_non_numeric() {
        assert_eq!(parse_delay(" 300 "), Some(300));
        assert_eq!(parse_delay("abc"), None);
        assert_eq!(parse_delay("0"), None);
    }
}
