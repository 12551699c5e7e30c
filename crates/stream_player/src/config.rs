//! 会话配置
//!
//! 加载顺序：默认值 -> `stream.toml`（可选）-> 环境变量。

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use stream_state::{ChatMessage, DEFAULT_CHAT_CAPACITY, DEFAULT_VOLUME};

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "stream.toml";

/// 配置错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// 会话配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub source_url: String,
    pub default_volume: f32,
    pub chat_capacity: usize,
    /// 本地提交消息使用的作者名
    pub local_author: String,
    /// 需要高亮显示的主持人作者名
    pub moderator: String,
    pub welcome_messages: Vec<ChatMessage>,
    /// 模拟媒体源在报告 ready 前的预热时间
    pub warmup_ms: u64,
    /// 开始播放后模拟一次缓冲的时长，0 表示不模拟
    pub simulate_stall_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            source_url: "https://www.youtube.com/watch?v=aqz-KE-bpKQ".into(),
            default_volume: DEFAULT_VOLUME,
            chat_capacity: DEFAULT_CHAT_CAPACITY,
            local_author: "You".into(),
            moderator: "Admin".into(),
            welcome_messages: vec![
                ChatMessage::new(
                    "Admin",
                    "Welcome to the live stream! The movie will start shortly.",
                ),
                ChatMessage::new("Fan123", "Cant wait for the show!"),
            ],
            warmup_ms: 600,
            simulate_stall_ms: 0,
        }
    }
}

impl SessionConfig {
    /// 从 TOML 文本解析，缺失字段使用默认值
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// 读取配置文件；文件不存在时返回默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取配置文件并应用进程环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path.unwrap_or(Path::new(CONFIG_FILE_NAME)))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 应用环境变量覆盖
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STREAM_SOURCE_URL") {
            self.source_url = v;
        }
        if let Some(v) = lookup("STREAM_VOLUME") {
            self.default_volume = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "STREAM_VOLUME",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("STREAM_CHAT_CAPACITY") {
            self.chat_capacity = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "STREAM_CHAT_CAPACITY",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("STREAM_AUTHOR") {
            if v.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "STREAM_AUTHOR",
                    value: v,
                });
            }
            self.local_author = v;
        }
        Ok(())
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    pub fn stall(&self) -> Option<Duration> {
        (self.simulate_stall_ms > 0).then(|| Duration::from_millis(self.simulate_stall_ms))
    }
}
