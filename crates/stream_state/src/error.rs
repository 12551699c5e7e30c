//! 错误类型

use serde::{Deserialize, Serialize};

/// 媒体源报告的错误，进入终态错误显示，不会自动重试
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Media source error: {message}")]
pub struct MediaSourceError {
    pub message: String,
}

impl MediaSourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 聊天输入校验错误
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Chat message is empty")]
    EmptyMessage,
}
