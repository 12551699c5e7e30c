//! 本地聊天消息存储

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValidationError;

/// 默认保留的消息条数
pub const DEFAULT_CHAT_CAPACITY: usize = 500;

/// 聊天消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }

    pub fn is_from(&self, author: &str) -> bool {
        self.author == author
    }
}

/// 有序、只追加的消息列表加上当前草稿。
///
/// 超出容量时丢弃最旧的消息。
#[derive(Debug, Clone)]
pub struct ChatStore {
    messages: VecDeque<ChatMessage>,
    draft: String,
    capacity: usize,
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHAT_CAPACITY)
    }
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 容量至少为 1
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            draft: String::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 按插入顺序遍历
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// 追加消息，返回新的消息条数。去除首尾空白后为空的文本被拒绝，
    /// 存储时保留原始文本。
    pub fn append_message(
        &mut self,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<usize, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        if self.messages.len() == self.capacity {
            self.messages.pop_front();
            debug!(capacity = self.capacity, "chat history full, dropped oldest");
        }
        self.messages.push_back(ChatMessage::new(author, text));
        Ok(self.messages.len())
    }

    /// 替换草稿，不做校验
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// 可变草稿，供输入框直接编辑
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    /// 提交草稿。校验失败时草稿与消息列表都不变。
    pub fn submit_draft(&mut self, author: impl Into<String>) -> Result<usize, ValidationError> {
        if self.draft.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        let text = std::mem::take(&mut self.draft);
        self.append_message(author, text)
    }

    /// 批量追加（如欢迎消息），返回被跳过的空白消息条数
    pub fn extend_from<I>(&mut self, messages: I) -> usize
    where
        I: IntoIterator<Item = ChatMessage>,
    {
        let mut skipped = 0;
        for message in messages {
            let author = message.author.clone();
            if let Err(err) = self.append_message(message.author, message.text) {
                debug!(%author, error = %err, "skipped blank seed message");
                skipped += 1;
            }
        }
        skipped
    }
}
