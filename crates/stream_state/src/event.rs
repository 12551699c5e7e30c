//! 媒体源事件与显示状态定义

use serde::{Deserialize, Serialize};

use crate::MediaSourceError;

/// 媒体源事件（媒体源 -> 会话）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaEvent {
    /// 首次可播放
    Ready,
    /// 开始缓冲
    BufferStart,
    /// 缓冲结束
    BufferEnd,
    /// 实际开始播放
    PlaybackStarted,
    /// 媒体源错误
    Error(MediaSourceError),
}

impl MediaEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MediaEvent::Ready => "ready",
            MediaEvent::BufferStart => "buffer_start",
            MediaEvent::BufferEnd => "buffer_end",
            MediaEvent::PlaybackStarted => "playback_started",
            MediaEvent::Error(_) => "error",
        }
    }
}

/// 视图可观察到的四种渲染状态，按优先级从高到低排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    /// 错误视图，只能通过完整重载离开
    Error,
    /// 加载中
    Loading,
    /// 点击开始播放
    StartPrompt,
    /// 播放控制
    Controls,
}

impl DisplayState {
    pub fn is_terminal(self) -> bool {
        self == DisplayState::Error
    }
}
