//! stream_state - 直播页面的核心状态机
//!
//! 提供播放意图状态机（`PlaybackController`）与本地聊天消息存储（`ChatStore`）。
//! 两者都只在单一事件线程上被修改，不做任何 I/O。

mod chat;
mod error;
mod event;
mod host;
mod playback;

pub use chat::*;
pub use error::*;
pub use event::*;
pub use host::*;
pub use playback::*;
