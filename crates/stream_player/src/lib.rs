//! stream_player - 媒体源引擎与会话
//!
//! 提供模拟媒体源线程、会话配置，以及把播放状态机、聊天存储和媒体源
//! 连接在一起的 `StreamSession`。

mod command;
mod config;
mod engine;
mod session;

pub use command::*;
pub use config::*;
pub use engine::*;
pub use session::*;
