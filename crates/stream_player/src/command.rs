//! 媒体源命令定义

/// 媒体源命令（会话 -> 媒体源）
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCommand {
    /// 加载媒体地址
    Load(String),
    /// 设置播放意图
    SetPlaying(bool),
    /// 设置音量 (0.0 - 1.0)
    SetVolume(f32),
    /// 关闭媒体源
    Shutdown,
}
