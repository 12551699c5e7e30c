//! 宿主环境接口

/// 宿主命令（会话 -> 宿主）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// 丢弃全部会话状态并重新初始化
    ReloadSession,
}

/// 宿主环境：负责销毁并重建整个会话
pub trait SessionHost {
    fn reload_session(&mut self);
}

impl SessionHost for crossbeam_channel::Sender<HostCommand> {
    fn reload_session(&mut self) {
        if self.send(HostCommand::ReloadSession).is_err() {
            tracing::warn!("host is gone, reload request dropped");
        }
    }
}
