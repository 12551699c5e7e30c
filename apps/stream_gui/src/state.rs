//! 应用状态

use crossbeam_channel::{Receiver, Sender};
use stream_player::StreamSession;
use stream_state::HostCommand;

/// 应用状态
pub struct AppState {
    pub session: StreamSession,
    /// 会话重建失败时的提示
    pub fatal: Option<String>,

    // 宿主命令通信
    host_tx: Sender<HostCommand>,
    host_rx: Receiver<HostCommand>,
}

impl AppState {
    pub fn new(session: StreamSession) -> Self {
        let (host_tx, host_rx) = crossbeam_channel::bounded(4);
        Self {
            session,
            fatal: None,
            host_tx,
            host_rx,
        }
    }

    /// 处理媒体源事件和宿主命令，返回是否需要重绘
    pub fn poll_events(&mut self) -> bool {
        let mut changed = self.session.poll_events();

        let commands: Vec<_> = self.host_rx.try_iter().collect();
        for command in commands {
            match command {
                HostCommand::ReloadSession => {
                    self.reload();
                    changed = true;
                }
            }
        }
        changed
    }

    /// 强制重载（错误视图按钮和状态栏链接）
    pub fn request_reload(&mut self) {
        self.session.request_full_reload(&mut self.host_tx);
    }

    pub fn toggle_play(&mut self) {
        self.session.toggle_play();
    }

    pub fn play(&mut self) {
        self.session.play();
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.session.set_volume(volume);
    }

    pub fn send_message(&mut self) {
        self.session.submit_draft();
    }

    fn reload(&mut self) {
        match self.session.reload() {
            Ok(()) => {
                self.fatal = None;
                tracing::info!("session reloaded");
            }
            Err(e) => {
                tracing::error!(error = %e, "session reload failed");
                self.fatal = Some(e.to_string());
            }
        }
    }
}
